/// Append `column = value` to an UPDATE's SET clause when the value is
/// present, tracking whether a separator is needed.
macro_rules! push_update_field {
    ($builder:expr, $sep:expr, $column:expr, $value:expr) => {
        if let Some(value) = $value {
            if $sep {
                $builder.push(", ");
            }
            $builder.push(concat!($column, " = "));
            $builder.push_bind(value);
            $sep = true;
        }
    };
}

pub(crate) use push_update_field;
