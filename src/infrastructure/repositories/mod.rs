pub(crate) mod macros;
pub mod profiles;
pub mod scans;
pub mod tokens;
