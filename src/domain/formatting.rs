/// Format a stored school grade for display: `"4"` becomes `"4th Grade"`.
/// Values that already mention "grade" or are not numeric pass through
/// unchanged; an absent grade renders as `"Reader"`.
pub fn format_grade(grade: Option<&str>) -> String {
    let Some(grade) = grade.map(str::trim).filter(|s| !s.is_empty()) else {
        return "Reader".to_string();
    };

    if grade.to_lowercase().contains("grade") {
        return grade.to_string();
    }

    let Ok(num) = grade.parse::<u32>() else {
        return grade.to_string();
    };

    let suffix = match (num % 10, num % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };

    format!("{num}{suffix} Grade")
}
