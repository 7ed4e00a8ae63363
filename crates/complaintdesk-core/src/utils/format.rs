use chrono::NaiveDateTime;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

/// Format an API timestamp for display.
/// The API emits naive timestamps (`2024-05-01T09:30:00.123456`), sometimes with an offset.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else if date.len() >= 10 {
        // Keep the YYYY-MM-DD part
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}
