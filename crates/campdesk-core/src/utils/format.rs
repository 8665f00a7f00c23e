use chrono::{NaiveDate, NaiveTime};

use crate::models::WALL_TIME_FORMAT;

/// Truncate a string to a maximum number of characters, adding an ellipsis
/// if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// "Mon, Jul 7"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Normalize operator input to zero-padded "HH:MM".
///
/// Accepts "9:05", "09:05", "905" and "0905". Anything else returns None so
/// the form keeps the raw text and the validator reports it.
pub fn normalize_wall_time(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let parsed = if input.contains(':') {
        NaiveTime::parse_from_str(input, "%H:%M").ok()
    } else if input.len() >= 3 && input.len() <= 4 && input.chars().all(|c| c.is_ascii_digit()) {
        let (h, m) = input.split_at(input.len() - 2);
        let hour = h.parse().ok()?;
        let minute = m.parse().ok()?;
        NaiveTime::from_hms_opt(hour, minute, 0)
    } else {
        None
    };
    parsed.map(|t| t.format(WALL_TIME_FORMAT).to_string())
}
