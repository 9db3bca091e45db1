use chrono::NaiveDateTime;

/// Layout used when showing portal timestamps
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a portal timestamp for display
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a last-read timestamp, showing "unread" when there is none
pub fn format_last_read(timestamp: Option<&NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => format_timestamp(ts),
        None => "unread".to_string(),
    }
}
