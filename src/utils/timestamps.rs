use chrono::{DateTime, Datelike, Utc};

/// Format a timestamp for listings, relative to now
///
/// - Under 7 days: "just now", "45m ago", "3h ago", "5d ago"
/// - Older: "Jan 15", or "Dec 3, 2024" when the year differs
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_at(timestamp, &Utc::now())
}

/// Same as [`format_timestamp`] with an explicit notion of "now"
pub fn format_timestamp_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);

    if elapsed.num_days() >= 7 {
        return if timestamp.year() == now.year() {
            timestamp.format("%b %-d").to_string()
        } else {
            timestamp.format("%b %-d, %Y").to_string()
        };
    }

    // Clock skew can put a log entry slightly in the future
    let minutes = elapsed.num_minutes().max(0);
    match (minutes / (60 * 24), minutes / 60, minutes) {
        (days, _, _) if days > 0 => format!("{}d ago", days),
        (_, hours, _) if hours > 0 => format!("{}h ago", hours),
        (_, _, minutes) if minutes > 0 => format!("{}m ago", minutes),
        _ => "just now".to_string(),
    }
}

/// Absolute timestamp used next to individual messages
pub fn format_message_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d %H:%M").to_string()
}
