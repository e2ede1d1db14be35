/// Format a cooldown interval largest-unit-first with no separators (e.g. `2m30s`, `1h`).
///
/// Zero renders as `disabled`.
pub fn format_interval(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "disabled".to_owned();
    }

    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{}s", seconds));
    }

    out
}

/// Render a user mention.
pub fn user_mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

/// Render a channel mention.
pub fn channel_mention(channel_id: u64) -> String {
    format!("<#{}>", channel_id)
}

#[cfg(test)]
mod tests {
    use super::{channel_mention, format_interval, user_mention};

    #[test]
    fn interval_formatting() {
        assert_eq!(format_interval(0), "disabled");
        assert_eq!(format_interval(59), "59s");
        assert_eq!(format_interval(60), "1m");
        assert_eq!(format_interval(150), "2m30s");
        assert_eq!(format_interval(300), "5m");
        assert_eq!(format_interval(3600), "1h");
        assert_eq!(format_interval(3605), "1h5s");
        assert_eq!(format_interval(3670), "1h1m10s");
        assert_eq!(format_interval(90000), "25h");
    }

    #[test]
    fn mentions() {
        assert_eq!(user_mention(42), "<@42>");
        assert_eq!(channel_mention(7), "<#7>");
    }
}
