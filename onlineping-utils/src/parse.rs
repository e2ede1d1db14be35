/// Parse a human-entered interval like `300`, `5m`, `2m30s`, or `1h 5m` into seconds.
///
/// A purely numeric input is a literal second count. Anything else must be made up
/// entirely of `<digits><unit>` segments with `h`, `m`, or `s` units (any order,
/// case-insensitive, whitespace between segments ignored). Bare digits mixed with unit segments are
/// rejected. Zero is a valid result.
pub fn parse_interval_seconds(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return trimmed.parse::<u64>().ok();
    }

    let compact: String = trimmed
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor || cursor >= bytes.len() {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        let multiplier = match bytes[cursor] {
            b's' => 1_u64,
            b'm' => 60_u64,
            b'h' => 60_u64 * 60,
            _ => return None,
        };
        cursor += 1;

        let part_seconds = number.checked_mul(multiplier)?;
        total_seconds = total_seconds.checked_add(part_seconds)?;
    }

    Some(total_seconds)
}

/// Parse an on/off toggle word.
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" | "enabled" => Some(true),
        "off" | "false" | "no" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_interval_seconds, parse_toggle};

    #[test]
    fn plain_digits_are_seconds() {
        assert_eq!(parse_interval_seconds("300"), Some(300));
        assert_eq!(parse_interval_seconds("  0 "), Some(0));
    }

    #[test]
    fn unit_segments_accumulate_in_any_order() {
        assert_eq!(parse_interval_seconds("5m"), Some(300));
        assert_eq!(parse_interval_seconds("2m30s"), Some(150));
        assert_eq!(parse_interval_seconds("30s2m"), Some(150));
        assert_eq!(parse_interval_seconds("1H 5M"), Some(3900));
        assert_eq!(parse_interval_seconds("0s"), Some(0));
    }

    #[test]
    fn rejects_malformed_intervals() {
        assert_eq!(parse_interval_seconds(""), None);
        assert_eq!(parse_interval_seconds("abc"), None);
        assert_eq!(parse_interval_seconds("5m30"), None);
        assert_eq!(parse_interval_seconds("5d"), None);
        assert_eq!(parse_interval_seconds("-5"), None);
        assert_eq!(parse_interval_seconds("m"), None);
    }

    #[test]
    fn split_digits_are_not_a_second_count() {
        assert_eq!(parse_interval_seconds("3 00"), None);
        assert_eq!(parse_interval_seconds("1 5"), None);
        assert_eq!(parse_interval_seconds("1h 5m"), Some(3900));
    }

    #[test]
    fn parses_toggles() {
        assert_eq!(parse_toggle("ON"), Some(true));
        assert_eq!(parse_toggle("off"), Some(false));
        assert_eq!(parse_toggle("maybe"), None);
    }
}
