//! Fixed-offset hour extraction from trip datetime fields.

/// Shortest datetime string that can carry an hour.
const MIN_DATETIME_LEN: usize = 16;

/// Extracts the hour of day from a `<date> <HH>...` datetime string.
///
/// Returns `None` when the string is shorter than 16 bytes, has no space,
/// has fewer than three bytes after the first space, when the two bytes
/// after the space are not both ASCII digits, or when they read as 24..=99.
/// Nothing else about the string is validated.
pub fn extract_hour(datetime: &str) -> Option<u8> {
    let bytes = datetime.as_bytes();
    if bytes.len() < MIN_DATETIME_LEN {
        return None;
    }

    let space = bytes.iter().position(|&b| b == b' ')?;
    if space + 3 >= bytes.len() {
        return None;
    }

    let (tens, ones) = (bytes[space + 1], bytes[space + 2]);
    if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
        return None;
    }

    let hour = (tens - b'0') * 10 + (ones - b'0');
    (hour <= 23).then_some(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_hour_from_iso_like_timestamp() {
        assert_eq!(extract_hour("2024-01-01 08:15:00"), Some(8));
        assert_eq!(extract_hour("2024-01-01 00:00:00"), Some(0));
    }

    #[test]
    fn test_hour_boundaries() {
        assert_eq!(extract_hour("2024-01-01 23:59:59"), Some(23));
        assert_eq!(extract_hour("2024-01-01 24:00:00"), None);
        assert_eq!(extract_hour("2024-01-01 99:00:00"), None);
    }

    #[test]
    fn test_rejects_short_strings() {
        // 15 bytes
        assert_eq!(extract_hour("2024-01-01 08:1"), None);
        // 16 bytes
        assert_eq!(extract_hour("2024-01-01 08:15"), Some(8));
        assert_eq!(extract_hour(""), None);
    }

    #[test]
    fn test_rejects_non_digit_hour() {
        assert_eq!(extract_hour("2024-01-01 1x:00:00"), None);
        assert_eq!(extract_hour("2024-01-01 x1:00:00"), None);
        assert_eq!(extract_hour("2024-01-01  8:00:00"), None);
    }

    #[test]
    fn test_rejects_missing_space() {
        assert_eq!(extract_hour("2024-01-01T08:15:00"), None);
    }

    #[test]
    fn test_needs_three_bytes_after_space() {
        assert_eq!(extract_hour("aaaaaaaaaaaaa 08"), None);
        assert_eq!(extract_hour("aaaaaaaaaaaa 08:"), Some(8));
    }

    #[test]
    fn test_uses_first_space_only() {
        assert_eq!(extract_hour("Mon 2024-01-01 08:00"), Some(20));
        assert_eq!(extract_hour("2024-01-01 07:00 PM"), Some(7));
    }
}
