//! UTF-8 safe string helpers
//!
//! Article text is mostly CJK, so nearly every character is multi-byte and
//! arbitrary byte positions (cursor offsets, selection ends) routinely land
//! inside a character. These helpers snap indices to character boundaries
//! before slicing, and convert between the char indices egui's text editor
//! reports and the byte offsets `String` operations need.

// Allow dead code - boundary helpers are a shared utility surface
#![allow(dead_code)]

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk backwards to the start of the character
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the
/// string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk forwards to the start of the next character
    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// Continuation bytes are `10xxxxxx`; everything else (ASCII and multi-byte
/// lead bytes) starts a character.
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b1100_0000) != 0b1000_0000
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index (as egui's text cursor reports) to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// A byte index in the middle of a character counts up to (but not
/// including) that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Timestamp Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Format a past millisecond timestamp relative to `now_ms` for list display
/// (draft lists, image history).
pub fn format_relative_time(then_ms: u64, now_ms: u64) -> String {
    let elapsed_secs = now_ms.saturating_sub(then_ms) / 1000;
    if elapsed_secs < 60 {
        return String::from("刚刚");
    }
    let minutes = elapsed_secs / 60;
    if minutes < 60 {
        return format!("{} 分钟前", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} 小时前", hours);
    }
    let days = hours / 24;
    format!("{} 天前", days)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_ascii() {
        let s = "Hello";
        assert_eq!(floor_char_boundary(s, 0), 0);
        assert_eq!(floor_char_boundary(s, 2), 2);
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 10), 5); // Beyond end
    }

    #[test]
    fn test_floor_chinese() {
        let s = "你好世界"; // Each char is 3 bytes
        assert_eq!(floor_char_boundary(s, 0), 0); // Start of '你'
        assert_eq!(floor_char_boundary(s, 1), 0); // Middle of '你'
        assert_eq!(floor_char_boundary(s, 2), 0); // Middle of '你'
        assert_eq!(floor_char_boundary(s, 3), 3); // Start of '好'
        assert_eq!(floor_char_boundary(s, 4), 3); // Middle of '好'
    }

    #[test]
    fn test_floor_emoji() {
        let s = "Hi🎉!"; // 🎉 is 4 bytes
        assert_eq!(floor_char_boundary(s, 2), 2); // Start of 🎉
        assert_eq!(floor_char_boundary(s, 3), 2);
        assert_eq!(floor_char_boundary(s, 5), 2);
        assert_eq!(floor_char_boundary(s, 6), 6); // '!'
    }

    #[test]
    fn test_ceil_ascii() {
        let s = "Hello";
        assert_eq!(ceil_char_boundary(s, 0), 0);
        assert_eq!(ceil_char_boundary(s, 2), 2);
        assert_eq!(ceil_char_boundary(s, 5), 5);
        assert_eq!(ceil_char_boundary(s, 10), 5);
    }

    #[test]
    fn test_ceil_chinese() {
        let s = "你好"; // Each char is 3 bytes
        assert_eq!(ceil_char_boundary(s, 0), 0);
        assert_eq!(ceil_char_boundary(s, 1), 3); // Middle of '你', ceils to '好'
        assert_eq!(ceil_char_boundary(s, 2), 3);
        assert_eq!(ceil_char_boundary(s, 3), 3);
    }

    #[test]
    fn test_char_to_byte_index() {
        let s = "标题Aå"; // 标(3) 题(3) A(1) å(2) = 9 bytes, 4 chars
        assert_eq!(char_index_to_byte_index(s, 0), 0);
        assert_eq!(char_index_to_byte_index(s, 1), 3);
        assert_eq!(char_index_to_byte_index(s, 2), 6);
        assert_eq!(char_index_to_byte_index(s, 3), 7);
        assert_eq!(char_index_to_byte_index(s, 4), 9); // End
        assert_eq!(char_index_to_byte_index(s, 100), 9); // Beyond end
    }

    #[test]
    fn test_byte_to_char_index() {
        let s = "标题A";
        assert_eq!(byte_index_to_char_index(s, 0), 0);
        assert_eq!(byte_index_to_char_index(s, 3), 1);
        assert_eq!(byte_index_to_char_index(s, 4), 1); // Middle of '题'
        assert_eq!(byte_index_to_char_index(s, 6), 2);
        assert_eq!(byte_index_to_char_index(s, 7), 3);
    }

    #[test]
    fn test_round_trip_on_boundaries() {
        let s = "Hello 世界! 🎉 Café";
        for (byte_idx, _) in s.char_indices() {
            let char_idx = byte_index_to_char_index(s, byte_idx);
            assert_eq!(char_index_to_byte_index(s, char_idx), byte_idx);
        }
    }

    #[test]
    fn test_boundaries_never_panic() {
        let s = "Hello 世界! 🎉 Café naïve";
        for i in 0..=s.len() + 5 {
            let floor = floor_char_boundary(s, i);
            let ceil = ceil_char_boundary(s, i);
            let _ = &s[..floor];
            let _ = &s[ceil..];
        }
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(floor_char_boundary("", 0), 0);
        assert_eq!(ceil_char_boundary("", 0), 0);
        assert_eq!(char_index_to_byte_index("", 3), 0);
        assert_eq!(byte_index_to_char_index("", 3), 0);
    }

    #[test]
    fn test_relative_time_steps() {
        let now = 10 * 24 * 3600 * 1000;
        assert_eq!(format_relative_time(now - 30 * 1000, now), "刚刚");
        assert_eq!(format_relative_time(now - 5 * 60 * 1000, now), "5 分钟前");
        assert_eq!(format_relative_time(now - 3 * 3600 * 1000, now), "3 小时前");
        assert_eq!(format_relative_time(now - 48 * 3600 * 1000, now), "2 天前");
    }

    #[test]
    fn test_relative_time_future_timestamp_is_now() {
        // Clock skew between save and display must not underflow
        assert_eq!(format_relative_time(2_000, 1_000), "刚刚");
    }
}
