//! Small formatting helpers shared by the probe and the chat messages.

use crate::core::config::limits::MEGABYTE;

/// Truncates `text` to at most `max_chars` characters, appending `...` when
/// something was cut. Counts Unicode scalar values, never splits a character.
///
/// # Example
///
/// ```
/// use tubelift::core::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
/// assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Size in megabytes with one decimal, as shown to users ("30.0").
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / MEGABYTE as f64)
}

/// Groups digits by thousands: 1234567 -> "1,234,567".
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        let long = "x".repeat(250);
        let truncated = truncate_with_ellipsis(&long, 200);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));

        let exact = "y".repeat(200);
        assert_eq!(truncate_with_ellipsis(&exact, 200), exact);
        assert_eq!(truncate_with_ellipsis("", 200), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "привет мир";
        assert_eq!(truncate_with_ellipsis(text, 6), "привет...");
        assert_eq!(truncate_with_ellipsis("🎬🎬🎬", 2), "🎬🎬...");
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(30 * MEGABYTE), "30.0");
        assert_eq!(format_megabytes(MEGABYTE + MEGABYTE / 2), "1.5");
        assert_eq!(format_megabytes(0), "0.0");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(5000), "5,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
