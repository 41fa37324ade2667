//! Classification of yt-dlp stderr output.
//!
//! Used for server-side logs only; users always get the fixed failure texts.

/// Broad category of a yt-dlp failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// Private, removed, age- or region-restricted video
    VideoUnavailable,
    /// YouTube asked for sign-in or blocked the request
    BotDetection,
    /// Timeouts, connection resets, DNS
    NetworkError,
    /// Anything else
    Unknown,
}

/// Analyzes yt-dlp stderr and picks the matching error category.
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("age-restricted")
        || stderr_lower.contains("not available in your country")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("sign in to confirm you're not a bot")
        || stderr_lower.contains("http error 403")
        || stderr_lower.contains("http error 429")
        || stderr_lower.contains("signature extraction failed")
    {
        return YtDlpErrorType::BotDetection;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("name resolution")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Short label for log lines
pub fn error_label(error_type: YtDlpErrorType) -> &'static str {
    match error_type {
        YtDlpErrorType::VideoUnavailable => "video_unavailable",
        YtDlpErrorType::BotDetection => "bot_detection",
        YtDlpErrorType::NetworkError => "network",
        YtDlpErrorType::Unknown => "unknown",
    }
}

/// Last non-empty stderr line, bounded, for compact log messages.
pub fn stderr_summary(stderr: &str) -> String {
    let line = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("<empty stderr>");
    crate::core::utils::truncate_with_ellipsis(line, 300)
}
