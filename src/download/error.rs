use std::time::Duration;
use thiserror::Error;

/// Structured error type for external tool and download operations.
///
/// These never reach the user verbatim: the probe and the downloader log them
/// and report plain failure upward.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp ran but exited with a failure status
    #[error("yt-dlp failed: {0}")]
    YtDlp(String),
    /// The tool binary could not be started
    #[error("failed to start yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),
    /// The call exceeded its deadline and was killed
    #[error("yt-dlp timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// The call was cancelled before finishing
    #[error("yt-dlp call cancelled")]
    Cancelled,
    /// Expected file not found after the tool exited
    #[error("no downloaded file found for {0}")]
    FileNotFound(String),
    /// Artifact over the size ceiling after every allowed tier
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
    /// Metadata JSON could not be parsed
    #[error("invalid metadata JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Filesystem errors while locating or measuring the artifact
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::YtDlp(_) => "ytdlp",
            DownloadError::Spawn(_) => "spawn",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::Cancelled => "cancelled",
            DownloadError::FileNotFound(_) => "file_not_found",
            DownloadError::TooLarge { .. } => "too_large",
            DownloadError::Parse(_) => "parse",
            DownloadError::Io(_) => "io",
        }
    }
}
