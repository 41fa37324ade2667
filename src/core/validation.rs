//! URL validation for incoming chat messages
//!
//! Whitelist-based: only recognized YouTube link shapes pass. Ambiguous input
//! is rejected, no download is ever attempted on an unclassified string.

use lazy_regex::{lazy_regex, Lazy, Regex};
use thiserror::Error;
use url::Url;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Not a recognized YouTube video link
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),
}

/// Link shapes accepted as YouTube video links.
///
/// Hosts: youtube.com (www/m/music), youtube-nocookie.com, youtu.be.
/// Paths: watch?v=, embed/, v/, shorts/, live/ or a bare id, each carrying an
/// 11-character video id.
static YOUTUBE_URL: Lazy<Regex> = lazy_regex!(
    r"^(?:(?i:https?)://)?(?i:(?:www\.|m\.|music\.)?(?:youtube\.com|youtube-nocookie\.com)|youtu\.be)/(?:watch\?(?:[^#\s]*&)?v=|embed/|v/|shorts/|live/)?[A-Za-z0-9_-]{11}(?:[?&#/]\S*)?$"
);

/// Returns `true` when `text` is a recognized YouTube video link.
///
/// Surrounding whitespace is ignored, anything else around the link is not.
///
/// # Examples
/// ```
/// use tubelift::core::validation::is_supported_url;
///
/// assert!(is_supported_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(is_supported_url("https://youtu.be/dQw4w9WgXcQ"));
/// assert!(is_supported_url("m.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(!is_supported_url("hello"));
/// assert!(!is_supported_url("https://evil.com/watch?v=dQw4w9WgXcQ"));
/// ```
pub fn is_supported_url(text: &str) -> bool {
    YOUTUBE_URL.is_match(text.trim())
}

/// Validates `text` and returns it as a parsed URL.
///
/// Scheme-less links get `https://` prepended so the external tool always
/// receives an absolute URL.
pub fn validate_youtube_url(text: &str) -> Result<Url, ValidationError> {
    let trimmed = text.trim();
    if !is_supported_url(trimmed) {
        return Err(ValidationError::InvalidUrl(trimmed.to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let absolute = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    Url::parse(&absolute).map_err(|_| ValidationError::InvalidUrl(trimmed.to_string()))
}
