//! User-facing texts sent by the request pipeline.

use indoc::{formatdoc, indoc};
use std::time::Duration;

use crate::core::config::limits;
use crate::core::utils::{format_megabytes, format_thousands};
use crate::download::metadata::VideoMetadata;

pub const INVALID_URL: &str = indoc! {"
    ❌ Please send a valid YouTube URL.

    Supported formats:
    • https://youtube.com/watch?v=...
    • https://youtu.be/...
    • https://m.youtube.com/watch?v=..."};

pub const CHECKING_INFO: &str = "🔍 Checking video information...";

pub const INFO_UNAVAILABLE: &str = "❌ Could not retrieve video information. Please check the URL and try again.";

pub const DOWNLOAD_STARTED: &str = "⬇️ Starting download...";

pub const DOWNLOAD_FAILED: &str = indoc! {"
    ❌ Download failed. This could be due to:
    • Video is too large (>45MB)
    • Video is private or restricted
    • Network issues
    • Invalid URL

    Please try again with a different video."};

pub const VIDEO_SENT: &str = "✅ Video sent successfully!";

pub const GENERIC_ERROR: &str =
    "❌ An error occurred while processing your request. Please try again later or contact support if the issue persists.";

/// Cooldown notice; `remaining` is rounded up to whole seconds.
pub fn rate_limited(cooldown: Duration, remaining: Option<Duration>) -> String {
    let mut text = format!(
        "⏳ Please wait a moment before sending another request. Rate limit: 1 video per {} seconds.",
        cooldown.as_secs()
    );
    if let Some(remaining) = remaining {
        let secs = remaining.as_millis().div_ceil(1000);
        text.push_str(&format!(" Try again in {}s.", secs));
    }
    text
}

pub fn video_info(meta: &VideoMetadata) -> String {
    formatdoc! {"
        📹 Video Info:
        Title: {title}
        Uploader: {uploader}
        Duration: {duration} seconds
        Views: {views}",
        title = meta.title,
        uploader = meta.uploader,
        duration = meta.duration_secs,
        views = format_thousands(meta.view_count),
    }
}

pub fn too_large(size_bytes: u64) -> String {
    format!(
        "❌ Video is too large ({}MB). Maximum allowed size is {}MB.",
        format_megabytes(size_bytes),
        limits::MAX_FILE_SIZE_MB
    )
}

pub fn uploading(size_bytes: u64) -> String {
    format!("📤 Uploading video ({}MB)...", format_megabytes(size_bytes))
}

pub fn video_caption(title: &str, size_bytes: u64) -> String {
    format!("🎬 {}\n📊 Size: {}MB", title, format_megabytes(size_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_video_info() {
        let meta = VideoMetadata {
            title: "X".into(),
            uploader: "Y".into(),
            duration_secs: 120,
            view_count: 5000,
            description: String::new(),
        };
        assert_eq!(
            video_info(&meta),
            "📹 Video Info:\nTitle: X\nUploader: Y\nDuration: 120 seconds\nViews: 5,000"
        );
    }

    #[test]
    fn test_rate_limited_names_cooldown() {
        let text = rate_limited(Duration::from_secs(10), Some(Duration::from_millis(6_200)));
        assert!(text.contains("1 video per 10 seconds"));
        assert!(text.ends_with("Try again in 7s."));
        assert!(!rate_limited(Duration::from_secs(10), None).contains("Try again"));
    }

    #[test]
    fn test_size_texts() {
        let size = 30 * limits::MEGABYTE;
        assert_eq!(uploading(size), "📤 Uploading video (30.0MB)...");
        assert_eq!(video_caption("X", size), "🎬 X\n📊 Size: 30.0MB");
        assert_eq!(
            too_large(50 * limits::MEGABYTE),
            "❌ Video is too large (50.0MB). Maximum allowed size is 45MB."
        );
    }

    #[test]
    fn test_static_texts() {
        assert!(INVALID_URL.starts_with("❌ Please send a valid YouTube URL.\n\nSupported formats:"));
        assert!(DOWNLOAD_FAILED.ends_with("Please try again with a different video."));
    }
}
