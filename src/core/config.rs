use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::AppError;

/// Configuration constants for the bot
/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Working directory for downloaded artifacts
/// Read from DOWNLOAD_FOLDER environment variable
/// Defaults to ./downloads, supports tilde (~) expansion
pub static DOWNLOAD_FOLDER: Lazy<PathBuf> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "./downloads".to_string());
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: tubelift.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "tubelift.log".to_string()));

/// Custom Bot API server (local telegram-bot-api), if any
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_API_URL")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
});

/// Reads the bot token from BOT_TOKEN (or TELOXIDE_TOKEN).
///
/// There is no built-in fallback: a missing or blank token is a configuration
/// error the caller must surface before touching the Bot API.
pub fn bot_token() -> Result<SecretString, AppError> {
    let raw = env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default();
    parse_token(&raw)
}

fn parse_token(raw: &str) -> Result<SecretString, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Config(
            "BOT_TOKEN is not set (TELOXIDE_TOKEN is accepted as an alias)".to_string(),
        ));
    }
    Ok(SecretString::from(trimmed.to_string()))
}

fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

/// File size limits
pub mod limits {
    /// Bytes in one megabyte as shown to users (binary megabyte)
    pub const MEGABYTE: u64 = 1024 * 1024;

    /// Hard ceiling for an artifact handed to the transport (45 MB).
    /// Telegram rejects bot uploads above 50 MB, this leaves headroom.
    pub const MAX_FILE_SIZE_MB: u64 = 45;

    /// Size estimate the degraded tier asks yt-dlp to stay under
    pub const DEGRADED_TARGET_MB: u64 = 40;

    /// Hard ceiling in bytes
    pub const fn max_file_size_bytes() -> u64 {
        MAX_FILE_SIZE_MB * MEGABYTE
    }
}

/// Rate limiting configuration
pub mod rate_limit {
    use super::Duration;

    /// Minimum time between two accepted requests of one user (in seconds)
    pub const COOLDOWN_SECONDS: u64 = 10;

    /// How often expired entries are swept from the limiter (in seconds)
    pub const SWEEP_INTERVAL_SECONDS: u64 = 300;

    /// Cooldown duration
    pub fn cooldown() -> Duration {
        Duration::from_secs(COOLDOWN_SECONDS)
    }

    /// Sweep interval duration
    pub fn sweep_interval() -> Duration {
        Duration::from_secs(SWEEP_INTERVAL_SECONDS)
    }
}

/// Download configuration
pub mod download {
    use super::{env_secs, Duration, Lazy};

    /// Default timeout for metadata-only yt-dlp calls (in seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 60;

    /// Default timeout for one yt-dlp download attempt (in seconds)
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 600;

    /// Timeout for `yt-dlp --version` at startup
    pub const VERSION_TIMEOUT_SECS: u64 = 15;

    /// Probe timeout, overridable via YTDLP_PROBE_TIMEOUT_SECS
    pub static PROBE_TIMEOUT: Lazy<Duration> =
        Lazy::new(|| Duration::from_secs(env_secs("YTDLP_PROBE_TIMEOUT_SECS", PROBE_TIMEOUT_SECS)));

    /// Download timeout, overridable via YTDLP_DOWNLOAD_TIMEOUT_SECS
    pub static DOWNLOAD_TIMEOUT: Lazy<Duration> =
        Lazy::new(|| Duration::from_secs(env_secs("YTDLP_DOWNLOAD_TIMEOUT_SECS", DOWNLOAD_TIMEOUT_SECS)));

    /// yt-dlp --version timeout duration
    pub fn version_timeout() -> Duration {
        Duration::from_secs(VERSION_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for a 45 MB video upload on a slow link
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_token_rejects_blank() {
        assert!(matches!(parse_token(""), Err(AppError::Config(_))));
        assert!(matches!(parse_token("   \n"), Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_token_trims() {
        let token = parse_token("  123:abc \n").unwrap();
        assert_eq!(token.expose_secret(), "123:abc");
    }

    #[test]
    fn test_limits() {
        assert_eq!(limits::max_file_size_bytes(), 47_185_920);
        assert!(limits::DEGRADED_TARGET_MB < limits::MAX_FILE_SIZE_MB);
        assert_eq!(rate_limit::cooldown(), Duration::from_secs(10));
    }
}
