//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the effective configuration

use anyhow::Result;
use simplelog::*;
use std::fs::OpenOptions;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// The log file is appended to, so earlier runs stay readable.
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective runtime configuration at startup.
///
/// Never logs the bot token.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("yt-dlp binary: {}", *config::YTDL_BIN);
    log::info!("Downloads directory: {}", config::DOWNLOAD_FOLDER.display());
    log::info!("Max file size: {} MB", config::limits::MAX_FILE_SIZE_MB);
    log::info!("Cooldown: {}s per user", config::rate_limit::COOLDOWN_SECONDS);
    log::info!(
        "yt-dlp timeouts: probe {}s, download {}s",
        config::download::PROBE_TIMEOUT.as_secs(),
        config::download::DOWNLOAD_TIMEOUT.as_secs()
    );
    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("Bot API: {}", url),
        None => log::info!("Bot API: api.telegram.org"),
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
