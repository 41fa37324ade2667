use thiserror::Error;

/// Centralized error types for the application
///
/// Transport and I/O errors reach the pipeline boundary as this enum, where
/// they are logged and mapped to a generic user-facing message. Download and
/// validation failures are handled as pipeline states and never get here.
///
/// # Example
///
/// ```no_run
/// use tubelift::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     log::error!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
