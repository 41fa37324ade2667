//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod messages;
pub mod transport;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use transport::{ChatTransport, TeloxideTransport, VideoUpload};
