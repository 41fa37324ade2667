//! Telegram bot handler tree configuration
//!
//! The same schema is used by the dispatcher in production and can be driven
//! from integration tests.

mod commands;
mod schema;
mod types;

pub use commands::{command_text, HELP_TEXT, WELCOME_TEXT};
pub use schema::{is_pipeline_input, schema};
pub use types::{HandlerDeps, HandlerError};
