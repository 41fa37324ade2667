//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command registration in the Telegram UI

use reqwest::ClientBuilder;
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "get help and usage instructions")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError)` - Invalid BOT_API_URL or HTTP client setup failure
pub fn create_bot(token: &SecretString) -> AppResult<Bot> {
    let client = ClientBuilder::new()
        .timeout(config::network::timeout())
        .build()
        .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;
    let bot = Bot::with_client(token.expose_secret(), client);

    // Check if local Bot API server is configured
    match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url)?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "show the welcome message"),
        BotCommand::new("help", "get help and usage instructions"),
    ])
    .await?;
    Ok(())
}
