//! Dispatcher schema and handler chain builders

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::handle_command;
use super::types::{HandlerDeps, HandlerError};
use crate::download::pipeline::DownloadRequest;
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Commands are matched first; any other text message becomes a download
/// request. Non-text messages and unknown `/` commands are ignored.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
                handle_command(msg.chat.id, &cmd, &deps).await
            }
        },
    ))
}

/// Text that should go through the download pipeline
pub fn is_pipeline_input(text: &str) -> bool {
    !text.starts_with('/')
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(is_pipeline_input).unwrap_or(false))
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let (Some(text), Some(from)) = (msg.text(), msg.from.as_ref()) else {
                    return Ok(());
                };

                let request = DownloadRequest::new(text, from.id, msg.chat.id);
                log::info!(
                    "Request {} from user {} in chat {}",
                    request.prefix(),
                    from.id,
                    msg.chat.id
                );

                let outcome = deps.pipeline.handle(Arc::as_ref(&deps.transport), &request).await;
                log::info!(
                    "Request {} finished: {} (cleanup: {:?})",
                    request.prefix(),
                    outcome.state,
                    outcome.cleanup
                );
                Ok(())
            }
        })
}
