//! Outbound chat operations used by the request pipeline.
//!
//! The pipeline never touches `teloxide::Bot` directly, which keeps it
//! testable against a recording transport.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile};

use crate::core::error::AppResult;

/// Options for a video upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub caption: String,
    pub supports_streaming: bool,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> AppResult<()>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> AppResult<()>;

    async fn send_video(&self, chat_id: ChatId, path: &Path, upload: VideoUpload) -> AppResult<()>;
}

/// `ChatTransport` over a teloxide bot
#[derive(Clone)]
pub struct TeloxideTransport {
    bot: Bot,
}

impl TeloxideTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TeloxideTransport {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> AppResult<()> {
        self.bot.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> AppResult<()> {
        self.bot.send_chat_action(chat_id, action).await?;
        Ok(())
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path, upload: VideoUpload) -> AppResult<()> {
        self.bot
            .send_video(chat_id, InputFile::file(path.to_path_buf()))
            .caption(upload.caption)
            .supports_streaming(upload.supports_streaming)
            .await?;
        Ok(())
    }
}
