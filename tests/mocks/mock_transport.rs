//! Recording chat transport

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use teloxide::types::{ChatAction, ChatId};
use tubelift::core::error::{AppError, AppResult};
use tubelift::telegram::{ChatTransport, VideoUpload};

/// One outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message(ChatId, String),
    Action(ChatId, ChatAction),
    Video {
        chat_id: ChatId,
        path: PathBuf,
        /// Size of the file at upload time, `None` if it was missing
        size: Option<u64>,
        upload: VideoUpload,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    fail_video: bool,
    /// Texts whose delivery fails; nothing is recorded for them
    fail_texts: Vec<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose video upload always fails
    pub fn failing_video() -> Self {
        Self {
            fail_video: true,
            ..Self::default()
        }
    }

    /// Transport that fails to send exactly these texts
    pub fn failing_texts(texts: &[&str]) -> Self {
        Self {
            fail_texts: texts.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Text messages only, in order
    pub fn messages(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Message(_, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn videos(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Video { .. }))
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> AppResult<()> {
        if self.fail_texts.iter().any(|t| t == text) {
            return Err(AppError::Io(std::io::Error::other("message refused")));
        }
        self.sent.lock().unwrap().push(Sent::Message(chat_id, text.to_string()));
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Action(chat_id, action));
        Ok(())
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path, upload: VideoUpload) -> AppResult<()> {
        if self.fail_video {
            return Err(AppError::Io(std::io::Error::other("upload refused")));
        }
        let size = std::fs::metadata(path).ok().map(|m| m.len());
        self.sent.lock().unwrap().push(Sent::Video {
            chat_id,
            path: path.to_path_buf(),
            size,
            upload,
        });
        Ok(())
    }
}
