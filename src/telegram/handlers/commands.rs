//! Static command replies

use indoc::indoc;
use teloxide::types::ChatId;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

pub const WELCOME_TEXT: &str = indoc! {"
    🎬 Welcome to YouTube Video Downloader Bot! 🎬

    📝 How to use:
    • Send me any YouTube URL
    • I'll download and send you the video
    • Videos are limited to 45MB due to Telegram restrictions

    ⚡ Commands:
    /start - Show this welcome message
    /help - Get help and usage instructions

    🚀 Just send me a YouTube link to get started!"};

pub const HELP_TEXT: &str = indoc! {"
    🆘 YouTube Downloader Bot Help 🆘

    📋 Instructions:
    1. Copy a YouTube video URL
    2. Send it to me in this chat
    3. Wait for the download to complete
    4. Receive your video file!

    ⚠️ Important Notes:
    • File size limit: 45MB (Telegram restriction)
    • Supported formats: MP4, WebM, MKV, AVI
    • Rate limit: 1 video per 10 seconds
    • Only YouTube URLs are supported

    🔗 Supported URL formats:
    • https://youtube.com/watch?v=...
    • https://youtu.be/...
    • https://m.youtube.com/watch?v=...

    ❓ Having issues? Make sure your URL is valid and try again!"};

/// Reply text for a command
pub fn command_text(cmd: &Command) -> &'static str {
    match cmd {
        Command::Start => WELCOME_TEXT,
        Command::Help => HELP_TEXT,
    }
}

/// Sends the static reply of `cmd`
pub async fn handle_command(chat_id: ChatId, cmd: &Command, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.transport.send_message(chat_id, command_text(cmd)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_texts() {
        assert!(command_text(&Command::Start).starts_with("🎬 Welcome"));
        assert!(command_text(&Command::Help).contains("Rate limit: 1 video per 10 seconds"));
        assert!(HELP_TEXT.ends_with("try again!"));
    }
}
