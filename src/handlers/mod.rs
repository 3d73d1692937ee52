//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for the vote button
//! - Message handlers for plain group messages
//!
//! Handlers only translate teloxide types into moderation events; the
//! moderation flow itself lives in [`crate::services::Moderator`].

pub mod callbacks;
pub mod commands;
pub mod messages;

use teloxide::types::{Chat, Message};
use tracing::{error, info, warn};

use crate::utils::errors::{ErrorSeverity, ReportBotError};

// Re-export commonly used handler functions
pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::handle_message;

/// Whether the chat is a group the bot moderates
pub fn is_group_chat(chat: &Chat) -> bool {
    chat.is_group() || chat.is_supergroup()
}

/// Telegram message id as stored by the bot
pub fn message_id(msg: &Message) -> i64 {
    i64::from(msg.id.0)
}

/// Log a failed event at the level its severity calls for
pub fn log_handler_error(kind: &str, chat_id: i64, err: &ReportBotError) {
    match err.severity() {
        ErrorSeverity::Info => info!(chat_id = chat_id, error = %err, "Error handling {}", kind),
        ErrorSeverity::Warning => warn!(chat_id = chat_id, error = %err, "Error handling {}", kind),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(
            chat_id = chat_id,
            error = %err,
            severity = %err.severity(),
            recoverable = err.is_recoverable(),
            "Error handling {}",
            kind
        ),
    }
}
