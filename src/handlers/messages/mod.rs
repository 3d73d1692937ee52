//! Message handlers module
//!
//! Counts plain group messages toward their author's vote power.

use teloxide::types::Message;
use tracing::debug;

use crate::handlers::{is_group_chat, message_id};
use crate::services::{GroupMessage, TelegramModerator};
use crate::utils::errors::Result;

/// Handle incoming non-command messages
pub async fn handle_message(msg: Message, moderator: TelegramModerator) -> Result<()> {
    if !is_group_chat(&msg.chat) {
        return Ok(());
    }
    let Some(author) = msg.from.as_ref() else {
        return Ok(());
    };
    if author.is_bot {
        debug!(chat_id = msg.chat.id.0, user_id = author.id.0, "Ignoring message from a bot");
        return Ok(());
    }

    moderator
        .handle_message(GroupMessage {
            chat_id: msg.chat.id.0,
            author_id: author.id.0 as i64,
            message_id: message_id(&msg),
        })
        .await
}
