//! Group settings command handlers

use teloxide::types::Message;

use crate::handlers::message_id;
use crate::models::SettingKind;
use crate::services::{SettingCommand, TelegramModerator};
use crate::utils::errors::Result;

/// Handle one of the /set… commands
pub async fn handle_set(
    msg: Message,
    setting: SettingKind,
    argument: String,
    moderator: &TelegramModerator,
) -> Result<()> {
    let Some(author) = msg.from.as_ref() else {
        return Ok(());
    };

    moderator
        .handle_setting(SettingCommand {
            chat_id: msg.chat.id.0,
            author_id: author.id.0 as i64,
            message_id: message_id(&msg),
            setting,
            argument,
        })
        .await
}

/// Handle /settings command
pub async fn handle_show(msg: Message, moderator: &TelegramModerator) -> Result<()> {
    moderator.show_settings(msg.chat.id.0, message_id(&msg)).await?;
    Ok(())
}
