//! Help command handler

use teloxide::{prelude::*, types::Message, utils::command::BotCommands, Bot};

use super::Command;
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}
