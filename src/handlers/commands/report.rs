//! /report command handler

use teloxide::types::Message;

use crate::handlers::message_id;
use crate::services::{ReportCommand, ReportedMessage, TelegramModerator};
use crate::utils::errors::Result;

pub async fn handle_report(msg: Message, moderator: &TelegramModerator) -> Result<()> {
    let Some(initiator) = msg.from.as_ref() else {
        return Ok(());
    };

    moderator.handle_report(report_command(&msg, initiator.id.0 as i64)).await
}

fn report_command(msg: &Message, initiator_id: i64) -> ReportCommand {
    let reported = msg.reply_to_message().map(|target| ReportedMessage {
        message_id: message_id(target),
        author_id: target.from.as_ref().map(|user| user.id.0 as i64),
    });

    ReportCommand {
        chat_id: msg.chat.id.0,
        initiator_id,
        initiator_message_id: message_id(msg),
        reported,
    }
}
