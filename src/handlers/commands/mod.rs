//! Command handlers module
//!
//! This module contains handlers for all bot commands like /report, /help, etc.

pub mod help;
pub mod report;
pub mod settings;

use teloxide::{types::Message, utils::command::BotCommands, Bot};
use tracing::debug;

use crate::handlers::is_group_chat;
use crate::models::SettingKind;
use crate::services::TelegramModerator;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "camelCase", description = "ReportBot commands:")]
pub enum Command {
    #[command(description = "reply to a message to start a vote on removing its author")]
    Report,
    #[command(description = "set the votes needed to accept a report (admins only)")]
    SetReportVoteLimit(String),
    #[command(description = "set the minutes since the first message before a member can vote (admins only)")]
    SetMinutesToGainVotePower(String),
    #[command(description = "set the messages a member must write before they can vote (admins only)")]
    SetMessagesToGainVotePower(String),
    #[command(description = "show the report settings of this group")]
    Settings,
    #[command(description = "show this help message")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, moderator: TelegramModerator) -> Result<()> {
    if let Command::Help = cmd {
        return help::handle_help(bot, msg).await;
    }
    if !is_group_chat(&msg.chat) {
        debug!(chat_id = msg.chat.id.0, command = ?cmd, "Group command outside a group ignored");
        return Ok(());
    }

    match cmd {
        Command::Report => report::handle_report(msg, &moderator).await,
        Command::SetReportVoteLimit(arg) => {
            settings::handle_set(msg, SettingKind::VoteThreshold, arg, &moderator).await
        }
        Command::SetMinutesToGainVotePower(arg) => {
            settings::handle_set(msg, SettingKind::CooldownMinutes, arg, &moderator).await
        }
        Command::SetMessagesToGainVotePower(arg) => {
            settings::handle_set(msg, SettingKind::MinMessagesForVotePower, arg, &moderator).await
        }
        Command::Settings => settings::handle_show(msg, &moderator).await,
        Command::Help => Ok(()),
    }
}
