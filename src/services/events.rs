//! Inbound chat events
//!
//! Handlers translate teloxide updates into these before handing them to the
//! moderator, which keeps the moderation flow independent of teloxide types.

use crate::models::SettingKind;

/// A plain message written in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMessage {
    pub chat_id: i64,
    pub author_id: i64,
    pub message_id: i64,
}

/// The message a `/report` command replies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportedMessage {
    pub message_id: i64,
    /// Absent for messages without a resolvable sender
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportCommand {
    pub chat_id: i64,
    pub initiator_id: i64,
    pub initiator_message_id: i64,
    pub reported: Option<ReportedMessage>,
}

/// One of the admin configuration commands with its raw argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingCommand {
    pub chat_id: i64,
    pub author_id: i64,
    pub message_id: i64,
    pub setting: SettingKind,
    pub argument: String,
}

/// A press of the vote button under a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteInteraction {
    pub chat_id: i64,
    pub voter_id: i64,
    pub prompt_message_id: i64,
}
