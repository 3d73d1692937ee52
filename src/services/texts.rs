//! User-facing message texts

use crate::models::{Group, GroupSetting, SettingKind};
use crate::utils::helpers::format_minutes;

pub const REPLY_REQUIRED: &str = "Reply to the message you want to report with /report.";
pub const ADMIN_NOT_REPORTABLE: &str = "Administrators cannot be reported.";
pub const ALREADY_VOTING: &str = "This message is already being voted on.";
pub const VOTE_PROMPT: &str = "This message was reported. Press the button below if its author should be removed from the group.";
pub const NO_VOTE_POWER: &str = "You do not have vote power in this group yet.";
pub const ADMIN_ONLY: &str = "Only group administrators can change the settings.";

pub fn usage(setting: SettingKind) -> String {
    format!("Usage: {} {}", setting.command(), setting.argument_hint())
}

pub fn setting_updated(setting: GroupSetting) -> String {
    match setting {
        GroupSetting::VoteThreshold(v) => format!("Votes needed to accept a report: {v}"),
        GroupSetting::CooldownMinutes(v) => {
            format!("Time needed to gain vote power: {}", format_minutes(v))
        }
        GroupSetting::MinMessagesForVotePower(v) => format!("Messages needed to gain vote power: {v}"),
    }
}

pub fn group_settings(group: &Group) -> String {
    format!(
        "Report settings\n\n\
        Votes needed to accept a report: {}\n\
        Time needed to gain vote power: {}\n\
        Messages needed to gain vote power: {}",
        group.vote_threshold,
        format_minutes(group.cooldown_minutes),
        group.min_messages_for_vote_power,
    )
}
