//! Group model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_VOTE_THRESHOLD: i64 = 10;
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 60 * 24 * 7;
pub const DEFAULT_MIN_MESSAGES_FOR_VOTE_POWER: i64 = 20;

/// Longest cooldown an admin may configure, ten years
pub const MAX_COOLDOWN_MINUTES: i64 = 60 * 24 * 3650;

/// A group chat and its moderation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Telegram chat id
    pub id: i64,
    pub vote_threshold: i64,
    pub cooldown_minutes: i64,
    pub min_messages_for_vote_power: i64,
}

impl Group {
    /// A group with default settings, as created on first sight
    pub fn with_defaults(id: i64) -> Self {
        Self {
            id,
            vote_threshold: DEFAULT_VOTE_THRESHOLD,
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            min_messages_for_vote_power: DEFAULT_MIN_MESSAGES_FOR_VOTE_POWER,
        }
    }
}

/// Which group setting an admin configuration command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    VoteThreshold,
    CooldownMinutes,
    MinMessagesForVotePower,
}

impl SettingKind {
    /// The setting carrying `value`, or `None` when the value is out of range
    pub fn with_value(self, value: i64) -> Option<GroupSetting> {
        if !self.accepts(value) {
            return None;
        }
        Some(match self {
            SettingKind::VoteThreshold => GroupSetting::VoteThreshold(value),
            SettingKind::CooldownMinutes => GroupSetting::CooldownMinutes(value),
            SettingKind::MinMessagesForVotePower => GroupSetting::MinMessagesForVotePower(value),
        })
    }

    pub fn accepts(&self, value: i64) -> bool {
        match self {
            SettingKind::VoteThreshold => value >= 1,
            SettingKind::CooldownMinutes => (0..=MAX_COOLDOWN_MINUTES).contains(&value),
            SettingKind::MinMessagesForVotePower => value >= 0,
        }
    }

    /// Argument placeholder shown in the usage notice
    pub fn argument_hint(&self) -> String {
        match self {
            SettingKind::VoteThreshold => "<positive number>".to_string(),
            SettingKind::CooldownMinutes => format!("<minutes, at most {MAX_COOLDOWN_MINUTES}>"),
            SettingKind::MinMessagesForVotePower => "<non-negative number>".to_string(),
        }
    }

    /// Command that changes this setting
    pub fn command(&self) -> &'static str {
        match self {
            SettingKind::VoteThreshold => "/setReportVoteLimit",
            SettingKind::CooldownMinutes => "/setMinutesToGainVotePower",
            SettingKind::MinMessagesForVotePower => "/setMessagesToGainVotePower",
        }
    }
}

/// Setting changed by one of the admin configuration commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSetting {
    VoteThreshold(i64),
    CooldownMinutes(i64),
    MinMessagesForVotePower(i64),
}

impl GroupSetting {
    pub fn name(&self) -> &'static str {
        match self {
            GroupSetting::VoteThreshold(_) => "report_vote_limit",
            GroupSetting::CooldownMinutes(_) => "minutes_to_gain_vote_power",
            GroupSetting::MinMessagesForVotePower(_) => "messages_to_gain_vote_power",
        }
    }

    pub fn value(&self) -> i64 {
        match *self {
            GroupSetting::VoteThreshold(v)
            | GroupSetting::CooldownMinutes(v)
            | GroupSetting::MinMessagesForVotePower(v) => v,
        }
    }
}
