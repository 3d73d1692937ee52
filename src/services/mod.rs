//! Services module
//!
//! This module contains the moderation logic: vote eligibility, the report
//! case state machine, the entity store and the coordinator tying them to
//! the chat platform.

pub mod actions;
pub mod coordinator;
pub mod deferred;
pub mod eligibility;
pub mod events;
pub mod report_case;
pub mod store;
pub mod telegram;
pub mod texts;

// Re-export commonly used services
pub use actions::{ChatActions, PromptButton, VOTE_CALLBACK_DATA};
pub use coordinator::{Moderator, VoteAck};
pub use deferred::DeferredDeletes;
pub use eligibility::{has_vote_power, VoterStanding};
pub use events::{GroupMessage, ReportCommand, ReportedMessage, SettingCommand, VoteInteraction};
pub use report_case::{IgnoreReason, VoteChange, VoteOutcome};
pub use store::EntityStore;
pub use telegram::{build_bot, TelegramActions};

/// Moderator wired to the real Telegram Bot API
pub type TelegramModerator = Moderator<TelegramActions>;
