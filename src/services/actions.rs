//! Outbound chat actions
//!
//! Everything the moderation flow asks of the chat platform goes through
//! [`ChatActions`]. The Telegram implementation lives in
//! [`crate::services::telegram`]; tests substitute a recording fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::utils::errors::Result;

/// Callback data carried by every vote button
pub const VOTE_CALLBACK_DATA: &str = "vote";

/// Inline button attached to a vote prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptButton {
    Progress { votes: i64, threshold: i64 },
    Accepted,
}

impl PromptButton {
    pub fn label(&self) -> String {
        match self {
            PromptButton::Progress { votes, threshold } => format!("Vote progress: {votes}/{threshold}"),
            PromptButton::Accepted => "Report accepted".to_string(),
        }
    }
}

#[async_trait]
pub trait ChatActions: Send + Sync {
    /// Send a text message and return its message id
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        button: Option<PromptButton>,
    ) -> Result<i64>;

    /// Replace the inline button of a message
    async fn edit_button(&self, chat_id: i64, message_id: i64, button: PromptButton) -> Result<()>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()>;

    /// Remove a user from the chat until the given moment
    async fn remove_member(&self, chat_id: i64, user_id: i64, until: DateTime<Utc>) -> Result<()>;

    /// Whether `user_id` is in the chat's administrator list
    async fn is_administrator(&self, chat_id: i64, user_id: i64) -> Result<bool>;
}
