//! Member model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A platform user, shared across every group the bot observes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Telegram user id
    pub id: i64,
    /// Messages seen across all groups
    pub message_count: i64,
    /// Reports against this member that ended in a confirmed removal
    pub accepted_reports: i64,
}
