//! Membership model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One member inside one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub id: i64,
    pub group_id: i64,
    pub member_id: i64,
    /// `None` until the member writes in this group
    pub first_message_at: Option<DateTime<Utc>>,
    pub message_count: i64,
    pub banned: bool,
}
