//! Report case model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Impact of a single vote
pub const DEFAULT_VOTE_WEIGHT: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Accepted,
    Rejected,
}

impl ReportStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReportStatus::Open)
    }
}

/// A vote cast on a report case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub voter_id: i64,
    pub weight: i64,
}

/// Row of the `report_cases` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ReportCaseRow {
    pub id: i64,
    pub membership_id: i64,
    pub reported_message_id: i64,
    pub initiator_message_id: i64,
    pub prompt_message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
}

/// A report case together with its votes, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCase {
    pub id: i64,
    pub membership_id: i64,
    pub reported_message_id: i64,
    pub initiator_message_id: i64,
    pub prompt_message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub votes: Vec<Vote>,
}

impl ReportCase {
    pub fn from_row(row: ReportCaseRow, votes: Vec<Vote>) -> Self {
        Self {
            id: row.id,
            membership_id: row.membership_id,
            reported_message_id: row.reported_message_id,
            initiator_message_id: row.initiator_message_id,
            prompt_message_id: row.prompt_message_id,
            created_at: row.created_at,
            status: row.status,
            votes,
        }
    }
}
