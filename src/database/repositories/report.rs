//! Report case repository implementation
//!
//! Votes live in their own table keyed by (case, voter), so a toggle touches
//! a single row.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::{ReportCase, ReportCaseRow, ReportStatus, Vote};
use crate::utils::errors::ReportBotError;

const CASE_COLUMNS: &str = "rc.id, rc.membership_id, rc.reported_message_id, rc.initiator_message_id, rc.prompt_message_id, rc.created_at, rc.status";

/// Fetch the case for a reported message, creating it if absent.
///
/// Returns the case and whether this call created it. `status` only applies
/// to a newly created case.
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    membership_id: i64,
    reported_message_id: i64,
    initiator_message_id: i64,
    created_at: DateTime<Utc>,
    status: ReportStatus,
) -> Result<(ReportCase, bool), ReportBotError> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO report_cases (membership_id, reported_message_id, initiator_message_id, created_at, status)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (membership_id, reported_message_id) DO NOTHING
        "#,
    )
    .bind(membership_id)
    .bind(reported_message_id)
    .bind(initiator_message_id)
    .bind(created_at)
    .bind(status)
    .execute(&mut *conn)
    .await?;

    let row = sqlx::query_as::<_, ReportCaseRow>(&format!(
        "SELECT {CASE_COLUMNS} FROM report_cases rc WHERE rc.membership_id = ? AND rc.reported_message_id = ?"
    ))
    .bind(membership_id)
    .bind(reported_message_id)
    .fetch_one(&mut *conn)
    .await?;

    let votes = load_votes(conn, row.id).await?;
    Ok((ReportCase::from_row(row, votes), inserted.rows_affected() == 1))
}

/// Find case by its row ID
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<ReportCase>, ReportBotError> {
    let row = sqlx::query_as::<_, ReportCaseRow>(&format!(
        "SELECT {CASE_COLUMNS} FROM report_cases rc WHERE rc.id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let votes = load_votes(conn, row.id).await?;
            Ok(Some(ReportCase::from_row(row, votes)))
        }
        None => Ok(None),
    }
}

/// Find the case whose vote prompt is `prompt_message_id` in a group
pub async fn find_by_prompt(
    conn: &mut SqliteConnection,
    group_id: i64,
    prompt_message_id: i64,
) -> Result<Option<ReportCase>, ReportBotError> {
    let row = sqlx::query_as::<_, ReportCaseRow>(&format!(
        r#"
        SELECT {CASE_COLUMNS}
        FROM report_cases rc
        INNER JOIN memberships m ON m.id = rc.membership_id
        WHERE m.group_id = ? AND rc.prompt_message_id = ?
        "#
    ))
    .bind(group_id)
    .bind(prompt_message_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let votes = load_votes(conn, row.id).await?;
            Ok(Some(ReportCase::from_row(row, votes)))
        }
        None => Ok(None),
    }
}

/// Votes of a case in the order they were cast
pub async fn load_votes(conn: &mut SqliteConnection, case_id: i64) -> Result<Vec<Vote>, ReportBotError> {
    let votes = sqlx::query_as::<_, Vote>(
        "SELECT voter_id, weight FROM report_votes WHERE case_id = ? ORDER BY rowid ASC",
    )
    .bind(case_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(votes)
}

/// Record the vote prompt sent for a case.
///
/// Only an open case without a prompt takes one; returns whether it did.
pub async fn set_prompt(
    conn: &mut SqliteConnection,
    case_id: i64,
    prompt_message_id: i64,
) -> Result<bool, ReportBotError> {
    let result = sqlx::query(
        "UPDATE report_cases SET prompt_message_id = ? \
         WHERE id = ? AND status = ? AND prompt_message_id IS NULL",
    )
    .bind(prompt_message_id)
    .bind(case_id)
    .bind(ReportStatus::Open)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn insert_vote(
    conn: &mut SqliteConnection,
    case_id: i64,
    vote: &Vote,
    cast_at: DateTime<Utc>,
) -> Result<(), ReportBotError> {
    sqlx::query("INSERT INTO report_votes (case_id, voter_id, weight, cast_at) VALUES (?, ?, ?, ?)")
        .bind(case_id)
        .bind(vote.voter_id)
        .bind(vote.weight)
        .bind(cast_at)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn delete_vote(conn: &mut SqliteConnection, case_id: i64, voter_id: i64) -> Result<(), ReportBotError> {
    sqlx::query("DELETE FROM report_votes WHERE case_id = ? AND voter_id = ?")
        .bind(case_id)
        .bind(voter_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Move an open case to `Accepted`.
///
/// Returns `false` when the case was not open any more, in which case
/// nothing is written.
pub async fn mark_accepted(conn: &mut SqliteConnection, case_id: i64) -> Result<bool, ReportBotError> {
    let result = sqlx::query("UPDATE report_cases SET status = ? WHERE id = ? AND status = ?")
        .bind(ReportStatus::Accepted)
        .bind(case_id)
        .bind(ReportStatus::Open)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}
