//! Membership repository implementation

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::Membership;
use crate::utils::errors::ReportBotError;

const MEMBERSHIP_COLUMNS: &str =
    "id, group_id, member_id, first_message_at, message_count, banned";

/// Fetch the membership of a member in a group, creating it if absent.
///
/// Both the group and the member rows must already exist.
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    group_id: i64,
    member_id: i64,
) -> Result<Membership, ReportBotError> {
    sqlx::query(
        "INSERT INTO memberships (group_id, member_id) VALUES (?, ?) ON CONFLICT (group_id, member_id) DO NOTHING",
    )
    .bind(group_id)
    .bind(member_id)
    .execute(&mut *conn)
    .await?;

    let membership = sqlx::query_as::<_, Membership>(&format!(
        "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE group_id = ? AND member_id = ?"
    ))
    .bind(group_id)
    .bind(member_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(membership)
}

/// Find membership by its row ID
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Membership>, ReportBotError> {
    let membership = sqlx::query_as::<_, Membership>(&format!(
        "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(membership)
}

/// Count a message in this group, stamping the first one
pub async fn record_message(
    conn: &mut SqliteConnection,
    id: i64,
    at: DateTime<Utc>,
) -> Result<(), ReportBotError> {
    sqlx::query(
        r#"
        UPDATE memberships
        SET message_count = message_count + 1,
            first_message_at = COALESCE(first_message_at, ?)
        WHERE id = ?
        "#,
    )
    .bind(at)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Mark the member as removed from the group
pub async fn set_banned(conn: &mut SqliteConnection, id: i64, banned: bool) -> Result<(), ReportBotError> {
    sqlx::query("UPDATE memberships SET banned = ? WHERE id = ?")
        .bind(banned)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
