//! Member repository implementation

use sqlx::SqliteConnection;

use crate::models::Member;
use crate::utils::errors::ReportBotError;

const MEMBER_COLUMNS: &str = "id, message_count, accepted_reports";

/// Fetch a member, creating it with zeroed counters if absent
pub async fn find_or_create(conn: &mut SqliteConnection, id: i64) -> Result<Member, ReportBotError> {
    sqlx::query("INSERT INTO members (id) VALUES (?) ON CONFLICT (id) DO NOTHING")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let member = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(member)
}

/// Count one more message from this member
pub async fn increment_messages(conn: &mut SqliteConnection, id: i64) -> Result<(), ReportBotError> {
    sqlx::query("UPDATE members SET message_count = message_count + 1 WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Count one more confirmed removal against this member
pub async fn increment_accepted_reports(conn: &mut SqliteConnection, id: i64) -> Result<(), ReportBotError> {
    sqlx::query("UPDATE members SET accepted_reports = accepted_reports + 1 WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
