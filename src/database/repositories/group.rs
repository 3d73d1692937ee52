//! Group repository implementation

use sqlx::SqliteConnection;

use crate::models::{Group, GroupSetting};
use crate::utils::errors::ReportBotError;

const GROUP_COLUMNS: &str = "id, vote_threshold, cooldown_minutes, min_messages_for_vote_power";

/// Fetch a group, creating it with default settings if absent
pub async fn find_or_create(conn: &mut SqliteConnection, id: i64) -> Result<Group, ReportBotError> {
    sqlx::query("INSERT INTO chat_groups (id) VALUES (?) ON CONFLICT (id) DO NOTHING")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let group = sqlx::query_as::<_, Group>(&format!(
        "SELECT {GROUP_COLUMNS} FROM chat_groups WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(group)
}

/// Fetch a group by id
async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Group>, ReportBotError> {
    let group = sqlx::query_as::<_, Group>(&format!(
        "SELECT {GROUP_COLUMNS} FROM chat_groups WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(group)
}

/// Change one moderation setting of a group
pub async fn update_setting(
    conn: &mut SqliteConnection,
    id: i64,
    setting: GroupSetting,
) -> Result<Group, ReportBotError> {
    let column = match setting {
        GroupSetting::VoteThreshold(_) => "vote_threshold",
        GroupSetting::CooldownMinutes(_) => "cooldown_minutes",
        GroupSetting::MinMessagesForVotePower(_) => "min_messages_for_vote_power",
    };

    let result = sqlx::query(&format!("UPDATE chat_groups SET {column} = ? WHERE id = ?"))
        .bind(setting.value())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ReportBotError::GroupNotFound { group_id: id });
    }

    find(conn, id)
        .await?
        .ok_or(ReportBotError::GroupNotFound { group_id: id })
}
