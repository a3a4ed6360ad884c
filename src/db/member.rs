use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;

use crate::models::Member;

/// Register a member in a group, or refresh the display name if the member
/// already exists (last write wins). Duplicate registration is not an error.
pub async fn upsert_member(
    pool: &MySqlPool,
    group_id: i64,
    user_id: i64,
    display_name: &str,
    joined_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO member (user_id, group_id, display_name, joined_at) VALUES (?, ?, ?, ?) \
         ON DUPLICATE KEY UPDATE display_name = VALUES(display_name)",
    )
    .bind(user_id)
    .bind(group_id)
    .bind(display_name)
    .bind(joined_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// All members of a group in registration order. This is the enumeration
/// universe for balance computation and front-end pickers.
pub async fn list_members(pool: &MySqlPool, group_id: i64) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT user_id, group_id, display_name FROM member WHERE group_id = ? \
         ORDER BY joined_at ASC, user_id ASC",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

/// Whether the user is registered in the group.
pub async fn member_exists(
    pool: &MySqlPool,
    group_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM member WHERE user_id = ? AND group_id = ?")
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}
