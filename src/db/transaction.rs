use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;

use crate::models::Transaction;

/// Append a single transaction row, returning its id.
pub async fn insert_transaction(
    pool: &MySqlPool,
    group_id: i64,
    creditor_id: i64,
    debtor_id: i64,
    amount: i64,
    comment: &str,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO transaction (group_id, creditor_id, debtor_id, amount, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(group_id)
    .bind(creditor_id)
    .bind(debtor_id)
    .bind(amount)
    .bind(comment)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id() as i64)
}

/// Append one row per (debtor, amount) share atomically: all rows are
/// written in a single database transaction so a failed split never leaves
/// a partial fan-out behind. Returns the new row ids.
pub async fn insert_transaction_batch(
    pool: &MySqlPool,
    group_id: i64,
    creditor_id: i64,
    shares: &[(i64, i64)],
    comment: &str,
    created_at: DateTime<Utc>,
) -> Result<Vec<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(shares.len());

    for &(debtor_id, amount) in shares {
        let result = sqlx::query(
            "INSERT INTO transaction (group_id, creditor_id, debtor_id, amount, comment, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(group_id)
        .bind(creditor_id)
        .bind(debtor_id)
        .bind(amount)
        .bind(comment)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        ids.push(result.last_insert_id() as i64);
    }

    tx.commit().await?;
    Ok(ids)
}

/// Full transaction log for a group, oldest first. Ties on the timestamp
/// fall back to insertion order.
pub async fn list_transactions(
    pool: &MySqlPool,
    group_id: i64,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT id, group_id, creditor_id, debtor_id, amount, comment, created_at \
         FROM transaction WHERE group_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

/// Delete every transaction of a group. Members are untouched. Irreversible.
pub async fn clear_transactions(pool: &MySqlPool, group_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transaction WHERE group_id = ?")
        .bind(group_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
