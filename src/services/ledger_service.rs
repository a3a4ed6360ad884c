//! Recording operations against the ledger store.
//!
//! All writes validate here, consistently, before touching storage: amounts
//! must be positive and both parties must be registered in the group. The
//! log itself is append-only; the only delete is the group-wide wipe.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::mysql::MySqlPool;
use tracing::{debug, info};

use crate::db;
use crate::models::{Member, Transaction, REPAYMENT_COMMENT};
use crate::utils::money::split_shares;
use crate::utils::retry::{with_retries, RETRY_ATTEMPTS};
use crate::utils::LedgerError;

/// Register a user in a group, refreshing the display name if they are
/// already known. Safe to call on every interaction.
pub async fn register_member(
    pool: &MySqlPool,
    group_id: i64,
    user_id: i64,
    display_name: &str,
) -> Result<(), LedgerError> {
    let joined_at = Utc::now();
    with_retries("upsert_member", RETRY_ATTEMPTS, || {
        db::member::upsert_member(pool, group_id, user_id, display_name, joined_at)
    })
    .await
}

/// Members of the group in registration order.
pub async fn list_members(pool: &MySqlPool, group_id: i64) -> Result<Vec<Member>, LedgerError> {
    with_retries("list_members", RETRY_ATTEMPTS, || {
        db::member::list_members(pool, group_id)
    })
    .await
}

/// Display-name lookup table for a group, for rendering reports.
pub async fn member_names(
    pool: &MySqlPool,
    group_id: i64,
) -> Result<HashMap<i64, String>, LedgerError> {
    let members = list_members(pool, group_id).await?;
    Ok(members
        .into_iter()
        .map(|m| (m.user_id, m.display_name))
        .collect())
}

/// Full transaction log for a group, oldest first.
pub async fn list_transactions(
    pool: &MySqlPool,
    group_id: i64,
) -> Result<Vec<Transaction>, LedgerError> {
    with_retries("list_transactions", RETRY_ATTEMPTS, || {
        db::transaction::list_transactions(pool, group_id)
    })
    .await
}

async fn ensure_member(
    pool: &MySqlPool,
    group_id: i64,
    user_id: i64,
) -> Result<(), LedgerError> {
    let exists = with_retries("member_exists", RETRY_ATTEMPTS, || {
        db::member::member_exists(pool, group_id, user_id)
    })
    .await?;

    if exists {
        Ok(())
    } else {
        Err(LedgerError::UnknownMember { user_id, group_id })
    }
}

/// Record "debtor owes creditor `amount`". Returns the new transaction id.
pub async fn record_debt(
    pool: &MySqlPool,
    group_id: i64,
    creditor_id: i64,
    debtor_id: i64,
    amount: i64,
    comment: &str,
) -> Result<i64, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount { amount });
    }
    ensure_member(pool, group_id, creditor_id).await?;
    ensure_member(pool, group_id, debtor_id).await?;

    let created_at = Utc::now();
    let id = with_retries("insert_transaction", RETRY_ATTEMPTS, || {
        db::transaction::insert_transaction(
            pool, group_id, creditor_id, debtor_id, amount, comment, created_at,
        )
    })
    .await?;

    info!(
        group_id,
        creditor_id, debtor_id, amount, transaction_id = id, "debt recorded"
    );
    Ok(id)
}

/// Record a repayment from `payer_id` to `receiver_id`.
///
/// The party handing the money over is recorded as the creditor, same as a
/// normal loan where the payer is the creditor; the reserved comment lets
/// history rendering phrase it as a repayment. Netting then reduces the
/// receiver's claim on the payer.
pub async fn record_repayment(
    pool: &MySqlPool,
    group_id: i64,
    payer_id: i64,
    receiver_id: i64,
    amount: i64,
) -> Result<i64, LedgerError> {
    record_debt(
        pool,
        group_id,
        payer_id,
        receiver_id,
        amount,
        REPAYMENT_COMMENT,
    )
    .await
}

/// Per-debtor allocation for an even split: every member except the payer,
/// in member-list order, paired with their share of the bill. Leftover
/// cents land on the first debtors in that order.
fn allocate_split(members: &[Member], payer_id: i64, total_amount: i64) -> Vec<(i64, i64)> {
    let shares = split_shares(total_amount, members.len());
    members
        .iter()
        .filter(|m| m.user_id != payer_id)
        .map(|m| m.user_id)
        .zip(shares)
        .collect()
}

/// Split a bill paid by `payer_id` evenly across the whole group: one debt
/// per other member, all rows written atomically. Groups with fewer than
/// two members have nobody to owe anything, so nothing is recorded.
pub async fn record_split(
    pool: &MySqlPool,
    group_id: i64,
    payer_id: i64,
    total_amount: i64,
    comment: &str,
) -> Result<Vec<i64>, LedgerError> {
    if total_amount <= 0 {
        return Err(LedgerError::InvalidAmount {
            amount: total_amount,
        });
    }
    ensure_member(pool, group_id, payer_id).await?;

    let members = list_members(pool, group_id).await?;
    if members.len() < 2 {
        debug!(group_id, payer_id, "split skipped, group has a single member");
        return Ok(Vec::new());
    }

    let allocations = allocate_split(&members, payer_id, total_amount);

    let created_at = Utc::now();
    let ids = with_retries("insert_transaction_batch", RETRY_ATTEMPTS, || {
        db::transaction::insert_transaction_batch(
            pool,
            group_id,
            payer_id,
            &allocations,
            comment,
            created_at,
        )
    })
    .await?;

    info!(
        group_id,
        payer_id,
        total_amount,
        debtors = ids.len(),
        "bill split recorded"
    );
    Ok(ids)
}

/// Wipe every transaction of the group. Members are kept. The front-end
/// restricts this to the configured admin; the core does not.
pub async fn clear_ledger(pool: &MySqlPool, group_id: i64) -> Result<u64, LedgerError> {
    let deleted = with_retries("clear_transactions", RETRY_ATTEMPTS, || {
        db::transaction::clear_transactions(pool, group_id)
    })
    .await?;

    info!(group_id, deleted, "ledger cleared");
    Ok(deleted)
}
