//! Monthly history views over the transaction log.
//!
//! Months are calendar year-months of the stored timestamp, taken in UTC
//! everywhere so grouping matches what is persisted.

use std::collections::{BTreeSet, HashMap};

use chrono::Datelike;
use sqlx::mysql::MySqlPool;

use crate::db;
use crate::models::{HistoryEntry, HistoryEntryKind, Transaction};
use crate::utils::money::format_minor;
use crate::utils::retry::{with_retries, RETRY_ATTEMPTS};
use crate::utils::LedgerError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize).saturating_sub(1).min(11)]
}

/// Distinct (year, month) keys present in a log, newest first.
pub fn history_months(transactions: &[Transaction]) -> Vec<(i32, u32)> {
    let months: BTreeSet<(i32, u32)> = transactions
        .iter()
        .map(|tx| (tx.created_at.year(), tx.created_at.month()))
        .collect();
    months.into_iter().rev().collect()
}

/// Display records for one calendar month, oldest first.
pub fn month_entries(transactions: &[Transaction], year: i32, month: u32) -> Vec<HistoryEntry> {
    transactions
        .iter()
        .filter(|tx| tx.created_at.year() == year && tx.created_at.month() == month)
        .map(|tx| HistoryEntry {
            transaction_id: tx.id,
            creditor_id: tx.creditor_id,
            debtor_id: tx.debtor_id,
            amount: tx.amount,
            comment: tx.comment.clone(),
            created_at: tx.created_at,
            kind: if tx.is_repayment() {
                HistoryEntryKind::Repayment
            } else {
                HistoryEntryKind::Loan
            },
        })
        .collect()
}

/// Months with activity for a group, newest first.
pub async fn list_history_months(
    pool: &MySqlPool,
    group_id: i64,
) -> Result<Vec<(i32, u32)>, LedgerError> {
    let transactions = with_retries("list_transactions", RETRY_ATTEMPTS, || {
        db::transaction::list_transactions(pool, group_id)
    })
    .await?;

    Ok(history_months(&transactions))
}

/// Display records for one month of a group's history.
pub async fn get_monthly_history(
    pool: &MySqlPool,
    group_id: i64,
    year: i32,
    month: u32,
) -> Result<Vec<HistoryEntry>, LedgerError> {
    let transactions = with_retries("list_transactions", RETRY_ATTEMPTS, || {
        db::transaction::list_transactions(pool, group_id)
    })
    .await?;

    Ok(month_entries(&transactions, year, month))
}

fn name_of(names: &HashMap<i64, String>, user_id: i64) -> &str {
    names.get(&user_id).map(String::as_str).unwrap_or("???")
}

/// Render one month of history. Loans read "debtor borrowed from creditor",
/// repayments read "payer repaid receiver" (the payer of a repayment is
/// stored as its creditor).
pub fn format_month(
    year: i32,
    month: u32,
    entries: &[HistoryEntry],
    names: &HashMap<i64, String>,
) -> String {
    let mut text = format!("History for {} {}\n\n", month_name(month), year);

    if entries.is_empty() {
        text.push_str("No activity this month.");
        return text;
    }

    for entry in entries {
        let date = entry.created_at.format("%d.%m");
        match entry.kind {
            HistoryEntryKind::Repayment => {
                text.push_str(&format!(
                    "{}: {} repaid {} {}\n",
                    date,
                    name_of(names, entry.creditor_id),
                    name_of(names, entry.debtor_id),
                    format_minor(entry.amount),
                ));
            }
            HistoryEntryKind::Loan => {
                let comment = if entry.comment.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", entry.comment)
                };
                text.push_str(&format!(
                    "{}: {} borrowed from {} {}{}\n",
                    date,
                    name_of(names, entry.debtor_id),
                    name_of(names, entry.creditor_id),
                    format_minor(entry.amount),
                    comment,
                ));
            }
        }
    }

    text
}
