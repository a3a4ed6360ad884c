use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reserved comment marking a transaction as a repayment. History rendering
/// phrases these as "X repaid Y" instead of "Y borrowed from X".
pub const REPAYMENT_COMMENT: &str = "repayment";

/// One directed ledger event: `debtor_id` owes `creditor_id` `amount`.
///
/// Amounts are integer minor units (cents). Rows are immutable once
/// written; a correction is a new offsetting transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub group_id: i64,
    pub creditor_id: i64,
    pub debtor_id: i64,
    pub amount: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_repayment(&self) -> bool {
        self.comment == REPAYMENT_COMMENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(comment: &str) -> Transaction {
        Transaction {
            id: 1,
            group_id: 10,
            creditor_id: 1,
            debtor_id: 2,
            amount: 500,
            comment: comment.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn repayment_detected_by_reserved_comment() {
        assert!(transaction(REPAYMENT_COMMENT).is_repayment());
        assert!(!transaction("").is_repayment());
        assert!(!transaction("pizza").is_repayment());
        // Sentinel match is exact, not a substring check.
        assert!(!transaction("repayment for pizza").is_repayment());
    }
}
