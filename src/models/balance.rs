use chrono::{DateTime, Utc};
use serde::Serialize;

/// One bilaterally netted obligation: `debtor_id` owes `creditor_id`
/// `amount` minor units after canceling mutual flows. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetDebt {
    pub debtor_id: i64,
    pub creditor_id: i64,
    pub amount: i64,
}

/// Per-user partition of the group's net debts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// Debts where the user is the debtor.
    pub owed_by_user: Vec<NetDebt>,
    /// Debts where the user is the creditor.
    pub owed_to_user: Vec<NetDebt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoryEntryKind {
    Loan,
    Repayment,
}

/// Display record for the monthly history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub transaction_id: i64,
    pub creditor_id: i64,
    pub debtor_id: i64,
    pub amount: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub kind: HistoryEntryKind,
}
