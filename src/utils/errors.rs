use thiserror::Error;

/// Error taxonomy for ledger operations.
///
/// `InvalidAmount` and `UnknownMember` are caller mistakes and are never
/// retried. `StorageUnavailable` is what a transient connectivity failure
/// becomes once the bounded retry budget is spent. Everything else the
/// database reports (bad schema, corrupt rows) surfaces as `Storage`.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be positive, got {amount} minor units")]
    InvalidAmount { amount: i64 },

    #[error("user {user_id} is not registered in group {group_id}")]
    UnknownMember { user_id: i64, group_id: i64 },

    #[error("storage unavailable after {attempts} attempts: {source}")]
    StorageUnavailable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}
