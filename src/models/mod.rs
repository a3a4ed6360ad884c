//! Data models shared between the storage layer and services.
//!
//! Rows are always carried as named structs, never positional tuples; the
//! creditor/debtor distinction is too easy to silently swap otherwise.

pub mod balance;
pub mod member;
pub mod transaction;

pub use balance::{HistoryEntry, HistoryEntryKind, NetDebt, UserSummary};
pub use member::Member;
pub use transaction::{Transaction, REPAYMENT_COMMENT};
