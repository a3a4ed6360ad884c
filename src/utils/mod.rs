pub mod errors;
pub mod money;
pub mod retry;

pub use errors::LedgerError;
pub use money::{format_minor, parse_amount, split_shares};
pub use retry::with_retries;
