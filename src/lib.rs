//! debtbook: group-chat shared-ledger core.
//!
//! Records directed payment events (loans, repayments, bill splits) per chat
//! group and reduces the full log into bilateral net debts on demand. A
//! conversational front-end drives these modules; it is not part of this
//! crate.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;
