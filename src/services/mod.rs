pub mod balance_service;
pub mod history_service;
pub mod ledger_service;
pub mod ping_service;
