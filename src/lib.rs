//! Single-session checking account ledger: deposits, withdrawals, account
//! creation and deletion over an owned collection of accounts, persisted as
//! `id,balance` lines in a flat text file.

mod compute;
mod config;
mod data;
mod read;
pub mod session;
mod write;

pub use compute::{DailyReport, Ledger, Outcome};
pub use config::{Config, DEFAULT_LEDGER_FILE};
pub use data::{
    normalize, Account, AccountId, AccountSummary, Error, Operation, Receipt, SIGNIFICANT_DIGITS,
};
pub use read::load;
pub use write::save;
