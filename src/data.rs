use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type AccountId = String;

/// Every amount handled by the ledger is kept to cents.
pub const SIGNIFICANT_DIGITS: u32 = 2;

/// Brings an amount to the ledger scale, so that `10`, `10.0` and `10.000`
/// all end up stored (and written back) as `10.00`.
pub fn normalize(mut amount: Decimal) -> Decimal {
    amount.rescale(SIGNIFICANT_DIGITS);
    amount
}

/// A checking account. The `daily_*` counters are cumulative since the account
/// was constructed (or reloaded from the store): there is no day rollover, and
/// they are never persisted.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    balance: Decimal,
    created_at: DateTime<Utc>,
    daily_deposits: Decimal,
    daily_withdrawals: Decimal,
}

impl Account {
    /// Uniqueness of `id` is the caller's business, see `Ledger::create_account`.
    pub fn new(id: impl Into<AccountId>, initial_balance: Decimal) -> Self {
        Self {
            id: id.into(),
            balance: normalize(initial_balance),
            created_at: Utc::now(),
            daily_deposits: normalize(Decimal::ZERO),
            daily_withdrawals: normalize(Decimal::ZERO),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn daily_deposits(&self) -> Decimal {
        self.daily_deposits
    }

    pub fn daily_withdrawals(&self) -> Decimal {
        self.daily_withdrawals
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            balance: self.balance,
        }
    }

    /// Amounts are rounded to cents before being applied, so a deposit of
    /// `0.004` credits nothing and its receipt says `0.00`. The only refusal is
    /// a balance (or running total) that would no longer fit in a `Decimal`.
    /// A negative amount is a caller bug: the `Ledger` rejects those before
    /// they get here.
    pub fn deposit(&mut self, amount: Decimal) -> Result<Receipt, Error> {
        debug_assert!(!amount.is_sign_negative());
        let amount = normalize(amount);
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| self.overflow(amount))?;
        let daily_deposits = self
            .daily_deposits
            .checked_add(amount)
            .ok_or_else(|| self.overflow(amount))?;
        self.balance = balance;
        self.daily_deposits = daily_deposits;
        Ok(self.receipt(Operation::Deposit, amount))
    }

    /// Withdrawals that would leave the balance negative are refused and leave
    /// the account untouched. Amounts are rounded to cents, as for deposits.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Receipt, Error> {
        debug_assert!(!amount.is_sign_negative());
        let amount = normalize(amount);
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                account: self.id.clone(),
                asked: amount,
                available: self.balance,
            });
        }
        let daily_withdrawals = self
            .daily_withdrawals
            .checked_add(amount)
            .ok_or_else(|| self.overflow(amount))?;
        self.balance -= amount;
        self.daily_withdrawals = daily_withdrawals;
        Ok(self.receipt(Operation::Withdrawal, amount))
    }

    fn overflow(&self, amount: Decimal) -> Error {
        Error::AmountOverflow {
            account: self.id.clone(),
            amount,
        }
    }

    pub(crate) fn opening_receipt(&self) -> Receipt {
        self.receipt(Operation::Opened, self.balance)
    }

    fn receipt(&self, operation: Operation, amount: Decimal) -> Receipt {
        Receipt {
            operation,
            account: self.id.clone(),
            amount,
            balance: self.balance,
        }
    }
}

/// The `(id, balance)` pair: what gets listed to the user and what goes to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Opened,
    Deposit,
    Withdrawal,
}

/// Proof of a successful operation. Its `Display` is the confirmation message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub operation: Operation,
    pub account: AccountId,
    pub amount: Decimal,
    pub balance: Decimal,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Operation::Opened => write!(
                f,
                "Account {} created with balance {:.2}",
                self.account, self.balance
            ),
            Operation::Deposit => write!(
                f,
                "Deposit of {:.2} made to account {}. New balance: {:.2}",
                self.amount, self.account, self.balance
            ),
            Operation::Withdrawal => write!(
                f,
                "Withdrawal of {:.2} made from account {}. New balance: {:.2}",
                self.amount, self.account, self.balance
            ),
        }
    }
}

/// Everything that can make a ledger operation fail. None of these are fatal:
/// the ledger is left exactly as it was before the failed call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Insufficient funds in account {account} (asked {asked:.2}). Current balance: {available:.2}")]
    InsufficientFunds {
        account: AccountId,
        asked: Decimal,
        available: Decimal,
    },
    #[error("Account id must not be empty nor contain commas or quotes")]
    InvalidAccountId,
    #[error("Account {0} already exists")]
    DuplicateAccount(AccountId),
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),
    #[error("Amount must not be negative")]
    NegativeAmount,
    #[error("Amount {amount:.2} is too large for account {account}")]
    AmountOverflow { account: AccountId, amount: Decimal },
}
