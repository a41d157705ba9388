use crate::{
    config::Config,
    data::{normalize, Account, AccountSummary, Error, Receipt},
    read::AccountUser,
    write,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// The whole set of accounts of a session, in creation/load order. It is owned
/// by whoever drives the session and handed to the store as a whole; there is
/// no shared or global state, and no locking because there is a single user.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: Vec<Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn list_accounts(&self) -> Vec<AccountSummary> {
        self.accounts.iter().map(Account::summary).collect()
    }

    pub fn get_account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id() == id)
    }

    fn get_account_mut(&mut self, id: &str) -> Result<&mut Account, Error> {
        self.accounts
            .iter_mut()
            .find(|account| account.id() == id)
            .ok_or_else(|| Error::AccountNotFound(id.to_owned()))
    }

    /// Ids are trimmed, the same way the store trims fields when loading. The
    /// ledger file has no escaping, so ids with commas or quotes are refused.
    pub fn create_account(&mut self, id: &str, initial_balance: Decimal) -> Result<Receipt, Error> {
        let id = id.trim();
        if id.is_empty() || id.contains([',', '"']) {
            return Err(Error::InvalidAccountId);
        }
        if initial_balance.is_sign_negative() {
            return Err(Error::NegativeAmount);
        }
        if self.get_account(id).is_some() {
            return Err(Error::DuplicateAccount(id.to_owned()));
        }
        let account = Account::new(id, initial_balance);
        let receipt = account.opening_receipt();
        info!(account = id, balance = %account.balance(), "account created");
        self.accounts.push(account);
        Ok(receipt)
    }

    /// Removing an id that isn't there is not an error, so calling this twice
    /// leaves the same ledger as calling it once. Returns whether an account
    /// was actually removed.
    pub fn delete_account(&mut self, id: &str) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|account| account.id() != id);
        let removed = self.accounts.len() != before;
        if removed {
            info!(account = id, "account deleted");
        }
        removed
    }

    pub fn deposit(&mut self, id: &str, amount: Decimal) -> Result<Receipt, Error> {
        if amount.is_sign_negative() {
            return Err(Error::NegativeAmount);
        }
        match self.get_account_mut(id)?.deposit(amount) {
            Ok(receipt) => {
                debug!(account = id, amount = %receipt.amount, balance = %receipt.balance, "deposit");
                Ok(receipt)
            }
            Err(e) => {
                warn!("deposit refused: {e}");
                Err(e)
            }
        }
    }

    pub fn withdraw(&mut self, id: &str, amount: Decimal) -> Result<Receipt, Error> {
        if amount.is_sign_negative() {
            return Err(Error::NegativeAmount);
        }
        match self.get_account_mut(id)?.withdraw(amount) {
            Ok(receipt) => {
                debug!(account = id, amount = %receipt.amount, balance = %receipt.balance, "withdrawal");
                Ok(receipt)
            }
            Err(e) => {
                warn!("withdrawal refused: {e}");
                Err(e)
            }
        }
    }

    /// Session totals (see `Account` for what "daily" means here), with the
    /// per-account breakdown limited to accounts that actually moved money.
    /// Grand totals saturate at `Decimal::MAX`.
    pub fn daily_totals(&self) -> DailyReport {
        let mut report = DailyReport::default();
        for account in &self.accounts {
            if !account.daily_deposits().is_zero() {
                report.total_deposits = report
                    .total_deposits
                    .saturating_add(account.daily_deposits());
                report
                    .deposits
                    .push((account.id().to_owned(), account.daily_deposits()));
            }
            if !account.daily_withdrawals().is_zero() {
                report.total_withdrawals = report
                    .total_withdrawals
                    .saturating_add(account.daily_withdrawals());
                report
                    .withdrawals
                    .push((account.id().to_owned(), account.daily_withdrawals()));
            }
        }
        report
    }

    pub fn save_all(&self, config: &Config) -> Result<(), anyhow::Error> {
        write::save(self, &config.ledger_path)
    }
}

/// Records coming from the store are appended in file order. A record whose id
/// is already in the ledger is refused, so ids stay unique after a load.
impl AccountUser for Ledger {
    fn use_account(&mut self, account: Account) -> Result<(), Error> {
        if self.get_account(account.id()).is_some() {
            return Err(Error::DuplicateAccount(account.id().to_owned()));
        }
        self.accounts.push(account);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub deposits: Vec<(String, Decimal)>,
    pub withdrawals: Vec<(String, Decimal)>,
}

impl Default for DailyReport {
    fn default() -> Self {
        Self {
            total_deposits: normalize(Decimal::ZERO),
            total_withdrawals: normalize(Decimal::ZERO),
            deposits: Vec::new(),
            withdrawals: Vec::new(),
        }
    }
}

/// What the front end shows after an operation: a success/failure flag, the
/// message, and the resulting balance when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    pub message: String,
    pub balance: Option<Decimal>,
}

impl From<Result<Receipt, Error>> for Outcome {
    fn from(result: Result<Receipt, Error>) -> Self {
        match result {
            Ok(receipt) => Self {
                ok: true,
                message: receipt.to_string(),
                balance: Some(receipt.balance),
            },
            Err(e) => Self {
                ok: false,
                balance: match &e {
                    Error::InsufficientFunds { available, .. } => Some(*available),
                    _ => None,
                },
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Ledger, Outcome};
    use rust_decimal::Decimal;
    use crate::{
        data::{Account, AccountSummary, Error},
        read::AccountUser,
    };
    use rust_decimal_macros::dec;

    fn ledger_with(accounts: &[(&str, Decimal)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (id, balance) in accounts {
            ledger.create_account(id, *balance).unwrap();
        }
        ledger
    }

    #[test]
    fn test_create_account() {
        let mut ledger = Ledger::new();
        let receipt = ledger.create_account("100", dec!(1000)).unwrap();
        assert_eq!(
            receipt.to_string(),
            "Account 100 created with balance 1000.00"
        );
        assert_eq!(
            ledger.list_accounts(),
            [AccountSummary {
                id: "100".into(),
                balance: dec!(1000.00)
            }]
        );
    }

    #[test]
    fn test_create_duplicate_account() {
        let mut ledger = ledger_with(&[("A1", dec!(100))]);
        assert_eq!(
            ledger.create_account("A1", dec!(500)),
            Err(Error::DuplicateAccount("A1".into()))
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get_account("A1").unwrap().balance(), dec!(100));
    }

    #[test]
    fn test_create_empty_id() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.create_account("", dec!(10)),
            Err(Error::InvalidAccountId)
        );
        assert_eq!(
            ledger.create_account("   ", dec!(10)),
            Err(Error::InvalidAccountId)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_create_id_with_separator() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.create_account("a,b", dec!(10)),
            Err(Error::InvalidAccountId)
        );
        assert_eq!(
            ledger.create_account("say \"hi\"", dec!(10)),
            Err(Error::InvalidAccountId)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_deposit_overflow() {
        let mut ledger = ledger_with(&[("a", Decimal::MAX), ("b", dec!(1))]);
        let outcome = Outcome::from(ledger.deposit("a", dec!(1)));
        assert!(!outcome.ok);
        assert_eq!(outcome.balance, None);
        assert_eq!(outcome.message, "Amount 1.00 is too large for account a");
        assert_eq!(ledger.get_account("a").unwrap().balance(), Decimal::MAX);
        assert!(ledger.daily_totals().deposits.is_empty());
    }

    #[test]
    fn test_create_negative_balance() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.create_account("1", dec!(-1)),
            Err(Error::NegativeAmount)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let ledger = ledger_with(&[("b", dec!(1)), ("a", dec!(2)), ("c", dec!(3))]);
        let ids: Vec<_> = ledger.list_accounts().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut ledger = ledger_with(&[("1", dec!(1)), ("2", dec!(2)), ("3", dec!(3))]);
        assert!(ledger.delete_account("2"));
        let once = ledger.list_accounts();
        assert!(!ledger.delete_account("2"));
        assert_eq!(ledger.list_accounts(), once);
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.delete_account("unknown"));
        assert_eq!(ledger.list_accounts(), once);
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let mut ledger = ledger_with(&[("100", dec!(1000))]);
        let receipt = ledger.deposit("100", dec!(250)).unwrap();
        assert_eq!(receipt.balance, dec!(1250));
        assert!(receipt.to_string().contains("1250.00"));
        assert_eq!(
            ledger.withdraw("100", dec!(2000)),
            Err(Error::InsufficientFunds {
                account: "100".into(),
                asked: dec!(2000),
                available: dec!(1250),
            })
        );
        assert_eq!(ledger.get_account("100").unwrap().balance(), dec!(1250));
        ledger.withdraw("100", dec!(50)).unwrap();
        assert_eq!(ledger.get_account("100").unwrap().balance(), dec!(1200));
    }

    #[test]
    fn test_unknown_account() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.deposit("9", dec!(1)),
            Err(Error::AccountNotFound("9".into()))
        );
        assert_eq!(
            ledger.withdraw("9", dec!(1)),
            Err(Error::AccountNotFound("9".into()))
        );
        assert!(ledger.get_account("9").is_none());
    }

    #[test]
    fn test_negative_amount() {
        let mut ledger = ledger_with(&[("1", dec!(10))]);
        assert_eq!(ledger.deposit("1", dec!(-5)), Err(Error::NegativeAmount));
        assert_eq!(ledger.withdraw("1", dec!(-5)), Err(Error::NegativeAmount));
        assert_eq!(ledger.get_account("1").unwrap().balance(), dec!(10));
    }

    #[test]
    fn test_daily_totals() {
        let mut ledger = ledger_with(&[("1", dec!(100)), ("2", dec!(100)), ("3", dec!(100))]);
        ledger.deposit("1", dec!(10)).unwrap();
        ledger.deposit("1", dec!(5.5)).unwrap();
        ledger.withdraw("2", dec!(20)).unwrap();
        ledger.deposit("3", dec!(1)).unwrap();
        ledger.withdraw("3", dec!(500)).unwrap_err();

        let report = ledger.daily_totals();
        assert_eq!(report.total_deposits, dec!(16.5));
        assert_eq!(report.total_withdrawals, dec!(20));
        assert_eq!(
            report.deposits,
            [("1".to_owned(), dec!(15.5)), ("3".to_owned(), dec!(1))]
        );
        assert_eq!(report.withdrawals, [("2".to_owned(), dec!(20))]);
    }

    #[test]
    fn test_daily_totals_empty() {
        let report = ledger_with(&[("1", dec!(100))]).daily_totals();
        assert_eq!(report.total_deposits, dec!(0));
        assert_eq!(report.total_withdrawals, dec!(0));
        assert!(report.deposits.is_empty());
        assert!(report.withdrawals.is_empty());
    }

    #[test]
    fn test_outcome() {
        let mut ledger = ledger_with(&[("100", dec!(1250))]);
        let failed = Outcome::from(ledger.withdraw("100", dec!(2000)));
        assert!(!failed.ok);
        assert_eq!(failed.balance, Some(dec!(1250)));
        assert!(failed.message.contains("Insufficient funds"));

        let done = Outcome::from(ledger.withdraw("100", dec!(250)));
        assert!(done.ok);
        assert_eq!(done.balance, Some(dec!(1000)));

        let missing = Outcome::from(ledger.deposit("nope", dec!(1)));
        assert!(!missing.ok);
        assert_eq!(missing.balance, None);
        assert_eq!(missing.message, "Account nope not found");
    }

    #[test]
    fn test_use_account_refuses_duplicates() {
        let mut ledger = Ledger::new();
        ledger.use_account(Account::new("1", dec!(5))).unwrap();
        assert_eq!(
            ledger.use_account(Account::new("1", dec!(7))),
            Err(Error::DuplicateAccount("1".into()))
        );
        assert_eq!(ledger.get_account("1").unwrap().balance(), dec!(5));
    }
}
