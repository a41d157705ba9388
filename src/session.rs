//! Line-oriented front end: one command per line, one answer per command.
//! It only translates text into `Ledger` calls and `Outcome`s back into text;
//! all the bookkeeping lives in the ledger itself.

use crate::{
    compute::{Ledger, Outcome},
    config::Config,
};
use rust_decimal::Decimal;
use std::{
    io::{BufRead, Write},
    str::FromStr,
};
use thiserror::Error;
use tracing::warn;

const HELP: &str = "\
commands:
  list                      show all accounts
  show <id>                 show one account
  create <id> <amount>      open an account with an initial balance
  delete <id>               remove an account
  deposit <id> <amount>     deposit into an account
  withdraw <id> <amount>    withdraw from an account
  report                    deposits and withdrawals of the day
  save                      write all accounts to the ledger file
  quit                      leave (unsaved changes are lost)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(String),
    Create(String, Decimal),
    Delete(String),
    Deposit(String, Decimal),
    Withdraw(String, Decimal),
    Report,
    Save,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid amount `{0}`")]
    Amount(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = words.split_first() else {
            return Err(ParseError::Usage("help"));
        };
        let amount = |s: &str| Decimal::from_str(s).map_err(|_| ParseError::Amount(s.to_owned()));
        match (verb.to_ascii_lowercase().as_str(), args) {
            ("list", []) => Ok(Command::List),
            ("show", [id]) => Ok(Command::Show((*id).to_owned())),
            ("show", _) => Err(ParseError::Usage("show <id>")),
            ("create", [id, value]) => Ok(Command::Create((*id).to_owned(), amount(*value)?)),
            ("create", _) => Err(ParseError::Usage("create <id> <amount>")),
            ("delete", [id]) => Ok(Command::Delete((*id).to_owned())),
            ("delete", _) => Err(ParseError::Usage("delete <id>")),
            ("deposit", [id, value]) => Ok(Command::Deposit((*id).to_owned(), amount(*value)?)),
            ("deposit", _) => Err(ParseError::Usage("deposit <id> <amount>")),
            ("withdraw", [id, value]) => Ok(Command::Withdraw((*id).to_owned(), amount(*value)?)),
            ("withdraw", _) => Err(ParseError::Usage("withdraw <id> <amount>")),
            ("report", []) => Ok(Command::Report),
            ("save", []) => Ok(Command::Save),
            ("help", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),
            (_, _) => Err(ParseError::Unknown(line.trim().to_owned())),
        }
    }
}

fn print_outcome<W: Write>(output: &mut W, outcome: Outcome) -> std::io::Result<()> {
    if outcome.ok {
        writeln!(output, "ok: {}", outcome.message)
    } else {
        writeln!(output, "error: {}", outcome.message)
    }
}

/// Applies one command. Returns `false` once the session should end. Failed
/// operations, a failed save included, are reported on `output`; only errors
/// writing to `output` itself are returned.
pub fn execute<W: Write>(
    ledger: &mut Ledger,
    config: &Config,
    command: Command,
    output: &mut W,
) -> Result<bool, anyhow::Error> {
    match command {
        Command::List => {
            if ledger.is_empty() {
                writeln!(output, "no accounts")?;
            }
            for summary in ledger.list_accounts() {
                writeln!(output, "{}: {:.2}", summary.id, summary.balance)?;
            }
        }
        Command::Show(id) => match ledger.get_account(&id) {
            Some(account) => writeln!(
                output,
                "{}: balance {:.2}, deposited {:.2}, withdrawn {:.2}, created {}",
                account.id(),
                account.balance(),
                account.daily_deposits(),
                account.daily_withdrawals(),
                account.created_at().format("%Y-%m-%d %H:%M:%S"),
            )?,
            None => writeln!(output, "error: Account {id} not found")?,
        },
        Command::Create(id, amount) => {
            print_outcome(output, ledger.create_account(&id, amount).into())?
        }
        Command::Delete(id) => {
            if ledger.delete_account(&id) {
                writeln!(output, "ok: Account {id} deleted")?;
            } else {
                writeln!(output, "ok: Account {id} was not there")?;
            }
        }
        Command::Deposit(id, amount) => print_outcome(output, ledger.deposit(&id, amount).into())?,
        Command::Withdraw(id, amount) => {
            print_outcome(output, ledger.withdraw(&id, amount).into())?
        }
        Command::Report => {
            let report = ledger.daily_totals();
            writeln!(output, "deposits by account:")?;
            for (id, amount) in &report.deposits {
                writeln!(output, "  {id}: {amount:.2}")?;
            }
            writeln!(output, "withdrawals by account:")?;
            for (id, amount) in &report.withdrawals {
                writeln!(output, "  {id}: {amount:.2}")?;
            }
            writeln!(output, "total deposited: {:.2}", report.total_deposits)?;
            writeln!(output, "total withdrawn: {:.2}", report.total_withdrawals)?;
        }
        Command::Save => match ledger.save_all(config) {
            Ok(()) => writeln!(
                output,
                "ok: Accounts saved to {}",
                config.ledger_path.display()
            )?,
            Err(e) => {
                warn!("Save failed: {e:#}");
                writeln!(output, "error: {e:#}")?;
            }
        },
        Command::Help => writeln!(output, "{HELP}")?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Reads commands until end of input or `quit`. Bad commands and failed
/// operations are reported and the session goes on; only failing to read
/// input or write output ends it.
pub fn run<R: BufRead, W: Write>(
    ledger: &mut Ledger,
    config: &Config,
    input: R,
    mut output: W,
) -> Result<(), anyhow::Error> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("Rejected command {line:?}: {e}");
                writeln!(output, "error: {e}")?;
                continue;
            }
        };
        if !execute(ledger, config, command, &mut output)? {
            break;
        }
    }
    output.flush()?;
    Ok(())
}
