use crate::{
    compute::Ledger,
    data::{Account, AccountSummary, Error},
};
use anyhow::Context;
use std::{io::ErrorKind, path::Path};
use tracing::{debug, info, warn};

/// Trait for doing something with an `Account` read from the ledger file.
/// Used by `Ledger` to rebuild the session's collection, but also by mock
/// tests to check what comes out of a ledger stream.
pub(crate) trait AccountUser {
    fn use_account(&mut self, account: Account) -> Result<(), Error>;
}

/// Reads `id,balance` records (no header). Records that can't be turned into
/// a valid account are skipped with a warning; only I/O errors stop the read.
pub(crate) fn read_accounts<R: std::io::Read, U: AccountUser>(
    reader: R,
    user: &mut U,
) -> Result<(), anyhow::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable ledger record: {e}");
                continue;
            }
        };
        let line = record.position().map_or(0, |pos| pos.line());
        if record.len() != 2 {
            warn!(
                "Skipping ledger line {line}: expected 2 fields, found {}",
                record.len()
            );
            continue;
        }
        let summary: AccountSummary = match record.deserialize(None) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Skipping ledger line {line}: {e}");
                continue;
            }
        };
        if summary.id.is_empty() {
            warn!("Skipping ledger line {line}: empty account id");
            continue;
        }
        if summary.balance.is_sign_negative() {
            warn!(
                "Skipping ledger line {line}: negative balance for account {}",
                summary.id
            );
            continue;
        }
        if let Err(e) = user.use_account(Account::new(summary.id, summary.balance)) {
            warn!("Skipping ledger line {line}: {e}");
        }
    }
    Ok(())
}

/// Loads the ledger stored at `path`. A missing file is an empty ledger, not
/// an error. Daily totals start from zero and creation times are the load time.
pub fn load(path: impl AsRef<Path>) -> Result<Ledger, anyhow::Error> {
    let path = path.as_ref();
    let mut ledger = Ledger::new();
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No ledger at {}, starting empty", path.display());
            return Ok(ledger);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open ledger {}", path.display()))
        }
    };
    read_accounts(file, &mut ledger)
        .with_context(|| format!("failed to read ledger {}", path.display()))?;
    info!(accounts = ledger.len(), "Loaded ledger from {}", path.display());
    Ok(ledger)
}
