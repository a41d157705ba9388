use crate::compute::Ledger;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Basic exporter for a `Ledger`: one `id,balance` line per account, in ledger
/// order, balances with exactly two decimals. `create_account` never lets a
/// comma or quote into an id; should one come from a hand-edited file anyway,
/// the csv writer quotes it rather than corrupting the line.
pub(crate) fn write_accounts<W: std::io::Write>(
    writer: W,
    ledger: &Ledger,
) -> Result<(), anyhow::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for account in ledger.accounts() {
        wtr.serialize(account.summary())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Replaces whatever is at `path` with the ledger's content. There is no
/// backup: if writing fails midway the previous file is lost.
pub fn save(ledger: &Ledger, path: impl AsRef<Path>) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create ledger {}", path.display()))?;
    write_accounts(std::io::BufWriter::new(file), ledger)
        .with_context(|| format!("failed to write ledger {}", path.display()))?;
    info!(accounts = ledger.len(), "Saved ledger to {}", path.display());
    Ok(())
}
