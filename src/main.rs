use ledger::{load, session, Config};
use std::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr (level from `RUST_LOG`, `info` by default) so that stdout
/// only carries the session's answers.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), anyhow::Error> {
    init_logging();
    let config = Config::from_args(std::env::args())?;
    let mut ledger = load(&config.ledger_path)?;
    session::run(&mut ledger, &config, stdin().lock(), stdout().lock())?;
    Ok(())
}
