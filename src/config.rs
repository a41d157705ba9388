use std::path::PathBuf;

pub const DEFAULT_LEDGER_FILE: &str = "cuentas.txt";

/// Where the session's ledger lives. Relative paths resolve against the
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ledger_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
        }
    }
}

impl Config {
    pub fn new(ledger_path: impl Into<PathBuf>) -> Self {
        Self {
            ledger_path: ledger_path.into(),
        }
    }

    /// Takes the program arguments, name first: `[ledger-file]`.
    pub fn from_args<I, S>(args: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.as_slice() {
            [] | [_] => Ok(Self::default()),
            [_, path] => Ok(Self::new(path)),
            [program, ..] => anyhow::bail!("usage: {program} [ledger-file]"),
        }
    }
}
