//! Logging utilities.
//!
//! Log records go to the systemd journal when the process is connected to it (e.g. when running
//! as a unit) and to stderr otherwise.

use log::{LevelFilter, Log};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use systemd_journal_logger::{JournalLog, connected_to_journal};

/// The syslog identifier used for journal entries.
const SYSLOG_IDENTIFIER: &str = "sshid";

/// Logging setup error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Journal initialization error.
    #[error("Journal initialization error: {0}")]
    Journal(std::io::Error),

    /// Logger initialization error.
    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Creates a journal logger, if the process is connected to the systemd journal.
fn journal_logger() -> Result<Option<Box<dyn Log>>, Error> {
    if !connected_to_journal() {
        return Ok(None);
    }
    let log = JournalLog::new()
        .map_err(Error::Journal)?
        .with_syslog_identifier(SYSLOG_IDENTIFIER.to_string())
        .with_extra_fields(vec![("VERSION", env!("CARGO_PKG_VERSION"))]);
    Ok(Some(Box::new(log)))
}

/// Sets up logging facilities.
///
/// Falls back to logging on stderr if the journal is unavailable.
///
/// # Errors
///
/// An error is returned if a logger has already been set.
pub fn setup_logging(max_level: impl Into<LevelFilter>) -> Result<(), Error> {
    let max_level = max_level.into();
    if let Ok(Some(log)) = journal_logger() {
        log::set_boxed_logger(log)?;
        log::set_max_level(max_level);
        return Ok(());
    }
    TermLogger::init(
        max_level,
        Default::default(),
        // simplelog needs to be explicitly instructed to always use stderr
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}
