#![doc = include_str!("../README.md")]

use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod state;

/// Command line interface error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] config::Error),

    /// Trust state error.
    #[error(transparent)]
    State(#[from] state::Error),

    /// Public key conversion error.
    #[error("Public key conversion failed: {0}")]
    Spki(#[from] sshid_spki::Error),

    /// Host key probe error.
    #[error("Host key probe failed: {0}")]
    Probe(#[from] sshid_probe::Error),

    /// JSON serialization error.
    #[error("Serde serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error occurred.
    #[error("I/O error: {source} when processing {file}")]
    Io {
        /// File being processed.
        ///
        /// This field will be empty ([`PathBuf::new`]) if the error
        /// was encountered when processing generic I/O streams.
        file: PathBuf,

        /// Source error.
        source: std::io::Error,
    },

    /// The captured host key is not listed in a `known_hosts` file.
    #[error("The host key of {entry:?} is not listed in {file}")]
    UnknownHostKey {
        /// The captured host key in the SSH `known_hosts` file format.
        entry: String,

        /// The `known_hosts` file.
        file: PathBuf,
    },
}
