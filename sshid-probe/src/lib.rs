#![doc = include_str!("../README.md")]

use std::path::PathBuf;

mod endpoint;
pub mod known_hosts;
mod probe;
mod record;
mod stream;

pub use endpoint::HostEndpoint;
pub use probe::{ProbeOptions, probe_host_key};
pub use record::HostKeyRecord;

/// Host key probe error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid options used.
    #[error("Invalid options used: {0}")]
    InvalidOptions(String),

    /// The TCP connection to the server could not be established.
    #[error("Failed to connect to {endpoint}: {source}")]
    Dial {
        /// The endpoint that has been dialed.
        endpoint: HostEndpoint,

        /// Source error.
        source: std::io::Error,
    },

    /// The SSH handshake failed before the server presented a host key.
    #[error("SSH handshake failed: {0}")]
    Handshake(#[source] russh::Error),

    /// The SSH handshake ended without a captured host key and without a transport error.
    #[error("Internal invariant violated: {reason}")]
    InternalInvariant {
        /// A description of the unexpected state.
        reason: &'static str,
    },

    /// The probe has been cancelled by the caller.
    #[error("The host key probe has been cancelled")]
    Cancelled,

    /// The captured host key could not be encoded.
    #[error("Failed to encode host key: {0}")]
    KeyEncoding(#[from] russh::keys::ssh_key::Error),

    /// I/O error occurred.
    #[error("I/O error: {source} when processing {file}")]
    Io {
        /// File being processed.
        file: PathBuf,

        /// Source error.
        source: std::io::Error,
    },
}
