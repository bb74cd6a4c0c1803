//! Persisted trust state.
//!
//! A trust state file pins the host key of a single SSH server endpoint.
//! It is created once, after the first successful probe, and never changed afterwards: later runs
//! for the same endpoint return the pinned record without contacting the server.
//! Removing the file is the only way to capture a new host key.

use std::{
    fs::{File, read_to_string},
    io::Write,
    path::{Path, PathBuf},
};

use log::info;
use sshid_probe::{HostEndpoint, HostKeyRecord};

/// An error that may occur when using a trust state file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error: {source} when processing {file}")]
    Io {
        /// File being processed.
        file: PathBuf,

        /// Source error.
        source: std::io::Error,
    },

    /// The trust state file does not contain a valid record.
    #[error("Invalid trust state in {file}: {source}")]
    Invalid {
        /// File being processed.
        file: PathBuf,

        /// Source error.
        source: serde_json::Error,
    },

    /// The trust state has been pinned for another endpoint.
    #[error(
        "The trust state in {file} is pinned to {pinned} but {requested} has been requested. Remove the file to capture a new host key."
    )]
    EndpointMismatch {
        /// File being processed.
        file: PathBuf,

        /// The endpoint of the pinned record.
        pinned: HostEndpoint,

        /// The requested endpoint.
        requested: HostEndpoint,
    },

    /// Capturing the host key failed.
    #[error(transparent)]
    Probe(#[from] sshid_probe::Error),
}

/// A trust state file holding a single pinned [`HostKeyRecord`] as JSON.
#[derive(Clone, Debug)]
pub struct TrustState {
    path: PathBuf,
}

impl TrustState {
    /// Creates a new [`TrustState`] for a file at `path`.
    ///
    /// The file is not accessed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the trust state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the pinned record.
    ///
    /// Returns `None` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can not be read or does not contain a valid record.
    pub fn load(&self) -> Result<Option<HostKeyRecord>, Error> {
        let input = match read_to_string(&self.path) {
            Ok(input) => input,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    file: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&input)
            .map(Some)
            .map_err(|source| Error::Invalid {
                file: self.path.clone(),
                source,
            })
    }

    /// Pins `record` by writing it to a new trust state file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists already or can not be written.
    pub fn store(&self, record: &HostKeyRecord) -> Result<(), Error> {
        let io_error = |source| Error::Io {
            file: self.path.clone(),
            source,
        };
        let data = serde_json::to_vec_pretty(record).map_err(|source| Error::Invalid {
            file: self.path.clone(),
            source,
        })?;
        let mut file = File::create_new(&self.path).map_err(io_error)?;
        file.write_all(&data).map_err(io_error)?;
        file.write_all(b"\n").map_err(io_error)
    }

    /// Returns the pinned record for `endpoint`, capturing it with `probe` if none exists yet.
    ///
    /// The `probe` future is only awaited if the trust state file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if
    /// - the trust state file can not be loaded,
    /// - the pinned record belongs to another endpoint,
    /// - `probe` fails,
    /// - or the captured record can not be stored.
    pub async fn resolve(
        &self,
        endpoint: &HostEndpoint,
        probe: impl Future<Output = Result<HostKeyRecord, sshid_probe::Error>>,
    ) -> Result<HostKeyRecord, Error> {
        if let Some(record) = self.load()? {
            if record.endpoint() != endpoint {
                return Err(Error::EndpointMismatch {
                    file: self.path.clone(),
                    pinned: record.endpoint().clone(),
                    requested: endpoint.clone(),
                });
            }
            info!("Using host key for {endpoint} pinned in {:?}", self.path);
            return Ok(record);
        }

        let record = probe.await?;
        self.store(&record)?;
        info!("Pinned host key for {endpoint} in {:?}", self.path);
        Ok(record)
    }
}
