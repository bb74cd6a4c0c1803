//! Configuration file handling.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sshid_common::defaults::{APPLICATION_NAME, DEFAULT_SSH_PORT};

/// The number of seconds after which a host key probe is cancelled by default.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config loading error
    #[error("Config loading issue: {0}")]
    Load(#[source] confy::ConfyError),
}

/// The configuration of the `sshid` command line interface.
///
/// All settings can be overridden by command line options.
///
/// # Examples
///
/// ```toml
/// host_key_algorithms = ["ssh-ed25519", "ecdsa-sha2-nistp256"]
/// port = 22
/// timeout = 30
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    /// The acceptable host key algorithms in order of preference.
    ///
    /// An empty list selects the default order of the SSH library.
    pub host_key_algorithms: Vec<String>,

    /// The TCP port of SSH servers.
    pub port: u16,

    /// The number of seconds after which a host key probe is cancelled.
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_key_algorithms: Vec::new(),
            port: DEFAULT_SSH_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Loads the configuration from `path` or the default location
    ///
    /// The default location is `~/.config/sshid/config.toml` (on Linux).
    /// A default configuration file is created if none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file can not be read, created or parsed.
    pub fn new(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            confy::load_path(path).map_err(Error::Load)
        } else {
            confy::load(APPLICATION_NAME, "config").map_err(Error::Load)
        }
    }
}
