//! Network endpoints of SSH servers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sshid_common::defaults::DEFAULT_SSH_PORT;

/// The network endpoint of an SSH server.
///
/// Tracks a `host` (a DNS name or an IP address literal) and a TCP `port`.
///
/// # Examples
///
/// ```
/// use sshid_probe::HostEndpoint;
///
/// let endpoint = HostEndpoint::new("example.org", 2222);
/// assert_eq!(endpoint.to_string(), "example.org:2222");
///
/// let endpoint = HostEndpoint::new("::1", 22);
/// assert_eq!(endpoint.to_string(), "[::1]:22");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct HostEndpoint {
    host: String,
    port: u16,
}

impl HostEndpoint {
    /// Creates a new [`HostEndpoint`].
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host name or IP address literal.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the name under which the endpoint is listed in SSH `known_hosts` data.
    ///
    /// This is the plain host for the default SSH port and `[host]:port` for all other ports.
    ///
    /// # Examples
    ///
    /// ```
    /// use sshid_probe::HostEndpoint;
    ///
    /// assert_eq!(HostEndpoint::new("example.org", 22).known_hosts_name(), "example.org");
    /// assert_eq!(
    ///     HostEndpoint::new("example.org", 2222).known_hosts_name(),
    ///     "[example.org]:2222"
    /// );
    /// ```
    pub fn known_hosts_name(&self) -> String {
        if self.port == DEFAULT_SSH_PORT {
            self.host.clone()
        } else {
            format!("[{}]:{}", self.host, self.port)
        }
    }
}

impl Display for HostEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
