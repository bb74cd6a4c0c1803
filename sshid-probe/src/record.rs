//! Host keys captured from SSH servers.

use serde::{Deserialize, Serialize};
use sshid_common::SshKeyLine;

use crate::HostEndpoint;

/// The host key of an SSH server, captured during a single probe.
///
/// # Examples
///
/// ```
/// # fn main() -> testresult::TestResult {
/// use sshid_probe::{HostEndpoint, HostKeyRecord};
///
/// let record = HostKeyRecord::new(
///     HostEndpoint::new("example.org", 2222),
///     "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
///         .parse()?,
/// );
/// assert_eq!(
///     record.known_hosts_entry(),
///     "[example.org]:2222 ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
/// );
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HostKeyRecord {
    #[serde(flatten)]
    endpoint: HostEndpoint,
    public_key: SshKeyLine,
}

impl HostKeyRecord {
    /// Creates a new [`HostKeyRecord`] for an `endpoint` and its `public_key`.
    pub fn new(endpoint: HostEndpoint, public_key: SshKeyLine) -> Self {
        Self {
            endpoint,
            public_key,
        }
    }

    /// Returns the endpoint the key has been captured from.
    pub fn endpoint(&self) -> &HostEndpoint {
        &self.endpoint
    }

    /// Returns the captured host key.
    pub fn public_key(&self) -> &SshKeyLine {
        &self.public_key
    }

    /// Returns the record as a line in the [SSH `known_hosts` file format].
    ///
    /// [SSH `known_hosts` file format]: https://man.archlinux.org/man/core/openssh/sshd.8.en#SSH_KNOWN_HOSTS_FILE_FORMAT
    pub fn known_hosts_entry(&self) -> String {
        format!("{} {}", self.endpoint.known_hosts_name(), self.public_key)
    }
}
