//! SSH public key lines.
//!
//! An [`SshKeyLine`] is the `"<algorithm> <base64>"` representation of an SSH public key, as found
//! in the [`authorized_keys` file format] and the [SSH `known_hosts` file format] (without host
//! patterns, options or comments).
//!
//! [`authorized_keys` file format]: https://man.archlinux.org/man/core/openssh/sshd.8.en#AUTHORIZED_KEYS_FILE_FORMAT
//! [SSH `known_hosts` file format]: https://man.archlinux.org/man/core/openssh/sshd.8.en#SSH_KNOWN_HOSTS_FILE_FORMAT

use std::{fmt::Display, str::FromStr};

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An error that may occur when parsing an [`SshKeyLine`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The line does not consist of an algorithm name and a base64 encoded blob.
    #[error("Expected \"<algorithm> <base64>\" but found {line:?}")]
    MalformedLine {
        /// The offending line.
        line: String,
    },

    /// The key blob is not valid base64.
    #[error("The key blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The key blob does not start with the algorithm name of the line.
    #[error("The key blob is not a wire encoded {algorithm} key")]
    AlgorithmMismatch {
        /// The algorithm name found in the line.
        algorithm: String,
    },
}

/// An SSH public key in the single line `"<algorithm> <base64>"` format.
///
/// The blob is the SSH wire encoding of the public key (see [RFC 4253, section 6.6]), which itself
/// starts with the length-prefixed algorithm name.
///
/// # Examples
///
/// ```
/// # fn main() -> testresult::TestResult {
/// use sshid_common::SshKeyLine;
///
/// let line: SshKeyLine =
///     "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
///         .parse()?;
/// assert_eq!(line.algorithm(), "ssh-ed25519");
/// assert_eq!(line.blob().len(), 51);
/// # Ok(()) }
/// ```
///
/// [RFC 4253, section 6.6]: https://www.rfc-editor.org/rfc/rfc4253#section-6.6
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SshKeyLine {
    algorithm: String,
    blob: Vec<u8>,
}

impl SshKeyLine {
    /// Creates a new [`SshKeyLine`] from an algorithm name and a wire encoded key blob.
    pub fn new(algorithm: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            algorithm: algorithm.into(),
            blob,
        }
    }

    /// Returns the SSH algorithm name (e.g. `ssh-ed25519`).
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the wire encoded key blob.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }
}

/// Returns the length-prefixed string at the start of `blob`, if there is one.
fn leading_string(blob: &[u8]) -> Option<&[u8]> {
    let (length, rest) = blob.split_first_chunk::<4>()?;
    rest.get(..u32::from_be_bytes(*length) as usize)
}

impl Display for SshKeyLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.algorithm, BASE64_STANDARD.encode(&self.blob))
    }
}

impl FromStr for SshKeyLine {
    type Err = Error;

    /// Parses an [`SshKeyLine`] from a string.
    ///
    /// A trailing comment is accepted and dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let (Some(algorithm), Some(blob)) = (fields.next(), fields.next()) else {
            return Err(Error::MalformedLine { line: s.to_string() });
        };
        let blob = BASE64_STANDARD.decode(blob)?;
        if leading_string(&blob) != Some(algorithm.as_bytes()) {
            return Err(Error::AlgorithmMismatch {
                algorithm: algorithm.to_string(),
            });
        }
        Ok(Self::new(algorithm, blob))
    }
}

impl Serialize for SshKeyLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SshKeyLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
