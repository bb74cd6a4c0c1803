//! Defaults shared by sshid libraries and the command line interface.
//!
//! # Examples
//!
//! ```
//! use sshid_common::defaults::{DEFAULT_SSH_PORT, PUBLIC_KEY_PEM_LABEL};
//!
//! assert_eq!(DEFAULT_SSH_PORT, 22);
//! assert_eq!(PUBLIC_KEY_PEM_LABEL, "PUBLIC KEY");
//! ```

/// The TCP port used if no port is provided for an SSH server.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// The only PEM type label accepted for X.509 SubjectPublicKeyInfo input.
pub const PUBLIC_KEY_PEM_LABEL: &str = "PUBLIC KEY";

/// The application name used for configuration file lookup.
pub const APPLICATION_NAME: &str = "sshid";
