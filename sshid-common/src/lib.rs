//! Common components and data for sshid crates.

pub mod defaults;
pub mod key_line;
#[cfg(feature = "logging")]
pub mod logging;

pub use key_line::{Error, SshKeyLine};
