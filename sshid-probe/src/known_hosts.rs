//! SSH `known_hosts` format utilities.

use std::path::Path;

use hmac::Mac;
use log::{info, warn};
use russh::keys::ssh_key::known_hosts::{Entry, HostPatterns, KnownHosts};

use crate::{Error, HostKeyRecord};

/// Reads all entries of a file in the [SSH `known_hosts` file format].
///
/// Lines that can not be parsed are skipped.
///
/// # Errors
///
/// Returns an error if reading the file fails.
///
/// [SSH `known_hosts` file format]: https://man.archlinux.org/man/core/openssh/sshd.8.en#SSH_KNOWN_HOSTS_FILE_FORMAT
pub fn read_known_hosts(path: impl AsRef<Path>) -> Result<Vec<Entry>, Error> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
        file: path.to_path_buf(),
        source,
    })?;
    Ok(KnownHosts::new(&input)
        .filter_map(|entry| {
            entry
                .inspect_err(|error| warn!("Skipping invalid entry in {path:?}: {error}"))
                .ok()
        })
        .collect())
}

/// Checks whether a `pattern` of a `known_hosts` entry matches the endpoint of `record`.
fn matches_pattern(pattern: &str, record: &HostKeyRecord) -> bool {
    let endpoint = record.endpoint();
    pattern.eq_ignore_ascii_case(&endpoint.known_hosts_name())
        || pattern.eq_ignore_ascii_case(&format!("[{}]:{}", endpoint.host(), endpoint.port()))
}

/// Checks whether a hashed host name of a `known_hosts` entry matches the endpoint of `record`.
fn matches_hash(salt: &[u8], hash: &[u8], record: &HostKeyRecord) -> bool {
    let Ok(mut mac) = hmac::Hmac::<sha1::Sha1>::new_from_slice(salt) else {
        warn!("The salt {salt:?} was not of correct size so the hashed entry does not match");
        return false;
    };
    mac.update(record.endpoint().known_hosts_name().as_bytes());
    mac.finalize().into_bytes()[..] == hash[..]
}

/// Checks whether a captured host key can be found in SSH `known_hosts` data.
///
/// Returns `true`, if the endpoint and key of `record` match an entry in `entries` and that entry
/// is neither a CA key nor a revoked key. Returns `false` in all other cases.
///
/// Plain host names and `[host]:port` patterns as well as hashed host names are supported.
/// Wildcards and negated patterns are not.
pub fn is_server_known<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    record: &HostKeyRecord,
) -> bool {
    let key = record.public_key();
    for entry in entries {
        let host_matches = match entry.host_patterns() {
            HostPatterns::Patterns(items) => {
                items.iter().any(|item| matches_pattern(item, record))
            }
            HostPatterns::HashedName { salt, hash } => matches_hash(salt, hash, record),
        };
        if !host_matches {
            continue;
        }
        if entry.public_key().to_bytes().ok().as_deref() != Some(key.blob()) {
            continue;
        }
        return if let Some(marker) = entry.marker() {
            info!(
                "Found marker {marker} for {} but it is not supported.",
                record.endpoint()
            );
            false
        } else {
            true
        };
    }
    false
}
