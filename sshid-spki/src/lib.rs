#![doc = include_str!("../README.md")]

mod material;
mod pem;

pub use material::PublicKeyMaterial;
pub use pem::PemBlock;
use sshid_common::{SshKeyLine, defaults::PUBLIC_KEY_PEM_LABEL};

/// An error that may occur when converting a public key.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not contain a PEM block.
    #[error("Expected input in PEM format")]
    NotPem,

    /// The PEM block is not of the expected type.
    #[error("Expected a PEM block of type {expected:?} but found {actual:?}")]
    WrongBlockType {
        /// The expected type label.
        expected: &'static str,

        /// The type label found in the input.
        actual: String,
    },

    /// The payload of the PEM block is not a valid public key.
    #[error("Failed to parse public key: {0}")]
    KeyParse(#[from] rsa::pkcs8::spki::Error),

    /// The algorithm of the public key is not supported.
    #[error("Unsupported public key algorithm: {oid}")]
    UnsupportedAlgorithm {
        /// The object identifier of the algorithm.
        oid: String,
    },

    /// The elliptic curve of an ECDSA public key is not supported.
    #[error("Unsupported elliptic curve: {oid}")]
    UnsupportedCurve {
        /// The object identifier of the named curve.
        oid: String,
    },

    /// The public key can not be encoded in SSH wire format.
    #[error("Failed to encode public key in SSH format: {0}")]
    KeyEncode(#[from] ssh_key::Error),
}

/// Converts a PEM encoded X.509 SubjectPublicKeyInfo public key to an SSH public key line.
///
/// Only the first PEM block in `pem` is considered and it must be of type `PUBLIC KEY`.
/// RSA, DSA, ECDSA (P-256, P-384 and P-521) and Ed25519 public keys are supported.
///
/// # Examples
///
/// ```
/// # fn main() -> testresult::TestResult {
/// use sshid_spki::from_spki;
///
/// let line = from_spki(
///     "-----BEGIN PUBLIC KEY-----
/// MCowBQYDK2VwAyEA+7VOplOcTbnvhgJHls2LDTfB3S9uxquJtNvP4szil10=
/// -----END PUBLIC KEY-----",
/// )?;
/// assert_eq!(
///     line.to_string(),
///     "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
/// );
/// # Ok(()) }
/// ```
///
/// # Errors
///
/// Returns an error if
/// - `pem` contains no PEM block,
/// - the first PEM block is not of type `PUBLIC KEY`,
/// - the block does not contain a valid SubjectPublicKeyInfo structure,
/// - the key algorithm or elliptic curve is not supported,
/// - or the key can not be encoded in SSH wire format.
pub fn from_spki(pem: &str) -> Result<SshKeyLine, Error> {
    let block = PemBlock::from_pem(pem)?;
    if block.label() != PUBLIC_KEY_PEM_LABEL {
        return Err(Error::WrongBlockType {
            expected: PUBLIC_KEY_PEM_LABEL,
            actual: block.label().to_string(),
        });
    }
    PublicKeyMaterial::from_der(block.contents())?.to_key_line()
}
