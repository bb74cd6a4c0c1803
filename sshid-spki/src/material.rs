//! Public key material decoded from X.509 SubjectPublicKeyInfo structures.

use ed25519_dalek::VerifyingKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::{
    RsaPublicKey,
    pkcs8::spki::{DecodePublicKey, ObjectIdentifier, SubjectPublicKeyInfoRef, der::Decode},
    traits::PublicKeyParts,
};
use ssh_key::{
    Mpint,
    public::{DsaPublicKey, EcdsaPublicKey, Ed25519PublicKey, KeyData},
};
use sshid_common::SshKeyLine;

use crate::Error;

/// Object identifier of `rsaEncryption` (RFC 8017).
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Object identifier of `id-dsa` (RFC 3279).
const DSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");

/// Object identifier of `id-ecPublicKey` (RFC 5480).
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Object identifier of the `secp256r1` named curve.
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Object identifier of the `secp384r1` named curve.
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// Object identifier of the `secp521r1` named curve.
const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// Object identifier of `id-Ed25519` (RFC 8410).
const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Public key material of one of the supported key families.
#[derive(Clone, Debug, PartialEq)]
pub enum PublicKeyMaterial {
    /// An RSA public key.
    Rsa(RsaPublicKey),

    /// A DSA public key.
    Dsa(dsa::VerifyingKey),

    /// An ECDSA public key on the NIST P-256 curve.
    EcdsaP256(p256::PublicKey),

    /// An ECDSA public key on the NIST P-384 curve.
    EcdsaP384(p384::PublicKey),

    /// An ECDSA public key on the NIST P-521 curve.
    EcdsaP521(p521::PublicKey),

    /// An Ed25519 public key.
    Ed25519(VerifyingKey),
}

impl PublicKeyMaterial {
    /// Decodes a DER encoded X.509 SubjectPublicKeyInfo structure.
    ///
    /// # Errors
    ///
    /// Returns an error if
    /// - `der` is not a valid SubjectPublicKeyInfo structure,
    /// - the algorithm of the key is not RSA, DSA, ECDSA or Ed25519,
    /// - an ECDSA key is not on one of the curves P-256, P-384 or P-521,
    /// - or the key itself is invalid for its algorithm.
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(rsa::pkcs8::spki::Error::from)?;
        let oid = spki.algorithm.oid;
        log::debug!("Decoding public key with algorithm {oid}");

        Ok(match oid {
            RSA_ENCRYPTION => Self::Rsa(RsaPublicKey::from_public_key_der(der)?),
            DSA => Self::Dsa(dsa::VerifyingKey::from_public_key_der(der)?),
            EC_PUBLIC_KEY => match spki.algorithm.parameters_oid()? {
                SECP256R1 => Self::EcdsaP256(p256::PublicKey::from_public_key_der(der)?),
                SECP384R1 => Self::EcdsaP384(p384::PublicKey::from_public_key_der(der)?),
                SECP521R1 => Self::EcdsaP521(p521::PublicKey::from_public_key_der(der)?),
                curve => {
                    return Err(Error::UnsupportedCurve {
                        oid: curve.to_string(),
                    });
                }
            },
            ED25519 => Self::Ed25519(VerifyingKey::from_public_key_der(der)?),
            _ => {
                return Err(Error::UnsupportedAlgorithm {
                    oid: oid.to_string(),
                });
            }
        })
    }

    /// Returns the SSH key data of the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key can not be represented in SSH wire format.
    pub fn to_key_data(&self) -> Result<KeyData, Error> {
        Ok(match self {
            Self::Rsa(key) => KeyData::Rsa(ssh_key::public::RsaPublicKey {
                e: Mpint::from_positive_bytes(&key.e().to_bytes_be())?,
                n: Mpint::from_positive_bytes(&key.n().to_bytes_be())?,
            }),
            Self::Dsa(key) => {
                let components = key.components();
                KeyData::Dsa(DsaPublicKey {
                    p: Mpint::from_positive_bytes(&components.p().to_bytes_be())?,
                    q: Mpint::from_positive_bytes(&components.q().to_bytes_be())?,
                    g: Mpint::from_positive_bytes(&components.g().to_bytes_be())?,
                    y: Mpint::from_positive_bytes(&key.y().to_bytes_be())?,
                })
            }
            Self::EcdsaP256(key) => KeyData::Ecdsa(EcdsaPublicKey::from_sec1_bytes(
                key.to_encoded_point(false).as_bytes(),
            )?),
            Self::EcdsaP384(key) => KeyData::Ecdsa(EcdsaPublicKey::from_sec1_bytes(
                key.to_encoded_point(false).as_bytes(),
            )?),
            Self::EcdsaP521(key) => KeyData::Ecdsa(EcdsaPublicKey::from_sec1_bytes(
                key.to_encoded_point(false).as_bytes(),
            )?),
            Self::Ed25519(key) => KeyData::Ed25519(Ed25519PublicKey(key.to_bytes())),
        })
    }

    /// Returns the key as an SSH public key line.
    ///
    /// # Errors
    ///
    /// Returns an error if the key can not be represented in SSH wire format.
    pub fn to_key_line(&self) -> Result<SshKeyLine, Error> {
        let key = ssh_key::PublicKey::from(self.to_key_data()?);
        Ok(SshKeyLine::new(key.algorithm().as_str(), key.to_bytes()?))
    }
}
