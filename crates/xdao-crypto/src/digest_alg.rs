//! Digest families usable as `Hash-Alg` in a CATF `CRYPTO` section.
//!
//! SHA-256 is mandatory; SHA-512 and SHA3-256 are optional per `spec.md`
//! §4.4 but carry no feature gate of their own — both `sha2` and `sha3`
//! are already in the dependency stack for CID derivation and digest
//! diversity, so there is no cost to keeping them always available.

use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;

use xdao_core::error::XdaoError;

use crate::rules;

/// A digest algorithm named by a CATF `Hash-Alg` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlg {
    Sha256,
    Sha512,
    Sha3_256,
}

impl DigestAlg {
    /// Parse the `Hash-Alg` field value.
    pub fn parse(value: &str) -> Result<Self, XdaoError> {
        match value {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "sha3-256" => Ok(Self::Sha3_256),
            other => Err(XdaoError::crypto(
                rules::UNSUPPORTED_ALGORITHM,
                format!("unsupported Hash-Alg {other:?}"),
            )),
        }
    }

    /// The `Hash-Alg` field value naming this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Sha3_256 => "sha3-256",
        }
    }

    /// Compute the digest of `bytes` under this algorithm.
    pub fn digest(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(bytes).to_vec(),
            Self::Sha512 => Sha512::digest(bytes).to_vec(),
            Self::Sha3_256 => Sha3_256::digest(bytes).to_vec(),
        }
    }
}
