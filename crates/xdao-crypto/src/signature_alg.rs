//! Polymorphism over signature algorithms.
//!
//! Modeled as a tagged variant with the capability set `{public_key_parse,
//! signature_length, verify}` per `spec.md` §9, rather than as a trait
//! object — the algorithm set is closed and small, so a `match` is more
//! direct than dynamic dispatch.

use xdao_core::error::XdaoError;

use crate::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::rules;

/// A signature algorithm named by `Signature-Alg` (and the prefix of an
/// `Issuer-Key`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlg {
    Ed25519,
    #[cfg(feature = "dilithium3")]
    Dilithium3,
}

impl SignatureAlg {
    /// Parse a `Signature-Alg` (or `Issuer-Key` prefix) value.
    pub fn parse(value: &str) -> Result<Self, XdaoError> {
        match value {
            "ed25519" => Ok(Self::Ed25519),
            #[cfg(feature = "dilithium3")]
            "dilithium3" => Ok(Self::Dilithium3),
            other => Err(XdaoError::crypto(
                rules::UNSUPPORTED_ALGORITHM,
                format!("unsupported signature algorithm {other:?}"),
            )),
        }
    }

    /// The canonical name of this algorithm, as used in `Signature-Alg`
    /// and the `Issuer-Key` prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            #[cfg(feature = "dilithium3")]
            Self::Dilithium3 => "dilithium3",
        }
    }

    /// The fixed signature length for this algorithm, if it has one.
    /// Ed25519 signatures are always 64 bytes; Dilithium3's detached
    /// signature length is fixed by the scheme but is not enforced as a
    /// distinct pre-check here — `verify` rejects malformed encodings
    /// directly.
    pub fn fixed_signature_length(&self) -> Option<usize> {
        match self {
            Self::Ed25519 => Some(64),
            #[cfg(feature = "dilithium3")]
            Self::Dilithium3 => None,
        }
    }

    /// Parse and validate a decoded public key for this algorithm.
    pub fn public_key_parse(&self, bytes: &[u8]) -> Result<(), XdaoError> {
        match self {
            Self::Ed25519 => Ed25519PublicKey::from_slice(bytes).map(|_| ()),
            #[cfg(feature = "dilithium3")]
            Self::Dilithium3 => crate::dilithium3::parse_public_key(bytes),
        }
    }

    /// Verify `signature_bytes` against `digest` under `public_key_bytes`.
    pub fn verify(
        &self,
        public_key_bytes: &[u8],
        digest: &[u8],
        signature_bytes: &[u8],
    ) -> Result<(), XdaoError> {
        if let Some(expected) = self.fixed_signature_length() {
            if signature_bytes.len() != expected {
                return Err(XdaoError::crypto(
                    rules::BAD_SIGNATURE_LENGTH,
                    format!(
                        "{} signature must be {expected} bytes, got {}",
                        self.as_str(),
                        signature_bytes.len()
                    ),
                ));
            }
        }
        match self {
            Self::Ed25519 => {
                let pk = Ed25519PublicKey::from_slice(public_key_bytes)?;
                let sig = Ed25519Signature::from_slice(signature_bytes)?;
                pk.verify(digest, &sig)
            }
            #[cfg(feature = "dilithium3")]
            Self::Dilithium3 => crate::dilithium3::verify(public_key_bytes, digest, signature_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ed25519() {
        assert_eq!(SignatureAlg::parse("ed25519").unwrap(), SignatureAlg::Ed25519);
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let err = SignatureAlg::parse("rsa").unwrap_err();
        assert_eq!(err.rule_id(), rules::UNSUPPORTED_ALGORITHM);
    }

    #[test]
    fn ed25519_has_fixed_signature_length() {
        assert_eq!(SignatureAlg::Ed25519.fixed_signature_length(), Some(64));
    }

    #[test]
    fn verify_rejects_wrong_length_signature() {
        let err = SignatureAlg::Ed25519
            .verify(&[0u8; 32], &[0u8; 32], &[0u8; 10])
            .unwrap_err();
        assert_eq!(err.rule_id(), rules::BAD_SIGNATURE_LENGTH);
    }
}
