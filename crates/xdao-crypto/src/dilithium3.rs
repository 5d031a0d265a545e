//! Dilithium3 signature support, gated behind the `dilithium3` feature.
//!
//! Optional per `spec.md` §4.4: the issuer key grammar allows `dilithium3:`
//! keys and `Signature-Alg: dilithium3`, but a build without this feature
//! simply never recognizes that algorithm name (see
//! [`crate::signature_alg::SignatureAlg::parse`]).

use pqcrypto_dilithium::dilithium3;
use pqcrypto_traits::sign::{
    DetachedSignature as _, PublicKey as _, VerificationError,
};

use xdao_core::error::XdaoError;

use crate::rules;

/// Parse and validate a decoded Dilithium3 public key.
pub fn parse_public_key(bytes: &[u8]) -> Result<(), XdaoError> {
    dilithium3::PublicKey::from_bytes(bytes)
        .map(|_| ())
        .map_err(|_| XdaoError::crypto(rules::BAD_KEY_LENGTH, "invalid dilithium3 public key encoding"))
}

/// Verify a detached Dilithium3 signature over `digest`.
pub fn verify(public_key_bytes: &[u8], digest: &[u8], signature_bytes: &[u8]) -> Result<(), XdaoError> {
    let pk = dilithium3::PublicKey::from_bytes(public_key_bytes).map_err(|_| {
        XdaoError::crypto(rules::BAD_KEY_LENGTH, "invalid dilithium3 public key encoding")
    })?;
    let sig = dilithium3::DetachedSignature::from_bytes(signature_bytes).map_err(|_| {
        XdaoError::crypto(rules::BAD_SIGNATURE_LENGTH, "invalid dilithium3 signature encoding")
    })?;
    match dilithium3::verify_detached_signature(&sig, digest, &pk) {
        Ok(()) => Ok(()),
        Err(VerificationError::InvalidSignature) => Err(XdaoError::crypto(
            rules::INVALID_SIGNATURE,
            "dilithium3 verification failed",
        )),
        Err(e) => Err(XdaoError::crypto(rules::INVALID_SIGNATURE, format!("dilithium3 verification error: {e:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

    #[test]
    fn sign_then_verify_round_trips() {
        let (pk, sk) = dilithium3::keypair();
        let digest = [3u8; 32];
        let sig = dilithium3::detached_sign(&digest, &sk);
        verify(pk.as_bytes(), &digest, sig.as_bytes()).unwrap();
        let _ = sk.as_bytes(); // keep SecretKey trait import used
    }

    #[test]
    fn tampered_digest_fails() {
        let (pk, sk) = dilithium3::keypair();
        let sig = dilithium3::detached_sign(&[1u8; 32], &sk);
        assert!(verify(pk.as_bytes(), &[2u8; 32], sig.as_bytes()).is_err());
    }
}
