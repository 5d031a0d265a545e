//! Ed25519 signing and verification over a digest of the CATF signature
//! scope.
//!
//! The mandatory signature algorithm. `spec.md` §4.4 verifies the
//! algorithm-specific signature against `Hash-Alg(signature_scope_bytes)`,
//! not against the scope bytes directly — so unlike a typical Ed25519
//! integration, the "message" `ed25519-dalek` signs and verifies here is
//! always a digest, never raw document bytes.

use ed25519_dalek::{Signer, Verifier};

use xdao_core::error::XdaoError;

use crate::rules;

/// An Ed25519 public key (32 bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

/// An Ed25519 key pair, for producing test fixtures and real signers.
///
/// Does not implement `Debug` in a way that exposes key material — see the
/// hand-written impl below.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from the decoded bytes of an `Issuer-Key`'s base64 payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, XdaoError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            XdaoError::crypto(
                rules::BAD_KEY_LENGTH,
                format!("ed25519 public key must be 32 bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self(arr))
    }

    fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, XdaoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| XdaoError::crypto(rules::BAD_KEY_LENGTH, format!("invalid ed25519 public key: {e}")))
    }

    /// Verify `signature` against `digest` (the hashed signature scope).
    pub fn verify(&self, digest: &[u8], signature: &Ed25519Signature) -> Result<(), XdaoError> {
        let vk = self.to_verifying_key()?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        vk.verify(digest, &sig)
            .map_err(|e| XdaoError::crypto(rules::INVALID_SIGNATURE, format!("ed25519 verification failed: {e}")))
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex_prefix(&self.0))
    }
}

impl Ed25519Signature {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Parse from the decoded bytes of a `Signature` field's base64 payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, XdaoError> {
        let arr: [u8; 64] = bytes.try_into().map_err(|_| {
            XdaoError::crypto(
                rules::BAD_SIGNATURE_LENGTH,
                format!("ed25519 signature must be 64 bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self(arr))
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex_prefix(&self.0))
    }
}

impl Ed25519KeyPair {
    /// Generate a new random key pair (test fixtures and key-generation
    /// utilities; the key-store file layout that would persist these is
    /// out of scope here).
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self { signing_key: ed25519_dalek::SigningKey::from_bytes(seed) }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a digest of the signature scope.
    pub fn sign(&self, digest: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(digest).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}
