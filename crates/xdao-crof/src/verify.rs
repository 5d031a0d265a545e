//! Optional resolver signature over a CROF document.
//!
//! `spec.md` §4.6: "emit `Signature: 0` as a placeholder, then replace it
//! with the base64 signature of SHA-256 over the byte scope consisting
//! of the entire document with the `Signature: …` line removed."

use base64::Engine;
use sha2::{Digest, Sha256};

use xdao_core::error::XdaoError;
use xdao_crypto::ed25519::{Ed25519KeyPair, Ed25519Signature};
use xdao_crypto::{IssuerKey, SignatureAlg};

use crate::canonicalize::{canonicalize, parse};
use crate::rules;

const SIGNATURE_PLACEHOLDER: &str = "Signature: 0";

/// Sign `unsigned_bytes` (a canonical CROF document whose `CRYPTO`
/// section is empty) with `keypair`, returning the fully canonical,
/// signed bytes.
pub fn sign(unsigned_bytes: &[u8], keypair: &Ed25519KeyPair) -> Result<Vec<u8>, XdaoError> {
    let text = std::str::from_utf8(unsigned_bytes)
        .map_err(|_| XdaoError::crypto(rules::INVALID_SIGNATURE, "unsigned CROF bytes are not valid UTF-8"))?;
    if !text.contains("CRYPTO\n-----END") {
        return Err(XdaoError::crypto(
            rules::MISSING_SIGNATURE_SENTINEL,
            "sign() expects a document whose CRYPTO section is empty",
        ));
    }

    let pubkey_b64 = base64::engine::general_purpose::STANDARD.encode(keypair.public_key().as_bytes());
    let resolver_key = format!("ed25519:{pubkey_b64}");
    let with_crypto = text.replacen(
        "CRYPTO\n-----END",
        &format!(
            "CRYPTO\nHash-Alg: sha256\nResolver-Key: {resolver_key}\n{SIGNATURE_PLACEHOLDER}\nSignature-Alg: ed25519\n-----END"
        ),
        1,
    );

    let scope = signature_scope(with_crypto.as_bytes())?;
    let digest = Sha256::digest(&scope);
    let signature = keypair.sign(&digest);
    let sig_b64 = base64::engine::general_purpose::STANDARD.encode(signature.as_bytes());
    let signed = with_crypto.replacen(SIGNATURE_PLACEHOLDER, &format!("Signature: {sig_b64}"), 1);

    canonicalize(signed.as_bytes())
}

/// Verify the resolver signature on a canonical, signed CROF document.
pub fn verify(bytes: &[u8]) -> Result<(), XdaoError> {
    let doc = parse(bytes)?;
    let crypto = doc.crypto();
    if crypto.is_empty() {
        return Err(XdaoError::crypto(rules::MISSING_SIGNATURE_SENTINEL, "document has no CRYPTO fields to verify"));
    }
    let field = |key: &str| -> Result<&str, XdaoError> {
        crypto
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| XdaoError::crypto(rules::MISSING_SIGNATURE_SENTINEL, format!("CRYPTO.{key} is required")))
    };

    let resolver_key = IssuerKey::parse(field("Resolver-Key")?)?;
    let signature_alg = SignatureAlg::parse(field("Signature-Alg")?)?;
    if resolver_key.algorithm() != signature_alg {
        return Err(XdaoError::crypto(
            rules::INVALID_SIGNATURE,
            "CRYPTO.Resolver-Key algorithm does not match CRYPTO.Signature-Alg",
        ));
    }
    if field("Hash-Alg")? != "sha256" {
        return Err(XdaoError::crypto(rules::INVALID_SIGNATURE, "resolver signatures are always sha256"));
    }

    let sig_bytes = base64::engine::general_purpose::STANDARD
        .decode(field("Signature")?)
        .map_err(|_| XdaoError::crypto(rules::INVALID_SIGNATURE, "CRYPTO.Signature is not valid base64"))?;

    let scope = signature_scope(bytes)?;
    let digest = Sha256::digest(&scope);

    let public_key = xdao_crypto::ed25519::Ed25519PublicKey::from_slice(resolver_key.public_key_bytes())?;
    let signature = Ed25519Signature::from_slice(&sig_bytes)?;
    let result = public_key.verify(&digest, &signature);
    if result.is_err() {
        tracing::warn!(cid = %doc.cid(), "CROF resolver signature verification failed");
    }
    result
}

/// The entire document with its one `Signature: …` line removed.
fn signature_scope(bytes: &[u8]) -> Result<Vec<u8>, XdaoError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| XdaoError::crypto(rules::INVALID_SIGNATURE, "CROF bytes are not valid UTF-8"))?;
    let mut matches = text.match_indices("\nSignature: ");
    let (start, _) = matches
        .next()
        .ok_or_else(|| XdaoError::crypto(rules::MISSING_SIGNATURE_SENTINEL, "no Signature: line found"))?;
    if matches.next().is_some() {
        return Err(XdaoError::crypto(rules::MULTIPLE_SIGNATURE_LINES, "more than one Signature: line found"));
    }
    let line_end = text[start + 1..]
        .find('\n')
        .map(|i| start + 1 + i)
        .unwrap_or(text.len());
    let mut scope = Vec::with_capacity(text.len() - (line_end - start));
    scope.extend_from_slice(&bytes[..start]);
    scope.extend_from_slice(&bytes[line_end..]);
    Ok(scope)
}
