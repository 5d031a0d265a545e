//! Full CATF signature verification procedure.

use xdao_catf::CatfDocument;
use xdao_core::error::XdaoError;

use crate::digest_alg::DigestAlg;
use crate::issuer_key::{decode_base64, IssuerKey};
use crate::rules;
use crate::signature_alg::SignatureAlg;

/// Verify `doc`'s `CRYPTO` signature against its signature scope.
///
/// Implements `spec.md` §4.4: re-canonicalize defensively, require the
/// three algorithm/key fields to be present and consistent, decode the
/// signature, hash the scope, and run the algorithm-specific check. Every
/// distinct failure mode carries its own stable rule id; the final
/// "signature did not verify" case is always [`rules::INVALID_SIGNATURE`].
pub fn verify(doc: &CatfDocument) -> Result<(), XdaoError> {
    xdao_catf::canonicalize(doc.canonical_bytes())?;

    let crypto = doc.crypto();
    let signature_alg_str = field(crypto, "Signature-Alg")?;
    let hash_alg_str = field(crypto, "Hash-Alg")?;
    let issuer_key_str = field(crypto, "Issuer-Key")?;
    let signature_str = field(crypto, "Signature")?;

    let issuer = IssuerKey::parse(issuer_key_str)?;
    let signature_alg = SignatureAlg::parse(signature_alg_str)?;
    if issuer.algorithm() != signature_alg {
        return Err(XdaoError::crypto(
            rules::ALGORITHM_MISMATCH,
            format!(
                "Issuer-Key algorithm {:?} does not match Signature-Alg {:?}",
                issuer.algorithm().as_str(),
                signature_alg.as_str()
            ),
        ));
    }

    let digest_alg = DigestAlg::parse(hash_alg_str)?;
    let signature_bytes = decode_base64(signature_str)?;
    let scope = doc.signature_scope()?;
    let digest = digest_alg.digest(scope);

    let result = signature_alg.verify(issuer.public_key_bytes(), &digest, &signature_bytes);
    if let Err(ref e) = result {
        tracing::warn!(rule_id = e.rule_id(), cid = %doc.cid(), "CATF signature verification failed");
    }
    result
}

fn field<'a>(
    crypto: &'a std::collections::BTreeMap<String, String>,
    key: &'static str,
) -> Result<&'a str, XdaoError> {
    crypto
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            XdaoError::crypto(rules::MISSING_CRYPTO_FIELD, format!("CRYPTO.{key} is missing or empty"))
        })
}
