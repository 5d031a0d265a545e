//! `Issuer-Key` grammar: `<alg>:<base64(pubkey)>`.

use base64::Engine;

use xdao_core::error::XdaoError;

use crate::rules;
use crate::signature_alg::SignatureAlg;

/// A parsed `Issuer-Key` field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerKey {
    alg: SignatureAlg,
    public_key_bytes: Vec<u8>,
}

impl IssuerKey {
    /// Parse and validate an `Issuer-Key` field value.
    pub fn parse(value: &str) -> Result<Self, XdaoError> {
        let (alg_str, encoded) = value.split_once(':').ok_or_else(|| {
            XdaoError::crypto(
                rules::MALFORMED_ISSUER_KEY,
                format!("Issuer-Key {value:?} is missing the ':' alg separator"),
            )
        })?;
        let alg = SignatureAlg::parse(alg_str)?;
        let public_key_bytes = decode_base64(encoded)?;
        alg.public_key_parse(&public_key_bytes)?;
        Ok(Self { alg, public_key_bytes })
    }

    pub fn algorithm(&self) -> SignatureAlg {
        self.alg
    }

    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key_bytes
    }
}

/// Decode base64, accepting both padded and unpadded input, as `spec.md`
/// §6 requires for both `Issuer-Key` and `Signature` payloads.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, XdaoError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(encoded))
        .map_err(|e| XdaoError::crypto(rules::BAD_BASE64, format!("invalid base64: {e}")))
}
