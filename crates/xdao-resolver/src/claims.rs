//! Per-claim-type required-field validation.

use xdao_catf::CatfDocument;
use xdao_core::error::XdaoError;

use crate::rules;

/// Validate that `doc`'s `CLAIMS` section has every field its
/// `Claim-Type` requires, per `spec.md` §4.7 step 2.
///
/// Returns the claim type on success (also readable directly from
/// `doc.claims()`, but returning it saves the caller a second lookup and
/// a second "what if it's missing" branch).
pub fn validate_required_fields(doc: &CatfDocument) -> Result<String, XdaoError> {
    let claim_type = doc
        .claims()
        .get("Type")
        .cloned()
        .ok_or_else(|| missing("CLAIMS.Type", "a claim type"))?;

    let required: &[&str] = match claim_type.as_str() {
        "authorship" => &["Role"],
        "approval" => &["Role", "Effective-Date"],
        "supersedes" => &["Supersedes"],
        "revocation" => &["Target-Attestation"],
        "name-binding" => &["Name", "Version", "Points-To"],
        other => return Err(missing("CLAIMS.Type", &format!("an unrecognized claim type {other:?}"))),
    };

    for key in required {
        if !doc.claims().contains_key(*key) {
            return Err(missing(key, &format!("{claim_type} claims")));
        }
    }

    Ok(claim_type)
}

fn missing(field: &str, context: &str) -> XdaoError {
    XdaoError::validation(
        rules::MISSING_REQUIRED_CLAIM_FIELD,
        format!("missing required field CLAIMS.{field} for {context}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_claims(claims_block: &str) -> CatfDocument {
        let text = format!(
            concat!(
                "-----BEGIN XDAO ATTESTATION-----\n",
                "META\n",
                "Issued-At: 2026-01-01T00:00:00Z\n",
                "\n",
                "SUBJECT\n",
                "Identifier: urn:example:alice\n",
                "\n",
                "CLAIMS\n",
                "{claims}",
                "\n",
                "CRYPTO\n",
                "Signature: abcd\n",
                "-----END XDAO ATTESTATION-----"
            ),
            claims = claims_block
        );
        xdao_catf::parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn authorship_requires_role() {
        let doc = doc_with_claims("Type: authorship\n");
        let err = validate_required_fields(&doc).unwrap_err();
        assert_eq!(err.rule_id(), rules::MISSING_REQUIRED_CLAIM_FIELD);
    }

    #[test]
    fn authorship_with_role_is_valid() {
        let doc = doc_with_claims("Role: author\nType: authorship\n");
        assert_eq!(validate_required_fields(&doc).unwrap(), "authorship");
    }

    #[test]
    fn approval_requires_role_and_effective_date() {
        let doc = doc_with_claims("Role: buyer\nType: approval\n");
        let err = validate_required_fields(&doc).unwrap_err();
        assert_eq!(err.rule_id(), rules::MISSING_REQUIRED_CLAIM_FIELD);
    }

    #[test]
    fn revocation_requires_target_attestation() {
        let doc = doc_with_claims("Type: revocation\n");
        assert!(validate_required_fields(&doc).is_err());
    }

    #[test]
    fn name_binding_requires_name_version_points_to() {
        let doc = doc_with_claims("Name: widget\nType: name-binding\nVersion: 2\n");
        let err = validate_required_fields(&doc).unwrap_err();
        assert_eq!(err.rule_id(), rules::MISSING_REQUIRED_CLAIM_FIELD);
    }
}
