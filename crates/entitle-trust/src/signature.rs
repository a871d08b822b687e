//! # Enveloped Signature Signing and Verification
//!
//! A signed document carries exactly one `<signature>` block holding a
//! signed-info (one digest reference per content unit) and an Ed25519
//! signature over the canonical signed-info bytes. The signed-info always
//! references the full document content (`#document`, signature blocks
//! excluded) plus each item individually — the document reference makes
//! coverage total, the item references make failures diagnosable.
//!
//! Verification is binary: the caller either gets `Ok(())` and may trust
//! the document, or a [`TrustError`] and must not assemble anything from
//! it. The detailed report exists so operators can tell a wrong key from
//! tampered content, not to grade partial trust.

use entitle_wire::{
    canonical_document, canonical_item, CanonicalBytes, Envelope, Reference, Signature, SignedInfo,
};

use crate::digest::ContentDigest;
use crate::error::TrustError;
use crate::keys::{SignatureBytes, SigningKey, VerifyingKey};

/// Reference URI covering the whole document (signature blocks excluded).
pub const DOCUMENT_URI: &str = "#document";

fn item_uri(index: usize) -> String {
    format!("#item/{index}")
}

/// Sign a document, replacing any existing signature blocks.
///
/// Builds one digest reference for the document content and one per item,
/// signs the canonical signed-info, and embeds the verifying key as
/// stripped base64.
///
/// # Errors
///
/// Returns a [`TrustError`] only when canonicalization fails.
pub fn sign_envelope(envelope: &mut Envelope, key: &SigningKey) -> Result<(), TrustError> {
    envelope.signatures.clear();

    let mut references = vec![Reference {
        uri: DOCUMENT_URI.to_string(),
        digest: ContentDigest::compute(&canonical_document(envelope)?).to_hex(),
    }];
    for (index, item) in envelope.items.iter().enumerate() {
        references.push(Reference {
            uri: item_uri(index),
            digest: ContentDigest::compute(&canonical_item(item)?).to_hex(),
        });
    }

    let signed_info = SignedInfo { references };
    let signature_value = key.sign(&entitle_wire::canonical_signed_info(&signed_info)?);

    envelope.signatures.push(Signature {
        signed_info,
        signature_value: signature_value.to_base64(),
        key_info: Some(key.verifying_key().to_stripped_base64()),
    });
    Ok(())
}

/// The outcome of one digest reference check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCheck {
    /// The reference URI.
    pub uri: String,
    /// Whether the recomputed digest matched.
    pub ok: bool,
}

/// Per-check diagnostics from a verification run.
///
/// `signature_value_ok == false` with matching digests points at a wrong
/// key (or a forged signed-info); matching signature with failing digests
/// points at content tampered with after signing. Both reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Whether the Ed25519 signature over the signed-info verified.
    pub signature_value_ok: bool,
    /// One entry per signed-info reference, in document order.
    pub references: Vec<ReferenceCheck>,
}

impl VerifyReport {
    /// Whether every check passed.
    pub fn all_ok(&self) -> bool {
        self.signature_value_ok && self.references.iter().all(|r| r.ok)
    }
}

impl std::fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.signature_value_ok {
            write!(f, "signature value ok")?;
        } else {
            write!(f, "signature value mismatch (wrong key or forged signed info)")?;
        }
        let failed: Vec<&str> = self
            .references
            .iter()
            .filter(|r| !r.ok)
            .map(|r| r.uri.as_str())
            .collect();
        if failed.is_empty() {
            write!(f, "; all content digests ok")
        } else {
            write!(f, "; tampered content: {}", failed.join(", "))
        }
    }
}

/// Verify a document's enveloped signature under `key`.
///
/// # Errors
///
/// - [`TrustError::MissingSignature`] / [`TrustError::MultipleSignatures`]
///   when the document does not carry exactly one signature block;
/// - [`TrustError::InvalidSignatureValue`] when the signature value is not
///   decodable;
/// - [`TrustError::DanglingReference`] /
///   [`TrustError::MissingDocumentReference`] when the signed-info does
///   not address the document's actual content;
/// - [`TrustError::Invalid`] carrying a [`VerifyReport`] when the
///   cryptographic checks fail.
pub fn verify_envelope(envelope: &Envelope, key: &VerifyingKey) -> Result<(), TrustError> {
    let report = verify_envelope_detailed(envelope, key)?;
    if report.all_ok() {
        Ok(())
    } else {
        Err(TrustError::Invalid { report })
    }
}

/// Run all verification checks and return the full report.
///
/// Structural problems (signature count, undecodable values, dangling
/// references) still fail fast; the report only grades the cryptographic
/// checks. [`verify_envelope`] is the binary form.
pub fn verify_envelope_detailed(
    envelope: &Envelope,
    key: &VerifyingKey,
) -> Result<VerifyReport, TrustError> {
    let signature = single_signature(envelope)?;
    let signature_value = SignatureBytes::from_base64(&signature.signature_value)?;

    if !signature
        .signed_info
        .references
        .iter()
        .any(|r| r.uri == DOCUMENT_URI)
    {
        return Err(TrustError::MissingDocumentReference);
    }

    let mut references = Vec::with_capacity(signature.signed_info.references.len());
    for reference in &signature.signed_info.references {
        let canonical = resolve_reference(envelope, &reference.uri)?;
        let ok = ContentDigest::compute(&canonical).matches_hex(&reference.digest);
        references.push(ReferenceCheck {
            uri: reference.uri.clone(),
            ok,
        });
    }

    let signed_info_bytes = entitle_wire::canonical_signed_info(&signature.signed_info)?;
    let signature_value_ok = key.verify(&signed_info_bytes, &signature_value).is_ok();

    Ok(VerifyReport {
        signature_value_ok,
        references,
    })
}

fn single_signature(envelope: &Envelope) -> Result<&Signature, TrustError> {
    match envelope.signatures.as_slice() {
        [] => Err(TrustError::MissingSignature),
        [signature] => Ok(signature),
        many => Err(TrustError::MultipleSignatures { count: many.len() }),
    }
}

fn resolve_reference(envelope: &Envelope, uri: &str) -> Result<CanonicalBytes, TrustError> {
    if uri == DOCUMENT_URI {
        return Ok(canonical_document(envelope)?);
    }
    if let Some(index) = uri.strip_prefix("#item/") {
        let index: usize = index.parse().map_err(|_| TrustError::DanglingReference {
            uri: uri.to_string(),
            reason: "item index is not a number".to_string(),
        })?;
        let item = envelope
            .items
            .get(index)
            .ok_or_else(|| TrustError::DanglingReference {
                uri: uri.to_string(),
                reason: format!("document has {} items", envelope.items.len()),
            })?;
        return Ok(canonical_item(item)?);
    }
    Err(TrustError::DanglingReference {
        uri: uri.to_string(),
        reason: "unrecognized reference URI".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use entitle_core::Timestamp;
    use entitle_wire::{Item, List};

    fn sample() -> Envelope {
        Envelope {
            ttl: Some(Timestamp::parse("2026-08-05T13:00:00Z").unwrap()),
            items: vec![
                Item::new("Licensee").with_property("number", "L001"),
                Item::new("ProductModuleValidation")
                    .with_property("productModuleNumber", "PM001")
                    .with_property("valid", "true")
                    .with_list(List::new("thresholds").with_property("red", "3")),
            ],
            signatures: vec![],
        }
    }

    fn signed_sample(key: &SigningKey) -> Envelope {
        let mut env = sample();
        sign_envelope(&mut env, key).unwrap();
        env
    }

    #[test]
    fn signed_document_verifies_under_matching_key() {
        let key = SigningKey::generate();
        let env = signed_sample(&key);
        assert!(verify_envelope(&env, &key.verifying_key()).is_ok());
    }

    #[test]
    fn signature_survives_a_wire_roundtrip() {
        let key = SigningKey::generate();
        let env = signed_sample(&key);
        let reparsed = Envelope::from_xml(&env.to_xml().unwrap()).unwrap();
        assert!(verify_envelope(&reparsed, &key.verifying_key()).is_ok());
    }

    #[test]
    fn different_key_fails_with_signature_diagnostic() {
        let env = signed_sample(&SigningKey::generate());
        let other = SigningKey::generate().verifying_key();
        match verify_envelope(&env, &other) {
            Err(TrustError::Invalid { report }) => {
                assert!(!report.signature_value_ok);
                // Content was not touched, so every digest still matches.
                assert!(report.references.iter().all(|r| r.ok));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn tampered_item_fails_with_digest_diagnostic() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        env.items[1].properties[1].value = "false".to_string();
        match verify_envelope(&env, &key.verifying_key()) {
            Err(TrustError::Invalid { report }) => {
                // The signature value itself still verifies — only the
                // content digests betray the mutation.
                assert!(report.signature_value_ok);
                let failed: Vec<&str> = report
                    .references
                    .iter()
                    .filter(|r| !r.ok)
                    .map(|r| r.uri.as_str())
                    .collect();
                assert!(failed.contains(&DOCUMENT_URI));
                assert!(failed.contains(&"#item/1"));
                assert!(!failed.contains(&"#item/0"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn tampered_ttl_fails_via_document_reference() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        env.ttl = Some(Timestamp::parse("2027-01-01T00:00:00Z").unwrap());
        match verify_envelope(&env, &key.verifying_key()) {
            Err(TrustError::Invalid { report }) => {
                let doc = report.references.iter().find(|r| r.uri == DOCUMENT_URI);
                assert!(!doc.unwrap().ok);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn unsigned_document_is_rejected() {
        let key = SigningKey::generate().verifying_key();
        match verify_envelope(&sample(), &key) {
            Err(TrustError::MissingSignature) => {}
            other => panic!("expected MissingSignature, got {other:?}"),
        }
    }

    #[test]
    fn two_signature_blocks_are_rejected() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        let duplicate = env.signatures[0].clone();
        env.signatures.push(duplicate);
        match verify_envelope(&env, &key.verifying_key()) {
            Err(TrustError::MultipleSignatures { count: 2 }) => {}
            other => panic!("expected MultipleSignatures, got {other:?}"),
        }
    }

    #[test]
    fn appended_item_cannot_hide_from_the_document_reference() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        env.items
            .push(Item::new("ProductModuleValidation").with_property("productModuleNumber", "EVIL"));
        match verify_envelope(&env, &key.verifying_key()) {
            Err(TrustError::Invalid { report }) => {
                let doc = report.references.iter().find(|r| r.uri == DOCUMENT_URI);
                assert!(!doc.unwrap().ok);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn signed_info_without_document_reference_is_rejected() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        env.signatures[0]
            .signed_info
            .references
            .retain(|r| r.uri != DOCUMENT_URI);
        match verify_envelope(&env, &key.verifying_key()) {
            Err(TrustError::MissingDocumentReference) => {}
            other => panic!("expected MissingDocumentReference, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_reference_is_structural() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        env.items.pop();
        match verify_envelope(&env, &key.verifying_key()) {
            Err(TrustError::DanglingReference { uri, .. }) => assert_eq!(uri, "#item/1"),
            other => panic!("expected DanglingReference, got {other:?}"),
        }
    }

    #[test]
    fn garbage_signature_value_is_structural() {
        let key = SigningKey::generate();
        let mut env = signed_sample(&key);
        env.signatures[0].signature_value = "@@@".to_string();
        assert!(matches!(
            verify_envelope(&env, &key.verifying_key()),
            Err(TrustError::InvalidSignatureValue(_))
        ));
    }

    #[test]
    fn embedded_key_matches_signer() {
        let key = SigningKey::generate();
        let env = signed_sample(&key);
        let embedded = env.signatures[0].key_info.as_deref().unwrap();
        let vk = VerifyingKey::from_stripped_base64(embedded).unwrap();
        assert!(verify_envelope(&env, &vk).is_ok());
    }

    #[test]
    fn empty_envelope_signs_and_verifies() {
        let key = SigningKey::generate();
        let mut env = Envelope::new();
        sign_envelope(&mut env, &key).unwrap();
        assert!(verify_envelope(&env, &key.verifying_key()).is_ok());
    }
}
