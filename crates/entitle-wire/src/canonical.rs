//! # Canonical Serialization
//!
//! This module defines [`CanonicalBytes`], the sole construction path for
//! bytes used in digest and signature computation across the workspace.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. The only way to construct
//! `CanonicalBytes` is through the canonicalization functions here, which
//! serialize through the deterministic writer in the XML codec: no
//! insignificant whitespace, fixed attribute order, second-precision ttl.
//! This makes the "wrong serialization path" class of signature defects
//! structurally impossible — a signer and a verifier that hold equal
//! envelopes always produce identical bytes.
//!
//! ## Enveloped-Signature Exclusion
//!
//! [`canonical_document`] serializes the envelope **without** its
//! `<signature>` blocks, since a signature cannot cover bytes that include
//! itself. Per-item and signed-info forms cover the units a signature's
//! references and value are computed over.

use quick_xml::Writer;

use crate::envelope::{Envelope, Item, SignedInfo};
use crate::error::WireError;
use crate::xml;

/// Bytes produced exclusively by canonical envelope serialization.
///
/// Downstream code cannot construct `CanonicalBytes` except through the
/// functions in this module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Access the canonical bytes for digest or signature computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonical form of a whole document, `<signature>` blocks excluded.
pub fn canonical_document(envelope: &Envelope) -> Result<CanonicalBytes, WireError> {
    xml::write_envelope(envelope, false).map(CanonicalBytes)
}

/// Canonical form of a single item — the unit a signature reference
/// digest covers.
pub fn canonical_item(item: &Item) -> Result<CanonicalBytes, WireError> {
    let mut writer = Writer::new(Vec::new());
    xml::write_item(&mut writer, item)?;
    Ok(CanonicalBytes(writer.into_inner()))
}

/// Canonical form of a signed-info block — the bytes a signature value
/// covers.
pub fn canonical_signed_info(signed_info: &SignedInfo) -> Result<CanonicalBytes, WireError> {
    let mut writer = Writer::new(Vec::new());
    xml::write_signed_info(&mut writer, signed_info)?;
    Ok(CanonicalBytes(writer.into_inner()))
}
