#![deny(missing_docs)]

//! # entitle-trust — Offline Trust for Validation Documents
//!
//! A validation document obtained from a live, transport-authenticated
//! connection is trusted implicitly. One loaded from disk is not: this
//! crate decides whether such a document's enveloped signature is valid
//! under a caller-supplied public key, which is the only thing that makes
//! an offline validation result usable.
//!
//! ## Security Invariants
//!
//! - All digest and signature computation runs over
//!   [`CanonicalBytes`](entitle_wire::CanonicalBytes) — there is no API
//!   that signs or hashes raw bytes, so signer and verifier can never
//!   disagree on serialization.
//! - A document must carry **exactly one** signature block to verify;
//!   zero and more-than-one are distinct, reportable trust failures —
//!   never "pick the first", never "valid because unsigned".
//! - The signed-info must reference the document content itself
//!   (`#document`), so no part of the envelope — items or ttl — escapes
//!   coverage. Per-item references exist for diagnostics: a failed
//!   verification distinguishes "wrong key" from "this item was tampered
//!   with".

pub mod digest;
pub mod error;
pub mod keys;
pub mod signature;

pub use digest::ContentDigest;
pub use error::TrustError;
pub use keys::{SignatureBytes, SigningKey, VerifyingKey};
pub use signature::{
    sign_envelope, verify_envelope, verify_envelope_detailed, ReferenceCheck, VerifyReport,
    DOCUMENT_URI,
};
