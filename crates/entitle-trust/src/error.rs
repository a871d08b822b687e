//! # Trust Errors
//!
//! Every failure here is a trust failure: none may be downgraded to a
//! warning, and no validation result may be assembled past one.

use thiserror::Error;

use entitle_wire::WireError;

use crate::signature::VerifyReport;

/// Errors from signature verification and key handling.
#[derive(Error, Debug)]
pub enum TrustError {
    /// Verification was required but the document carries no signature
    /// block. Absent and invalid are the same trust outcome.
    #[error("document has no signature block")]
    MissingSignature,

    /// The document carries more than one signature block.
    #[error("document has {count} signature blocks, expected exactly one")]
    MultipleSignatures {
        /// How many blocks were found.
        count: usize,
    },

    /// The public key failed to parse.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// The signature value failed to decode.
    #[error("invalid signature value: {0}")]
    InvalidSignatureValue(String),

    /// A signed-info reference does not resolve to document content.
    #[error("signature reference \"{uri}\" does not resolve: {reason}")]
    DanglingReference {
        /// The reference URI.
        uri: String,
        /// Why it could not be resolved.
        reason: String,
    },

    /// The signed-info does not cover the document content itself, so the
    /// signature proves nothing about the envelope.
    #[error("signed info does not reference the document content")]
    MissingDocumentReference,

    /// Cryptographic verification failed. The report tells wrong-key
    /// failures apart from tampered content.
    #[error("signature verification failed: {report}")]
    Invalid {
        /// Per-check diagnostics.
        report: VerifyReport,
    },

    /// Canonicalization of the document failed.
    #[error("canonicalization failed: {0}")]
    Wire(#[from] WireError),
}
