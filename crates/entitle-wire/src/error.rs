//! # Wire Errors
//!
//! Structural failures while reading or writing the XML envelope. Every
//! variant names the element or attribute involved — a malformed response
//! should be diagnosable from the error text alone.

use thiserror::Error;

use entitle_core::TimestampError;

/// Errors from envelope parsing, serialization, and canonicalization.
#[derive(Error, Debug)]
pub enum WireError {
    /// The underlying XML is malformed.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute list could not be parsed.
    #[error("malformed XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// A required attribute is absent.
    #[error("element <{element}> is missing required attribute \"{attribute}\"")]
    MissingAttribute {
        /// The element lacking the attribute.
        element: String,
        /// The attribute that was expected.
        attribute: String,
    },

    /// The document shape does not match the envelope contract.
    #[error("unexpected document structure: {0}")]
    Structure(String),

    /// The envelope `ttl` attribute is not a valid timestamp.
    #[error("invalid ttl attribute: {0}")]
    Ttl(#[from] TimestampError),

    /// The document is not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Writing the document failed.
    #[error("writing the document failed: {0}")]
    Io(#[from] std::io::Error),
}
