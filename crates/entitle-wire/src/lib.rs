#![deny(missing_docs)]

//! # entitle-wire — Wire Envelope for the Entitle Service
//!
//! Every structured payload the Entitle service exchanges — entities,
//! validation outcomes, offline validation files — travels as the same
//! generic envelope: a list of typed [`Item`]s carrying flat properties
//! and recursively nested named lists, with an optional time-to-live and
//! zero or more enveloped [`Signature`] blocks.
//!
//! This crate owns three things:
//!
//! - the envelope **model** ([`Envelope`], [`Item`], [`Property`],
//!   [`List`], [`Signature`]),
//! - the **XML codec** (parse and serialize, unknown elements skipped for
//!   forward compatibility),
//! - the **canonical byte forms** ([`CanonicalBytes`]) that digest and
//!   signature computation run over. `CanonicalBytes` has a private inner
//!   buffer and can only be produced by the canonicalization functions,
//!   so a "signed the wrong serialization" defect is unrepresentable.
//!
//! Trust decisions live in `entitle-trust`; this crate only guarantees
//! that equal envelopes canonicalize to equal bytes.

pub mod canonical;
pub mod envelope;
pub mod error;
mod xml;

pub use canonical::{canonical_document, canonical_item, canonical_signed_info, CanonicalBytes};
pub use envelope::{Envelope, Item, List, Property, Reference, Signature, SignedInfo};
pub use error::WireError;
