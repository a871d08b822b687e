#![deny(missing_docs)]

//! # entitle-core — Foundational Types for the Entitle Client Stack
//!
//! This crate defines the types that every other crate in the workspace
//! depends on. It has no internal crate dependencies — only `serde`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **[`Composition`] makes the leaf/interior split structural.** A node
//!    is either a scalar leaf or an interior tree of named children — the
//!    "both at once" state is unrepresentable.
//!
//! 2. **One property-name discipline.** Every property-name comparison in
//!    the workspace — lookup and reserved-name membership alike — is ASCII
//!    case-insensitive, while stored names keep their wire case verbatim.
//!    The helpers in [`properties`] are the single implementation.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] carries second precision and a
//!    canonical `Z`-suffixed text form, so time values survive
//!    canonicalization and digest computation unchanged.

pub mod composition;
pub mod error;
pub mod properties;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use composition::Composition;
pub use error::{TimestampError, TreeError};
pub use properties::{is_reserved, property_by_name, property_by_name_or, NamedValue};
pub use temporal::Timestamp;
