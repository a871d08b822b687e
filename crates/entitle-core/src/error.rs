//! # Error Leaves
//!
//! Structured error types for the foundational crate, built with
//! `thiserror`. Higher layers wrap these into their own hierarchies; no
//! `Box<dyn Error>`, no `.unwrap()` outside tests.

use thiserror::Error;

/// Errors from [`Composition`](crate::Composition) tree mutation.
#[derive(Error, Debug)]
pub enum TreeError {
    /// A child was inserted under a scalar leaf. Leaves and interior nodes
    /// are mutually exclusive; callers must build sub-trees explicitly.
    #[error("cannot attach child \"{key}\" to a leaf node")]
    ChildOfLeaf {
        /// The key the caller attempted to insert.
        key: String,
    },
}

/// Errors from [`Timestamp`](crate::Timestamp) parsing.
#[derive(Error, Debug)]
pub enum TimestampError {
    /// The input string is not a valid RFC 3339 date-time.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    Invalid {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
