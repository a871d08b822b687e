//! Cross-crate integration tests for the Entitle client stack.
//!
//! No library code lives here; see the `tests/` directory.
