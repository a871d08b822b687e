//! Client error hierarchy.
//!
//! One top-level [`ClientError`] wraps the failure kinds of the layers
//! below it without flattening them: structural wire errors,
//! malformed-argument conversion errors, and trust errors stay distinct
//! variants a caller can match on.

use thiserror::Error;

use entitle_trust::TrustError;
use entitle_wire::WireError;

use crate::config::ConfigError;
use crate::convert::ConvertError;
use crate::validation::ValidationError;

/// Errors from Entitle API calls and offline validation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// The logical endpoint, e.g. `GET /licensee/{number}`.
        endpoint: String,
        /// The underlying transport failure.
        source: reqwest::Error,
    },

    /// The Entitle API returned a non-2xx status.
    #[error("Entitle API {endpoint} returned {status}: {body}")]
    Api {
        /// The logical endpoint.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, verbatim, for diagnostics.
        body: String,
    },

    /// A response envelope did not contain the expected item type.
    #[error("response from {endpoint} contains no {item_type} item")]
    MissingItem {
        /// The logical endpoint.
        endpoint: String,
        /// The item type that was expected.
        item_type: &'static str,
    },

    /// Entity conversion failed (malformed or missing wire properties).
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The response document is structurally malformed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Validation result assembly failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Offline document trust could not be established.
    #[error(transparent)]
    Trust(#[from] TrustError),

    /// Client configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
