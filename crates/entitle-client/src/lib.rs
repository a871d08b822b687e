#![deny(missing_docs)]

//! # entitle-client — Typed Client for the Entitle Licensing Service
//!
//! Builds typed domain entities from the generic wire envelope, flattens
//! them back into request parameters, and validates licensees — online
//! against the live service, or offline from a previously retrieved,
//! signed validation document.
//!
//! ## Design Principles
//!
//! 1. **Closed converter dispatch.** One
//!    [`FromItem`](convert::FromItem)/[`ToRequest`](convert::ToRequest)
//!    implementation per entity type, selected at compile time. No
//!    type-name registry, no reflection.
//!
//! 2. **Identifier references, not object graphs.** Entities point at
//!    their parents by number. There are no doubly-owned bidirectional
//!    links to keep consistent.
//!
//! 3. **Explicit configuration.** [`ClientConfig`] flows into
//!    [`EntitleClient::new`]; nothing global, nothing lazily initialized.
//!    The offline-validation public key is part of the config — whether a
//!    call context verifies signatures is decided once, not per response.
//!
//! 4. **Binary trust gate.** The offline path either verifies and
//!    assembles, or fails with a trust error and assembles nothing.
//!
//! ## Example
//!
//! ```no_run
//! use entitle_client::{ClientConfig, EntitleClient, ValidationRequest};
//! use url::Url;
//!
//! # async fn run() -> Result<(), entitle_client::ClientError> {
//! let config = ClientConfig::new(Url::parse("https://api.entitle.io").unwrap(), "api-key");
//! let client = EntitleClient::new(config)?;
//! let result = client
//!     .validation()
//!     .validate("L001", &ValidationRequest::new())
//!     .await?;
//! if let Some(module) = result.product_module_validation("PM001") {
//!     println!("PM001: {module}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod convert;
pub mod entities;
pub mod error;
mod rest;
mod retry;
pub mod validation;

pub use client::{EntitleClient, EntityResource, ValidationClient, ValidationRequest};
pub use config::{ClientConfig, ConfigError};
pub use convert::{ConvertError, Currency, FromItem, Money, ToRequest};
pub use entities::{
    Bundle, License, LicenseTemplate, LicenseType, Licensee, Product, ProductDiscount,
    ProductModule, Token, TokenType,
};
pub use error::ClientError;
pub use validation::{
    assemble, validate_offline, ValidationError, ValidationResult, DEFAULT_TTL_MINUTES,
};
