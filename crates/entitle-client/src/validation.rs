//! # Validation Results
//!
//! Assembly of a response envelope into a [`ValidationResult`]: the
//! licensee identity (when the server included it), a client-side cache
//! expiry, and one [`Composition`] sub-tree per product module. The
//! sub-tree schema is defined by the server-side licensing model — the
//! client never assumes anything beyond the module-number key.
//!
//! The offline entry point ([`validate_offline`]) runs the same assembly
//! after an explicit trust gate: a caller-supplied public key makes
//! signature verification mandatory, and a document that fails it is
//! never assembled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use entitle_core::{Composition, Timestamp, TreeError};
use entitle_trust::{verify_envelope, VerifyingKey};
use entitle_wire::{Envelope, Item, List};

use crate::error::ClientError;

/// Item type tag carrying the licensee identity.
pub const LICENSEE_ITEM_TYPE: &str = "Licensee";

/// Item type tag carrying one product module's validation outcome.
pub const VALIDATION_ITEM_TYPE: &str = "ProductModuleValidation";

/// The property every validation item must carry.
pub const MODULE_NUMBER_PROPERTY: &str = "productModuleNumber";

/// Cache lifetime applied when a response carries no ttl.
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Errors from validation result assembly.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A validation item without a module number cannot be keyed and the
    /// whole response is unusable.
    #[error("item of type {item_type} is missing the \"productModuleNumber\" property")]
    MissingModuleNumber {
        /// The offending item's type tag.
        item_type: String,
    },

    /// Tree construction failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// The outcome of validating a licensee, online or offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    licensee_number: Option<String>,
    expires_at: Timestamp,
    modules: BTreeMap<String, Composition>,
}

impl ValidationResult {
    /// The licensee number, when the response included an identity item.
    pub fn licensee_number(&self) -> Option<&str> {
        self.licensee_number.as_deref()
    }

    /// When this result stops being usable as a cache entry.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Whether the result has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// The validation sub-tree for one product module.
    pub fn product_module_validation(&self, module_number: &str) -> Option<&Composition> {
        self.modules.get(module_number)
    }

    /// All module numbers present in this result.
    pub fn module_numbers(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Whether the result carries no module data at all.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Assemble a response envelope into a [`ValidationResult`].
///
/// Unknown item types are skipped — the server may introduce new ones
/// ahead of this client. A validation item without a module number is a
/// fatal structural error.
pub fn assemble(envelope: &Envelope) -> Result<ValidationResult, ValidationError> {
    let expires_at = envelope
        .ttl
        .unwrap_or_else(|| Timestamp::now().plus_minutes(DEFAULT_TTL_MINUTES));

    let mut licensee_number = None;
    let mut modules = BTreeMap::new();

    for item in &envelope.items {
        match item.item_type.as_str() {
            LICENSEE_ITEM_TYPE => {
                // Identity only; a licensee item contributes no module data.
                if let Some(number) = item.property("number") {
                    licensee_number = Some(number.to_string());
                }
            }
            VALIDATION_ITEM_TYPE => {
                let module_number = item.property(MODULE_NUMBER_PROPERTY).ok_or_else(|| {
                    ValidationError::MissingModuleNumber {
                        item_type: item.item_type.clone(),
                    }
                })?;
                // Duplicate module numbers overwrite: last write wins.
                modules.insert(module_number.to_string(), item_to_composition(item)?);
            }
            other => {
                tracing::debug!(item_type = other, "skipping unrecognized item type");
            }
        }
    }

    Ok(ValidationResult {
        licensee_number,
        expires_at,
        modules,
    })
}

fn item_to_composition(item: &Item) -> Result<Composition, ValidationError> {
    let mut node = Composition::tree();
    for property in &item.properties {
        if !property.name.eq_ignore_ascii_case(MODULE_NUMBER_PROPERTY) {
            node.put_value(property.name.as_str(), property.value.as_str())?;
        }
    }
    for list in &item.lists {
        node.put(list.name.as_str(), list_to_composition(list)?)?;
    }
    Ok(node)
}

fn list_to_composition(list: &List) -> Result<Composition, ValidationError> {
    let mut node = Composition::tree();
    for property in &list.properties {
        node.put_value(property.name.as_str(), property.value.as_str())?;
    }
    for nested in &list.lists {
        node.put(nested.name.as_str(), list_to_composition(nested)?)?;
    }
    Ok(node)
}

/// Validate a previously retrieved document without contacting the server.
///
/// When `validation_key` is present (stripped base64), the document's
/// enveloped signature is verified first and a failure aborts before any
/// assembly — absent and invalid signatures reject alike. When it is
/// `None`, the caller has decided to assume trust and verification is
/// skipped entirely.
pub fn validate_offline(
    document: &[u8],
    validation_key: Option<&str>,
) -> Result<ValidationResult, ClientError> {
    let envelope = Envelope::from_xml_bytes(document)?;
    if let Some(key) = validation_key {
        let key = VerifyingKey::from_stripped_base64(key)?;
        verify_envelope(&envelope, &key)?;
        tracing::debug!("offline validation document verified");
    }
    Ok(assemble(&envelope)?)
}
