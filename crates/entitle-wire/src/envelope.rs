//! # Envelope Model
//!
//! The generic semi-structured payload of the Entitle service. An
//! [`Envelope`] carries zero or more typed [`Item`]s — each a flat ordered
//! property list plus recursively nested named [`List`]s — an optional
//! time-to-live, and any enveloped [`Signature`] blocks found in the
//! document.
//!
//! Signatures are kept as a `Vec` deliberately: the verifier must be able
//! to observe "no signature" and "more than one signature" as distinct
//! states and reject both, so the model never collapses them into an
//! `Option`.

use serde::{Deserialize, Serialize};

use entitle_core::{properties, NamedValue, Timestamp};

/// A flat name/value pair on an item or nested list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// The property name as it appeared on the wire (case preserved).
    pub name: String,
    /// The property value.
    pub value: String,
}

impl Property {
    /// Create a property.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl NamedValue for Property {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }
}

/// A named nested list: the same shape as an item body, without a type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// The list name.
    pub name: String,
    /// Flat properties of this list.
    pub properties: Vec<Property>,
    /// Further nested lists.
    pub lists: Vec<List>,
}

impl List {
    /// Create an empty list with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            lists: Vec::new(),
        }
    }

    /// First property value matching `name`, case-insensitively.
    pub fn property(&self, name: &str) -> Option<&str> {
        properties::property_by_name(&self.properties, name)
    }

    /// Append a property. Builder-style, returns `self`.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Append a nested list. Builder-style, returns `self`.
    pub fn with_list(mut self, list: List) -> Self {
        self.lists.push(list);
        self
    }
}

/// One unit of the wire envelope: a type tag, flat properties, nested lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The item type tag (e.g. `Product`, `ProductModuleValidation`).
    pub item_type: String,
    /// Flat ordered property list.
    pub properties: Vec<Property>,
    /// Named nested lists.
    pub lists: Vec<List>,
}

impl Item {
    /// Create an empty item with the given type tag.
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            properties: Vec::new(),
            lists: Vec::new(),
        }
    }

    /// Build an item from flattened request parameters, one property per
    /// name/value pair (repeated names stay repeated).
    pub fn from_params(item_type: impl Into<String>, params: &[(String, String)]) -> Self {
        Self {
            item_type: item_type.into(),
            properties: params
                .iter()
                .map(|(n, v)| Property::new(n.clone(), v.clone()))
                .collect(),
            lists: Vec::new(),
        }
    }

    /// First property value matching `name`, case-insensitively.
    pub fn property(&self, name: &str) -> Option<&str> {
        properties::property_by_name(&self.properties, name)
    }

    /// Like [`property`](Self::property), with a default for absence.
    pub fn property_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        properties::property_by_name_or(&self.properties, name, default)
    }

    /// First nested list matching `name`, case-insensitively.
    pub fn list(&self, name: &str) -> Option<&List> {
        self.lists
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Append a property. Builder-style, returns `self`.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Append a nested list. Builder-style, returns `self`.
    pub fn with_list(mut self, list: List) -> Self {
        self.lists.push(list);
        self
    }
}

/// One digest reference inside a signature's signed-info block.
///
/// `uri` addresses a content unit of the enclosing document
/// (`#item/<index>`); `digest` is the lowercase hex SHA-256 of that unit's
/// canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The content unit this reference covers.
    pub uri: String,
    /// Lowercase hex SHA-256 digest of the unit's canonical bytes.
    pub digest: String,
}

/// The signed portion of a signature block: the list of content digests
/// the signature value actually covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInfo {
    /// Per-content-unit digest references, in document order.
    pub references: Vec<Reference>,
}

/// An enveloped signature block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The digest references the signature value covers.
    pub signed_info: SignedInfo,
    /// Base64 Ed25519 signature over the canonical signed-info bytes.
    pub signature_value: String,
    /// Optional embedded public key, stripped base64.
    pub key_info: Option<String>,
}

/// A parsed wire document: items, optional TTL, enveloped signatures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Optional response time-to-live.
    pub ttl: Option<Timestamp>,
    /// The items, in document order.
    pub items: Vec<Item>,
    /// Enveloped signature blocks found in the document. The trust layer
    /// requires exactly one when verification is requested.
    pub signatures: Vec<Signature>,
}

impl Envelope {
    /// Create an empty envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate items whose type tag matches `item_type`, case-sensitively.
    ///
    /// Type tags are schema constants, not user-supplied property names,
    /// so they keep exact matching.
    pub fn items_of_type<'a>(&'a self, item_type: &'a str) -> impl Iterator<Item = &'a Item> {
        self.items.iter().filter(move |i| i.item_type == item_type)
    }

    /// The first item matching `item_type`, if any.
    pub fn first_of_type<'a>(&'a self, item_type: &'a str) -> Option<&'a Item> {
        self.items_of_type(item_type).next()
    }
}
