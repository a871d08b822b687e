//! Licensee: the holder of licenses, owned by a product.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, opt_string, push_bool, push_custom, push_opt,
    ConvertError, FromItem, ToRequest,
};

/// A licensee of a product.
///
/// Licenses belonging to a licensee reference it by number; the entity
/// itself does not aggregate them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Licensee {
    /// Unique licensee number; `None` until assigned.
    pub number: Option<String>,
    /// Whether the licensee is active.
    pub active: bool,
    /// Display name.
    pub name: Option<String>,
    /// Number of the owning product (reference, not a loaded entity).
    pub product_number: Option<String>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for Licensee {
    const ITEM_TYPE: &'static str = "Licensee";
    const RESERVED: &'static [&'static str] = &["number", "active", "name", "productNumber"];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            name: opt_string(item, "name"),
            product_number: opt_string(item, "productNumber"),
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for Licensee {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        push_opt(&mut params, "name", self.name.as_deref());
        push_opt(&mut params, "productNumber", self.product_number.as_deref());
        push_custom(&mut params, &self.custom);
        params
    }
}
