//! Product module: one licensable unit of a product, bound to a licensing
//! model evaluated server-side. The client treats the model name as an
//! opaque string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, opt_string, push_bool, push_custom, push_opt,
    ConvertError, FromItem, ToRequest,
};

/// A licensable module of a product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductModule {
    /// Unique module number; `None` until assigned.
    pub number: Option<String>,
    /// Whether the module is active.
    pub active: bool,
    /// Display name.
    pub name: Option<String>,
    /// Server-side licensing model identifier.
    pub licensing_model: Option<String>,
    /// Number of the owning product (reference, not a loaded entity).
    pub product_number: Option<String>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for ProductModule {
    const ITEM_TYPE: &'static str = "ProductModule";
    const RESERVED: &'static [&'static str] =
        &["number", "active", "name", "licensingModel", "productNumber"];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            name: opt_string(item, "name"),
            licensing_model: opt_string(item, "licensingModel"),
            product_number: opt_string(item, "productNumber"),
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for ProductModule {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        push_opt(&mut params, "name", self.name.as_deref());
        push_opt(&mut params, "licensingModel", self.licensing_model.as_deref());
        push_opt(&mut params, "productNumber", self.product_number.as_deref());
        push_custom(&mut params, &self.custom);
        params
    }
}
