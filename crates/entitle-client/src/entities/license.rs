//! License: one instance created from a template for a licensee. Both
//! parents are referenced by number; the bidirectional object graph of
//! older client libraries is deliberately absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, opt_bool, opt_string, push_bool, push_custom,
    push_opt, ConvertError, FromItem, Money, ToRequest,
};

/// A license held by a licensee.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct License {
    /// Unique license number; `None` until assigned.
    pub number: Option<String>,
    /// Whether the license is active.
    pub active: bool,
    /// Display name.
    pub name: Option<String>,
    /// Price paid, always paired with its currency.
    pub price: Option<Money>,
    /// Whether the license is hidden from shop listings.
    pub hidden: bool,
    /// Number of the owning licensee (reference, not a loaded entity).
    pub licensee_number: Option<String>,
    /// Number of the originating template (reference).
    pub license_template_number: Option<String>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for License {
    const ITEM_TYPE: &'static str = "License";
    const RESERVED: &'static [&'static str] = &[
        "number",
        "active",
        "name",
        "price",
        "currency",
        "hidden",
        "licenseeNumber",
        "licenseTemplateNumber",
    ];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            name: opt_string(item, "name"),
            price: Money::from_item(item, Self::ITEM_TYPE)?,
            hidden: opt_bool(item, Self::ITEM_TYPE, "hidden")?.unwrap_or(false),
            licensee_number: opt_string(item, "licenseeNumber"),
            license_template_number: opt_string(item, "licenseTemplateNumber"),
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for License {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        push_opt(&mut params, "name", self.name.as_deref());
        if let Some(price) = &self.price {
            price.push_params(&mut params);
        }
        push_bool(&mut params, "hidden", self.hidden);
        push_opt(&mut params, "licenseeNumber", self.licensee_number.as_deref());
        push_opt(
            &mut params,
            "licenseTemplateNumber",
            self.license_template_number.as_deref(),
        );
        push_custom(&mut params, &self.custom);
        params
    }
}
