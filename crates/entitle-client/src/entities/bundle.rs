//! Bundle: a priced collection of license templates obtained together.
//!
//! The member templates are serialized as a **single comma-joined
//! parameter** (`licenseTemplateNumbers`), not repeated parameters — a
//! deliberate per-field wire contract of this entity, the opposite choice
//! from product discounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, opt_string, push_bool, push_custom, push_opt,
    ConvertError, FromItem, Money, ToRequest,
};

/// A bundle of license templates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bundle {
    /// Unique bundle number; `None` until assigned.
    pub number: Option<String>,
    /// Whether the bundle is active.
    pub active: bool,
    /// Display name.
    pub name: Option<String>,
    /// Bundle price, always paired with its currency.
    pub price: Option<Money>,
    /// Numbers of the member license templates, in order.
    pub license_template_numbers: Vec<String>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for Bundle {
    const ITEM_TYPE: &'static str = "Bundle";
    const RESERVED: &'static [&'static str] = &[
        "number",
        "active",
        "name",
        "price",
        "currency",
        "licenseTemplateNumbers",
    ];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        let license_template_numbers = item
            .property("licenseTemplateNumbers")
            .map(|joined| {
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            name: opt_string(item, "name"),
            price: Money::from_item(item, Self::ITEM_TYPE)?,
            license_template_numbers,
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for Bundle {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        push_opt(&mut params, "name", self.name.as_deref());
        if let Some(price) = &self.price {
            price.push_params(&mut params);
        }
        if !self.license_template_numbers.is_empty() {
            params.push((
                "licenseTemplateNumbers".to_string(),
                self.license_template_numbers.join(","),
            ));
        }
        push_custom(&mut params, &self.custom);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_numbers_split_from_single_parameter() {
        let item = Item::new("Bundle")
            .with_property("number", "B001")
            .with_property("licenseTemplateNumbers", "LT001, LT002,LT003");
        let bundle = Bundle::from_item(&item).unwrap();
        assert_eq!(bundle.license_template_numbers, vec!["LT001", "LT002", "LT003"]);
    }

    #[test]
    fn template_numbers_join_into_single_parameter() {
        let bundle = Bundle {
            number: Some("B001".to_string()),
            license_template_numbers: vec!["LT001".to_string(), "LT002".to_string()],
            ..Bundle::default()
        };
        let params = bundle.to_request_params();
        let joined: Vec<&(String, String)> = params
            .iter()
            .filter(|(n, _)| n == "licenseTemplateNumbers")
            .collect();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].1, "LT001,LT002");
    }

    #[test]
    fn request_params_roundtrip() {
        let item = Item::new("Bundle")
            .with_property("number", "B001")
            .with_property("price", "49.00")
            .with_property("currency", "EUR")
            .with_property("licenseTemplateNumbers", "LT001,LT002")
            .with_property("campaign", "summer");
        let bundle = Bundle::from_item(&item).unwrap();
        let rebuilt = Item::from_params(Bundle::ITEM_TYPE, &bundle.to_request_params());
        assert_eq!(Bundle::from_item(&rebuilt).unwrap(), bundle);
    }
}
