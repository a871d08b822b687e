//! # Product
//!
//! The top-level sellable unit. Licensees and product modules hang off a
//! product; the product itself carries display metadata, the
//! licensee-auto-create switch, and any number of volume discounts.
//!
//! ## Discount Wire Form
//!
//! Discounts travel as repeated `discount` parameters, each a single
//! semicolon-delimited string `totalPrice;currency;amount` where `amount`
//! is either a fixed decimal or a percentage with a trailing `%`. This is
//! a server-dictated per-field contract, not a pattern to generalize —
//! compare the comma-joined template numbers on
//! [`Bundle`](crate::entities::Bundle) and the proper nested lists in
//! validation responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, is_decimal, opt_bool, opt_string, push_bool,
    push_custom, push_opt, ConvertError, Currency, FromItem, ToRequest,
};

/// A volume discount on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiscount {
    /// Order total at which the discount applies.
    pub total_price: String,
    /// Currency of `total_price`.
    pub currency: Currency,
    /// Discount amount: a fixed decimal, or a percentage ending in `%`.
    pub amount: String,
}

impl ProductDiscount {
    /// Parse the wire form `totalPrice;currency;amount`.
    pub fn parse(value: &str) -> Result<Self, ConvertError> {
        let malformed = || ConvertError::Malformed {
            item_type: Product::ITEM_TYPE,
            name: "discount".to_string(),
            expected: "totalPrice;currency;amount",
            value: value.to_string(),
        };

        let mut parts = value.split(';');
        let (total_price, code, amount) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(t), Some(c), Some(a), None) => (t, c, a),
            _ => return Err(malformed()),
        };

        let currency = code
            .parse()
            .map_err(|()| ConvertError::UnsupportedCurrency {
                item_type: Product::ITEM_TYPE,
                value: code.to_string(),
            })?;
        let amount_body = amount.strip_suffix('%').unwrap_or(amount);
        if !is_decimal(total_price) || !is_decimal(amount_body) {
            return Err(malformed());
        }

        Ok(Self {
            total_price: total_price.to_string(),
            currency,
            amount: amount.to_string(),
        })
    }
}

impl fmt::Display for ProductDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.total_price, self.currency, self.amount)
    }
}

/// A product of the vendor's account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Product {
    /// Unique product number; `None` until assigned.
    pub number: Option<String>,
    /// Whether the product is active. Absent on the wire means inactive.
    pub active: bool,
    /// Display name.
    pub name: Option<String>,
    /// Product version label.
    pub version: Option<String>,
    /// Whether validating an unknown licensee creates it on the fly.
    pub licensee_auto_create: bool,
    /// Free-text description.
    pub description: Option<String>,
    /// Licensing info shown in the shop.
    pub licensing_info: Option<String>,
    /// Volume discounts.
    pub discounts: Vec<ProductDiscount>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for Product {
    const ITEM_TYPE: &'static str = "Product";
    const RESERVED: &'static [&'static str] = &[
        "number",
        "active",
        "name",
        "version",
        "licenseeAutoCreate",
        "description",
        "licensingInfo",
        "discount",
    ];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        let discounts = item
            .properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case("discount"))
            .map(|p| ProductDiscount::parse(&p.value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            name: opt_string(item, "name"),
            version: opt_string(item, "version"),
            licensee_auto_create: opt_bool(item, Self::ITEM_TYPE, "licenseeAutoCreate")?
                .unwrap_or(false),
            description: opt_string(item, "description"),
            licensing_info: opt_string(item, "licensingInfo"),
            discounts,
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for Product {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        push_opt(&mut params, "name", self.name.as_deref());
        push_opt(&mut params, "version", self.version.as_deref());
        push_bool(&mut params, "licenseeAutoCreate", self.licensee_auto_create);
        push_opt(&mut params, "description", self.description.as_deref());
        push_opt(&mut params, "licensingInfo", self.licensing_info.as_deref());
        // One parameter per discount, not a joined value.
        for discount in &self.discounts {
            params.push(("discount".to_string(), discount.to_string()));
        }
        push_custom(&mut params, &self.custom);
        params
    }
}
