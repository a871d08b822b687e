//! # Wire Conversion Discipline
//!
//! One converter per entity type, selected statically — there is no
//! type-name registry and no reflective instantiation. Every converter
//! follows the same shape:
//!
//! 1. check the item's type tag,
//! 2. read `number` and `active` (absent `active` means `false`),
//! 3. read the type's fixed fields and parent-reference numbers,
//! 4. copy every property whose name is **not** in the reserved set into
//!    the open custom-property map, verbatim.
//!
//! Reserved-name membership and property lookup share one discipline:
//! ASCII case-insensitive matching (see `entitle_core::properties`).
//!
//! [`Money`] packages a price amount with its currency so the
//! price-requires-currency pairing is a type-level fact rather than a
//! convention converters must each remember.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use entitle_core::{is_reserved, Timestamp};
use entitle_wire::Item;

/// Conversion failures. `Missing`/`WrongItemType` are structural wire
/// errors; the rest are malformed-argument errors — a caller can tell the
/// two classes apart by variant.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The item's type tag does not match the converter.
    #[error("expected an item of type {expected}, got {actual}")]
    WrongItemType {
        /// The converter's item type.
        expected: &'static str,
        /// The tag found on the wire.
        actual: String,
    },

    /// A required property is absent.
    #[error("item of type {item_type} is missing required property \"{name}\"")]
    Missing {
        /// The entity type being converted.
        item_type: &'static str,
        /// The absent property.
        name: String,
    },

    /// A property value does not parse as its expected shape.
    #[error("property \"{name}\" on {item_type} is not a valid {expected}: \"{value}\"")]
    Malformed {
        /// The entity type being converted.
        item_type: &'static str,
        /// The offending property.
        name: String,
        /// What the value should have been.
        expected: &'static str,
        /// The value found on the wire.
        value: String,
    },

    /// A price property arrived without a currency.
    #[error("item of type {item_type} has a price but no currency")]
    PriceWithoutCurrency {
        /// The entity type being converted.
        item_type: &'static str,
    },

    /// A currency property arrived without a price.
    #[error("item of type {item_type} has a currency but no price")]
    CurrencyWithoutPrice {
        /// The entity type being converted.
        item_type: &'static str,
    },

    /// The currency code is not in the supported set.
    #[error("unsupported currency \"{value}\" on {item_type}")]
    UnsupportedCurrency {
        /// The entity type being converted.
        item_type: &'static str,
        /// The rejected code.
        value: String,
    },
}

/// Conversion from a wire item into a typed entity.
///
/// Implemented once per entity type; dispatch is closed at compile time.
pub trait FromItem: Sized {
    /// The wire type tag for this entity.
    const ITEM_TYPE: &'static str;
    /// Property names that map to fixed fields (and parent-reference
    /// numbers). Everything else on the wire is a custom property.
    const RESERVED: &'static [&'static str];

    /// Convert a wire item into this entity type.
    fn from_item(item: &Item) -> Result<Self, ConvertError>;
}

/// Flattening of an entity into outgoing request parameters.
pub trait ToRequest {
    /// Fixed fields first, custom properties after; collection fields are
    /// repeated parameters unless the entity documents a delimited form.
    fn to_request_params(&self) -> Vec<(String, String)>;
}

/// A supported currency code. Unknown codes fail conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Euro.
    Eur,
    /// US dollar.
    Usd,
}

impl Currency {
    /// The wire code for this currency.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }
}

impl FromStr for Currency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A price amount paired with its currency.
///
/// The amount is a validated plain decimal string — amounts are never
/// floats anywhere in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount, e.g. `"19.90"`.
    pub amount: String,
    /// The currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Read the `price`/`currency` property pair from an item.
    ///
    /// Both absent is fine (`Ok(None)`); one without the other, an
    /// unsupported currency code, or a malformed amount is a conversion
    /// error.
    pub fn from_item(item: &Item, item_type: &'static str) -> Result<Option<Self>, ConvertError> {
        let price = item.property("price");
        let currency = item.property("currency");
        match (price, currency) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConvertError::PriceWithoutCurrency { item_type }),
            (None, Some(_)) => Err(ConvertError::CurrencyWithoutPrice { item_type }),
            (Some(amount), Some(code)) => {
                let currency =
                    code.parse()
                        .map_err(|()| ConvertError::UnsupportedCurrency {
                            item_type,
                            value: code.to_string(),
                        })?;
                if !is_decimal(amount) {
                    return Err(ConvertError::Malformed {
                        item_type,
                        name: "price".to_string(),
                        expected: "decimal amount",
                        value: amount.to_string(),
                    });
                }
                Ok(Some(Self {
                    amount: amount.to_string(),
                    currency,
                }))
            }
        }
    }

    /// Append the `price`/`currency` parameter pair.
    pub fn push_params(&self, params: &mut Vec<(String, String)>) {
        params.push(("price".to_string(), self.amount.clone()));
        params.push(("currency".to_string(), self.currency.code().to_string()));
    }
}

/// A plain non-negative decimal: digits with at most one interior point.
pub(crate) fn is_decimal(s: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_point = false;
    for c in s.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Check the item's type tag against the converter's.
pub(crate) fn expect_type(item: &Item, expected: &'static str) -> Result<(), ConvertError> {
    if item.item_type == expected {
        Ok(())
    } else {
        Err(ConvertError::WrongItemType {
            expected,
            actual: item.item_type.clone(),
        })
    }
}

/// The `active` flag; absent means inactive.
pub(crate) fn active_flag(item: &Item, item_type: &'static str) -> Result<bool, ConvertError> {
    opt_bool(item, item_type, "active").map(|b| b.unwrap_or(false))
}

/// An optional boolean property.
pub(crate) fn opt_bool(
    item: &Item,
    item_type: &'static str,
    name: &str,
) -> Result<Option<bool>, ConvertError> {
    match item.property(name) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(v) => Err(ConvertError::Malformed {
            item_type,
            name: name.to_string(),
            expected: "boolean",
            value: v.to_string(),
        }),
    }
}

/// An optional unsigned integer property.
pub(crate) fn opt_u32(
    item: &Item,
    item_type: &'static str,
    name: &str,
) -> Result<Option<u32>, ConvertError> {
    match item.property(name) {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| ConvertError::Malformed {
            item_type,
            name: name.to_string(),
            expected: "unsigned integer",
            value: v.to_string(),
        }),
    }
}

/// An optional RFC 3339 timestamp property.
pub(crate) fn opt_timestamp(
    item: &Item,
    item_type: &'static str,
    name: &str,
) -> Result<Option<Timestamp>, ConvertError> {
    match item.property(name) {
        None => Ok(None),
        Some(v) => Timestamp::parse(v)
            .map(Some)
            .map_err(|_| ConvertError::Malformed {
                item_type,
                name: name.to_string(),
                expected: "RFC 3339 timestamp",
                value: v.to_string(),
            }),
    }
}

/// An optional string property, owned.
pub(crate) fn opt_string(item: &Item, name: &str) -> Option<String> {
    item.property(name).map(str::to_string)
}

/// Every non-reserved property, verbatim. Repeated names keep the last
/// occurrence, matching the tree's last-write-wins rule.
pub(crate) fn custom_properties(
    item: &Item,
    reserved: &'static [&'static str],
) -> BTreeMap<String, String> {
    let mut custom = BTreeMap::new();
    for property in &item.properties {
        if !is_reserved(&property.name, reserved) {
            custom.insert(property.name.clone(), property.value.clone());
        }
    }
    custom
}

/// Append a parameter if the value is present.
pub(crate) fn push_opt(params: &mut Vec<(String, String)>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        params.push((name.to_string(), value.to_string()));
    }
}

/// Append a boolean parameter.
pub(crate) fn push_bool(params: &mut Vec<(String, String)>, name: &str, value: bool) {
    params.push((name.to_string(), value.to_string()));
}

/// Append the custom-property map.
pub(crate) fn push_custom(params: &mut Vec<(String, String)>, custom: &BTreeMap<String, String>) {
    for (name, value) in custom {
        params.push((name.clone(), value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(props: &[(&str, &str)]) -> Item {
        let mut item = Item::new("Test");
        for (n, v) in props {
            item = item.with_property(*n, *v);
        }
        item
    }

    #[test]
    fn money_both_absent_is_none() {
        assert_eq!(Money::from_item(&item(&[]), "Test").unwrap(), None);
    }

    #[test]
    fn money_price_without_currency_fails() {
        let err = Money::from_item(&item(&[("price", "10.00")]), "Test").unwrap_err();
        assert!(matches!(err, ConvertError::PriceWithoutCurrency { .. }));
    }

    #[test]
    fn money_currency_without_price_fails() {
        let err = Money::from_item(&item(&[("currency", "EUR")]), "Test").unwrap_err();
        assert!(matches!(err, ConvertError::CurrencyWithoutPrice { .. }));
    }

    #[test]
    fn money_unsupported_currency_fails() {
        let err =
            Money::from_item(&item(&[("price", "10.00"), ("currency", "XBT")]), "Test")
                .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedCurrency { .. }));
        assert!(format!("{err}").contains("XBT"));
    }

    #[test]
    fn money_valid_pair_converts() {
        let money = Money::from_item(&item(&[("price", "19.90"), ("currency", "eur")]), "Test")
            .unwrap()
            .unwrap();
        assert_eq!(money.amount, "19.90");
        assert_eq!(money.currency, Currency::Eur);
    }

    #[test]
    fn money_malformed_amount_fails() {
        let err = Money::from_item(&item(&[("price", "1,99"), ("currency", "EUR")]), "Test")
            .unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
    }

    #[test]
    fn decimal_shapes() {
        assert!(is_decimal("0"));
        assert!(is_decimal("19.90"));
        assert!(is_decimal(".5"));
        assert!(!is_decimal(""));
        assert!(!is_decimal("."));
        assert!(!is_decimal("1.2.3"));
        assert!(!is_decimal("-1"));
        assert!(!is_decimal("1e3"));
    }

    #[test]
    fn active_defaults_to_false() {
        assert!(!active_flag(&item(&[]), "Test").unwrap());
        assert!(active_flag(&item(&[("active", "TRUE")]), "Test").unwrap());
    }

    #[test]
    fn malformed_bool_names_the_property() {
        let err = opt_bool(&item(&[("hidden", "yes")]), "Test", "hidden").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("hidden"));
        assert!(msg.contains("yes"));
    }

    #[test]
    fn custom_properties_exclude_reserved_case_insensitively() {
        const RESERVED: &[&str] = &["number", "active"];
        let item = item(&[("Number", "X1"), ("color", "blue"), ("color", "red")]);
        let custom = custom_properties(&item, RESERVED);
        assert!(!custom.contains_key("Number"));
        assert_eq!(custom.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn currency_parse_and_display() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert!("GBP".parse::<Currency>().is_err());
    }
}
