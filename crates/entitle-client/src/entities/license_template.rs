//! # License Template
//!
//! The blueprint a license is created from: license type, price, shop
//! visibility switches, and the capacity figures the time-volume and
//! quantity types consume. Templates belong to a product module.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, opt_bool, opt_string, opt_u32, push_bool,
    push_custom, push_opt, ConvertError, FromItem, Money, ToRequest,
};

/// The type of license a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    /// A plain on/off feature license.
    Feature,
    /// Valid until a point in time.
    TimeLimited,
    /// A prepaid volume of usage time.
    TimeVolume,
    /// A prepaid quantity of units.
    Quantity,
}

impl LicenseType {
    /// The wire code for this license type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Feature => "FEATURE",
            Self::TimeLimited => "TIMELIMITED",
            Self::TimeVolume => "TIMEVOLUME",
            Self::Quantity => "QUANTITY",
        }
    }
}

impl FromStr for LicenseType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FEATURE" => Ok(Self::Feature),
            "TIMELIMITED" => Ok(Self::TimeLimited),
            "TIMEVOLUME" => Ok(Self::TimeVolume),
            "QUANTITY" => Ok(Self::Quantity),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A license template of a product module.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LicenseTemplate {
    /// Unique template number; `None` until assigned.
    pub number: Option<String>,
    /// Whether the template is active.
    pub active: bool,
    /// Display name.
    pub name: Option<String>,
    /// The license type produced by this template.
    pub license_type: Option<LicenseType>,
    /// Price and currency, always paired.
    pub price: Option<Money>,
    /// Whether licenses are created automatically on licensee creation.
    pub automatic: bool,
    /// Whether the template is hidden in the shop.
    pub hidden: bool,
    /// Whether licenses from this template are hidden.
    pub hide_licenses: bool,
    /// Prepaid usage time in days, for time-volume templates.
    pub time_volume: Option<u32>,
    /// Prepaid unit count, for quantity templates.
    pub quantity: Option<u32>,
    /// Number of the owning product module (reference).
    pub product_module_number: Option<String>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for LicenseTemplate {
    const ITEM_TYPE: &'static str = "LicenseTemplate";
    const RESERVED: &'static [&'static str] = &[
        "number",
        "active",
        "name",
        "licenseType",
        "price",
        "currency",
        "automatic",
        "hidden",
        "hideLicenses",
        "timeVolume",
        "quantity",
        "productModuleNumber",
    ];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        let license_type = match item.property("licenseType") {
            None => None,
            Some(v) => Some(v.parse().map_err(|()| ConvertError::Malformed {
                item_type: Self::ITEM_TYPE,
                name: "licenseType".to_string(),
                expected: "FEATURE, TIMELIMITED, TIMEVOLUME or QUANTITY",
                value: v.to_string(),
            })?),
        };

        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            name: opt_string(item, "name"),
            license_type,
            price: Money::from_item(item, Self::ITEM_TYPE)?,
            automatic: opt_bool(item, Self::ITEM_TYPE, "automatic")?.unwrap_or(false),
            hidden: opt_bool(item, Self::ITEM_TYPE, "hidden")?.unwrap_or(false),
            hide_licenses: opt_bool(item, Self::ITEM_TYPE, "hideLicenses")?.unwrap_or(false),
            time_volume: opt_u32(item, Self::ITEM_TYPE, "timeVolume")?,
            quantity: opt_u32(item, Self::ITEM_TYPE, "quantity")?,
            product_module_number: opt_string(item, "productModuleNumber"),
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for LicenseTemplate {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        push_opt(&mut params, "name", self.name.as_deref());
        if let Some(license_type) = self.license_type {
            params.push(("licenseType".to_string(), license_type.to_string()));
        }
        if let Some(price) = &self.price {
            price.push_params(&mut params);
        }
        push_bool(&mut params, "automatic", self.automatic);
        push_bool(&mut params, "hidden", self.hidden);
        push_bool(&mut params, "hideLicenses", self.hide_licenses);
        if let Some(time_volume) = self.time_volume {
            params.push(("timeVolume".to_string(), time_volume.to_string()));
        }
        if let Some(quantity) = self.quantity {
            params.push(("quantity".to_string(), quantity.to_string()));
        }
        push_opt(
            &mut params,
            "productModuleNumber",
            self.product_module_number.as_deref(),
        );
        push_custom(&mut params, &self.custom);
        params
    }
}
