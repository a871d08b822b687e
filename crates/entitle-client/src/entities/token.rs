//! Token: a short-lived credential issued by the service — shop access
//! for a licensee, or a scoped API key.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use entitle_core::Timestamp;
use entitle_wire::Item;

use crate::convert::{
    active_flag, custom_properties, expect_type, opt_string, opt_timestamp, push_bool, push_custom,
    push_opt, ConvertError, FromItem, ToRequest,
};

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// General-purpose token.
    Default,
    /// Grants a licensee access to the hosted shop.
    Shop,
    /// A scoped API key.
    Apikey,
}

impl TokenType {
    /// The wire code for this token type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Shop => "SHOP",
            Self::Apikey => "APIKEY",
        }
    }
}

impl FromStr for TokenType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEFAULT" => Ok(Self::Default),
            "SHOP" => Ok(Self::Shop),
            "APIKEY" => Ok(Self::Apikey),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A service-issued token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    /// The token number, which is also the secret presented back to the
    /// service; `None` until issued.
    pub number: Option<String>,
    /// Whether the token is still usable.
    pub active: bool,
    /// When the token expires.
    pub expiration_time: Option<Timestamp>,
    /// The kind of token.
    pub token_type: Option<TokenType>,
    /// The licensee this token was issued for, if any (reference).
    pub licensee_number: Option<String>,
    /// Vendor-defined custom properties.
    pub custom: BTreeMap<String, String>,
}

impl FromItem for Token {
    const ITEM_TYPE: &'static str = "Token";
    const RESERVED: &'static [&'static str] = &[
        "number",
        "active",
        "expirationTime",
        "tokenType",
        "licenseeNumber",
    ];

    fn from_item(item: &Item) -> Result<Self, ConvertError> {
        expect_type(item, Self::ITEM_TYPE)?;
        let token_type = match item.property("tokenType") {
            None => None,
            Some(v) => Some(v.parse().map_err(|()| ConvertError::Malformed {
                item_type: Self::ITEM_TYPE,
                name: "tokenType".to_string(),
                expected: "DEFAULT, SHOP or APIKEY",
                value: v.to_string(),
            })?),
        };

        Ok(Self {
            number: opt_string(item, "number"),
            active: active_flag(item, Self::ITEM_TYPE)?,
            expiration_time: opt_timestamp(item, Self::ITEM_TYPE, "expirationTime")?,
            token_type,
            licensee_number: opt_string(item, "licenseeNumber"),
            custom: custom_properties(item, Self::RESERVED),
        })
    }
}

impl ToRequest for Token {
    fn to_request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "number", self.number.as_deref());
        push_bool(&mut params, "active", self.active);
        if let Some(expiration) = &self.expiration_time {
            params.push(("expirationTime".to_string(), expiration.to_canonical_string()));
        }
        if let Some(token_type) = self.token_type {
            params.push(("tokenType".to_string(), token_type.to_string()));
        }
        push_opt(&mut params, "licenseeNumber", self.licensee_number.as_deref());
        push_custom(&mut params, &self.custom);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_expiration_and_type() {
        let item = Item::new("Token")
            .with_property("number", "shop-4f9c")
            .with_property("active", "true")
            .with_property("expirationTime", "2026-08-06T12:00:00Z")
            .with_property("tokenType", "SHOP")
            .with_property("licenseeNumber", "L001");
        let token = Token::from_item(&item).unwrap();
        assert_eq!(token.token_type, Some(TokenType::Shop));
        assert_eq!(
            token.expiration_time.unwrap().to_canonical_string(),
            "2026-08-06T12:00:00Z"
        );
    }

    #[test]
    fn malformed_expiration_is_rejected_with_context() {
        let item = Item::new("Token").with_property("expirationTime", "tomorrow");
        let err = Token::from_item(&item).unwrap_err();
        assert!(format!("{err}").contains("tomorrow"));
    }

    #[test]
    fn unknown_token_type_is_rejected() {
        let item = Item::new("Token").with_property("tokenType", "SESSION");
        assert!(Token::from_item(&item).is_err());
    }

    #[test]
    fn request_params_roundtrip() {
        let item = Item::new("Token")
            .with_property("number", "api-11aa")
            .with_property("tokenType", "APIKEY")
            .with_property("scope", "read-only");
        let token = Token::from_item(&item).unwrap();
        let rebuilt = Item::from_params(Token::ITEM_TYPE, &token.to_request_params());
        assert_eq!(Token::from_item(&rebuilt).unwrap(), token);
    }
}
