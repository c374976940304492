//! Shopify global ID (GID) handling for products.

use core::fmt;

use serde::{Deserialize, Serialize};

/// GID prefix for product resources.
const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// Errors that can occur when parsing a [`ProductGid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input string is empty.
    #[error("product id cannot be empty")]
    Empty,
    /// The input is a GID for some other resource type.
    #[error("expected a product GID, got '{0}'")]
    WrongResource(String),
    /// The numeric part is missing or not a positive integer.
    #[error("invalid product id '{0}'")]
    InvalidNumber(String),
}

/// A Shopify product global ID (`gid://shopify/Product/<n>`).
///
/// The resource picker in the embedded admin hands out full GIDs, while the
/// REST-era payloads use bare numeric ids. Both forms are accepted and
/// normalized to the GID form.
///
/// ## Examples
///
/// ```
/// use bundle_kit_core::ProductGid;
///
/// let a = ProductGid::parse("123").unwrap();
/// let b = ProductGid::parse("gid://shopify/Product/123").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.numeric_id(), "123");
///
/// assert!(ProductGid::parse("gid://shopify/Order/1").is_err());
/// assert!(ProductGid::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ProductGid(String);

impl ProductGid {
    /// Parse a product id from either numeric or GID form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, references another resource
    /// type, or does not end in a positive integer.
    pub fn parse(s: &str) -> Result<Self, GidError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GidError::Empty);
        }

        let numeric = if let Some(rest) = s.strip_prefix(PRODUCT_GID_PREFIX) {
            rest
        } else if s.starts_with("gid://") {
            return Err(GidError::WrongResource(s.to_owned()));
        } else {
            s
        };

        if numeric.is_empty() || !numeric.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GidError::InvalidNumber(s.to_owned()));
        }
        if numeric.bytes().all(|b| b == b'0') {
            return Err(GidError::InvalidNumber(s.to_owned()));
        }

        Ok(Self(format!("{PRODUCT_GID_PREFIX}{numeric}")))
    }

    /// Returns the full GID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric (legacy REST) id.
    #[must_use]
    pub fn numeric_id(&self) -> &str {
        legacy_id(&self.0)
    }
}

/// Returns the trailing segment of a GID (the legacy numeric id).
///
/// Inputs without a `/` are returned unchanged.
#[must_use]
pub fn legacy_id(gid: &str) -> &str {
    gid.rsplit('/').next().unwrap_or(gid)
}

impl fmt::Display for ProductGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductGid {
    type Error = GidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductGid> for String {
    fn from(gid: ProductGid) -> Self {
        gid.0
    }
}

impl AsRef<str> for ProductGid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        let gid = ProductGid::parse("8123456789").unwrap();
        assert_eq!(gid.as_str(), "gid://shopify/Product/8123456789");
    }

    #[test]
    fn test_parse_full_gid() {
        let gid = ProductGid::parse("gid://shopify/Product/42").unwrap();
        assert_eq!(gid.as_str(), "gid://shopify/Product/42");
        assert_eq!(gid.numeric_id(), "42");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let gid = ProductGid::parse("  42 ").unwrap();
        assert_eq!(gid.numeric_id(), "42");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductGid::parse(""), Err(GidError::Empty));
        assert_eq!(ProductGid::parse("   "), Err(GidError::Empty));
    }

    #[test]
    fn test_parse_wrong_resource() {
        assert!(matches!(
            ProductGid::parse("gid://shopify/ProductVariant/1"),
            Err(GidError::WrongResource(_))
        ));
    }

    #[test]
    fn test_parse_invalid_number() {
        assert!(matches!(
            ProductGid::parse("gid://shopify/Product/"),
            Err(GidError::InvalidNumber(_))
        ));
        assert!(matches!(
            ProductGid::parse("12a"),
            Err(GidError::InvalidNumber(_))
        ));
        assert!(matches!(
            ProductGid::parse("0"),
            Err(GidError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_legacy_id() {
        assert_eq!(legacy_id("gid://shopify/Product/99"), "99");
        assert_eq!(legacy_id("99"), "99");
    }

    #[test]
    fn test_serde_accepts_both_forms() {
        let a: ProductGid = serde_json::from_str("\"7\"").unwrap();
        let b: ProductGid = serde_json::from_str("\"gid://shopify/Product/7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            "\"gid://shopify/Product/7\""
        );
        assert!(serde_json::from_str::<ProductGid>("\"nope\"").is_err());
    }
}
