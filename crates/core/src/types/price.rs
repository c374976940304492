//! Decimal price handling.
//!
//! Shopify exchanges money amounts as decimal strings (`"19.99"`). Prices are
//! parsed into [`rust_decimal::Decimal`] so sums never pick up binary
//! floating-point error, and rendered back with exactly two decimal places.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when strictly parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("'{0}' is not a decimal amount")]
    NotDecimal(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A money amount in the shop's currency.
///
/// ## Examples
///
/// ```
/// use bundle_kit_core::Price;
///
/// let total = Price::aggregate(["10.00", "5.5", "abc"]);
/// assert_eq!(total.to_money_string(), "15.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price, rejecting anything that is not a non-negative decimal.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a decimal, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(s).map_err(|_| PriceError::NotDecimal(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price, treating empty or malformed input as zero.
    ///
    /// Used wherever a missing price must still order or sum deterministically.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::ZERO)
    }

    /// Sum a list of price strings; malformed entries contribute zero.
    #[must_use]
    pub fn aggregate<I, S>(prices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        prices
            .into_iter()
            .map(|p| Self::parse_lenient(p.as_ref()).0)
            .fold(Self::ZERO, |acc, amount| Self(acc.0 + amount))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Render with exactly two decimal places (`"15.50"`), rounding half away from zero.
    #[must_use]
    pub fn to_money_string(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_money_string())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
