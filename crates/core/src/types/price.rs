//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a decimal number: {0}")]
    NotANumber(String),
    /// Shopify rejects negative prices.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative price in the shop's currency.
///
/// Shopify takes prices as decimal strings, so the amount is kept as a
/// [`Decimal`] and serialized as a string to avoid float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price such as `"19.99"`. A leading `$` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(s).map_err(|_| PriceError::NotANumber(s.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        Ok(Self(amount.round_dp(2)))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
        assert_eq!(Price::parse("$5").unwrap().to_string(), "5.00");
        assert_eq!(Price::parse(" 0 ").unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_parse_rounds_to_cents() {
        assert_eq!(Price::parse("1.005").unwrap().to_string(), "1.00");
        assert_eq!(Price::parse("2.499").unwrap().to_string(), "2.50");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("$"), Err(PriceError::Empty));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
        assert!(matches!(Price::parse("ten"), Err(PriceError::NotANumber(_))));
    }
}
