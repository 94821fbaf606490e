//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are single-currency amounts. On disk they are plain JSON numbers
//! (e.g. `19.99`) so the snapshot file stays readable and hand-editable.
//!
//! Amounts are whole cents no larger than [`Price::MAX`]. That keeps every
//! price at 14 significant digits or fewer, which an `f64` carries exactly
//! through the snapshot file.

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be numeric")]
    NotNumeric,
    /// The amount is below zero.
    #[error("price must be >= 0")]
    Negative,
    /// The amount is above [`Price::MAX`].
    #[error("price must be at most 1000000000")]
    TooLarge,
}

/// A non-negative amount in the shop's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest unit price accepted: one billion.
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a price from a decimal amount, rounded to whole cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero, or
    /// `PriceError::TooLarge` if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative);
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount.round_dp(2)))
    }

    /// Parse a price from user input such as `"12.50"`.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotNumeric` if the input is not a decimal number,
    /// `PriceError::Negative` if it is below zero, or `PriceError::TooLarge`
    /// if it is above [`Price::MAX`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotNumeric)?;
        Self::new(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `qty` units at this unit price.
    ///
    /// Saturates at the largest representable amount.
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(qty)))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.0;
        amount.rescale(2);
        write!(f, "${amount}")
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("12.50").unwrap().amount(), Decimal::new(1250, 2));
        assert_eq!(Price::parse(" 3 ").unwrap().amount(), Decimal::from(3));
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_not_numeric() {
        assert_eq!(Price::parse("abc"), Err(PriceError::NotNumeric));
        assert_eq!(Price::parse(""), Err(PriceError::NotNumeric));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::parse("2.25").unwrap();
        let total: Price = [unit.times(2), unit.times(1)].into_iter().sum();
        assert_eq!(total, Price::parse("6.75").unwrap());
    }

    #[test]
    fn test_parse_rejects_above_max() {
        assert_eq!(Price::parse("1000000000").unwrap(), Price::MAX);
        assert_eq!(Price::parse("1000000000.01"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse("79228162514264337593543950335"),
            Err(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_parse_rounds_to_cents() {
        assert_eq!(
            Price::parse("12.345678").unwrap().amount(),
            Decimal::new(1235, 2)
        );
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price(Decimal::MAX);
        assert_eq!(huge.times(2).amount(), Decimal::MAX);
        assert_eq!((huge + Price::MAX).amount(), Decimal::MAX);
        let total: Price = [huge, huge, huge].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);

        let max_line = Price::MAX.times(u32::MAX);
        assert!(max_line > Price::MAX);
    }

    #[test]
    fn test_largest_price_round_trips_exactly() {
        let price = Price::parse("999999999.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "999999999.99");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::parse("5").unwrap().to_string(), "$5.00");
        assert_eq!(Price::parse("19.999").unwrap().to_string(), "$20.00");
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "19.99");
        let parsed: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(parsed, price);
        let whole: Price = serde_json::from_str("7").unwrap();
        assert_eq!(whole, Price::parse("7").unwrap());
    }
}
