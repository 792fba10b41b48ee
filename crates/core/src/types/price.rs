//! Type-safe price representation using decimal arithmetic.
//!
//! The shop API speaks plain JSON numbers for prices, so [`Price`] reads and
//! writes a float on the wire while keeping a [`Decimal`] internally. All
//! arithmetic (line totals, inventory value) happens on the decimal.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the shop's single currency (dollars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity (a line total).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Amount rounded half-away-from-zero to cents.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded().0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

impl core::str::FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('$').parse::<Decimal>().map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(250).amount(), Decimal::new(250, 2));
        assert_eq!(Price::from_cents(-5).amount(), Decimal::new(-5, 2));
    }

    #[test]
    fn test_times_and_sum() {
        let line = Price::from_cents(125).times(3);
        assert_eq!(line, Price::from_cents(375));

        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(150).to_string(), "$1.50");
        assert_eq!(Price::new(Decimal::new(2, 0)).to_string(), "$2.00");
        assert_eq!(Price::new(Decimal::new(1005, 3)).to_string(), "$1.01");
    }

    #[test]
    fn test_parse_with_and_without_symbol() {
        assert_eq!("$3.25".parse::<Price>().unwrap(), Price::from_cents(325));
        assert_eq!(" 4 ".parse::<Price>().unwrap(), Price::from_cents(400));
        assert!("four".parse::<Price>().is_err());
    }

    #[test]
    fn test_wire_format_is_a_number() {
        let price = Price::from_cents(225);
        assert_eq!(serde_json::to_string(&price).unwrap(), "2.25");

        let parsed: Price = serde_json::from_str("2.25").unwrap();
        assert_eq!(parsed, price);

        let whole: Price = serde_json::from_str("3").unwrap();
        assert_eq!(whole, Price::from_cents(300));
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_cents(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::from_cents(1).is_negative());
    }
}
