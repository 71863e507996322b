//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in US dollars.
///
/// Unit prices and wholesale costs are compared directly, so they are kept
/// as exact decimals rather than floats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
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

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).amount(), Decimal::new(1999, 2));
        assert_eq!(Price::from_cents(-5).amount(), Decimal::new(-5, 2));
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_cents(100) < Price::from_cents(101));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(350).to_string(), "$3.50");
    }
}
