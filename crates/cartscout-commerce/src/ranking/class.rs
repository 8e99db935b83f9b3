//! Price classification of ranked stores.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a store's total compares with the rest of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceClass {
    /// Total equals the ranking minimum.
    Cheapest,
    /// Total equals the ranking maximum (and not the minimum).
    MostExpensive,
    /// Anything in between.
    Average,
}

impl PriceClass {
    /// Classify a total against the ranking's extremes.
    ///
    /// Compares by value, so ties at either end share the class. Cheapest is
    /// checked first: when min == max every store is Cheapest.
    pub fn of(total: Money, min: Money, max: Money) -> Self {
        if total == min {
            PriceClass::Cheapest
        } else if total == max {
            PriceClass::MostExpensive
        } else {
            PriceClass::Average
        }
    }

    /// Short label, e.g. for card styling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceClass::Cheapest => "cheap",
            PriceClass::MostExpensive => "exp",
            PriceClass::Average => "avg",
        }
    }
}

impl fmt::Display for PriceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceClass::Cheapest => write!(f, "cheapest"),
            PriceClass::MostExpensive => write!(f, "most expensive"),
            PriceClass::Average => write!(f, "average"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn bgn(cents: i64) -> Money {
        Money::new(cents, Currency::BGN)
    }

    #[test]
    fn test_classify() {
        assert_eq!(PriceClass::of(bgn(355), bgn(355), bgn(500)), PriceClass::Cheapest);
        assert_eq!(PriceClass::of(bgn(500), bgn(355), bgn(500)), PriceClass::MostExpensive);
        assert_eq!(PriceClass::of(bgn(400), bgn(355), bgn(500)), PriceClass::Average);
    }

    #[test]
    fn test_cheapest_wins_when_all_equal() {
        assert_eq!(PriceClass::of(bgn(370), bgn(370), bgn(370)), PriceClass::Cheapest);
    }
}
