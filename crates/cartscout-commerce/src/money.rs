//! Money type for representing monetary values.
//!
//! Uses an integer count of the currency's smallest unit (stotinki for BGN,
//! cents for EUR) so that store totals compare exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed lev-to-euro peg. Deliberately a constant, not a live or configurable rate.
pub const BGN_PER_EUR: f64 = 1.95583;

/// Supported currencies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Currency {
    /// Bulgarian lev, the currency of every price table.
    #[default]
    BGN,
    /// Euro, shown alongside totals through [`BGN_PER_EUR`].
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BGN").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BGN => "BGN",
            Currency::EUR => "EUR",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use cartscout_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(2.20, Currency::BGN);
    /// assert_eq!(price.amount_cents, 220);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Convert between BGN and EUR through the fixed peg.
    pub fn convert(&self, target: Currency) -> Money {
        if self.currency == target {
            return *self;
        }
        let amount = match target {
            Currency::EUR => self.amount_cents as f64 / BGN_PER_EUR,
            Currency::BGN => self.amount_cents as f64 * BGN_PER_EUR,
        };
        Money::new(amount.round() as i64, target)
    }

    /// Format as a display string, e.g. "3.55 BGN" or "€1.82".
    pub fn display(&self) -> String {
        match self.currency {
            Currency::BGN => format!("{} BGN", self.display_amount()),
            Currency::EUR => format!("\u{20ac}{}", self.display_amount()),
        }
    }

    /// Format as "3.55 BGN / €1.82": the amount followed by its euro equivalent.
    pub fn display_dual(&self) -> String {
        let eur = self.convert(Currency::EUR);
        format!("{} / {}", self.display(), eur.display())
    }

    /// Format as a display string without symbol (e.g., "3.55").
    pub fn display_amount(&self) -> String {
        let decimal = self.to_decimal();
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", decimal)
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_sub(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
