//! Rupiah amounts and percentage discounts.
//!
//! The remote API sends prices as plain JSON numbers in whole Rupiah. Values
//! are held as [`Decimal`] so sorting and display never go through floats.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount in Indonesian Rupiah.
///
/// Displays with `.` as the thousands separator and no fractional part,
/// e.g. `Rp 15.000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupiah(Decimal);

impl Rupiah {
    /// Zero Rupiah.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of Rupiah.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount grouped in thousands without currency prefix (`15.000`).
    #[must_use]
    pub fn grouped(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().trunc().to_string();

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rp {}", self.grouped())
    }
}

impl From<Decimal> for Rupiah {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// A percentage discount, e.g. `15` for 15% off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(Decimal);

impl Discount {
    /// Create a new discount percentage.
    #[must_use]
    pub const fn new(percent: Decimal) -> Self {
        Self(percent)
    }

    /// The percentage value.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Badge text shown on product cards, or `None` for a zero discount.
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        if self.0.is_zero() {
            None
        } else {
            Some(format!("{}% OFF", self.0.normalize()))
        }
    }
}
