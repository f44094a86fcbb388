//! # Money Module
//!
//! Integer money in paise, used when a computed tax result is written onto a
//! receipt.
//!
//! ## Where Floats Stop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate_tax_amounts  ──►  f64, unrounded (152.5423728...)            │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  receipt_totals()       ──►  Money (15254 paise)                        │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  Receipt row / printout ──►  "₹152.54"                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gymdesk_core::money::Money;
//!
//! let fee = Money::from_paise(149_900); // ₹1499.00
//! let total = fee + Money::from_paise(26_982);
//! assert_eq!(total.to_string(), "₹1768.82");
//!
//! assert_eq!(Money::from_amount(152.5423).paise(), 15254);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxKind;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// - **i64 (signed)**: refunds and rebates can be negative
/// - **Tuple struct**: zero-cost wrapper over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Rounds a rupee amount to the nearest paisa, halves away from zero.
    ///
    /// Non-finite input maps to zero.
    ///
    /// ```rust
    /// use gymdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(10.005).paise(), 1001);
    /// assert_eq!(Money::from_amount(-2.5).paise(), -250);
    /// assert_eq!(Money::from_amount(f64::NAN).paise(), 0);
    /// ```
    pub fn from_amount(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        // Snap to micro-paise first: 10.005 * 100 is 1000.4999999999999
        // in binary and would otherwise round down.
        let scaled = (rupees * 100.0 * 1e6).round() / 1e6;
        Money(scaled.round() as i64)
    }

    /// Value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Paise portion, always 0-99.
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Value as a rupee float, for display math only.
    #[inline]
    pub fn as_rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Receipt Totals
// =============================================================================

/// Tax figures rounded for storage on a receipt row.
///
/// Produced by [`crate::tax::TaxCalculationResult::receipt_totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTaxTotals {
    pub base: Money,
    pub tax: Money,
    pub total: Money,
    /// Kind of tax applied, `None` when the receipt is untaxed.
    pub kind: Option<TaxKind>,
}

impl ReceiptTaxTotals {
    /// Net amount excluding tax.
    ///
    /// Inclusive receipts carve the tax out of the base; exclusive receipts
    /// already quote the base net.
    pub fn net(&self) -> Money {
        match self.kind {
            Some(TaxKind::Inclusive) => self.base - self.tax,
            _ => self.base,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(149_999);
        assert_eq!(money.rupees(), 1499);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_amount_rounding() {
        assert_eq!(Money::from_amount(152.542_372_881).paise(), 15254);
        assert_eq!(Money::from_amount(107.142_857).paise(), 10714);
        assert_eq!(Money::from_amount(0.125).paise(), 13);
        assert_eq!(Money::from_amount(1150.0).paise(), 115_000);
        assert_eq!(Money::from_amount(f64::INFINITY).paise(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(115_000).to_string(), "₹1150.00");
        assert_eq!(Money::from_paise(5).to_string(), "₹0.05");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Money::from_paise(1000);
        let b = Money::from_paise(250);
        assert_eq!((a + b).paise(), 1250);
        assert_eq!((a - b).paise(), 750);
        a -= b;
        a += Money::from_paise(50);
        assert_eq!(a.paise(), 800);
    }

    #[test]
    fn test_receipt_net() {
        let inclusive = ReceiptTaxTotals {
            base: Money::from_paise(100_000),
            tax: Money::from_paise(15_254),
            total: Money::from_paise(100_000),
            kind: Some(TaxKind::Inclusive),
        };
        assert_eq!(inclusive.net().paise(), 84_746);

        let exclusive = ReceiptTaxTotals {
            kind: Some(TaxKind::Exclusive),
            total: Money::from_paise(115_000),
            tax: Money::from_paise(15_000),
            ..inclusive
        };
        assert_eq!(exclusive.net().paise(), 100_000);
    }
}
