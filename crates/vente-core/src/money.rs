//! # Money Module
//!
//! Amount parsing and the `Money` type.
//!
//! ## One Parsing Rule Everywhere
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screens hand us amounts in whatever shape the user typed them:        │
//! │                                                                         │
//! │    1500            "1500"          "12 000 FCFA"         "2,5"          │
//! │      │               │                  │                  │            │
//! │      └───────────────┴──────┬───────────┴──────────────────┘            │
//! │                             ▼                                           │
//! │                    Amount::{Numeric, Text}                              │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                     parse_amount()  ← THE ONLY canonicalization step    │
//! │                             │                                           │
//! │      ┌──────────────────────┼──────────────────────┐                    │
//! │      ▼                      ▼                      ▼                    │
//! │  format_currency     validate_amount        edit_line / subtotal       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Whole Units?
//! FCFA has no minor unit, so `Money` counts whole francs in an `i64`.
//! Fractional inputs (a quantity of `2,5`) are multiplied as floats and
//! rounded exactly once, when they become `Money`.
//!
//! ## Usage
//! ```rust
//! use vente_core::money::{parse_amount, Amount, Money};
//!
//! assert_eq!(parse_amount(&Amount::from("12 000 FCFA")), 12000.0);
//! assert_eq!(parse_amount(&Amount::from("abc")), 0.0);
//!
//! let line = Money::from_units(1500) * 2;
//! assert_eq!(line.units(), 3000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Amount (loosely-typed input)
// =============================================================================

/// An amount as received from a screen: either a number or raw typed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Already numeric.
    Numeric(f64),
    /// Raw text, possibly with spaces, separators or a currency suffix.
    Text(String),
}

impl Amount {
    /// Returns the numeric value, or `None` if the input is blank or garbage.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Amount::Numeric(value) => Some(*value).filter(|v| v.is_finite()),
            Amount::Text(raw) => try_parse_amount(raw),
        }
    }

    /// True when there is nothing to interpret (blank text).
    ///
    /// A numeric NaN is not blank: it is a value that fails to parse.
    pub fn is_blank(&self) -> bool {
        match self {
            Amount::Numeric(_) => false,
            Amount::Text(raw) => raw.trim().is_empty(),
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Text(String::new())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Numeric(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Numeric(value as f64)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::Numeric(f64::from(value))
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::Numeric(f64::from(value))
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

impl From<&String> for Amount {
    fn from(value: &String) -> Self {
        Amount::Text(value.clone())
    }
}

impl From<&Amount> for Amount {
    fn from(value: &Amount) -> Self {
        value.clone()
    }
}

impl From<Money> for Amount {
    fn from(value: Money) -> Self {
        Amount::Numeric(value.units() as f64)
    }
}

/// A missing value reads as blank text.
impl<T: Into<Amount>> From<Option<T>> for Amount {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Strips everything but the numeric content of `raw` and parses it.
///
/// Kept characters: ASCII digits, `.`, `,` (read as a decimal point) and a
/// `-` appearing before any digit. Returns `None` when what remains is not a
/// finite number.
///
/// ```rust
/// use vente_core::money::try_parse_amount;
///
/// assert_eq!(try_parse_amount("12 000 FCFA"), Some(12000.0));
/// assert_eq!(try_parse_amount("2,5"), Some(2.5));
/// assert_eq!(try_parse_amount("-500"), Some(-500.0));
/// assert_eq!(try_parse_amount("FCFA"), None);
/// ```
pub fn try_parse_amount(raw: &str) -> Option<f64> {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '0'..='9' | '.' => cleaned.push(c),
            ',' => cleaned.push('.'),
            '-' if cleaned.is_empty() => cleaned.push('-'),
            _ => {}
        }
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric interpretation of an amount, with anything unparseable read as zero.
#[inline]
pub fn parse_amount(amount: &Amount) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units (francs CFA).
///
/// ## Design Decisions
/// - **i64 (signed)**: credit notes and corrections can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Rounding happens once**: in [`Money::from_f64_rounded`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Rounds a float to the nearest whole unit, half away from zero.
    ///
    /// Non-finite input becomes zero. Values beyond the `i64` range are
    /// clamped to `i64::MIN` / `i64::MAX`.
    ///
    /// ```rust
    /// use vente_core::money::Money;
    ///
    /// assert_eq!(Money::from_f64_rounded(1234.5).units(), 1235);
    /// assert_eq!(Money::from_f64_rounded(-0.5).units(), -1);
    /// assert_eq!(Money::from_f64_rounded(f64::NAN).units(), 0);
    /// ```
    pub fn from_f64_rounded(value: f64) -> Self {
        if !value.is_finite() {
            return Money::zero();
        }
        // `as` saturates at the i64 bounds
        Money(value.round() as i64)
    }

    /// Parses an amount the way every formatter does (unparseable → zero).
    pub fn from_amount(amount: &Amount) -> Self {
        Money::from_f64_rounded(parse_amount(amount))
    }

    /// Returns the value in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at a fixed rate, rounded half away from zero.
    ///
    /// ## Implementation
    /// Integer math on the magnitude: `(|amount| * bps + 5000) / 10000`,
    /// then the sign is restored so refunds round symmetrically.
    ///
    /// ## Example
    /// ```rust
    /// use vente_core::money::Money;
    /// use vente_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_units(3500);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1800)); // 18%
    /// assert_eq!(tax.units(), 630);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps the product exact for any i64 amount
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        let tax = if self.0 < 0 { -magnitude } else { magnitude };
        Money(tax as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount the way the vente screens do: `3 500 FCFA`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_currency(*self, true))
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds instead of overflowing.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a whole quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_currency_noise() {
        assert_eq!(try_parse_amount("12 000 FCFA"), Some(12000.0));
        assert_eq!(try_parse_amount("3\u{202f}500"), Some(3500.0));
        assert_eq!(try_parse_amount(" 42 "), Some(42.0));
        assert_eq!(try_parse_amount("1.5"), Some(1.5));
        assert_eq!(try_parse_amount("1,5"), Some(1.5));
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(try_parse_amount(""), None);
        assert_eq!(try_parse_amount("FCFA"), None);
        assert_eq!(try_parse_amount("-"), None);
        assert_eq!(try_parse_amount("1.2.3"), None);
        assert_eq!(parse_amount(&Amount::from("n/a")), 0.0);
    }

    #[test]
    fn test_parse_sign_only_before_digits() {
        assert_eq!(try_parse_amount("-250"), Some(-250.0));
        assert_eq!(try_parse_amount("FCFA -250"), Some(-250.0));
        assert_eq!(try_parse_amount("10-20"), Some(1020.0));
    }

    #[test]
    fn test_amount_conversions() {
        assert_eq!(Amount::from(1500).to_f64(), Some(1500.0));
        assert_eq!(Amount::from("1 500").to_f64(), Some(1500.0));
        assert_eq!(Amount::from(f64::NAN).to_f64(), None);
        assert_eq!(Amount::from(None::<f64>), Amount::Text(String::new()));
        assert!(Amount::from(None::<&str>).is_blank());
        assert!(!Amount::from(f64::NAN).is_blank());
    }

    #[test]
    fn test_amount_deserializes_number_or_string() {
        let numeric: Amount = serde_json::from_str("1500").unwrap();
        assert_eq!(numeric, Amount::Numeric(1500.0));
        let text: Amount = serde_json::from_str("\"1 500 FCFA\"").unwrap();
        assert_eq!(text.to_f64(), Some(1500.0));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(Money::from_f64_rounded(2.4).units(), 2);
        assert_eq!(Money::from_f64_rounded(2.5).units(), 3);
        assert_eq!(Money::from_f64_rounded(-2.5).units(), -3);
        assert_eq!(Money::from_f64_rounded(f64::INFINITY).units(), 0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).units(), 1500);
        assert_eq!((a - b).units(), 500);
        assert_eq!((a * 3).units(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.units(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_units(i64::MAX);
        assert_eq!((max + Money::from_units(1)).units(), i64::MAX);
        assert_eq!(Money::from_units(i64::MIN) - Money::from_units(1), Money::from_units(i64::MIN));
        assert_eq!((max * 2).units(), i64::MAX);

        let mut total = max;
        total += max;
        assert_eq!(total, max);
        assert_eq!(vec![max, max, max].into_iter().sum::<Money>(), max);
        assert_eq!(Money::from_f64_rounded(1e30).units(), i64::MAX);
    }

    #[test]
    fn test_tax_calculation() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(Money::from_units(3500).calculate_tax(rate).units(), 630);
        assert_eq!(Money::from_units(1000).calculate_tax(rate).units(), 180);
        // 18% of 25 = 4.5 → 5
        assert_eq!(Money::from_units(25).calculate_tax(rate).units(), 5);
        assert_eq!(Money::from_units(-25).calculate_tax(rate).units(), -5);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_units(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().units(), 100);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(3500).to_string(), "3 500 FCFA");
        assert_eq!(Money::zero().to_string(), "0 FCFA");
    }
}
