//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the browser storefront (binary floats):                             │
//! │    35.10 + 8.20 = 43.300000000000004  ❌ WRONG!                         │
//! │                                                                         │
//! │  A "live" total recomputed on every keystroke accumulates that drift.  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3510 + 820 = 4330 cents, exactly, every time                         │
//! │    Decimal strings ("35.10") are parsed straight into cents            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hearth_core::money::Money;
//!
//! let price = Money::from_cents(3500);       // $35.00
//! let shipping: Money = "8.50".parse().unwrap();
//! let total = price + shipping;
//! assert_eq!(total.cents(), 4350);
//! assert_eq!(total.to_decimal_string(), "43.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Raw cart input may carry negative prices; the
///   calculator clamps them instead of the type forbidding them
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as cents**: the browser receives integers, never floats
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► CartLine.unit_price ──► line subtotal
///                                                      │
/// RateTable bracket price ──► shipping_cost            │
///                                   │                  ▼
///                                   └──────► OrderTotals.grand_total
///                                                      │
///                                                      ▼
///                                         Payment redirect amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use hearth_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Clamps negative values to zero.
    ///
    /// ## Example
    /// ```rust
    /// use hearth_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(250).clamp_non_negative().cents(), 250);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use hearth_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2450); // $24.50 hand-thrown mug
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 7350);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Saturating addition, used when summing untrusted cart lines.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Formats as a plain decimal string with two places ("43.50").
    ///
    /// This is the format payment providers expect in query strings.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal strings such as `"35"`, `"8.5"`, `"1200.00"` or `"-2.25"`.
///
/// ## Rules
/// - At most two fractional digits (more would silently lose precision)
/// - No thousands separators, no currency symbols
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty() || !major_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a decimal number like 12.50"));
        }
        if minor_str.len() > 2 || !minor_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("at most two decimal places are allowed"));
        }
        if digits.ends_with('.') {
            return Err(invalid("missing digits after decimal point"));
        }

        let major: i64 = major_str
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().unwrap_or(0) * 10,
            _ => minor_str.parse::<i64>().unwrap_or(0),
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

/// Serde adapter for human-edited config files: money as `"12.50"`.
///
/// ## Usage
/// ```rust,ignore
/// #[serde(with = "hearth_core::money::decimal")]
/// pub free_shipping_threshold: Money,
/// ```
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_decimal_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money with a dollar sign. Use the frontend for localized
/// formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor_part())
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

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc.saturating_add(m))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(4350)), "$43.50");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(4350).to_decimal_string(), "43.50");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_cents(-120).to_decimal_string(), "-1.20");
    }

    #[test]
    fn test_parse() {
        assert_eq!("35.00".parse::<Money>().unwrap().cents(), 3500);
        assert_eq!("8.5".parse::<Money>().unwrap().cents(), 850);
        assert_eq!("1200".parse::<Money>().unwrap().cents(), 120000);
        assert_eq!(" 0.07 ".parse::<Money>().unwrap().cents(), 7);
        assert_eq!("-2.25".parse::<Money>().unwrap().cents(), -225);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1.".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("$5".parse::<Money>().is_err());
        assert!("1,000.00".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);
    }

    #[test]
    fn test_no_float_drift() {
        // 0.10 added ten times is exactly 1.00
        let dime: Money = "0.10".parse().unwrap();
        let total: Money = std::iter::repeat(dime).take(10).sum();
        assert_eq!(total.cents(), 100);
    }

    #[test]
    fn test_clamp_and_saturation() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
        assert_eq!(
            Money::from_cents(i64::MAX).multiply_quantity(2).cents(),
            i64::MAX
        );
        assert_eq!(
            Money::from_cents(i64::MAX)
                .saturating_add(Money::from_cents(1))
                .cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
