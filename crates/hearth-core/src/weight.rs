//! # Weight Module
//!
//! Parcel weight in integer grams.
//!
//! Weights arrive from the catalog as decimal kilograms (`0.8`), but every
//! sum and bracket comparison happens on grams so that `0.1 + 0.2` kg lands
//! exactly on a 0.3 kg bracket bound.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use ts_rs::TS;

/// A weight in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Weight(i64);

impl Weight {
    #[inline]
    pub const fn from_grams(grams: i64) -> Self {
        Weight(grams)
    }

    #[inline]
    pub const fn zero() -> Self {
        Weight(0)
    }

    /// Converts decimal kilograms to grams, rounding to the nearest gram.
    ///
    /// Returns `None` for NaN or infinite input. Negative values are kept;
    /// callers decide how to clamp them.
    ///
    /// ## Example
    /// ```rust
    /// use hearth_core::weight::Weight;
    ///
    /// assert_eq!(Weight::from_kg(0.8).unwrap().grams(), 800);
    /// assert!(Weight::from_kg(f64::NAN).is_none());
    /// ```
    pub fn from_kg(kg: f64) -> Option<Self> {
        if !kg.is_finite() {
            return None;
        }
        let grams = (kg * 1000.0).round();
        // Float-to-int `as` saturates, so absurd inputs cannot wrap.
        Some(Weight(grams as i64))
    }

    #[inline]
    pub const fn grams(&self) -> i64 {
        self.0
    }

    /// Kilograms as a float, for display only.
    #[inline]
    pub fn kilograms(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Weight(self.0.saturating_mul(qty))
    }

    #[inline]
    pub const fn saturating_add(&self, other: Weight) -> Self {
        Weight(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} kg", self.kilograms())
    }
}

impl Add for Weight {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

/// Serde adapter for config files: weight written as decimal kilograms.
pub mod kilograms {
    use super::Weight;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Weight, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.kilograms())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Weight, D::Error>
    where
        D: Deserializer<'de>,
    {
        let kg = f64::deserialize(deserializer)?;
        Weight::from_kg(kg).ok_or_else(|| de::Error::custom("weight must be a finite number"))
    }
}
