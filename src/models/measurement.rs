//! Non-negative physical measurements.
//!
//! Every length, weight, diameter and width that enters the crate passes
//! through [`Measurement::new`]. Negative and non-finite values are treated as
//! absent so they can never cancel positive contributions during aggregation.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A finite, non-negative floating-point measurement.
///
/// Units are carried by the field name (`_mm`, `_kg_per_m`, ...), not the type.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Measurement(f64);

impl Measurement {
    /// Zero measurement.
    pub const ZERO: Self = Self(0.0);

    /// Creates a measurement, returning `None` for negative or non-finite input.
    ///
    /// # Examples
    ///
    /// ```
    /// use cabletray::models::Measurement;
    ///
    /// assert_eq!(Measurement::new(300.0).map(Measurement::value), Some(300.0));
    /// assert!(Measurement::new(-1.0).is_none());
    /// assert!(Measurement::new(f64::NAN).is_none());
    /// ```
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            // Collapse -0.0 so stored values compare and print consistently
            Some(Self(value + 0.0))
        } else {
            None
        }
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Exact stored-value equality. No rounding or tolerance is applied.
    #[must_use]
    pub fn same_value(self, other: Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Self::new(raw).ok_or_else(|| {
            serde::de::Error::custom(format!("measurement must be finite and non-negative, got {raw}"))
        })
    }
}

/// Any JSON value in a numeric slot. Non-numbers carry no value.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseNumber {
    Number(f64),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl LooseNumber {
    pub(crate) fn into_measurement(self) -> Option<Measurement> {
        match self {
            Self::Number(value) => Measurement::new(value),
            Self::Other(_) => None,
        }
    }
}

/// Lenient deserializer for optional measurement fields.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`. Missing, null,
/// non-numeric, negative and non-finite values all become `None` instead of
/// failing the whole snapshot.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<Measurement>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(LooseNumber::into_measurement))
}
