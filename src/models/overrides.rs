//! Per-project support-spacing overrides.

use crate::models::measurement::{LooseNumber, Measurement};
use crate::models::tray_type::TrayTypeName;
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Manual support distances keyed by tray-type name.
///
/// Keys are matched against tray types by exact, case-sensitive equality.
/// A key may name a type that no tray currently uses; such types still appear
/// in the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OverrideMap {
    entries: BTreeMap<TrayTypeName, Measurement>,
}

impl OverrideMap {
    /// Creates an empty override map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the override for a type, if any.
    #[must_use]
    pub fn get(&self, type_name: &TrayTypeName) -> Option<Measurement> {
        self.entries.get(type_name).copied()
    }

    /// Returns true when the map holds an override for the type.
    #[must_use]
    pub fn contains(&self, type_name: &TrayTypeName) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Sets the support distance for a type, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the type name is blank or the distance is negative
    /// or non-finite.
    pub fn set(&mut self, type_name: &str, distance: f64) -> Result<Option<Measurement>> {
        let Some(key) = TrayTypeName::parse(type_name) else {
            anyhow::bail!("Tray type name cannot be empty");
        };
        let Some(value) = Measurement::new(distance) else {
            anyhow::bail!(
                "Support distance for '{key}' must be a non-negative number (got {distance})"
            );
        };
        Ok(self.entries.insert(key, value))
    }

    /// Removes the override for a type. Returns the removed value.
    pub fn remove(&mut self, type_name: &str) -> Option<Measurement> {
        let key = TrayTypeName::parse(type_name)?;
        self.entries.remove(&key)
    }

    /// Iterates over the type names that carry an override.
    pub fn keys(&self) -> impl Iterator<Item = &TrayTypeName> {
        self.entries.keys()
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&TrayTypeName, Measurement)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no overrides are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for OverrideMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Blank keys and invalid distances are dropped rather than failing the load
        let raw = BTreeMap::<String, LooseNumber>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let key = TrayTypeName::parse(&key)?;
                let value = value.into_measurement()?;
                Some((key, value))
            })
            .collect();
        Ok(Self { entries })
    }
}
