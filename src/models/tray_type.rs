//! Typed tray-type labels.

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

/// A validated tray-type name.
///
/// Tray types are free-text labels rather than a separate entity, so this
/// wrapper is the single place where a label is normalized. Surrounding
/// whitespace is trimmed and empty labels are rejected.
///
/// # Matching vs. ordering
///
/// - Equality and hashing are exact and case-sensitive: `"Power"` and
///   `"power"` are different types and never share an override.
/// - [`TrayTypeName::display_cmp`] is case-insensitive and locale-collated,
///   and is used only to order results for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrayTypeName(String);

impl TrayTypeName {
    /// Parses a raw label, returning `None` when it is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use cabletray::models::TrayTypeName;
    ///
    /// assert_eq!(TrayTypeName::parse("  Power ").unwrap().as_str(), "Power");
    /// assert!(TrayTypeName::parse("   ").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive, collated ordering for display.
    ///
    /// Uses the Unicode root collation at secondary strength: accented letters
    /// sort next to their base letter and case is ignored. Labels that differ
    /// only in case compare equal, so callers must use a stable sort to keep
    /// input order for such ties.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        DISPLAY_COLLATOR.with(|collator| match collator {
            Some(collator) => collator.compare(&self.0, &other.0),
            None => {
                let lhs = self.0.chars().flat_map(char::to_lowercase);
                let rhs = other.0.chars().flat_map(char::to_lowercase);
                lhs.cmp(rhs)
            }
        })
    }
}

thread_local! {
    static DISPLAY_COLLATOR: Option<Collator> = display_collator();
}

fn display_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("Root collation unavailable, ordering tray types by lowercase: {e}");
            None
        }
    }
}

impl fmt::Display for TrayTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrayTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TrayTypeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("tray type name cannot be empty"))
    }
}

/// Deserializes an optional tray-type label, mapping blank labels to `None`.
///
/// A tray with a blank type still exists; it just belongs to no type group.
pub fn optional_label<'de, D>(deserializer: D) -> Result<Option<TrayTypeName>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(TrayTypeName::parse))
}
