//! Effective support spacing per tray type.
//!
//! Each type group resolves independently:
//!
//! | widths      | override | spacing  | needs manual resolution |
//! |-------------|----------|----------|-------------------------|
//! | unambiguous | yes      | override | no                      |
//! | unambiguous | no       | unset    | no                      |
//! | ambiguous   | no       | unset    | yes                     |
//! | ambiguous   | yes      | override | no                      |
//!
//! No default spacing is invented here. A default, if any, is caller policy.

use serde::Serialize;
use tracing::debug;

use crate::models::{Measurement, OverrideMap, TrayTypeName};
use crate::services::type_aggregator::TrayTypeGroup;

/// Where the effective spacing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpacingSource {
    /// A manual override for the type name
    Override,
    /// Nothing resolved; left to external policy or the user
    Unset,
}

/// Support-spacing outcome for one tray type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSupport {
    /// Tray type label
    pub type_name: TrayTypeName,
    /// Single width when unambiguous
    pub width_mm: Option<Measurement>,
    /// True when trays of this type disagree on width
    pub has_multiple_widths: bool,
    /// Spacing to use, if any
    pub effective_support_spacing: Option<Measurement>,
    /// True when the width conflict blocks automatic resolution
    pub needs_manual_resolution: bool,
    /// Where `effective_support_spacing` came from
    pub spacing_source: SpacingSource,
}

/// Merges type groups with the override snapshot.
///
/// Overrides are matched by exact type name and always win, whatever the
/// widths. The output keeps the order of `groups`.
pub fn resolve_support_spacing(
    groups: &[TrayTypeGroup],
    overrides: &OverrideMap,
) -> Vec<ResolvedSupport> {
    let resolved: Vec<ResolvedSupport> = groups
        .iter()
        .map(|group| {
            let manual = overrides.get(&group.type_name);
            ResolvedSupport {
                type_name: group.type_name.clone(),
                width_mm: group.width_mm,
                has_multiple_widths: group.has_multiple_widths,
                effective_support_spacing: manual,
                needs_manual_resolution: group.has_multiple_widths && manual.is_none(),
                spacing_source: if manual.is_some() {
                    SpacingSource::Override
                } else {
                    SpacingSource::Unset
                },
            }
        })
        .collect();

    debug!(
        types = resolved.len(),
        overridden = resolved
            .iter()
            .filter(|r| r.spacing_source == SpacingSource::Override)
            .count(),
        pending = resolved.iter().filter(|r| r.needs_manual_resolution).count(),
        "Resolved support spacing"
    );

    resolved
}
