//! Display-ready rows for the presentation layer.

use serde::Serialize;

use crate::models::{Measurement, Tray, TrayId, TrayTypeName};
use crate::services::support_spacing::{ResolvedSupport, SpacingSource};
use crate::services::type_aggregator::TrayTypeGroup;
use crate::services::weights::WeightReport;

/// One row of the tray-type table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayTypeSummary {
    /// Tray type label
    pub type_name: TrayTypeName,
    /// Single width when unambiguous
    pub width_mm: Option<Measurement>,
    /// All distinct widths observed, in first-seen order
    pub widths_mm: Vec<Measurement>,
    /// True when trays of this type disagree on width
    pub has_multiple_widths: bool,
    /// Spacing to use, if any
    pub effective_support_spacing: Option<Measurement>,
    /// True when a manual override is required
    pub needs_manual_resolution: bool,
    /// Where the spacing came from
    pub spacing_source: SpacingSource,
    /// Total cable weight across all trays of this type
    pub total_weight_kg: f64,
    /// Number of trays of this type
    pub tray_count: usize,
}

/// One row of the per-tray table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayLoading {
    /// Tray id
    pub tray_id: TrayId,
    /// Tray tag
    pub name: String,
    /// Tray type, if declared
    pub type_name: Option<TrayTypeName>,
    /// Tray width
    pub width_mm: Option<Measurement>,
    /// Total cable weight on the tray
    pub total_weight_kg: f64,
    /// Number of cables on the tray
    pub cable_count: usize,
    /// Linear load
    pub load_kg_per_m: f64,
}

/// Joins type groups, their resolved spacing and the weights into table rows.
///
/// `resolved` must be the output of
/// [`resolve_support_spacing`](crate::services::support_spacing::resolve_support_spacing)
/// for the same `groups`; rows are paired by position.
pub fn project_types(
    groups: &[TrayTypeGroup],
    resolved: &[ResolvedSupport],
    weights: &WeightReport,
) -> Vec<TrayTypeSummary> {
    groups
        .iter()
        .zip(resolved)
        .map(|(group, support)| {
            debug_assert_eq!(group.type_name, support.type_name);
            TrayTypeSummary {
                type_name: support.type_name.clone(),
                width_mm: support.width_mm,
                widths_mm: group.widths.clone(),
                has_multiple_widths: support.has_multiple_widths,
                effective_support_spacing: support.effective_support_spacing,
                needs_manual_resolution: support.needs_manual_resolution,
                spacing_source: support.spacing_source,
                total_weight_kg: weights.total_for(&group.tray_ids),
                tray_count: group.tray_count(),
            }
        })
        .collect()
}

/// Per-tray rows in input order.
pub fn project_trays(trays: &[Tray], weights: &WeightReport) -> Vec<TrayLoading> {
    trays
        .iter()
        .map(|tray| {
            let weight = weights.tray(tray.id).copied().unwrap_or_default();
            TrayLoading {
                tray_id: tray.id,
                name: tray.name.clone(),
                type_name: tray.type_name.clone(),
                width_mm: tray.width_mm,
                total_weight_kg: weight.total_weight_kg,
                cable_count: weight.cable_count,
                load_kg_per_m: weight.load_kg_per_m,
            }
        })
        .collect()
}
