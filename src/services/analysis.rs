//! Full tray-loading analysis for one project.
//!
//! Runs the pipeline in order: type aggregation, weight resolution, support
//! spacing, projection. The computation is pure: the same snapshot and
//! override map always give the same, identically ordered result.

use serde::Serialize;
use tracing::debug;

use crate::models::{OverrideMap, ProjectSnapshot};
use crate::services::projection::{project_trays, project_types, TrayLoading, TrayTypeSummary};
use crate::services::support_spacing::resolve_support_spacing;
use crate::services::type_aggregator::aggregate_types;
use crate::services::weights::{resolve_weights, UnresolvedReference};

/// Everything the presentation layer shows for a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    /// Tray-type rows, ordered case-insensitively by name
    pub types: Vec<TrayTypeSummary>,
    /// Per-tray rows in snapshot order
    pub trays: Vec<TrayLoading>,
    /// References that did not resolve
    pub unresolved: Vec<UnresolvedReference>,
}

impl ProjectAnalysis {
    /// Types that need a manual override before spacing can be resolved.
    pub fn pending_types(&self) -> impl Iterator<Item = &TrayTypeSummary> {
        self.types.iter().filter(|t| t.needs_manual_resolution)
    }

    /// True when nothing needs attention.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.pending_types().next().is_none()
    }
}

/// Analyzes a project snapshot against its override map.
///
/// # Examples
///
/// ```
/// use cabletray::models::{OverrideMap, ProjectSnapshot, Tray};
/// use cabletray::services::analysis::analyze_project;
///
/// let mut project = ProjectSnapshot::new("Demo");
/// project.trays.push(Tray::new(1, "T-1", "A").with_width_mm(300.0));
/// project.trays.push(Tray::new(2, "T-2", "A").with_width_mm(450.0));
///
/// let mut overrides = OverrideMap::new();
/// let analysis = analyze_project(&project, &overrides);
/// assert!(analysis.types[0].needs_manual_resolution);
///
/// overrides.set("A", 600.0)?;
/// let analysis = analyze_project(&project, &overrides);
/// assert!(!analysis.types[0].needs_manual_resolution);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn analyze_project(project: &ProjectSnapshot, overrides: &OverrideMap) -> ProjectAnalysis {
    let groups = aggregate_types(&project.trays, overrides.keys());
    let weights = resolve_weights(&project.cables, &project.cable_types, &project.trays);
    let resolved = resolve_support_spacing(&groups, overrides);

    let analysis = ProjectAnalysis {
        types: project_types(&groups, &resolved, &weights),
        trays: project_trays(&project.trays, &weights),
        unresolved: weights.unresolved,
    };

    debug!(
        project = %project.name,
        types = analysis.types.len(),
        trays = analysis.trays.len(),
        unresolved = analysis.unresolved.len(),
        "Analyzed project"
    );

    analysis
}
