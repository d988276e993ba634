//! Cable load per tray.
//!
//! Joins every cable to its cable type and sums weight over the tray the cable
//! is routed on. Broken references never abort the computation: the affected
//! contribution counts as zero and the reference is reported.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, warn};

use crate::models::{Cable, CableId, CableType, CableTypeId, Tray, TrayId};

/// Load figures for one tray.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayWeight {
    /// Σ unit weight × length over assigned cables, plus the grounding term
    pub total_weight_kg: f64,
    /// Number of cables routed on the tray (grounding conductor excluded)
    pub cable_count: usize,
    /// Linear load: Σ unit weight over assigned cables, plus the grounding term
    pub load_kg_per_m: f64,
}

/// A pointer in the snapshot that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnresolvedReference {
    /// A cable references a cable type that is not in the snapshot.
    #[serde(rename_all = "camelCase")]
    CableType {
        /// The cable holding the reference
        cable_id: CableId,
        /// The missing cable type
        cable_type_id: CableTypeId,
    },
    /// A cable is routed on a tray that is not in the snapshot.
    #[serde(rename_all = "camelCase")]
    Tray {
        /// The cable holding the reference
        cable_id: CableId,
        /// The missing tray
        tray_id: TrayId,
    },
    /// A tray asks for a grounding cable whose type does not resolve.
    #[serde(rename_all = "camelCase")]
    GroundingCableType {
        /// The tray holding the reference
        tray_id: TrayId,
        /// The missing cable type, `None` when no type was given at all
        cable_type_id: Option<CableTypeId>,
    },
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CableType {
                cable_id,
                cable_type_id,
            } => write!(
                f,
                "Cable {cable_id} references unknown cable type {cable_type_id}"
            ),
            Self::Tray { cable_id, tray_id } => {
                write!(f, "Cable {cable_id} is routed on unknown tray {tray_id}")
            }
            Self::GroundingCableType {
                tray_id,
                cable_type_id: Some(type_id),
            } => write!(
                f,
                "Tray {tray_id} grounding cable references unknown cable type {type_id}"
            ),
            Self::GroundingCableType {
                tray_id,
                cable_type_id: None,
            } => write!(
                f,
                "Tray {tray_id} includes a grounding cable but no cable type is set"
            ),
        }
    }
}

/// Result of [`resolve_weights`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightReport {
    /// Load per tray; every tray in the input has an entry
    pub trays: BTreeMap<TrayId, TrayWeight>,
    /// References that could not be resolved, in input order
    pub unresolved: Vec<UnresolvedReference>,
}

impl WeightReport {
    /// Load for one tray. Unknown trays have no entry.
    #[must_use]
    pub fn tray(&self, id: TrayId) -> Option<&TrayWeight> {
        self.trays.get(&id)
    }

    /// Sum of total weight over the given trays.
    #[must_use]
    pub fn total_for<'a>(&self, tray_ids: impl IntoIterator<Item = &'a TrayId>) -> f64 {
        tray_ids
            .into_iter()
            .filter_map(|id| self.trays.get(id))
            .map(|w| w.total_weight_kg)
            .sum()
    }
}

/// Computes the cable load of every tray.
///
/// For each cable routed on a tray, adds `weight_kg_per_m × length` where
/// length is the install length, else the design length, else zero. A tray
/// with `include_grounding_cable` adds the grounding type's unit weight once,
/// independent of how many cables it carries.
///
/// Unrouted cables (no `tray_id`) are ignored.
pub fn resolve_weights(cables: &[Cable], cable_types: &[CableType], trays: &[Tray]) -> WeightReport {
    let types: HashMap<CableTypeId, &CableType> =
        cable_types.iter().map(|t| (t.id, t)).collect();

    let mut report = WeightReport {
        trays: trays.iter().map(|t| (t.id, TrayWeight::default())).collect(),
        unresolved: Vec::new(),
    };

    for cable in cables {
        let Some(tray_id) = cable.tray_id else {
            continue;
        };
        let Some(entry) = report.trays.get_mut(&tray_id) else {
            report.unresolved.push(UnresolvedReference::Tray {
                cable_id: cable.id,
                tray_id,
            });
            continue;
        };

        entry.cable_count += 1;

        match types.get(&cable.cable_type_id) {
            Some(cable_type) => {
                let unit = cable_type.unit_weight();
                entry.total_weight_kg += unit * cable.effective_length();
                entry.load_kg_per_m += unit;
            }
            None => report.unresolved.push(UnresolvedReference::CableType {
                cable_id: cable.id,
                cable_type_id: cable.cable_type_id,
            }),
        }
    }

    for tray in trays.iter().filter(|t| t.include_grounding_cable) {
        let grounding = tray
            .grounding_cable_type_id
            .and_then(|id| types.get(&id));
        match grounding {
            Some(cable_type) => {
                if let Some(entry) = report.trays.get_mut(&tray.id) {
                    let unit = cable_type.unit_weight();
                    entry.total_weight_kg += unit;
                    entry.load_kg_per_m += unit;
                }
            }
            None => report.unresolved.push(UnresolvedReference::GroundingCableType {
                tray_id: tray.id,
                cable_type_id: tray.grounding_cable_type_id,
            }),
        }
    }

    for reference in &report.unresolved {
        warn!("{reference}");
    }
    debug!(
        cables = cables.len(),
        trays = trays.len(),
        unresolved = report.unresolved.len(),
        "Resolved tray weights"
    );

    report
}
