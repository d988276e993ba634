//! Cables and cable types.

use crate::models::measurement::{lenient, Measurement};
use crate::models::tray::TrayId;
use serde::{Deserialize, Serialize};

/// Identifier of a cable type within a project.
pub type CableTypeId = u64;

/// Identifier of a cable within a project.
pub type CableId = u64;

/// A category of cable within a project.
///
/// Cables reference their type by id; the unit weight is always read from here
/// at aggregation time, so editing a type affects every referencing cable on
/// the next analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableType {
    /// Identifier, unique within the project
    pub id: CableTypeId,
    /// Display name, unique within the project
    pub name: String,
    /// Optional purpose tag (e.g., "power", "signal")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Outer diameter in millimetres
    #[serde(default, deserialize_with = "lenient")]
    pub diameter_mm: Option<Measurement>,
    /// Weight per metre in kilograms
    #[serde(default, deserialize_with = "lenient")]
    pub weight_kg_per_m: Option<Measurement>,
}

impl CableType {
    /// Creates a cable type with no optional attributes set.
    #[must_use]
    pub fn new(id: CableTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            purpose: None,
            diameter_mm: None,
            weight_kg_per_m: None,
        }
    }

    /// Sets the purpose tag.
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Sets the diameter. Negative values are stored as absent.
    #[must_use]
    pub fn with_diameter_mm(mut self, diameter: f64) -> Self {
        self.diameter_mm = Measurement::new(diameter);
        self
    }

    /// Sets the unit weight. Negative values are stored as absent.
    #[must_use]
    pub fn with_weight_kg_per_m(mut self, weight: f64) -> Self {
        self.weight_kg_per_m = Measurement::new(weight);
        self
    }

    /// Unit weight used for summation (absent counts as zero).
    #[must_use]
    pub fn unit_weight(&self) -> f64 {
        self.weight_kg_per_m.map_or(0.0, Measurement::value)
    }
}

/// A single cable run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cable {
    /// Identifier, unique within the project
    pub id: CableId,
    /// Cable tag as shown on drawings
    #[serde(default)]
    pub tag: String,
    /// Referenced cable type
    pub cable_type_id: CableTypeId,
    /// Source location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_location: Option<String>,
    /// Destination location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_location: Option<String>,
    /// Free-text routing path as entered by the designer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    /// Tray the routing resolves to; `None` for unrouted cables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tray_id: Option<TrayId>,
    /// Design length in metres
    #[serde(default, deserialize_with = "lenient")]
    pub design_length: Option<Measurement>,
    /// As-installed length in metres
    #[serde(default, deserialize_with = "lenient")]
    pub install_length: Option<Measurement>,
}

impl Cable {
    /// Creates an unrouted cable of the given type.
    #[must_use]
    pub fn new(id: CableId, tag: impl Into<String>, cable_type_id: CableTypeId) -> Self {
        Self {
            id,
            tag: tag.into(),
            cable_type_id,
            from_location: None,
            to_location: None,
            routing: None,
            tray_id: None,
            design_length: None,
            install_length: None,
        }
    }

    /// Assigns the cable to a tray.
    #[must_use]
    pub const fn on_tray(mut self, tray_id: TrayId) -> Self {
        self.tray_id = Some(tray_id);
        self
    }

    /// Sets the from/to locations.
    #[must_use]
    pub fn between(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_location = Some(from.into());
        self.to_location = Some(to.into());
        self
    }

    /// Sets the design length. Negative values are stored as absent.
    #[must_use]
    pub fn with_design_length(mut self, length: f64) -> Self {
        self.design_length = Measurement::new(length);
        self
    }

    /// Sets the install length. Negative values are stored as absent.
    #[must_use]
    pub fn with_install_length(mut self, length: f64) -> Self {
        self.install_length = Measurement::new(length);
        self
    }

    /// Length used for weight: install length, else design length, else zero.
    #[must_use]
    pub fn effective_length(&self) -> f64 {
        self.install_length
            .or(self.design_length)
            .map_or(0.0, Measurement::value)
    }
}
