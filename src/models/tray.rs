//! Cable trays.

use crate::models::cable::CableTypeId;
use crate::models::measurement::{lenient, Measurement};
use crate::models::tray_type::{optional_label, TrayTypeName};
use serde::{Deserialize, Serialize};

/// Identifier of a tray within a project.
pub type TrayId = u64;

/// A physical tray run.
///
/// The type is a free-text label, not a foreign key. Trays sharing a label form
/// one type group during analysis even when their widths disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tray {
    /// Identifier, unique within the project
    pub id: TrayId,
    /// Tray tag as shown on drawings
    #[serde(default)]
    pub name: String,
    /// Declared tray type; `None` when blank
    #[serde(rename = "type", default, deserialize_with = "optional_label")]
    pub type_name: Option<TrayTypeName>,
    /// Width in millimetres
    #[serde(default, deserialize_with = "lenient")]
    pub width_mm: Option<Measurement>,
    /// Side-rail height in millimetres
    #[serde(default, deserialize_with = "lenient")]
    pub height_mm: Option<Measurement>,
    /// Run length in millimetres
    #[serde(default, deserialize_with = "lenient")]
    pub length_mm: Option<Measurement>,
    /// Whether a continuous grounding conductor runs along this tray
    #[serde(default)]
    pub include_grounding_cable: bool,
    /// Cable type of the grounding conductor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_cable_type_id: Option<CableTypeId>,
}

impl Tray {
    /// Creates a tray with the given type label.
    ///
    /// A blank label leaves the tray untyped.
    #[must_use]
    pub fn new(id: TrayId, name: impl Into<String>, type_name: &str) -> Self {
        Self {
            id,
            name: name.into(),
            type_name: TrayTypeName::parse(type_name),
            width_mm: None,
            height_mm: None,
            length_mm: None,
            include_grounding_cable: false,
            grounding_cable_type_id: None,
        }
    }

    /// Sets the width. Negative values are stored as absent.
    #[must_use]
    pub fn with_width_mm(mut self, width: f64) -> Self {
        self.width_mm = Measurement::new(width);
        self
    }

    /// Sets the height. Negative values are stored as absent.
    #[must_use]
    pub fn with_height_mm(mut self, height: f64) -> Self {
        self.height_mm = Measurement::new(height);
        self
    }

    /// Sets the run length. Negative values are stored as absent.
    #[must_use]
    pub fn with_length_mm(mut self, length: f64) -> Self {
        self.length_mm = Measurement::new(length);
        self
    }

    /// Marks the tray as carrying a grounding conductor of the given type.
    #[must_use]
    pub const fn with_grounding_cable(mut self, cable_type_id: CableTypeId) -> Self {
        self.include_grounding_cable = true;
        self.grounding_cable_type_id = Some(cable_type_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_type() {
        let tray = Tray::new(1, "T-01", " Ladder ");
        assert_eq!(tray.type_name.unwrap().as_str(), "Ladder");

        let untyped = Tray::new(2, "T-02", "");
        assert!(untyped.type_name.is_none());
    }

    #[test]
    fn test_grounding_builder() {
        let tray = Tray::new(1, "T-01", "Ladder").with_grounding_cable(9);
        assert!(tray.include_grounding_cable);
        assert_eq!(tray.grounding_cable_type_id, Some(9));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "id": 4,
            "name": "T-04",
            "type": "Perforated",
            "widthMm": 450,
            "heightMm": -60,
            "includeGroundingCable": true,
            "groundingCableTypeId": 2
        }"#;
        let tray: Tray = serde_json::from_str(json).unwrap();
        assert_eq!(tray.type_name.as_ref().unwrap().as_str(), "Perforated");
        assert_eq!(tray.width_mm.map(Measurement::value), Some(450.0));
        assert!(tray.height_mm.is_none());
        assert!(tray.include_grounding_cable);
    }

    #[test]
    fn test_deserialize_blank_type() {
        let tray: Tray = serde_json::from_str(r#"{"id": 1, "type": "  "}"#).unwrap();
        assert!(tray.type_name.is_none());
    }
}
