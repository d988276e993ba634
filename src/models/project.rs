//! Project snapshots: the cables, cable types and trays of one project.

use crate::models::cable::{Cable, CableId, CableType, CableTypeId};
use crate::models::tray::{Tray, TrayId};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Immutable view of one project's engineering data.
///
/// The analysis engine only ever reads a snapshot. The editing helpers below
/// are used by the store and the HTTP layer, which save the edited snapshot as
/// a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Project display name
    #[serde(default)]
    pub name: String,
    /// Cable types defined in the project
    #[serde(default)]
    pub cable_types: Vec<CableType>,
    /// Cables in the project
    #[serde(default)]
    pub cables: Vec<Cable>,
    /// Trays in the project
    #[serde(default)]
    pub trays: Vec<Tray>,
}

impl ProjectSnapshot {
    /// Creates an empty project.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Checks identifier and name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns an error if any cable, cable type or tray id repeats, or if two
    /// cable types share a name.
    pub fn validate(&self) -> Result<()> {
        check_unique("cable type id", self.cable_types.iter().map(|t| t.id))?;
        check_unique("cable id", self.cables.iter().map(|c| c.id))?;
        check_unique("tray id", self.trays.iter().map(|t| t.id))?;
        check_unique(
            "cable type name",
            self.cable_types.iter().map(|t| t.name.as_str()),
        )?;

        if let Some(blank) = self.cable_types.iter().find(|t| t.name.trim().is_empty()) {
            anyhow::bail!("Cable type {} has an empty name", blank.id);
        }

        Ok(())
    }

    /// Looks up a cable type by id.
    #[must_use]
    pub fn cable_type(&self, id: CableTypeId) -> Option<&CableType> {
        self.cable_types.iter().find(|t| t.id == id)
    }

    /// Looks up a cable by id.
    #[must_use]
    pub fn cable(&self, id: CableId) -> Option<&Cable> {
        self.cables.iter().find(|c| c.id == id)
    }

    /// Looks up a tray by id.
    #[must_use]
    pub fn tray(&self, id: TrayId) -> Option<&Tray> {
        self.trays.iter().find(|t| t.id == id)
    }

    /// Next free cable type id.
    pub fn next_cable_type_id(&self) -> Result<CableTypeId> {
        next_id("cable type", self.cable_types.iter().map(|t| t.id))
    }

    /// Next free cable id.
    pub fn next_cable_id(&self) -> Result<CableId> {
        next_id("cable", self.cables.iter().map(|c| c.id))
    }

    /// Next free tray id.
    pub fn next_tray_id(&self) -> Result<TrayId> {
        next_id("tray", self.trays.iter().map(|t| t.id))
    }

    /// Adds a cable type.
    pub fn add_cable_type(&mut self, cable_type: CableType) -> Result<()> {
        if self.cable_type(cable_type.id).is_some() {
            anyhow::bail!("Cable type {} already exists", cable_type.id);
        }
        self.ensure_cable_type_name_free(&cable_type.name, None)?;
        self.cable_types.push(cable_type);
        Ok(())
    }

    /// Replaces an existing cable type (matched by id).
    ///
    /// Referencing cables pick up the new values on the next analysis.
    pub fn update_cable_type(&mut self, cable_type: CableType) -> Result<()> {
        self.ensure_cable_type_name_free(&cable_type.name, Some(cable_type.id))?;
        let slot = self
            .cable_types
            .iter_mut()
            .find(|t| t.id == cable_type.id)
            .ok_or_else(|| anyhow::anyhow!("Cable type {} not found", cable_type.id))?;
        *slot = cable_type;
        Ok(())
    }

    /// Removes a cable type that nothing references.
    ///
    /// # Errors
    ///
    /// Returns an error if the type does not exist, or if a cable or a tray's
    /// grounding conductor still references it.
    pub fn remove_cable_type(&mut self, id: CableTypeId) -> Result<CableType> {
        let in_use_by_cables = self.cables.iter().filter(|c| c.cable_type_id == id).count();
        if in_use_by_cables > 0 {
            anyhow::bail!("Cable type {id} is referenced by {in_use_by_cables} cable(s)");
        }
        if let Some(tray) = self
            .trays
            .iter()
            .find(|t| t.grounding_cable_type_id == Some(id))
        {
            anyhow::bail!(
                "Cable type {id} is the grounding cable of tray {} ({})",
                tray.id,
                tray.name
            );
        }

        let index = self
            .cable_types
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("Cable type {id} not found"))?;
        Ok(self.cable_types.remove(index))
    }

    /// Adds a cable.
    pub fn add_cable(&mut self, cable: Cable) -> Result<()> {
        if self.cable(cable.id).is_some() {
            anyhow::bail!("Cable {} already exists", cable.id);
        }
        self.cables.push(cable);
        Ok(())
    }

    /// Replaces an existing cable (matched by id).
    pub fn update_cable(&mut self, cable: Cable) -> Result<()> {
        let slot = self
            .cables
            .iter_mut()
            .find(|c| c.id == cable.id)
            .ok_or_else(|| anyhow::anyhow!("Cable {} not found", cable.id))?;
        *slot = cable;
        Ok(())
    }

    /// Removes a cable.
    pub fn remove_cable(&mut self, id: CableId) -> Result<Cable> {
        let index = self
            .cables
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("Cable {id} not found"))?;
        Ok(self.cables.remove(index))
    }

    /// Adds a tray.
    pub fn add_tray(&mut self, tray: Tray) -> Result<()> {
        if self.tray(tray.id).is_some() {
            anyhow::bail!("Tray {} already exists", tray.id);
        }
        self.trays.push(tray);
        Ok(())
    }

    /// Replaces an existing tray (matched by id).
    pub fn update_tray(&mut self, tray: Tray) -> Result<()> {
        let slot = self
            .trays
            .iter_mut()
            .find(|t| t.id == tray.id)
            .ok_or_else(|| anyhow::anyhow!("Tray {} not found", tray.id))?;
        *slot = tray;
        Ok(())
    }

    /// Removes a tray and detaches the cables that were routed on it.
    ///
    /// Returns the removed tray and the number of detached cables.
    pub fn remove_tray(&mut self, id: TrayId) -> Result<(Tray, usize)> {
        let index = self
            .trays
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("Tray {id} not found"))?;
        let tray = self.trays.remove(index);

        let mut detached = 0;
        for cable in self.cables.iter_mut().filter(|c| c.tray_id == Some(id)) {
            cable.tray_id = None;
            detached += 1;
        }

        Ok((tray, detached))
    }

    fn ensure_cable_type_name_free(&self, name: &str, except: Option<CableTypeId>) -> Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("Cable type name cannot be empty");
        }
        if let Some(existing) = self
            .cable_types
            .iter()
            .find(|t| t.name == name && Some(t.id) != except)
        {
            anyhow::bail!(
                "Cable type name '{name}' is already used by cable type {}",
                existing.id
            );
        }
        Ok(())
    }
}

/// One past the largest id, or 1 when there are none.
fn next_id(what: &str, ids: impl Iterator<Item = u64>) -> Result<u64> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| anyhow::anyhow!("No {what} id left after {max}")),
    }
}

fn check_unique<T>(what: &str, values: impl Iterator<Item = T>) -> Result<()>
where
    T: std::hash::Hash + Eq + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for value in values {
        if seen.contains(&value) {
            anyhow::bail!("Duplicate {what}: {value}");
        }
        seen.insert(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectSnapshot {
        let mut project = ProjectSnapshot::new("Substation");
        project.cable_types.push(CableType::new(1, "NYY 4x16").with_weight_kg_per_m(0.9));
        project.cable_types.push(CableType::new(2, "Earth 70").with_weight_kg_per_m(0.6));
        project.trays.push(Tray::new(1, "T-01", "Ladder").with_grounding_cable(2));
        project.cables.push(Cable::new(1, "P-1", 1).on_tray(1));
        project
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let mut project = sample();
        project.cables.push(Cable::new(1, "P-1b", 1));
        let err = project.validate().unwrap_err();
        assert!(err.to_string().contains("cable id"));
    }

    #[test]
    fn test_validate_duplicate_type_names() {
        let mut project = sample();
        project.cable_types.push(CableType::new(3, "NYY 4x16"));
        let err = project.validate().unwrap_err();
        assert!(err.to_string().contains("cable type name"));
    }

    #[test]
    fn test_next_ids() {
        let project = sample();
        assert_eq!(project.next_cable_type_id().unwrap(), 3);
        assert_eq!(project.next_cable_id().unwrap(), 2);
        assert_eq!(project.next_tray_id().unwrap(), 2);
        assert_eq!(ProjectSnapshot::default().next_tray_id().unwrap(), 1);
    }

    #[test]
    fn test_next_id_exhausted() {
        let mut project = sample();
        project.trays.push(Tray::new(u64::MAX, "T-max", "Ladder"));
        let err = project.next_tray_id().unwrap_err();
        assert!(err.to_string().contains("No tray id left"));
        assert_eq!(project.next_cable_id().unwrap(), 2);
    }

    #[test]
    fn test_add_cable_type_name_conflict() {
        let mut project = sample();
        assert!(project.add_cable_type(CableType::new(3, "NYY 4x16")).is_err());
        assert!(project.add_cable_type(CableType::new(3, "NYY 4x25")).is_ok());
    }

    #[test]
    fn test_update_cable_type_keeps_own_name() {
        let mut project = sample();
        let edited = CableType::new(1, "NYY 4x16").with_weight_kg_per_m(1.1);
        project.update_cable_type(edited).unwrap();
        assert_eq!(project.cable_type(1).unwrap().unit_weight(), 1.1);
    }

    #[test]
    fn test_remove_cable_type_in_use() {
        let mut project = sample();
        assert!(project.remove_cable_type(1).is_err());
        assert!(project.remove_cable_type(2).is_err());

        project.remove_cable(1).unwrap();
        assert!(project.remove_cable_type(1).is_ok());
    }

    #[test]
    fn test_remove_tray_detaches_cables() {
        let mut project = sample();
        let (tray, detached) = project.remove_tray(1).unwrap();
        assert_eq!(tray.name, "T-01");
        assert_eq!(detached, 1);
        assert!(project.cable(1).unwrap().tray_id.is_none());
    }

    #[test]
    fn test_missing_records() {
        let mut project = sample();
        assert!(project.update_cable(Cable::new(99, "X", 1)).is_err());
        assert!(project.update_tray(Tray::new(99, "X", "Ladder")).is_err());
        assert!(project.remove_cable(99).is_err());
        assert!(project.remove_tray(99).is_err());
    }
}
