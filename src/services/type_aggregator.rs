//! Groups trays by their declared type name.
//!
//! Tray types are free-text labels, so trays that share a label may disagree on
//! width. This module collects the distinct widths per label and flags the
//! groups where they disagree.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{Measurement, Tray, TrayId, TrayTypeName};

/// All trays sharing one type label, plus override-only labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayTypeGroup {
    /// The shared type label
    pub type_name: TrayTypeName,
    /// Distinct widths in first-seen order
    pub widths: Vec<Measurement>,
    /// True iff two or more distinct widths were observed
    pub has_multiple_widths: bool,
    /// The single width when unambiguous, else `None`
    pub width_mm: Option<Measurement>,
    /// Trays of this type in input order
    pub tray_ids: Vec<TrayId>,
}

impl TrayTypeGroup {
    fn new(type_name: TrayTypeName) -> Self {
        Self {
            type_name,
            widths: Vec::new(),
            has_multiple_widths: false,
            width_mm: None,
            tray_ids: Vec::new(),
        }
    }

    /// Number of trays declaring this type. Zero for override-only types.
    #[must_use]
    pub fn tray_count(&self) -> usize {
        self.tray_ids.len()
    }

    fn observe_width(&mut self, width: Measurement) {
        if !self.widths.iter().any(|w| w.same_value(width)) {
            self.widths.push(width);
        }
    }

    fn finish(&mut self) {
        self.has_multiple_widths = self.widths.len() > 1;
        self.width_mm = match self.widths.as_slice() {
            [single] => Some(*single),
            _ => None,
        };
    }
}

/// Builds one group per distinct type name found on trays or override keys.
///
/// - Trays with a blank type belong to no group.
/// - Trays without a width still count towards the group but add no width.
/// - Widths compare by exact stored value; `300.0` and `300.0000001` differ.
/// - Groups are ordered case-insensitively by name. Names that compare equal
///   keep their first-seen order, trays before override keys.
///
/// # Examples
///
/// ```
/// use cabletray::models::{Tray, TrayTypeName};
/// use cabletray::services::type_aggregator::aggregate_types;
///
/// let trays = vec![
///     Tray::new(1, "T-1", "Power").with_width_mm(300.0),
///     Tray::new(2, "T-2", "control").with_width_mm(150.0),
/// ];
/// let fiber = TrayTypeName::parse("Fiber").unwrap();
/// let groups = aggregate_types(&trays, [&fiber]);
///
/// let names: Vec<&str> = groups.iter().map(|g| g.type_name.as_str()).collect();
/// assert_eq!(names, vec!["control", "Fiber", "Power"]);
/// assert_eq!(groups[1].tray_count(), 0);
/// ```
pub fn aggregate_types<'a, I>(trays: &[Tray], override_keys: I) -> Vec<TrayTypeGroup>
where
    I: IntoIterator<Item = &'a TrayTypeName>,
{
    let mut groups: Vec<TrayTypeGroup> = Vec::new();
    let mut index: HashMap<TrayTypeName, usize> = HashMap::new();

    let mut group_for = |name: &TrayTypeName, groups: &mut Vec<TrayTypeGroup>| -> usize {
        *index.entry(name.clone()).or_insert_with(|| {
            groups.push(TrayTypeGroup::new(name.clone()));
            groups.len() - 1
        })
    };

    for tray in trays {
        let Some(type_name) = &tray.type_name else {
            continue;
        };
        let slot = group_for(type_name, &mut groups);
        let group = &mut groups[slot];
        group.tray_ids.push(tray.id);
        if let Some(width) = tray.width_mm {
            group.observe_width(width);
        }
    }

    for key in override_keys {
        group_for(key, &mut groups);
    }

    for group in &mut groups {
        group.finish();
    }

    // sort_by is stable, so case-only ties keep first-seen order
    groups.sort_by(|a, b| a.type_name.display_cmp(&b.type_name));

    debug!(
        trays = trays.len(),
        groups = groups.len(),
        ambiguous = groups.iter().filter(|g| g.has_multiple_widths).count(),
        "Aggregated tray types"
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_OVERRIDES: &[TrayTypeName] = &[];

    fn names(groups: &[TrayTypeGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.type_name.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_types(&[], NO_OVERRIDES).is_empty());
    }

    #[test]
    fn test_case_insensitive_ordering() {
        let trays = vec![
            Tray::new(1, "T-1", "Power"),
            Tray::new(2, "T-2", "control"),
            Tray::new(3, "T-3", "INSTRUMENT"),
        ];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert_eq!(names(&groups), vec!["control", "INSTRUMENT", "Power"]);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let trays = vec![
            Tray::new(1, "T-1", "Zebra"),
            Tray::new(2, "T-2", "Éclairage"),
            Tray::new(3, "T-3", "Fiber"),
            Tray::new(4, "T-4", "ábaco"),
        ];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert_eq!(names(&groups), vec!["ábaco", "Éclairage", "Fiber", "Zebra"]);
    }

    #[test]
    fn test_case_variants_stay_separate_and_stable() {
        let trays = vec![
            Tray::new(1, "T-1", "power"),
            Tray::new(2, "T-2", "Power"),
            Tray::new(3, "T-3", "power"),
        ];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert_eq!(names(&groups), vec!["power", "Power"]);
        assert_eq!(groups[0].tray_ids, vec![1, 3]);
        assert_eq!(groups[1].tray_ids, vec![2]);
    }

    #[test]
    fn test_single_width_resolves() {
        let trays = vec![
            Tray::new(1, "T-1", "Ladder").with_width_mm(300.0),
            Tray::new(2, "T-2", "Ladder").with_width_mm(300.0),
            Tray::new(3, "T-3", "Ladder"),
        ];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].width_mm.map(Measurement::value), Some(300.0));
        assert!(!groups[0].has_multiple_widths);
        assert_eq!(groups[0].tray_count(), 3);
    }

    #[test]
    fn test_multiple_widths_flagged() {
        let trays = vec![
            Tray::new(1, "T-1", "A").with_width_mm(300.0),
            Tray::new(2, "T-2", "A").with_width_mm(450.0),
        ];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert!(groups[0].has_multiple_widths);
        assert!(groups[0].width_mm.is_none());
        assert_eq!(groups[0].widths.len(), 2);
    }

    #[test]
    fn test_near_equal_widths_are_distinct() {
        let trays = vec![
            Tray::new(1, "T-1", "A").with_width_mm(300.0),
            Tray::new(2, "T-2", "A").with_width_mm(300.000_000_1),
        ];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert!(groups[0].has_multiple_widths);
    }

    #[test]
    fn test_no_widths_is_null_not_ambiguous() {
        let trays = vec![Tray::new(1, "T-1", "A"), Tray::new(2, "T-2", "A")];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert!(groups[0].width_mm.is_none());
        assert!(!groups[0].has_multiple_widths);
    }

    #[test]
    fn test_override_only_type_surfaces() {
        let trays = vec![Tray::new(1, "T-1", "Ladder")];
        let fiber = TrayTypeName::parse("Fiber").unwrap();
        let ladder = TrayTypeName::parse("Ladder").unwrap();
        let groups = aggregate_types(&trays, [&fiber, &ladder]);
        assert_eq!(names(&groups), vec!["Fiber", "Ladder"]);
        assert_eq!(groups[0].tray_count(), 0);
        assert_eq!(groups[1].tray_count(), 1);
    }

    #[test]
    fn test_untyped_trays_are_skipped() {
        let trays = vec![Tray::new(1, "T-1", "  "), Tray::new(2, "T-2", "Wire")];
        let groups = aggregate_types(&trays, NO_OVERRIDES);
        assert_eq!(names(&groups), vec!["Wire"]);
    }
}
