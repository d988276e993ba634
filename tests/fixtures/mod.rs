//! Shared test fixtures for engine, CLI and web API tests.
#![allow(dead_code)] // Each test binary uses a different subset

use cabletray::models::{Cable, CableType, OverrideMap, ProjectSnapshot, Tray};
use cabletray::services::ProjectStore;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Creates a small plant with one ambiguous tray type.
///
/// - `Ladder` trays come in 300 and 450 mm, so the type needs an override.
/// - `Mesh` has a single 200 mm tray that carries a grounding conductor.
/// - Cable 3 is not routed on any tray.
///
/// Unit weights are binary-exact so sums can be compared with `==`.
pub fn sample_project() -> ProjectSnapshot {
    let mut project = ProjectSnapshot::new("Sample Plant");
    project.cable_types = vec![
        CableType::new(1, "NYY 3x2.5")
            .with_purpose("Power")
            .with_diameter_mm(12.0)
            .with_weight_kg_per_m(0.5),
        CableType::new(2, "H07V-K 16").with_weight_kg_per_m(0.25),
    ];
    project.trays = vec![
        Tray::new(1, "T-100", "Ladder").with_width_mm(300.0),
        Tray::new(2, "T-101", "Ladder").with_width_mm(450.0),
        Tray::new(3, "T-200", "Mesh")
            .with_width_mm(200.0)
            .with_grounding_cable(2),
    ];
    project.cables = vec![
        Cable::new(1, "P-001", 1)
            .on_tray(1)
            .with_design_length(10.0)
            .with_install_length(12.0),
        Cable::new(2, "P-002", 1).on_tray(3).with_design_length(4.0),
        Cable::new(3, "P-003", 1).with_design_length(30.0),
    ];
    project
}

/// An override map that resolves the `Ladder` type of [`sample_project`].
pub fn ladder_override() -> OverrideMap {
    let mut overrides = OverrideMap::new();
    overrides
        .set("Ladder", 1500.0)
        .expect("valid override");
    overrides
}

/// Writes a project (and optional overrides) into a fresh temp workspace.
///
/// Returns the snapshot path and the workspace guard.
pub fn write_workspace(
    key: &str,
    project: &ProjectSnapshot,
    overrides: Option<&OverrideMap>,
) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = ProjectStore::new(temp_dir.path());
    store.save(key, project).expect("Failed to write project");
    if let Some(overrides) = overrides {
        store
            .save_overrides(key, overrides)
            .expect("Failed to write overrides");
    }
    let path = store.project_path(key).expect("valid key");
    (path, temp_dir)
}

/// Path to the cabletray binary
pub fn cabletray_bin() -> String {
    std::env::var("CARGO_BIN_EXE_cabletray")
        .unwrap_or_else(|_| "target/debug/cabletray".to_string())
}

/// Creates a Command whose configuration lives in `config_dir`.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(cabletray_bin());
    cmd.env("CABLETRAY_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}
