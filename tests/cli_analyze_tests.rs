//! End-to-end tests for `cabletray analyze` and `cabletray weights`.

use serde_json::Value;
use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

fn run(args: &[&str]) -> std::process::Output {
    let config_dir = TempDir::new().expect("Failed to create config dir");
    isolated_command(args, config_dir.path())
        .output()
        .expect("Failed to execute command")
}

// ============================================================================
// Analyze Command Tests
// ============================================================================

#[test]
fn test_analyze_json_without_overrides() {
    let (path, _workspace) = write_workspace("plant", &sample_project(), None);

    let output = run(&["analyze", "--project", path.to_str().unwrap(), "--json"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result: Value = serde_json::from_slice(&output.stdout).expect("Should parse JSON");
    let types = result["types"].as_array().unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0]["typeName"], "Ladder");
    assert_eq!(types[0]["needsManualResolution"], true);
    assert_eq!(types[1]["typeName"], "Mesh");
    assert_eq!(types[1]["widthMm"], 200.0);
    assert!(result["unresolved"].as_array().unwrap().is_empty());
}

#[test]
fn test_analyze_picks_up_sibling_overrides() {
    let (path, _workspace) =
        write_workspace("plant", &sample_project(), Some(&ladder_override()));

    let output = run(&["analyze", "-p", path.to_str().unwrap(), "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["types"][0]["needsManualResolution"], false);
    assert_eq!(result["types"][0]["effectiveSupportSpacing"], 1500.0);
    assert_eq!(result["types"][0]["spacingSource"], "override");
}

#[test]
fn test_analyze_explicit_overrides_file() {
    let (path, workspace) = write_workspace("plant", &sample_project(), None);
    let overrides = workspace.path().join("alt.json");
    fs::write(&overrides, r#"{ "Ladder": 900, "Fiber": 1200 }"#).unwrap();

    let output = run(&[
        "analyze",
        "-p",
        path.to_str().unwrap(),
        "-o",
        overrides.to_str().unwrap(),
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = result["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["typeName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Fiber", "Ladder", "Mesh"]);
    assert_eq!(result["types"][0]["trayCount"], 0);
    assert_eq!(result["types"][1]["effectiveSupportSpacing"], 900.0);
}

#[test]
fn test_analyze_text_output() {
    let (path, _workspace) = write_workspace("plant", &sample_project(), None);

    let output = run(&["analyze", "-p", path.to_str().unwrap(), "--trays"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Project: Sample Plant"));
    assert!(stdout.contains("needs override (widths: 300, 450)"));
    assert!(stdout.contains("T-200"), "Tray table should be listed");
    assert!(stdout.contains("2.25"), "Weights use two decimals by default");
}

#[test]
fn test_analyze_missing_project_is_io_error() {
    let workspace = TempDir::new().unwrap();
    let missing = workspace.path().join("nope.json");

    let output = run(&["analyze", "-p", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load project"));
}

#[test]
fn test_analyze_invalid_json_is_io_error() {
    let workspace = TempDir::new().unwrap();
    let path = workspace.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let output = run(&["analyze", "-p", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// Weights Command Tests
// ============================================================================

#[test]
fn test_weights_json() {
    let (path, _workspace) = write_workspace("plant", &sample_project(), None);

    let output = run(&["weights", "-p", path.to_str().unwrap(), "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    let trays = result["trays"].as_array().unwrap();
    assert_eq!(trays.len(), 3);
    assert_eq!(trays[0]["trayId"], 1);
    assert_eq!(trays[0]["totalWeightKg"], 6.0);
    assert_eq!(trays[1]["cableCount"], 0);
    assert_eq!(trays[1]["totalWeightKg"], 0.0);
    assert_eq!(trays[2]["loadKgPerM"], 0.75);
}

#[test]
fn test_weights_reports_unresolved() {
    let mut project = sample_project();
    project
        .cables
        .push(cabletray::models::Cable::new(9, "X-9", 42).on_tray(1));
    let (path, _workspace) = write_workspace("plant", &project, None);

    let output = run(&["weights", "-p", path.to_str().unwrap(), "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    let unresolved = result["unresolved"].as_array().unwrap();
    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0]
        .as_str()
        .unwrap()
        .contains("unknown cable type 42"));
}

#[test]
fn test_weights_respects_configured_decimals() {
    let (path, _workspace) = write_workspace("plant", &sample_project(), None);
    let config_dir = TempDir::new().unwrap();

    let set = isolated_command(&["config", "set", "--weight-decimals", "0"], config_dir.path())
        .output()
        .unwrap();
    assert_eq!(set.status.code(), Some(0));

    let output = isolated_command(&["weights", "-p", path.to_str().unwrap()], config_dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("T-100"));
    assert!(!stdout.contains("6.00"));
}
