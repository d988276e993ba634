//! Shared CLI plumbing: exit codes, errors and output helpers.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::{Measurement, OverrideMap, ProjectSnapshot};
use crate::services::projects::OVERRIDES_SUFFIX;
use crate::services::ProjectService;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was readable but failed validation or checks
    ValidationFailed = 1,
    /// A file could not be read, parsed or written
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit status.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code to terminate with
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Creates an I/O error (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Creates a validation error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationFailed,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{out}");
    Ok(())
}

/// Loads a project snapshot, mapping failures to an I/O error.
pub fn load_project(path: &Path) -> CliResult<ProjectSnapshot> {
    ProjectService::load(path).map_err(|e| CliError::io(format!("Failed to load project: {e:#}")))
}

/// Loads the override map given explicitly, or the one next to the project.
///
/// `plant.json` pairs with `plant.overrides.json`. A missing file is empty.
pub fn load_overrides_for(project: &Path, explicit: Option<&Path>) -> CliResult<OverrideMap> {
    let path = explicit.map_or_else(|| sibling_overrides_path(project), Path::to_path_buf);
    ProjectService::load_overrides(&path)
        .map_err(|e| CliError::io(format!("Failed to load overrides: {e:#}")))
}

/// Override file that sits next to a project file.
#[must_use]
pub fn sibling_overrides_path(project: &Path) -> PathBuf {
    let stem = project
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    project.with_file_name(format!("{stem}{OVERRIDES_SUFFIX}"))
}

/// Formats an optional measurement, `-` when absent.
#[must_use]
pub fn fmt_measure(value: Option<Measurement>) -> String {
    value.map_or_else(|| "-".to_string(), |m| m.to_string())
}

/// Formats a weight with the configured number of decimals.
#[must_use]
pub fn fmt_weight(value: f64, decimals: u8) -> String {
    format!("{value:.prec$}", prec = usize::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::validation("x").code.code(), 1);
        assert_eq!(CliError::io("x").code.code(), 2);
    }

    #[test]
    fn test_sibling_overrides_path() {
        assert_eq!(
            sibling_overrides_path(Path::new("/data/plant.json")),
            PathBuf::from("/data/plant.overrides.json")
        );
        assert_eq!(
            sibling_overrides_path(Path::new("plant")),
            PathBuf::from("plant.overrides.json")
        );
    }

    #[test]
    fn test_formatting() {
        assert_eq!(fmt_measure(None), "-");
        assert_eq!(fmt_measure(Measurement::new(300.0)), "300");
        assert_eq!(fmt_weight(12.3456, 2), "12.35");
        assert_eq!(fmt_weight(0.0, 0), "0");
    }
}
