//! Check command: reports what blocks a clean analysis.

use crate::cli::common::{load_overrides_for, load_project, print_json, CliError, CliResult};
use crate::services::analyze_project;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Report unresolved references and tray types needing an override
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Path to project JSON file
    #[arg(short, long, value_name = "FILE")]
    pub project: PathBuf,

    /// Path to overrides JSON file (defaults to <project>.overrides.json)
    #[arg(short, long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Exit non-zero when anything is reported
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for the check command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckResponse {
    clean: bool,
    pending_types: Vec<PendingType>,
    unresolved: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingType {
    type_name: String,
    widths_mm: Vec<f64>,
}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self) -> CliResult<()> {
        let project = load_project(&self.project)?;
        let overrides = load_overrides_for(&self.project, self.overrides.as_deref())?;
        let analysis = analyze_project(&project, &overrides);

        let response = CheckResponse {
            clean: analysis.is_clean(),
            pending_types: analysis
                .pending_types()
                .map(|t| PendingType {
                    type_name: t.type_name.to_string(),
                    widths_mm: t.widths_mm.iter().map(|w| w.value()).collect(),
                })
                .collect(),
            unresolved: analysis.unresolved.iter().map(ToString::to_string).collect(),
        };

        if self.json {
            print_json(&response)?;
        } else if response.clean {
            println!("✓ No issues found");
        } else {
            for pending in &response.pending_types {
                let widths: Vec<String> =
                    pending.widths_mm.iter().map(ToString::to_string).collect();
                println!(
                    "  ⚠ Tray type '{}' has multiple widths ({}) and no support spacing override",
                    pending.type_name,
                    widths.join(", ")
                );
            }
            for reference in &response.unresolved {
                println!("  ⚠ {reference}");
            }
        }

        if self.strict && !response.clean {
            return Err(CliError::validation("Issues found in strict mode"));
        }

        Ok(())
    }
}
