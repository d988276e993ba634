//! Analyze command: the tray-type table for a project.

use crate::cli::common::{
    fmt_measure, fmt_weight, load_overrides_for, load_project, print_json, CliResult,
};
use crate::config::Config;
use crate::services::analyze_project;
use crate::services::support_spacing::SpacingSource;
use clap::Args;
use std::path::PathBuf;

/// Resolve tray types, support spacing and weights for a project
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Path to project JSON file
    #[arg(short, long, value_name = "FILE")]
    pub project: PathBuf,

    /// Path to overrides JSON file (defaults to <project>.overrides.json)
    #[arg(short, long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Also list per-tray loads
    #[arg(long)]
    pub trays: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    /// Execute the analyze command
    pub fn execute(&self) -> CliResult<()> {
        let project = load_project(&self.project)?;
        let overrides = load_overrides_for(&self.project, self.overrides.as_deref())?;
        let analysis = analyze_project(&project, &overrides);

        if self.json {
            return print_json(&analysis);
        }

        let decimals = Config::load().unwrap_or_default().display.weight_decimals;

        println!("Project: {}", project.name);
        println!();
        if analysis.types.is_empty() {
            println!("No tray types.");
        } else {
            println!(
                "{:<24} {:>10} {:>12} {:>6} {:>14}  {}",
                "Type", "Width mm", "Spacing", "Trays", "Weight kg", "Status"
            );
            for row in &analysis.types {
                let width = if row.has_multiple_widths {
                    "multiple".to_string()
                } else {
                    fmt_measure(row.width_mm)
                };
                let status = if row.needs_manual_resolution {
                    let widths: Vec<String> =
                        row.widths_mm.iter().map(ToString::to_string).collect();
                    format!("⚠ needs override (widths: {})", widths.join(", "))
                } else if row.spacing_source == SpacingSource::Override {
                    "override".to_string()
                } else {
                    String::new()
                };
                println!(
                    "{:<24} {:>10} {:>12} {:>6} {:>14}  {}",
                    row.type_name.as_str(),
                    width,
                    fmt_measure(row.effective_support_spacing),
                    row.tray_count,
                    fmt_weight(row.total_weight_kg, decimals),
                    status
                );
            }
        }

        if self.trays && !analysis.trays.is_empty() {
            println!();
            println!(
                "{:<16} {:<24} {:>7} {:>14} {:>12}",
                "Tray", "Type", "Cables", "Weight kg", "kg/m"
            );
            for tray in &analysis.trays {
                println!(
                    "{:<16} {:<24} {:>7} {:>14} {:>12}",
                    tray.name,
                    tray.type_name.as_ref().map_or("-", |t| t.as_str()),
                    tray.cable_count,
                    fmt_weight(tray.total_weight_kg, decimals),
                    fmt_weight(tray.load_kg_per_m, decimals)
                );
            }
        }

        if !analysis.unresolved.is_empty() {
            println!();
            println!("Unresolved references:");
            for reference in &analysis.unresolved {
                println!("  ⚠ {reference}");
            }
        }

        Ok(())
    }
}
