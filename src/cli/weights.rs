//! Weights command: cable load per tray.

use crate::cli::common::{fmt_weight, load_project, print_json, CliResult};
use crate::config::Config;
use crate::models::TrayId;
use crate::services::weights::resolve_weights;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show cable weight per tray
#[derive(Debug, Clone, Args)]
pub struct WeightsArgs {
    /// Path to project JSON file
    #[arg(short, long, value_name = "FILE")]
    pub project: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON row for one tray
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrayWeightRow {
    tray_id: TrayId,
    name: String,
    total_weight_kg: f64,
    cable_count: usize,
    load_kg_per_m: f64,
}

/// JSON response for the weights command
#[derive(Debug, Serialize)]
struct WeightsResponse {
    trays: Vec<TrayWeightRow>,
    unresolved: Vec<String>,
}

impl WeightsArgs {
    /// Execute the weights command
    pub fn execute(&self) -> CliResult<()> {
        let project = load_project(&self.project)?;
        let report = resolve_weights(&project.cables, &project.cable_types, &project.trays);

        let rows: Vec<TrayWeightRow> = project
            .trays
            .iter()
            .map(|tray| {
                let weight = report.tray(tray.id).copied().unwrap_or_default();
                TrayWeightRow {
                    tray_id: tray.id,
                    name: tray.name.clone(),
                    total_weight_kg: weight.total_weight_kg,
                    cable_count: weight.cable_count,
                    load_kg_per_m: weight.load_kg_per_m,
                }
            })
            .collect();

        if self.json {
            return print_json(&WeightsResponse {
                trays: rows,
                unresolved: report.unresolved.iter().map(ToString::to_string).collect(),
            });
        }

        let decimals = Config::load().unwrap_or_default().display.weight_decimals;
        if rows.is_empty() {
            println!("No trays.");
        }
        for row in &rows {
            println!(
                "{:<16} {:>4} cables  {:>12} kg  {:>10} kg/m",
                row.name,
                row.cable_count,
                fmt_weight(row.total_weight_kg, decimals),
                fmt_weight(row.load_kg_per_m, decimals)
            );
        }
        for reference in &report.unresolved {
            println!("  ⚠ {reference}");
        }

        Ok(())
    }
}
