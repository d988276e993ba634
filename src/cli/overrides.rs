//! Support-spacing override management commands.

use crate::cli::common::{fmt_measure, print_json, CliError, CliResult};
use crate::models::{OverrideMap, TrayTypeName};
use crate::services::ProjectService;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Manage support-spacing overrides
#[derive(Args, Debug)]
pub struct OverrideArgs {
    #[command(subcommand)]
    command: OverrideCommand,
}

#[derive(Subcommand, Debug)]
enum OverrideCommand {
    /// List overrides
    List(OverrideListArgs),
    /// Set the support spacing for a tray type
    Set(OverrideSetArgs),
    /// Remove the override for a tray type
    Remove(OverrideRemoveArgs),
}

/// List overrides
#[derive(Args, Debug)]
pub struct OverrideListArgs {
    /// Path to overrides JSON file
    #[arg(short, long, value_name = "FILE")]
    overrides: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set the support spacing for a tray type
#[derive(Args, Debug)]
pub struct OverrideSetArgs {
    /// Path to overrides JSON file (created if missing)
    #[arg(short, long, value_name = "FILE")]
    overrides: PathBuf,

    /// Tray type name (matched exactly, case-sensitive)
    #[arg(short = 't', long = "type", value_name = "NAME")]
    type_name: String,

    /// Support spacing
    #[arg(short, long, value_name = "DISTANCE", allow_negative_numbers = true)]
    spacing: f64,
}

/// Remove the override for a tray type
#[derive(Args, Debug)]
pub struct OverrideRemoveArgs {
    /// Path to overrides JSON file
    #[arg(short, long, value_name = "FILE")]
    overrides: PathBuf,

    /// Tray type name (matched exactly, case-sensitive)
    #[arg(short = 't', long = "type", value_name = "NAME")]
    type_name: String,
}

impl OverrideArgs {
    /// Execute override subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            OverrideCommand::List(args) => args.execute(),
            OverrideCommand::Set(args) => args.execute(),
            OverrideCommand::Remove(args) => args.execute(),
        }
    }
}

fn load(path: &Path) -> CliResult<OverrideMap> {
    ProjectService::load_overrides(path)
        .map_err(|e| CliError::io(format!("Failed to load overrides: {e:#}")))
}

fn save(overrides: &OverrideMap, path: &Path) -> CliResult<()> {
    ProjectService::save_overrides(overrides, path)
        .map_err(|e| CliError::io(format!("Failed to save overrides: {e:#}")))
}

impl OverrideListArgs {
    /// Execute list command
    pub fn execute(&self) -> CliResult<()> {
        let overrides = load(&self.overrides)?;

        if self.json {
            return print_json(&overrides);
        }

        if overrides.is_empty() {
            println!("No overrides.");
            return Ok(());
        }

        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort_by(|a, b| a.0.display_cmp(b.0));
        for (type_name, spacing) in entries {
            println!("{:<24} {}", type_name.as_str(), fmt_measure(Some(spacing)));
        }
        Ok(())
    }
}

impl OverrideSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        let mut overrides = load(&self.overrides)?;
        let previous = overrides
            .set(&self.type_name, self.spacing)
            .map_err(|e| CliError::validation(e.to_string()))?;
        save(&overrides, &self.overrides)?;

        let name = TrayTypeName::parse(&self.type_name)
            .map_or_else(|| self.type_name.clone(), |n| n.to_string());
        match previous {
            Some(old) => println!("Updated '{name}': {old} → {}", self.spacing),
            None => println!("Set '{name}': {}", self.spacing),
        }
        Ok(())
    }
}

impl OverrideRemoveArgs {
    /// Execute remove command
    pub fn execute(&self) -> CliResult<()> {
        let mut overrides = load(&self.overrides)?;
        if overrides.remove(&self.type_name).is_none() {
            return Err(CliError::validation(format!(
                "No override for tray type '{}'",
                self.type_name
            )));
        }
        save(&overrides, &self.overrides)?;
        println!("Removed override for '{}'", self.type_name.trim());
        Ok(())
    }
}
