//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::constants::APP_NAME;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Workspace directory holding project files
    #[arg(long, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Web server port
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Decimal places for weights in text output (0-6)
    #[arg(long, value_name = "N")]
    weight_decimals: Option<u8>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: String,
    workspace: String,
    host: String,
    port: u16,
    weight_decimals: u8,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;
        let output = ConfigOutput {
            config_file: Config::config_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            workspace: config
                .workspace_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            host: config.server.host.clone(),
            port: config.server.port,
            weight_decimals: config.display.weight_decimals,
        };

        if self.json {
            let json = serde_json::to_string_pretty(&output).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            let title = format!("{APP_NAME} Configuration");
            println!("{title}");
            println!("{}", "=".repeat(title.len()));
            println!();
            println!("Config file:     {}", output.config_file);
            println!("Workspace:       {}", output.workspace);
            println!("Server:          {}:{}", output.host, output.port);
            println!("Weight decimals: {}", output.weight_decimals);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.workspace.is_none() && self.port.is_none() && self.weight_decimals.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --workspace, --port, or --weight-decimals",
            ));
        }

        let mut config = Config::load().unwrap_or_default();

        if let Some(path) = &self.workspace {
            std::fs::create_dir_all(path).map_err(|e| {
                CliError::io(format!(
                    "Failed to create workspace directory {}: {e}",
                    path.display()
                ))
            })?;
            config
                .set_workspace(path.clone())
                .map_err(|e| CliError::validation(e.to_string()))?;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(decimals) = self.weight_decimals {
            config.display.weight_decimals = decimals;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(e.to_string()))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }
}
