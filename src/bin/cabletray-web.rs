//! CableTray Web Server Binary
//!
//! This binary starts the CableTray web server that provides a REST API
//! for the web-based project editor.
//!
//! # Usage
//!
//! ```bash
//! # Start with settings from the config file (port 3010 by default)
//! cabletray-web
//!
//! # Specify port and workspace
//! cabletray-web --port 8080 --workspace ~/projects
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cabletray::config::Config;
use cabletray::web;

/// CableTray Web Server - REST API for the project editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to the configured port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (defaults to the configured host)
    #[arg(long)]
    host: Option<String>,

    /// Workspace directory containing project files.
    /// Defaults to the configured workspace, else the platform projects directory:
    /// - Linux: ~/.config/cabletray/projects/
    /// - macOS: ~/Library/Application Support/cabletray/projects/
    /// - Windows: %APPDATA%\cabletray\projects\
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_default();

    let workspace_root = match args.workspace {
        Some(path) => path,
        None => config.workspace_dir()?,
    };
    std::fs::create_dir_all(&workspace_root).with_context(|| {
        format!(
            "Failed to create workspace directory: {}",
            workspace_root.display()
        )
    })?;

    info!("Workspace root: {}", workspace_root.display());

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    web::run_server(workspace_root, addr).await
}
