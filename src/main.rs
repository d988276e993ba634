//! CableTray - cable and tray data management
//!
//! Command-line access to project analysis: tray-type width reconciliation,
//! cable weight per tray, and support-spacing resolution against per-project
//! overrides.

use cabletray::cli::{
    AnalyzeArgs, CheckArgs, CliError, ConfigArgs, ExitCode, OverrideArgs, WeightsArgs,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CableTray - tray loading and support-spacing resolution
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve tray types, support spacing and weights for a project
    Analyze(AnalyzeArgs),
    /// Show cable weight per tray
    Weights(WeightsArgs),
    /// Report unresolved references and tray types needing an override
    Check(CheckArgs),
    /// Manage support-spacing overrides
    Override(OverrideArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    // Only warnings by default so stdout stays clean for --json consumers
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: &Command) -> Result<(), CliError> {
    match command {
        Command::Analyze(args) => args.execute(),
        Command::Weights(args) => args.execute(),
        Command::Check(args) => args.execute(),
        Command::Override(args) => args.execute(),
        Command::Config(args) => args.execute(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(e.code.code());
    }

    std::process::exit(ExitCode::Success.code());
}
