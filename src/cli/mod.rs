//! CLI command handlers for CableTray.
//!
//! This module provides headless, scriptable access to project analysis and
//! override management for automation, testing, and CI/CD integration.

pub mod analyze;
pub mod check;
pub mod common;
pub mod config;
pub mod overrides;
pub mod weights;

// Re-export types used by main.rs and tests
pub use analyze::AnalyzeArgs;
pub use check::CheckArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use overrides::OverrideArgs;
pub use weights::WeightsArgs;
