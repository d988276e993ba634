//! CableTray Library
//!
//! This library provides the data model for cable/tray design projects and the
//! tray loading engine: grouping trays by type, reconciling widths, summing
//! cable weight per tray and resolving support spacing against per-project
//! overrides.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
#[cfg(feature = "web")]
pub mod web;
