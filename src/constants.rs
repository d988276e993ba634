//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and configuration locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "CableTray";

/// Directory name under the platform config dir.
pub const APP_CONFIG_DIR_NAME: &str = "cabletray";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "CABLETRAY_CONFIG_DIR";
