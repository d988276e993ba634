//! Service layer for business logic.
//!
//! The analysis services (`type_aggregator`, `weights`, `support_spacing`,
//! `projection`, `analysis`) are pure functions over in-memory snapshots. The
//! `projects` service owns all file I/O for snapshots and override maps.

pub mod analysis;
pub mod projection;
pub mod projects;
pub mod support_spacing;
pub mod type_aggregator;
pub mod weights;

// Re-export commonly used types and functions
pub use analysis::{analyze_project, ProjectAnalysis};
pub use projects::{EditError, ProjectService, ProjectStore};
