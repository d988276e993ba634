//! Data models for cables, cable types, trays and overrides.
//!
//! This module contains the value types exchanged between the project store,
//! the analysis engine and the presentation surfaces. Models carry no I/O and
//! normalize invalid measurements on the way in.

pub mod cable;
pub mod measurement;
pub mod overrides;
pub mod project;
pub mod tray;
pub mod tray_type;

// Re-export all model types
pub use cable::{Cable, CableId, CableType, CableTypeId};
pub use measurement::Measurement;
pub use overrides::OverrideMap;
pub use project::ProjectSnapshot;
pub use tray::{Tray, TrayId};
pub use tray_type::TrayTypeName;
