//! Physicsim prelude module
//!
//! Re-exports the types most plugins and systems need, to cut down on
//! import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Math
pub use crate::physics::math::{Scalar, Vector};

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Resources
pub use crate::resources::{ExportPath, RotateLock, RunLimit, SharedRng};

// Internal re-exports - Events
pub use crate::events::SimulationCommand;

// Internal re-exports - Simulations
pub use crate::simulations::{Simulation, SimulationKind, SimulationRunner, SimulationState};
