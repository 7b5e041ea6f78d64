//! Input events delivered to the running simulation
//!
//! Pointer, keyboard and page-visibility changes reach the simulation only
//! through these events. Nothing observes ambient window state directly.

use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCommand {
    /// Re-initialise from the current configuration
    Restart,
    TogglePause,
    SetPaused(bool),
    /// The host window or page was hidden or shown again
    VisibilityChanged { hidden: bool },
    /// The pointer entered or left a control panel, locking camera rotation
    PointerOverPanel(bool),
    /// Write the simulation's records to the configured export path
    Export,
    Quit,
}
