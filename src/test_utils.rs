//! Test utilities for plugin testing

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::config::SimulationConfig;
use crate::events::SimulationCommand;
use crate::plugins::simulation::SimulationPlugin;

/// Creates a minimal test app with core Bevy plugins needed for testing
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app
}

/// Creates a test app running `config` and updates it once
pub fn create_simulation_app(config: SimulationConfig) -> App {
    let mut app = create_test_app();
    app.add_plugins(SimulationPlugin::with_config(config));
    app.update();
    app
}

/// Sends a command and runs one frame so it is handled
pub fn send_command(app: &mut App, command: SimulationCommand) {
    app.world_mut().send_event(command);
    app.update();
}
