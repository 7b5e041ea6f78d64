//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the single running simulation and drives it once per frame from
//! real elapsed time. Input reaches it only as `SimulationCommand` events.

use crate::prelude::*;

mod actions;

pub use actions::{
    drive_simulation, handle_export_event, handle_pause_events, handle_pointer_event,
    handle_quit_event, handle_restart_event, stop_when_done, sync_app_state,
};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Step,
    Sync,
}

/// Seconds since startup on the real clock
pub(crate) fn now(time: &Time<Real>) -> Scalar {
    time.elapsed_secs_f64()
}

#[derive(Default)]
pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
}

impl SimulationPlugin {
    /// Use the configuration from the user's config directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let kind = config.runtime.simulation;
        let runner = SimulationRunner::from_config(&config, 0.0).unwrap_or_else(|e| {
            error!("Could not start {}: {}. Using default parameters.", kind, e);
            SimulationRunner::new(kind, 0.0)
        });

        app.insert_resource(config);
        app.insert_resource(runner);
        app.init_resource::<ExportPath>();
        app.init_resource::<RotateLock>();
        app.init_resource::<RunLimit>();
        app.init_state::<AppState>();
        app.add_event::<SimulationCommand>();

        app.configure_sets(
            Update,
            (SimulationSet::Input, SimulationSet::Step, SimulationSet::Sync).chain(),
        );

        app.add_systems(
            Update,
            (
                (
                    handle_restart_event,
                    handle_pause_events,
                    handle_pointer_event,
                    handle_export_event,
                    handle_quit_event,
                )
                    .chain()
                    .in_set(SimulationSet::Input),
                drive_simulation.in_set(SimulationSet::Step),
                (sync_app_state, stop_when_done).in_set(SimulationSet::Sync),
            ),
        );
    }
}
