//! Drives one simulation from wall-clock frames

use super::{Simulation, SimulationClock, SimulationError, SimulationKind, SimulationState};
use crate::config::SimulationConfig;
use crate::export::CsvTable;
use crate::physics::math::Scalar;
use bevy::prelude::*;

/// The single running simulation together with its clock
#[derive(Resource)]
pub struct SimulationRunner {
    simulation: Box<dyn Simulation>,
    clock: SimulationClock,
    steps: u64,
    fixed_dt: Option<Scalar>,
}

impl SimulationRunner {
    /// A runner for `kind` with default parameters.
    pub fn new(kind: SimulationKind, now: Scalar) -> Self {
        Self {
            simulation: kind.create(),
            clock: SimulationClock::new(now),
            steps: 0,
            fixed_dt: None,
        }
    }

    /// Create and initialise the simulation named in `config.runtime`.
    pub fn from_config(config: &SimulationConfig, now: Scalar) -> Result<Self, SimulationError> {
        let kind = config.runtime.simulation;
        let mut runner = Self::new(kind, now);
        runner.restart(config, now)?;
        info!(
            "Created {} simulation ({:?})",
            kind.title(),
            kind.dimension()
        );
        Ok(runner)
    }

    /// Re-initialise from `config`, switching variant if the configured
    /// kind has changed.
    pub fn restart(&mut self, config: &SimulationConfig, now: Scalar) -> Result<(), SimulationError> {
        let kind = config.runtime.simulation;
        if kind != self.simulation.kind() {
            self.simulation = kind.create();
        }
        self.simulation.init(config)?;
        self.clock.reset(now);
        if config.runtime.start_paused {
            self.clock.pause(now);
        }
        self.steps = 0;
        self.fixed_dt = config.runtime.fixed_dt.filter(|dt| *dt > 0.0);
        Ok(())
    }

    /// Advance by the wall-clock time since the previous frame.
    ///
    /// Returns the simulated `dt` applied, or `None` when the frame was a
    /// timing baseline or the runner is paused.
    pub fn frame(&mut self, now: Scalar) -> Option<Scalar> {
        let measured = self.clock.tick(now);
        if self.clock.is_paused() {
            return None;
        }
        let dt = self.fixed_dt.or(measured)? * self.simulation.time_scale();

        self.simulation.step(dt);
        self.steps += 1;

        if self.simulation.is_finished() {
            info!(
                "{} finished after {} steps",
                self.simulation.kind().title(),
                self.steps
            );
            self.clock.pause(now);
        }
        Some(dt)
    }

    pub fn apply_live(&mut self, config: &SimulationConfig) {
        self.simulation.apply_live(config);
    }

    pub fn kind(&self) -> SimulationKind {
        self.simulation.kind()
    }

    pub fn state(&self) -> SimulationState {
        self.simulation.state()
    }

    pub fn export(&self) -> Option<CsvTable> {
        self.simulation.export()
    }

    pub fn simulation(&self) -> &dyn Simulation {
        self.simulation.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.simulation.is_finished()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn elapsed(&self, now: Scalar) -> Scalar {
        self.clock.elapsed(now)
    }

    pub fn toggle_pause(&mut self, now: Scalar) {
        self.clock.toggle(now);
    }

    pub fn set_paused(&mut self, paused: bool, now: Scalar) {
        self.clock.set_paused(paused, now);
    }

    pub fn set_hidden(&mut self, hidden: bool, now: Scalar) {
        self.clock.set_hidden(hidden, now);
    }
}
