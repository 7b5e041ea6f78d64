//! Monte Carlo radioactive decay charted against the exponential law

use super::{Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState, require_finite};
use crate::config::{NuclearDecayConfig, SimulationConfig};
use crate::export::CsvTable;
use crate::physics::decay::{DecaySample, DecayState, batch_horizon};
use crate::physics::math::{Scalar, Vector};
use crate::resources::SharedRng;
use bevy::log::info;

/// Samples taken when the whole run is computed up front
const BATCH_STEPS: usize = 50;

pub struct NuclearDecaySimulation {
    decay: DecayState,
    rng: SharedRng,
    interval: Scalar,
    real_time: bool,
    /// Elapsed time not yet consumed by a sampling interval
    accumulator: Scalar,
    samples: Vec<DecaySample>,
    finished: bool,
}

impl NuclearDecaySimulation {
    fn build(config: &NuclearDecayConfig, rng: SharedRng) -> Self {
        let mut simulation = Self {
            decay: DecayState::new(config.initial_nuclei, config.decay_constant),
            rng,
            interval: config.interval.abs(),
            real_time: config.real_time,
            accumulator: 0.0,
            samples: Vec::new(),
            finished: false,
        };

        if simulation.real_time {
            simulation.sample(simulation.interval);
        } else {
            simulation.run_batch();
        }
        simulation
    }

    fn sample(&mut self, dt: Scalar) {
        let reading = self.decay.step(dt, &mut *self.rng);
        self.samples.push(reading);
    }

    /// Compute the whole curve down to half a nucleus in one go.
    fn run_batch(&mut self) {
        let horizon = batch_horizon(self.decay.n0(), self.decay.lambda());
        let dt = horizon / BATCH_STEPS as Scalar;
        if dt > 0.0 {
            for _ in 0..BATCH_STEPS {
                self.sample(dt);
            }
        }
        self.samples.push(self.decay.sample());
        self.finished = true;
        info!(
            "Computed {} decay samples up to t = {:.3} s",
            self.samples.len(),
            self.decay.t()
        );
    }

    pub fn decay(&self) -> &DecayState {
        &self.decay
    }

    /// Readings in time order.
    pub fn samples(&self) -> &[DecaySample] {
        &self.samples
    }
}

impl Default for NuclearDecaySimulation {
    fn default() -> Self {
        Self::build(&NuclearDecayConfig::default(), SharedRng::default())
    }
}

impl Simulation for NuclearDecaySimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::NuclearDecay
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        require_finite("nuclear_decay.decay_constant", config.nuclear_decay.decay_constant)?;
        require_finite("nuclear_decay.interval", config.nuclear_decay.interval)?;
        *self = Self::build(
            &config.nuclear_decay,
            SharedRng::from_optional_seed(config.runtime.seed),
        );
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        if self.finished || !self.real_time || self.interval <= 0.0 {
            return;
        }

        self.accumulator += dt;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.sample(self.interval);
        }

        if self.decay.n() == 0 {
            self.samples.push(self.decay.sample());
            self.finished = true;
            info!("All nuclei decayed by t = {:.2} s", self.decay.t());
        }
    }

    fn state(&self) -> SimulationState {
        let mut state = SimulationState::new(self.kind(), self.decay.t());
        state.paths = vec![
            Path {
                points: self
                    .samples
                    .iter()
                    .map(|sample| Vector::new(sample.t, sample.n as Scalar, 0.0))
                    .collect(),
                open_direction: None,
            },
            Path {
                points: self
                    .samples
                    .iter()
                    .map(|sample| Vector::new(sample.t, sample.model, 0.0))
                    .collect(),
                open_direction: None,
            },
        ];

        let lambda = self.decay.lambda();
        let half_life = if lambda > 0.0 {
            std::f64::consts::LN_2 / lambda
        } else {
            Scalar::INFINITY
        };
        state.readouts = vec![
            Readout::new("nuclei", self.decay.n() as Scalar, ""),
            Readout::new("model", self.decay.model(self.decay.t()), ""),
            Readout::new("half life", half_life, "s"),
        ];
        state
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn export(&self) -> Option<CsvTable> {
        let mut table = CsvTable::new(["t", "n", "model"]);
        for sample in &self.samples {
            table.push_values([sample.t, sample.n as Scalar, sample.model]);
        }
        Some(table)
    }
}
