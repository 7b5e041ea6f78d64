//! Two-source sound interference heard by a moving observer

use super::{
    Body, History, Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState,
    require_finite,
};
use crate::config::{InterferenceConfig, SimulationConfig};
use crate::physics::math::{Scalar, Vector};
use std::f64::consts::TAU;

const AMPLITUDE_HISTORY: usize = 500;

/// What the observer hears at one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    /// `|d1 - d2| mod λ`, in metres
    pub path_difference: Scalar,
    /// Radians in `[0, 2π)`
    pub phase_difference: Scalar,
    /// `(1 + cos φ) / 2`, from 0 (silent) to 1 (loudest)
    pub amplitude: Scalar,
}

/// Superposition of two in-phase sources at `first` and `second` heard at
/// `observer`.
pub fn superpose(first: Scalar, second: Scalar, observer: Scalar, wavelength: Scalar) -> Superposition {
    if wavelength <= 0.0 {
        return Superposition {
            path_difference: 0.0,
            phase_difference: 0.0,
            amplitude: 1.0,
        };
    }

    let d1 = (observer - first).abs();
    let d2 = (observer - second).abs();
    let path_difference = (d1 - d2).abs() % wavelength;
    let phase_difference = path_difference / wavelength * TAU;
    Superposition {
        path_difference,
        phase_difference,
        amplitude: (1.0 + libm::cos(phase_difference)) / 2.0,
    }
}

pub struct InterferenceSimulation {
    width: Scalar,
    wavelength: Scalar,
    wave_speed: Scalar,
    observer: Scalar,
    observer_velocity: Scalar,
    time: Scalar,
    amplitudes: History<Vector>,
}

impl InterferenceSimulation {
    fn build(config: &InterferenceConfig) -> Self {
        let width = config.width.abs();
        let mut simulation = Self {
            width,
            wavelength: config.wavelength.abs(),
            wave_speed: config.wave_speed.abs(),
            observer: config.observer_fraction.clamp(0.0, 1.0) * width,
            observer_velocity: config.observer_speed,
            time: 0.0,
            amplitudes: History::new(AMPLITUDE_HISTORY),
        };
        simulation.record();
        simulation
    }

    fn record(&mut self) {
        let amplitude = self.superposition().amplitude;
        self.amplitudes.push(Vector::new(self.time, amplitude, 0.0));
    }

    /// Source positions along the line, a quarter of the way in from each wall.
    pub fn sources(&self) -> (Scalar, Scalar) {
        (self.width * 0.25, self.width * 0.75)
    }

    pub fn observer(&self) -> Scalar {
        self.observer
    }

    pub fn superposition(&self) -> Superposition {
        let (first, second) = self.sources();
        superpose(first, second, self.observer, self.wavelength)
    }

    /// Frequency of the emitted tone, `v / λ`.
    pub fn frequency(&self) -> Scalar {
        if self.wavelength > 0.0 {
            self.wave_speed / self.wavelength
        } else {
            0.0
        }
    }
}

impl Default for InterferenceSimulation {
    fn default() -> Self {
        Self::build(&InterferenceConfig::default())
    }
}

impl Simulation for InterferenceSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Interference
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        require_finite("interference.wavelength", config.interference.wavelength)?;
        require_finite("interference.observer_speed", config.interference.observer_speed)?;
        *self = Self::build(&config.interference);
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        let next = self.observer + self.observer_velocity * dt;
        if next > self.width || next < 0.0 {
            self.observer_velocity = -self.observer_velocity;
        }
        self.observer = next.clamp(0.0, self.width);
        self.time += dt;
        self.record();
    }

    fn state(&self) -> SimulationState {
        let (first, second) = self.sources();
        let superposition = self.superposition();

        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies = [first, second, self.observer]
            .into_iter()
            .map(|x| Body {
                position: Vector::new(x, 0.0, 0.0),
                velocity: Vector::ZERO,
                radius: 0.25,
            })
            .collect();
        state.bodies[2].velocity = Vector::new(self.observer_velocity, 0.0, 0.0);
        state.paths.push(Path {
            points: self.amplitudes.iter().copied().collect(),
            open_direction: None,
        });
        state.readouts = vec![
            Readout::new("path difference", superposition.path_difference, "m"),
            Readout::new("phase difference", superposition.phase_difference, "rad"),
            Readout::new("amplitude", superposition.amplitude, ""),
            Readout::new("frequency", self.frequency(), "Hz"),
            Readout::new("observer position", self.observer, "m"),
        ];
        state
    }

    fn apply_live(&mut self, config: &SimulationConfig) {
        self.wavelength = config.interference.wavelength.abs();
        self.wave_speed = config.interference.wave_speed.abs();
    }
}
