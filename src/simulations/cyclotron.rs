//! A charged particle spiralling out of a two-dee cyclotron

use super::{
    Body, History, Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState,
    require_finite,
};
use crate::config::{CyclotronConfig, SimulationConfig};
use crate::physics::fields::Cyclotron;
use crate::physics::math::{Scalar, Vector};
use bevy::log::{debug, info};

/// Mass inputs are in units of this many kilograms
const MASS_UNIT: Scalar = 1e-27;
/// Charge inputs are in units of this many coulombs
const CHARGE_UNIT: Scalar = 1e-19;

/// Chart sample in SI units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclotronSample {
    pub t: Scalar,
    pub speed: Scalar,
    pub potential: Scalar,
    pub x: Scalar,
}

/// Linear speed ramp while the particle crosses the gap
#[derive(Debug, Clone, Copy, PartialEq)]
struct GapTransit {
    elapsed: Scalar,
    duration: Scalar,
    from: Scalar,
    to: Scalar,
}

impl GapTransit {
    fn speed(&self) -> Scalar {
        let progress = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.from + (self.to - self.from) * progress
    }
}

pub struct CyclotronSimulation {
    cyclotron: Cyclotron,
    /// Applied to the configured potential before it drives the particle
    potential_scale: Scalar,
    /// Display speed to metres per second
    speed_factor: Scalar,
    /// Display seconds to seconds
    time_factor: Scalar,
    position: Vector,
    direction: Vector,
    speed: Scalar,
    crossings: u32,
    transit: Option<GapTransit>,
    time: Scalar,
    escaped: bool,
    trail: History<Vector>,
    history: History<CyclotronSample>,
}

impl CyclotronSimulation {
    fn build(config: &CyclotronConfig) -> Self {
        let potential_scale = if config.potential_scale > 0.0 {
            config.potential_scale
        } else {
            1.0
        };
        let time_factor = MASS_UNIT / CHARGE_UNIT;

        let mut simulation = Self {
            cyclotron: Cyclotron {
                mass: config.mass.abs(),
                charge: config.charge,
                magnetic_field: config.magnetic_field,
                potential: config.potential * potential_scale,
                gap_width: config.gap_width.abs(),
                dee_radius: config.dee_radius.abs(),
            },
            potential_scale,
            speed_factor: libm::sqrt(time_factor.recip() / potential_scale),
            time_factor,
            position: Vector::ZERO,
            direction: Vector::X,
            speed: 0.0,
            crossings: 0,
            transit: None,
            time: 0.0,
            escaped: false,
            trail: History::new(config.trail_limit),
            history: History::new(config.history_limit),
        };
        if simulation.cyclotron.in_gap(simulation.position) {
            simulation.begin_transit();
        }
        simulation.record();
        simulation
    }

    fn begin_transit(&mut self) {
        let to = self.cyclotron.speed_after_crossings(self.crossings + 1);
        self.crossings += 1;
        self.transit = Some(GapTransit {
            elapsed: 0.0,
            duration: self.cyclotron.gap_transit_time(to - self.speed),
            from: self.speed,
            to,
        });
        debug!("Gap crossing {} towards {:.3}", self.crossings, to);
    }

    fn finish_transit(&mut self) {
        if let Some(transit) = self.transit.take() {
            self.speed = transit.to;
        }
    }

    /// Rotate the direction of travel by the magnetic force, keeping the speed.
    fn bend(&mut self, dt: Scalar) {
        let velocity = self.direction * self.speed;
        let acceleration = self.cyclotron.magnetic_acceleration(self.position, velocity);
        self.direction = (velocity + acceleration * dt).normalize_or(self.direction);
    }

    fn record(&mut self) {
        self.trail.push(self.position);
        self.history.push(CyclotronSample {
            t: self.time * self.time_factor,
            speed: self.speed * self.speed_factor,
            potential: self.alternating_potential(),
            x: self.position.x * self.speed_factor * self.time_factor,
        });
    }

    /// Gap potential in volts at the current time.
    fn alternating_potential(&self) -> Scalar {
        self.cyclotron.alternating_potential(self.time) / self.potential_scale
    }

    pub fn speed(&self) -> Scalar {
        self.speed
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn crossings(&self) -> u32 {
        self.crossings
    }

    pub fn cyclotron(&self) -> &Cyclotron {
        &self.cyclotron
    }

    pub fn history(&self) -> &History<CyclotronSample> {
        &self.history
    }
}

impl Default for CyclotronSimulation {
    fn default() -> Self {
        Self::build(&CyclotronConfig::default())
    }
}

impl Simulation for CyclotronSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Cyclotron
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        let cyclotron = &config.cyclotron;
        require_finite("cyclotron.mass", cyclotron.mass)?;
        require_finite("cyclotron.charge", cyclotron.charge)?;
        require_finite("cyclotron.magnetic_field", cyclotron.magnetic_field)?;
        require_finite("cyclotron.potential", cyclotron.potential)?;
        *self = Self::build(&config.cyclotron);
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        if self.escaped {
            return;
        }

        if let Some(transit) = self.transit.as_mut() {
            transit.elapsed += dt;
            self.speed = transit.speed();
        } else if self.cyclotron.in_dee(self.position) {
            self.bend(dt);
        }

        let before = self.position;
        self.position += self.direction * self.speed * dt;
        self.time += dt;

        let was_in_gap = self.cyclotron.in_gap(before);
        let in_gap = self.cyclotron.in_gap(self.position);
        if self.transit.is_some() {
            if !in_gap {
                self.finish_transit();
            }
        } else if in_gap && !was_in_gap {
            self.begin_transit();
        } else if !in_gap && !was_in_gap && before.x.signum() != self.position.x.signum() {
            // Stepped clean over the gap
            self.begin_transit();
            self.finish_transit();
        }

        self.record();

        if self.cyclotron.has_escaped(self.position) {
            self.escaped = true;
            info!(
                "Particle escaped after {} crossings at {:.3e} m/s",
                self.crossings,
                self.speed * self.speed_factor
            );
        }
    }

    fn state(&self) -> SimulationState {
        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies.push(Body::from(self));
        state.paths.push(Path {
            points: self.trail.iter().copied().collect(),
            open_direction: None,
        });
        state.readouts = vec![
            Readout::new("speed", self.speed * self.speed_factor, "m/s"),
            Readout::new("period", self.cyclotron.period() * self.time_factor, "s"),
            Readout::new(
                "half cycles",
                self.cyclotron.half_cycles(self.time) as Scalar,
                "",
            ),
            Readout::new("potential difference", self.alternating_potential(), "V"),
            Readout::new("gap crossings", Scalar::from(self.crossings), ""),
        ];
        state
    }

    fn is_finished(&self) -> bool {
        self.escaped
    }
}

impl From<&CyclotronSimulation> for Body {
    fn from(simulation: &CyclotronSimulation) -> Self {
        Self {
            position: simulation.position,
            velocity: simulation.direction * simulation.speed,
            radius: 1.0,
        }
    }
}
