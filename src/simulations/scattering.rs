//! Rutherford scattering of a grid of alpha particles off a heavy nucleus

use super::{
    Body, History, Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState,
    require_finite,
};
use crate::config::{ScatteringConfig, SimulationConfig};
use crate::export::CsvTable;
use crate::physics::components::Particle;
use crate::physics::fields::{CoulombField, ELEMENTARY_CHARGE, PROTON_MASS};
use crate::physics::integrators::{SymplecticEuler, UniformField};
use crate::physics::kinematics::KinematicsIntegrator;
use crate::physics::math::{Scalar, Vector};
use bevy::log::info;

/// State positions are reported in femtometres
const FEMTOMETRE: Scalar = 1e-15;

struct Alpha {
    particle: Particle,
    impact_parameter: Scalar,
    trail: History<Vector>,
}

pub struct ScatteringSimulation {
    nucleus: Particle,
    alphas: Vec<Alpha>,
    kinematics: KinematicsIntegrator,
    cutoff: Scalar,
    recoil: bool,
    escape_distance: Scalar,
    time_scale: Scalar,
    time: Scalar,
    finished: bool,
}

impl ScatteringSimulation {
    fn build(config: &ScatteringConfig) -> Self {
        let z = Scalar::from(config.proton_number);
        let nucleus = Particle::new(z * PROTON_MASS, Vector::ZERO, Vector::ZERO)
            .with_charge(z * ELEMENTARY_CHARGE)
            .with_radius(libm::cbrt(4.0 * z) * 1.2 * FEMTOMETRE);

        let half = Scalar::from(config.grid_size) / 2.0;
        let spacing = config.grid_spacing.abs();
        let mut alphas = Vec::new();
        for row in 0..=config.grid_size {
            for column in 0..=config.grid_size {
                let offset = Vector::new(
                    0.0,
                    (Scalar::from(row) - half) * spacing,
                    (Scalar::from(column) - half) * spacing,
                );
                let particle = Particle::new(
                    2.0 * PROTON_MASS,
                    Vector::new(-config.start_distance.abs(), 0.0, 0.0) + offset,
                    Vector::new(config.alpha_speed, 0.0, 0.0),
                )
                .with_charge(2.0 * ELEMENTARY_CHARGE)
                .with_radius(1.7 * FEMTOMETRE);

                let mut trail = History::new(config.trail_limit);
                trail.push(particle.position);
                alphas.push(Alpha {
                    particle,
                    impact_parameter: offset.length(),
                    trail,
                });
            }
        }

        Self {
            nucleus,
            alphas,
            kinematics: KinematicsIntegrator::new(Box::new(SymplecticEuler)),
            cutoff: config.coulomb_cutoff.abs(),
            recoil: config.nucleus_recoil,
            escape_distance: config.escape_distance.abs(),
            time_scale: config.time_scale.abs(),
            time: 0.0,
            finished: false,
        }
    }

    /// Angle in radians between an alpha's current and launch directions.
    fn deflection(particle: &Particle) -> Scalar {
        let direction = particle.velocity.normalize_or_zero();
        libm::acos(direction.dot(Vector::X).clamp(-1.0, 1.0))
    }

    fn has_escaped(&self, particle: &Particle) -> bool {
        let outward = particle.position - self.nucleus.position;
        outward.length() > self.escape_distance && outward.dot(particle.velocity) > 0.0
    }

    pub fn nucleus(&self) -> &Particle {
        &self.nucleus
    }

    pub fn alphas(&self) -> impl Iterator<Item = &Particle> {
        self.alphas.iter().map(|alpha| &alpha.particle)
    }

    /// Deflection of every alpha in radians, in grid order.
    pub fn deflections(&self) -> Vec<Scalar> {
        self.alphas()
            .map(|particle| Self::deflection(particle))
            .collect()
    }
}

impl Default for ScatteringSimulation {
    fn default() -> Self {
        Self::build(&ScatteringConfig::default())
    }
}

impl Simulation for ScatteringSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Scattering
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        require_finite("scattering.alpha_speed", config.scattering.alpha_speed)?;
        require_finite("scattering.time_scale", config.scattering.time_scale)?;
        *self = Self::build(&config.scattering);
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        if self.finished {
            return;
        }

        let mut reaction = Vector::ZERO;
        for alpha in &mut self.alphas {
            let field = CoulombField {
                source_position: self.nucleus.position,
                source_charge: self.nucleus.charge,
                charge: alpha.particle.charge,
                mass: alpha.particle.mass,
                cutoff: self.cutoff,
            };
            self.kinematics.advance(&mut alpha.particle, &field, dt);
            reaction -= alpha.particle.acceleration * alpha.particle.mass;
            alpha.trail.push(alpha.particle.position);
        }

        if self.recoil && !self.nucleus.is_massless() {
            let pull = UniformField(reaction / self.nucleus.mass);
            self.kinematics.advance(&mut self.nucleus, &pull, dt);
        }
        self.time += dt;

        if self.alphas.iter().all(|alpha| self.has_escaped(&alpha.particle)) {
            self.finished = true;
            let back_scattered = self
                .alphas()
                .filter(|particle| Self::deflection(particle) > std::f64::consts::FRAC_PI_2)
                .count();
            info!(
                "All {} alphas escaped, {} scattered back",
                self.alphas.len(),
                back_scattered
            );
        }
    }

    fn state(&self) -> SimulationState {
        let to_display = |particle: &Particle| Body {
            position: particle.position / FEMTOMETRE,
            velocity: particle.velocity / FEMTOMETRE,
            radius: particle.radius / FEMTOMETRE,
        };

        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies.push(to_display(&self.nucleus));
        state
            .bodies
            .extend(self.alphas().map(|particle| to_display(particle)));
        state.paths = self
            .alphas
            .iter()
            .map(|alpha| Path {
                points: alpha.trail.iter().map(|point| *point / FEMTOMETRE).collect(),
                open_direction: None,
            })
            .collect();

        let deflections = self.deflections();
        let max = deflections.iter().copied().fold(0.0, Scalar::max);
        let mean = if deflections.is_empty() {
            0.0
        } else {
            deflections.iter().sum::<Scalar>() / deflections.len() as Scalar
        };
        state.readouts = vec![
            Readout::new("alphas", self.alphas.len() as Scalar, ""),
            Readout::new("max deflection", max.to_degrees(), "°"),
            Readout::new("mean deflection", mean.to_degrees(), "°"),
            Readout::new("nucleus speed", self.nucleus.speed(), "m/s"),
        ];
        state
    }

    fn time_scale(&self) -> Scalar {
        self.time_scale
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn export(&self) -> Option<CsvTable> {
        let mut table = CsvTable::new(["b/fm", "theta/rad"]);
        for alpha in &self.alphas {
            table.push_values([
                alpha.impact_parameter / FEMTOMETRE,
                Self::deflection(&alpha.particle),
            ]);
        }
        Some(table)
    }
}
