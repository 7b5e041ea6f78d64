//! A single projectile bouncing on the ground under gravity

use super::{
    Body, History, Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState,
    require_finite, require_finite_vector, resolve_integrator,
};
use crate::config::{ProjectileConfig, SimulationConfig};
use crate::export::CsvTable;
use crate::physics::components::Particle;
use crate::physics::integrators::UniformField;
use crate::physics::kinematics::{BoundaryContact, KinematicsIntegrator, ReflectingBoundary};
use crate::physics::math::{Scalar, Vector, from_user_frame};
use bevy::log::{debug, info};

/// One chart sample of the vertical motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSample {
    pub t: Scalar,
    pub height: Scalar,
    pub vertical_velocity: Scalar,
    pub vertical_acceleration: Scalar,
}

pub struct ProjectileSimulation {
    particle: Particle,
    gravity: UniformField,
    kinematics: KinematicsIntegrator,
    size: Scalar,
    time: Scalar,
    bounces: u32,
    last_contact: Option<BoundaryContact>,
    finished: bool,
    history: History<ProjectileSample>,
    trail: History<Vector>,
}

impl ProjectileSimulation {
    fn build(config: &ProjectileConfig, kinematics: KinematicsIntegrator) -> Self {
        let particle = Particle::new(
            config.mass,
            from_user_frame(config.initial_position),
            from_user_frame(config.initial_velocity),
        )
        .with_radius_scale(config.radius_scale);

        let mut simulation = Self {
            particle,
            gravity: UniformField(Vector::new(0.0, -config.gravity.abs(), 0.0)),
            kinematics: kinematics
                .with_boundary(ReflectingBoundary::ground(0.0, config.restitution.clamp(0.0, 1.0))),
            size: config.size.abs(),
            time: 0.0,
            bounces: 0,
            last_contact: None,
            finished: false,
            history: History::new(config.history_limit),
            trail: History::new(config.history_limit),
        };
        simulation.record();
        simulation
    }

    fn record(&mut self) {
        self.history.push(ProjectileSample {
            t: self.time,
            height: self.particle.position.y,
            vertical_velocity: self.particle.velocity.y,
            vertical_acceleration: self.particle.acceleration.y,
        });
        self.trail.push(self.particle.position);
    }

    fn left_floor(&self) -> bool {
        self.particle.position.x.abs() > self.size || self.particle.position.z.abs() > self.size
    }

    pub fn particle(&self) -> &Particle {
        &self.particle
    }

    /// Most recent bounce, if any.
    pub fn last_contact(&self) -> Option<BoundaryContact> {
        self.last_contact
    }

    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    pub fn history(&self) -> &History<ProjectileSample> {
        &self.history
    }
}

impl Default for ProjectileSimulation {
    fn default() -> Self {
        Self::build(&ProjectileConfig::default(), KinematicsIntegrator::default())
    }
}

impl Simulation for ProjectileSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Projectile
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        let projectile = &config.projectile;
        require_finite("projectile.mass", projectile.mass)?;
        require_finite_vector("projectile.initial_velocity", projectile.initial_velocity)?;
        require_finite_vector("projectile.initial_position", projectile.initial_position)?;
        require_finite("projectile.gravity", projectile.gravity)?;
        require_finite("projectile.restitution", projectile.restitution)?;
        require_finite("projectile.size", projectile.size)?;
        require_finite("projectile.radius_scale", projectile.radius_scale)?;
        let integrator = resolve_integrator(&projectile.integrator)?;
        *self = Self::build(projectile, KinematicsIntegrator::new(integrator));
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        if self.finished {
            return;
        }

        if let Some(contact) = self.kinematics.advance(&mut self.particle, &self.gravity, dt) {
            self.bounces += 1;
            self.last_contact = Some(contact);
            debug!(
                "Projectile bounce {} at {:.3} m/s",
                self.bounces, contact.speed_at_boundary
            );
        }
        self.time += dt;
        self.record();

        if self.left_floor() {
            self.finished = true;
            info!("Projectile left the floor at t = {:.2} s", self.time);
        }
    }

    fn state(&self) -> SimulationState {
        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies.push(Body::from(&self.particle));
        state.paths.push(Path {
            points: self.trail.iter().copied().collect(),
            open_direction: None,
        });
        state.readouts = vec![
            Readout::new("height", self.particle.position.y, "m"),
            Readout::new("vertical velocity", self.particle.velocity.y, "m/s"),
            Readout::new("vertical acceleration", self.particle.acceleration.y, "m/s²"),
            Readout::new("kinetic energy", self.particle.kinetic_energy(), "J"),
            Readout::new("bounces", Scalar::from(self.bounces), ""),
        ];
        state
    }

    fn apply_live(&mut self, config: &SimulationConfig) {
        self.kinematics
            .set_restitution(config.projectile.restitution.clamp(0.0, 1.0));
        self.gravity = UniformField(Vector::new(0.0, -config.projectile.gravity.abs(), 0.0));
        self.size = config.projectile.size.abs();
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn export(&self) -> Option<CsvTable> {
        let mut table = CsvTable::new(["t", "s", "v", "a"]);
        for sample in self.history.iter() {
            table.push_values([
                sample.t,
                sample.height,
                sample.vertical_velocity,
                sample.vertical_acceleration,
            ]);
        }
        Some(table)
    }
}
