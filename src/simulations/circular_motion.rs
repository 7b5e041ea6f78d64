//! Uniform circular motion held by a centripetal pull

use super::{
    Body, History, Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState,
    require_finite, resolve_integrator,
};
use crate::config::{CircularMotionConfig, SimulationConfig, SpeedInput};
use crate::physics::components::Particle;
use crate::physics::fields::CentripetalField;
use crate::physics::integrators::{AccelerationField, SymplecticEuler};
use crate::physics::kinematics::KinematicsIntegrator;
use crate::physics::math::{Scalar, Vector, decompose};
use std::f64::consts::PI;

/// Chart sample of the x component, in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularSample {
    pub t: Scalar,
    pub displacement: Scalar,
    pub velocity: Scalar,
    pub acceleration: Scalar,
}

pub struct CircularMotionSimulation {
    particle: Particle,
    field: CentripetalField,
    kinematics: KinematicsIntegrator,
    unit_scale: Scalar,
    time: Scalar,
    history: History<CircularSample>,
    trail: History<Vector>,
}

impl CircularMotionSimulation {
    fn build(config: &CircularMotionConfig, kinematics: KinematicsIntegrator) -> Self {
        let unit_scale = config.unit_scale.abs();
        let radius = config.radius.abs() * unit_scale;
        let speed = match config.speed_input {
            SpeedInput::Tangential => config.tangential_speed * unit_scale,
            SpeedInput::Angular => config.angular_velocity * radius,
        };

        let centre = Vector::ZERO;
        let mut simulation = Self {
            particle: Particle::new(
                config.mass,
                centre + Vector::new(radius, 0.0, 0.0),
                Vector::new(0.0, 0.0, speed),
            )
            .with_radius_scale(2.0),
            field: CentripetalField { centre, radius },
            kinematics,
            unit_scale,
            time: 0.0,
            history: History::new(config.history_limit),
            trail: History::new(config.history_limit),
        };
        simulation.particle.acceleration = simulation
            .field
            .at(simulation.particle.position, simulation.particle.velocity);
        simulation.record();
        simulation
    }

    fn record(&mut self) {
        let scale = if self.unit_scale > 0.0 { self.unit_scale } else { 1.0 };
        self.history.push(CircularSample {
            t: self.time,
            displacement: (self.particle.position.x - self.field.centre.x) / scale,
            velocity: self.particle.velocity.x / scale,
            acceleration: self.particle.acceleration.x / scale,
        });
        self.trail.push(self.particle.position);
    }

    /// Velocity perpendicular to the radius, in display units.
    fn tangential_velocity(&self) -> Vector {
        let outward = self.particle.position - self.field.centre;
        if outward.length_squared() == 0.0 {
            return self.particle.velocity;
        }
        decompose(self.particle.velocity, outward.normalize()).1
    }

    pub fn particle(&self) -> &Particle {
        &self.particle
    }

    /// Circle radius in display units.
    pub fn radius(&self) -> Scalar {
        self.field.radius
    }

    pub fn history(&self) -> &History<CircularSample> {
        &self.history
    }
}

impl Default for CircularMotionSimulation {
    fn default() -> Self {
        Self::build(
            &CircularMotionConfig::default(),
            KinematicsIntegrator::new(Box::new(SymplecticEuler)),
        )
    }
}

impl Simulation for CircularMotionSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::CircularMotion
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        let circular = &config.circular_motion;
        require_finite("circular_motion.mass", circular.mass)?;
        require_finite("circular_motion.radius", circular.radius)?;
        require_finite("circular_motion.tangential_speed", circular.tangential_speed)?;
        require_finite("circular_motion.angular_velocity", circular.angular_velocity)?;
        require_finite("circular_motion.unit_scale", circular.unit_scale)?;
        let integrator = resolve_integrator(&circular.integrator)?;
        *self = Self::build(circular, KinematicsIntegrator::new(integrator));
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        self.kinematics.advance(&mut self.particle, &self.field, dt);
        self.time += dt;
        self.record();
    }

    fn state(&self) -> SimulationState {
        let scale = if self.unit_scale > 0.0 { self.unit_scale } else { 1.0 };
        let radius = self.field.radius / scale;
        let speed = self.tangential_velocity().length() / scale;
        let angular_velocity = if radius > 0.0 { speed / radius } else { 0.0 };
        let acceleration = if radius > 0.0 { speed * speed / radius } else { 0.0 };
        let period = if speed > 0.0 {
            2.0 * PI * radius / speed
        } else {
            Scalar::INFINITY
        };

        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies.push(Body::from(&self.particle));
        state.paths.push(Path {
            points: self.trail.iter().copied().collect(),
            open_direction: None,
        });
        state.readouts = vec![
            Readout::new("tangential speed", speed, "m/s"),
            Readout::new("angular velocity", angular_velocity, "rad/s"),
            Readout::new("centripetal acceleration", acceleration, "m/s²"),
            Readout::new("centripetal force", self.particle.mass * acceleration, "N"),
            Readout::new("period", period, "s"),
        ];
        state
    }

    fn apply_live(&mut self, config: &SimulationConfig) {
        self.particle.mass = config.circular_motion.mass.abs();
    }
}
