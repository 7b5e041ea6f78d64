//! Fixed-step particle update with reflecting boundaries

use crate::physics::components::Particle;
use crate::physics::integrators::{AccelerationField, ConstantAcceleration, Integrator};
use crate::physics::math::{Scalar, Vector};

/// Cartesian axis in the engine frame (y is up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which side of the boundary level the particle is allowed to occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    /// Allowed region is `coordinate >= level` (a floor)
    Lower,
    /// Allowed region is `coordinate <= level` (a ceiling or wall)
    Upper,
}

/// An axis-aligned plane that bounces particles back with restitution `e`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectingBoundary {
    pub axis: Axis,
    pub level: Scalar,
    pub side: BoundarySide,
    pub restitution: Scalar,
}

impl ReflectingBoundary {
    /// Ground plane at `y = level`.
    pub fn ground(level: Scalar, restitution: Scalar) -> Self {
        Self {
            axis: Axis::Y,
            level,
            side: BoundarySide::Lower,
            restitution,
        }
    }

    #[inline]
    fn is_crossed(&self, coordinate: Scalar) -> bool {
        match self.side {
            BoundarySide::Lower => coordinate < self.level,
            BoundarySide::Upper => coordinate > self.level,
        }
    }

    /// Clamp the particle back onto the boundary and reverse the crossing
    /// velocity component.
    ///
    /// The speed at the boundary is rebuilt from `v_b² = v² - 2·a·s`, where
    /// `s` is how far past the boundary the step carried the particle, so a
    /// coarse step does not gain or lose energy on the bounce.
    fn reflect(&self, particle: &mut Particle) -> Scalar {
        let i = self.axis.index();
        let overshoot = particle.position[i] - self.level;
        let velocity = particle.velocity[i];
        let acceleration = particle.acceleration[i];

        let boundary_speed_squared = velocity * velocity - 2.0 * acceleration * overshoot;
        let boundary_speed = libm::sqrt(boundary_speed_squared.max(0.0));

        particle.position[i] = self.level;
        particle.velocity[i] = match self.side {
            BoundarySide::Lower => self.restitution * boundary_speed,
            BoundarySide::Upper => -self.restitution * boundary_speed,
        };

        boundary_speed
    }
}

/// Result of a boundary reflection during [`KinematicsIntegrator::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryContact {
    pub axis: Axis,
    /// Speed along the axis at the moment the boundary was reached
    pub speed_at_boundary: Scalar,
}

/// Advances a particle under an acceleration field and applies reflecting
/// boundaries after each step
#[derive(Clone)]
pub struct KinematicsIntegrator {
    integrator: Box<dyn Integrator>,
    boundaries: Vec<ReflectingBoundary>,
}

impl Default for KinematicsIntegrator {
    fn default() -> Self {
        Self::new(Box::new(ConstantAcceleration))
    }
}

impl KinematicsIntegrator {
    pub fn new(integrator: Box<dyn Integrator>) -> Self {
        Self {
            integrator,
            boundaries: Vec::new(),
        }
    }

    pub fn with_boundary(mut self, boundary: ReflectingBoundary) -> Self {
        self.boundaries.push(boundary);
        self
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integrator.name()
    }

    pub fn boundaries(&self) -> &[ReflectingBoundary] {
        &self.boundaries
    }

    /// Set the restitution of every boundary, e.g. after a live input change.
    pub fn set_restitution(&mut self, restitution: Scalar) {
        for boundary in &mut self.boundaries {
            boundary.restitution = restitution;
        }
    }

    /// Advance `particle` by `dt` seconds.
    ///
    /// Massless particles are left untouched. Returns the boundary contact
    /// made during the step, if any.
    pub fn advance(
        &self,
        particle: &mut Particle,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> Option<BoundaryContact> {
        if particle.is_massless() {
            return None;
        }

        particle.acceleration = self.integrator.step(
            &mut particle.position,
            &mut particle.velocity,
            field,
            dt,
        );

        let mut contact = None;
        for boundary in &self.boundaries {
            if boundary.is_crossed(particle.position[boundary.axis.index()]) {
                let speed_at_boundary = boundary.reflect(particle);
                contact = Some(BoundaryContact {
                    axis: boundary.axis,
                    speed_at_boundary,
                });
            }
        }

        contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::UniformField;

    const GRAVITY: Vector = Vector::new(0.0, -9.81, 0.0);

    #[test]
    fn test_zero_acceleration_has_no_drift() {
        let kinematics = KinematicsIntegrator::default();
        let velocity = Vector::new(1.5, -0.25, 3.0);
        let mut particle = Particle::new(1.0, Vector::new(2.0, 7.0, -1.0), velocity);
        let start = particle.position;

        let dt = 0.25;
        for _ in 0..8 {
            kinematics.advance(&mut particle, &UniformField(Vector::ZERO), dt);
        }

        assert_eq!(particle.position - start, velocity * 2.0);
        assert_eq!(particle.velocity, velocity);
    }

    #[test]
    fn test_massless_particle_is_not_updated() {
        let kinematics = KinematicsIntegrator::default();
        let mut particle = Particle::new(0.0, Vector::new(0.0, 5.0, 0.0), Vector::X);

        let contact = kinematics.advance(&mut particle, &UniformField(GRAVITY), 0.1);

        assert!(contact.is_none());
        assert_eq!(particle.position, Vector::new(0.0, 5.0, 0.0));
        assert_eq!(particle.velocity, Vector::X);
    }

    #[test]
    fn test_ground_bounce_preserves_speed_when_elastic() {
        let kinematics =
            KinematicsIntegrator::default().with_boundary(ReflectingBoundary::ground(0.0, 1.0));
        let mut particle = Particle::new(2.0, Vector::new(0.0, 0.1, 0.0), Vector::new(0.0, -3.0, 0.0));
        let dt = 0.1;

        // Speed the particle would have when reaching y = 0
        let expected = libm::sqrt(3.0 * 3.0 + 2.0 * 9.81 * 0.1);

        let contact = kinematics
            .advance(&mut particle, &UniformField(GRAVITY), dt)
            .expect("particle should reach the ground");

        assert_eq!(contact.axis, Axis::Y);
        assert!((contact.speed_at_boundary - expected).abs() < 1e-9);
        assert_eq!(particle.position.y, 0.0);
        assert!((particle.velocity.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_restitution_scales_rebound() {
        let kinematics =
            KinematicsIntegrator::default().with_boundary(ReflectingBoundary::ground(0.0, 0.5));
        let mut particle = Particle::new(1.0, Vector::new(0.0, 0.01, 0.0), Vector::new(0.0, -4.0, 0.0));

        let contact = kinematics
            .advance(&mut particle, &UniformField(GRAVITY), 0.05)
            .expect("particle should reach the ground");

        assert!((particle.velocity.y - 0.5 * contact.speed_at_boundary).abs() < 1e-12);
    }

    #[test]
    fn test_upper_boundary_reflects_downward() {
        let boundary = ReflectingBoundary {
            axis: Axis::X,
            level: 1.0,
            side: BoundarySide::Upper,
            restitution: 1.0,
        };
        let kinematics = KinematicsIntegrator::default().with_boundary(boundary);
        let mut particle = Particle::new(1.0, Vector::new(0.9, 0.0, 0.0), Vector::new(2.0, 0.0, 0.0));

        kinematics.advance(&mut particle, &UniformField(Vector::ZERO), 0.1);

        assert_eq!(particle.position.x, 1.0);
        assert_eq!(particle.velocity.x, -2.0);
    }

    #[test]
    fn test_set_restitution_updates_all_boundaries() {
        let mut kinematics =
            KinematicsIntegrator::default().with_boundary(ReflectingBoundary::ground(0.0, 1.0));
        kinematics.set_restitution(0.25);
        assert!(kinematics.boundaries().iter().all(|b| b.restitution == 0.25));
    }
}
