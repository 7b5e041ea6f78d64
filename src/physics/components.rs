//! Particle state shared by the kinematic, collision and field engines

use crate::physics::math::{Scalar, Vector};

/// A point mass with a finite radius, optionally carrying charge
///
/// Owned by the simulation that created it and mutated every step by the
/// relevant engine. The radius is derived from the mass as `k * sqrt(mass)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector,
    pub velocity: Vector,
    /// Most recent acceleration applied, kept for read-out and charting
    pub acceleration: Vector,
    pub mass: Scalar,
    pub charge: Scalar,
    pub radius: Scalar,
}

impl Particle {
    /// Radius scale used when none is given explicitly
    pub const DEFAULT_RADIUS_SCALE: Scalar = 1.0;

    /// Create an uncharged particle. Negative masses are coerced to their
    /// absolute value.
    pub fn new(mass: Scalar, position: Vector, velocity: Vector) -> Self {
        let mass = mass.abs();
        Self {
            position,
            velocity,
            acceleration: Vector::ZERO,
            mass,
            charge: 0.0,
            radius: Self::DEFAULT_RADIUS_SCALE * libm::sqrt(mass),
        }
    }

    /// Recompute the radius as `scale * sqrt(mass)`.
    pub fn with_radius_scale(mut self, scale: Scalar) -> Self {
        self.radius = scale.abs() * libm::sqrt(self.mass);
        self
    }

    /// Override the derived radius.
    pub fn with_radius(mut self, radius: Scalar) -> Self {
        self.radius = radius.abs();
        self
    }

    pub fn with_charge(mut self, charge: Scalar) -> Self {
        self.charge = charge;
        self
    }

    #[inline]
    pub fn is_massless(&self) -> bool {
        self.mass == 0.0
    }

    #[inline]
    pub fn speed(&self) -> Scalar {
        self.velocity.length()
    }

    #[inline]
    pub fn momentum(&self) -> Vector {
        self.velocity * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> Scalar {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
