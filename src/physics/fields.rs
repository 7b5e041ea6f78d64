//! Force laws that turn the current kinematic state into an acceleration
//!
//! Everything here is a pure function of state. Integration is left to the
//! owning simulation.

use crate::physics::integrators::AccelerationField;
use crate::physics::math::{Scalar, Vector, is_near_zero};
use std::f64::consts::PI;

/// Elementary charge in coulombs
pub const ELEMENTARY_CHARGE: Scalar = 1.602_176_63e-19;
/// Proton rest mass in kilograms
pub const PROTON_MASS: Scalar = 1.672_621_92e-27;
/// Vacuum permittivity in farads per metre
pub const VACUUM_PERMITTIVITY: Scalar = 8.854_187_82e-12;
/// `1 / (4π·ε0)`
pub const COULOMB_CONSTANT: Scalar = 1.0 / (4.0 * PI * VACUUM_PERMITTIVITY);

/// Magnetic part of the Lorentz force as an acceleration.
///
/// The direction is `v × B̂` and the magnitude `|v|·|B|·q/m`, so the result
/// only turns the velocity. A negative charge bends the other way. Returns
/// zero when the velocity is parallel to the field or the mass is zero.
pub fn lorentz_acceleration(velocity: Vector, field: Vector, charge: Scalar, mass: Scalar) -> Vector {
    if mass == 0.0 {
        return Vector::ZERO;
    }

    let strength = field.length();
    let direction = velocity.cross(field).normalize_or_zero();
    direction * (velocity.length() * strength * charge / mass)
}

/// Coulomb force exerted on charge 2 by charge 1.
///
/// `F = k·q1·q2 / r²` along the line from 1 to 2, so like charges repel.
/// Returns `None` when the charges coincide.
pub fn coulomb_force(
    source_position: Vector,
    source_charge: Scalar,
    target_position: Vector,
    target_charge: Scalar,
) -> Option<Vector> {
    let offset = target_position - source_position;
    let distance_squared = offset.length_squared();
    if distance_squared <= Scalar::MIN_POSITIVE {
        return None;
    }

    let magnitude = COULOMB_CONSTANT * source_charge * target_charge / distance_squared;
    Some(offset / libm::sqrt(distance_squared) * magnitude)
}

/// Field of a point charge as seen by a test charge, switched off beyond
/// `cutoff`
///
/// The cutoff is a performance guard, not physics: outside it the test
/// charge feels nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoulombField {
    pub source_position: Vector,
    pub source_charge: Scalar,
    pub charge: Scalar,
    pub mass: Scalar,
    pub cutoff: Scalar,
}

impl CoulombField {
    pub fn in_range(&self, position: Vector) -> bool {
        self.source_position.distance(position) < self.cutoff
    }
}

impl AccelerationField for CoulombField {
    fn at(&self, position: Vector, _velocity: Vector) -> Vector {
        if self.mass == 0.0 || !self.in_range(position) {
            return Vector::ZERO;
        }
        coulomb_force(self.source_position, self.source_charge, position, self.charge)
            .map_or(Vector::ZERO, |force| force / self.mass)
    }
}

/// Centripetal pull toward a fixed centre that holds a particle on a circle
/// of the given radius: `a = |v_t|² / r`, with `v_t` the velocity component
/// perpendicular to the radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentripetalField {
    pub centre: Vector,
    pub radius: Scalar,
}

impl AccelerationField for CentripetalField {
    fn at(&self, position: Vector, velocity: Vector) -> Vector {
        let outward = position - self.centre;
        if is_near_zero(self.radius) || outward.length_squared() == 0.0 {
            return Vector::ZERO;
        }

        let inward = -outward.normalize();
        let tangential = velocity - inward * velocity.dot(inward);
        inward * (tangential.length_squared() / self.radius)
    }
}

/// Geometry and field strengths of a two-dee cyclotron
///
/// The accelerating gap is the strip `|x| <= gap_width / 2`; the dees are
/// either side of it out to `dee_radius` in the x-z plane. The magnetic field
/// points along +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cyclotron {
    pub mass: Scalar,
    pub charge: Scalar,
    pub magnetic_field: Scalar,
    pub potential: Scalar,
    pub gap_width: Scalar,
    pub dee_radius: Scalar,
}

impl Cyclotron {
    /// Time for one revolution, `2πm / (|q|·B)`.
    pub fn period(&self) -> Scalar {
        let denominator = self.charge.abs() * self.magnetic_field;
        if denominator == 0.0 {
            return Scalar::INFINITY;
        }
        2.0 * PI * self.mass / denominator
    }

    /// Number of completed half revolutions after `elapsed` seconds.
    pub fn half_cycles(&self, elapsed: Scalar) -> u64 {
        let half_period = self.period() / 2.0;
        if !half_period.is_finite() || half_period <= 0.0 {
            return 0;
        }
        libm::floor(elapsed.max(0.0) / half_period) as u64
    }

    /// Potential across the gap at time `elapsed`, `V·cos(2πt/T)`.
    pub fn alternating_potential(&self, elapsed: Scalar) -> Scalar {
        let period = self.period();
        if !period.is_finite() || period <= 0.0 {
            return self.potential;
        }
        self.potential * libm::cos(2.0 * PI * elapsed / period)
    }

    /// Speed after `crossings` passes through the gap,
    /// `sqrt(2·n·|V|·|q| / m)`.
    pub fn speed_after_crossings(&self, crossings: u32) -> Scalar {
        if self.mass == 0.0 {
            return 0.0;
        }
        libm::sqrt(
            2.0 * Scalar::from(crossings) * self.potential.abs() * self.charge.abs() / self.mass,
        )
    }

    /// Time spent crossing the gap while gaining `speed_gain`,
    /// `d·m·Δv / (|V|·|q|)`.
    pub fn gap_transit_time(&self, speed_gain: Scalar) -> Scalar {
        let denominator = self.potential.abs() * self.charge.abs();
        if denominator == 0.0 {
            return 0.0;
        }
        self.gap_width * self.mass * speed_gain.abs() / denominator
    }

    /// Magnetic acceleration inside a dee; zero in the gap and outside.
    pub fn magnetic_acceleration(&self, position: Vector, velocity: Vector) -> Vector {
        if !self.in_dee(position) {
            return Vector::ZERO;
        }
        lorentz_acceleration(
            velocity,
            Vector::Y * self.magnetic_field,
            self.charge,
            self.mass,
        )
    }

    #[inline]
    pub fn in_gap(&self, position: Vector) -> bool {
        position.x.abs() <= self.gap_width / 2.0
    }

    #[inline]
    pub fn in_dee(&self, position: Vector) -> bool {
        !self.in_gap(position) && !self.has_escaped(position)
    }

    /// True once the particle has left the dees in the x-z plane.
    #[inline]
    pub fn has_escaped(&self, position: Vector) -> bool {
        libm::hypot(position.x, position.z) > self.dee_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lorentz_is_perpendicular_and_scaled() {
        let velocity = Vector::new(3.0, 0.0, 0.0);
        let field = Vector::new(0.0, 2.0, 0.0);

        let acceleration = lorentz_acceleration(velocity, field, 1.5, 0.5);

        assert!(acceleration.dot(velocity).abs() < 1e-12);
        // |v|·B·q/m = 3·2·1.5/0.5
        assert!((acceleration.length() - 18.0).abs() < 1e-12);
        // x × y = z
        assert!(acceleration.z > 0.0);
    }

    #[test]
    fn test_lorentz_parallel_velocity_has_no_force() {
        let acceleration = lorentz_acceleration(Vector::Y, Vector::Y, 1.0, 1.0);
        assert_eq!(acceleration, Vector::ZERO);
    }

    #[test]
    fn test_negative_charge_bends_the_other_way() {
        let positive = lorentz_acceleration(Vector::X, Vector::Y, 1.0, 1.0);
        let negative = lorentz_acceleration(Vector::X, Vector::Y, -1.0, 1.0);
        assert_eq!(positive, -negative);
    }

    #[test]
    fn test_coulomb_like_charges_repel() {
        let force = coulomb_force(Vector::ZERO, 1e-6, Vector::new(2.0, 0.0, 0.0), 1e-6)
            .expect("charges are apart");

        let expected = COULOMB_CONSTANT * 1e-12 / 4.0;
        assert!(force.x > 0.0);
        assert!((force.x - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_coulomb_coincident_charges() {
        assert!(coulomb_force(Vector::ONE, 1.0, Vector::ONE, 1.0).is_none());
    }

    #[test]
    fn test_coulomb_field_cutoff() {
        let field = CoulombField {
            source_position: Vector::ZERO,
            source_charge: ELEMENTARY_CHARGE,
            charge: ELEMENTARY_CHARGE,
            mass: PROTON_MASS,
            cutoff: 1.0,
        };

        assert_eq!(field.at(Vector::new(2.0, 0.0, 0.0), Vector::ZERO), Vector::ZERO);
        assert!(field.at(Vector::new(0.5, 0.0, 0.0), Vector::ZERO).x > 0.0);
    }

    #[test]
    fn test_centripetal_magnitude() {
        let field = CentripetalField {
            centre: Vector::ZERO,
            radius: 2.0,
        };

        let acceleration = field.at(Vector::new(2.0, 0.0, 0.0), Vector::new(0.0, 0.0, 4.0));

        assert!((acceleration - Vector::new(-8.0, 0.0, 0.0)).length() < 1e-12);
    }

    fn cyclotron() -> Cyclotron {
        Cyclotron {
            mass: 2.0,
            charge: 1.0,
            magnetic_field: 1.0,
            potential: 4.0,
            gap_width: 2.0,
            dee_radius: 50.0,
        }
    }

    #[test]
    fn test_cyclotron_speed_schedule() {
        let cyclotron = cyclotron();

        assert_eq!(cyclotron.speed_after_crossings(0), 0.0);
        assert!((cyclotron.speed_after_crossings(1) - 2.0).abs() < 1e-12);
        assert!((cyclotron.speed_after_crossings(4) - 4.0).abs() < 1e-12);
        // d·m·Δv / (V·q) = 2·2·2 / 4
        assert!((cyclotron.gap_transit_time(2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cyclotron_period_and_potential() {
        let cyclotron = cyclotron();
        let period = cyclotron.period();

        assert!((period - 4.0 * PI).abs() < 1e-12);
        assert_eq!(cyclotron.half_cycles(period * 1.25), 2);
        assert!((cyclotron.alternating_potential(period / 2.0) + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cyclotron_regions() {
        let cyclotron = cyclotron();

        assert!(cyclotron.in_gap(Vector::new(0.5, 0.0, 30.0)));
        assert!(cyclotron.in_dee(Vector::new(10.0, 0.0, 5.0)));
        assert!(cyclotron.has_escaped(Vector::new(40.0, 0.0, 40.0)));
        assert_eq!(
            cyclotron.magnetic_acceleration(Vector::new(0.5, 0.0, 0.0), Vector::Z),
            Vector::ZERO
        );
        assert_ne!(
            cyclotron.magnetic_acceleration(Vector::new(10.0, 0.0, 0.0), Vector::Z),
            Vector::ZERO
        );
    }
}
