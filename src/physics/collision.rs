//! Pairwise impulse exchange along the line of centres

use crate::physics::components::Particle;
use crate::physics::kinematics::Axis;
use crate::physics::math::{Scalar, Vector, decompose, round_to};
use bevy::log::debug;

/// Pre- and post-collision momentum components of a particle pair
///
/// Stored as `[pax, pbx, pay, pby, paz, pbz]` before and after the impulse, in
/// the user's z-up frame so exported tables read the same way the inputs do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRecord {
    pub before: [Scalar; 6],
    pub after: [Scalar; 6],
}

impl CollisionRecord {
    pub const HEADER: [&'static str; 12] = [
        "pax", "pbx", "pay", "pby", "paz", "pbz", "pax'", "pbx'", "pay'", "pby'", "paz'", "pbz'",
    ];

    fn momenta(a: &Particle, b: &Particle) -> [Scalar; 6] {
        let pa = a.momentum();
        let pb = b.momentum();
        // Engine y is the user's z axis
        [pa.x, pb.x, pa.z, pb.z, pa.y, pb.y]
    }

    /// All twelve values in export column order.
    pub fn values(&self) -> [Scalar; 12] {
        let mut values = [0.0; 12];
        values[..6].copy_from_slice(&self.before);
        values[6..].copy_from_slice(&self.after);
        values
    }
}

/// Resolves contacts between two particles with a coefficient of restitution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    /// 1 is perfectly elastic, 0 perfectly inelastic along the normal
    pub restitution: Scalar,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self { restitution: 1.0 }
    }
}

impl CollisionResolver {
    pub fn new(restitution: Scalar) -> Self {
        Self {
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// True when the two spheres touch or overlap.
    #[inline]
    pub fn in_contact(a: &Particle, b: &Particle) -> bool {
        a.position.distance(b.position) <= a.radius + b.radius
    }

    /// Resolve a contact between `a` and `b`, if there is one.
    ///
    /// Overlapping particles are pushed apart symmetrically along the normal
    /// by half the overlap each. Velocities are exchanged along the normal
    /// only while the pair is still approaching, so a pair that is already
    /// separating after a previous frame's impulse is not swapped back.
    /// Coincident centres have no defined normal and are skipped.
    pub fn resolve(&self, a: &mut Particle, b: &mut Particle) -> Option<CollisionRecord> {
        let offset = b.position - a.position;
        let distance = offset.length();
        let contact_distance = a.radius + b.radius;

        if distance > contact_distance {
            return None;
        }
        if distance <= Scalar::EPSILON {
            debug!("Skipping collision between coincident particles");
            return None;
        }

        let normal = offset / distance;

        let overlap = contact_distance - distance;
        if overlap > 0.0 {
            a.position -= normal * (overlap * 0.5);
            b.position += normal * (overlap * 0.5);
        }

        let (v1n, v1t) = decompose(a.velocity, normal);
        let (v2n, v2t) = decompose(b.velocity, normal);

        if v1n - v2n <= 0.0 {
            return None;
        }

        let before = CollisionRecord::momenta(a, b);
        let (v1n_after, v2n_after) = self.exchange(a.mass, b.mass, v1n, v2n);

        a.velocity = v1t + normal * v1n_after;
        b.velocity = v2t + normal * v2n_after;

        debug!(
            "Collision resolved: normal speeds ({v1n:.3}, {v2n:.3}) -> ({v1n_after:.3}, {v2n_after:.3})"
        );

        Some(CollisionRecord {
            before,
            after: CollisionRecord::momenta(a, b),
        })
    }

    /// One-dimensional exchange of the normal velocity components.
    pub fn exchange(&self, m1: Scalar, m2: Scalar, v1n: Scalar, v2n: Scalar) -> (Scalar, Scalar) {
        let e = self.restitution;
        let total = m1 + m2;
        if total <= 0.0 {
            return (v1n, v2n);
        }

        let v1n_after = (m1 * v1n - e * m2 * v1n + m2 * v2n + e * m2 * v2n) / total;
        let v2n_after = (m2 * v2n - e * m1 * v2n + m1 * v1n + e * m1 * v1n) / total;
        (v1n_after, v2n_after)
    }
}

/// Reflect a particle off the walls of the cube `[-half_extent, half_extent]³`.
///
/// Each axis is handled independently: the coordinate is clamped to the wall
/// and the velocity component on that axis is reversed.
pub fn reflect_at_edges(particle: &mut Particle, half_extent: Scalar) {
    for axis in Axis::ALL {
        let i = axis.index();
        if particle.position[i] > half_extent {
            particle.velocity[i] = -particle.velocity[i];
            particle.position[i] = half_extent;
        } else if particle.position[i] < -half_extent {
            particle.velocity[i] = -particle.velocity[i];
            particle.position[i] = -half_extent;
        }
    }
}

/// True when every particle's speed rounds to zero at `decimals` places.
pub fn all_at_rest<'a>(particles: impl IntoIterator<Item = &'a Particle>, decimals: u32) -> bool {
    particles
        .into_iter()
        .all(|particle| round_to(particle.speed(), decimals) == 0.0)
}

/// Total momentum of a set of particles.
pub fn total_momentum<'a>(particles: impl IntoIterator<Item = &'a Particle>) -> Vector {
    particles.into_iter().map(Particle::momentum).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_on(e: Scalar, m1: Scalar, m2: Scalar) -> (Particle, Particle, CollisionResolver) {
        let a = Particle::new(m1, Vector::new(-1.0, 0.0, 0.0), Vector::new(2.0, 0.5, 0.0))
            .with_radius(1.0);
        let b = Particle::new(m2, Vector::new(1.0, 0.0, 0.0), Vector::new(-3.0, 0.0, 1.0))
            .with_radius(1.0);
        (a, b, CollisionResolver::new(e))
    }

    #[test]
    fn test_elastic_conserves_momentum_and_energy() {
        let (mut a, mut b, resolver) = head_on(1.0, 1.5, 4.0);
        let momentum = total_momentum([&a, &b]);
        let energy = a.kinetic_energy() + b.kinetic_energy();

        resolver.resolve(&mut a, &mut b).expect("particles touch");

        assert!((total_momentum([&a, &b]) - momentum).length() < 1e-9);
        let after = a.kinetic_energy() + b.kinetic_energy();
        assert!((after - energy).abs() / energy < 1e-9);
    }

    #[test]
    fn test_inelastic_leaves_no_relative_normal_velocity() {
        let (mut a, mut b, resolver) = head_on(0.0, 2.0, 3.0);

        resolver.resolve(&mut a, &mut b).expect("particles touch");

        let normal = Vector::X;
        assert!((a.velocity.dot(normal) - b.velocity.dot(normal)).abs() < 1e-12);
        // Tangential parts pass through
        assert_eq!(a.velocity.y, 0.5);
        assert_eq!(b.velocity.z, 1.0);
    }

    #[test]
    fn test_overlap_is_split_evenly() {
        let mut a = Particle::new(1.0, Vector::new(-0.5, 0.0, 0.0), Vector::X).with_radius(1.0);
        let mut b = Particle::new(1.0, Vector::new(0.5, 0.0, 0.0), -Vector::X).with_radius(1.0);

        CollisionResolver::default().resolve(&mut a, &mut b);

        assert!((a.position.x - -1.0).abs() < 1e-12);
        assert!((b.position.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_separating_pair_is_not_swapped_back() {
        let mut a = Particle::new(1.0, Vector::new(-0.5, 0.0, 0.0), -Vector::X).with_radius(1.0);
        let mut b = Particle::new(1.0, Vector::new(0.5, 0.0, 0.0), Vector::X).with_radius(1.0);

        let record = CollisionResolver::default().resolve(&mut a, &mut b);

        assert!(record.is_none());
        assert_eq!(a.velocity, -Vector::X);
        assert_eq!(b.velocity, Vector::X);
    }

    #[test]
    fn test_coincident_centres_are_skipped() {
        let mut a = Particle::new(1.0, Vector::ZERO, Vector::X);
        let mut b = Particle::new(1.0, Vector::ZERO, -Vector::X);

        assert!(CollisionResolver::default().resolve(&mut a, &mut b).is_none());
        assert!(a.velocity.is_finite() && b.velocity.is_finite());
    }

    #[test]
    fn test_record_uses_user_frame_columns() {
        let (mut a, mut b, resolver) = head_on(1.0, 1.0, 1.0);
        let record = resolver.resolve(&mut a, &mut b).expect("particles touch");

        // Engine y of A (0.5) is the user's z momentum of A
        assert_eq!(record.before, [2.0, -3.0, 0.0, 1.0, 0.5, 0.0]);
        assert_eq!(record.after[0], -3.0);
        assert_eq!(record.after[1], 2.0);
        assert_eq!(record.values().len(), CollisionRecord::HEADER.len());
    }

    #[test]
    fn test_edge_reflection_per_axis() {
        let mut particle = Particle::new(1.0, Vector::new(12.0, -11.0, 3.0), Vector::new(1.0, -2.0, 3.0));

        reflect_at_edges(&mut particle, 10.0);

        assert_eq!(particle.position, Vector::new(10.0, -10.0, 3.0));
        assert_eq!(particle.velocity, Vector::new(-1.0, 2.0, 3.0));
    }

    #[test]
    fn test_at_rest_rounding() {
        let slow = Particle::new(1.0, Vector::ZERO, Vector::new(0.004, 0.0, 0.0));
        let moving = Particle::new(1.0, Vector::ZERO, Vector::new(0.01, 0.0, 0.0));

        assert!(all_at_rest([&slow, &slow], 2));
        assert!(!all_at_rest([&slow, &moving], 2));
    }
}
