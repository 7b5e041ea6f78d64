//! Symplectic Euler integration method

use super::{AccelerationField, Integrator};
use crate::physics::math::{Scalar, Vector};

/// Symplectic Euler integrator (also known as semi-implicit Euler)
///
/// Velocity is updated first and the new velocity then moves the position:
///
/// ```text
/// a(t) = F(x(t), v(t)) / m
/// v(t+dt) = v(t) + a(t) * dt
/// x(t+dt) = x(t) + v(t+dt) * dt
/// ```
///
/// First order, but its energy error stays bounded for orbits, which keeps
/// circular motion and Coulomb scattering from spiralling outward.
#[derive(Debug, Copy, Clone, Default)]
pub struct SymplecticEuler;

impl Integrator for SymplecticEuler {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(
        &self,
        position: &mut Vector,
        velocity: &mut Vector,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> Vector {
        let acceleration = field.at(*position, *velocity);

        *velocity += acceleration * dt;
        *position += *velocity * dt;

        acceleration
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "symplectic_euler"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["euler", "semi_implicit_euler"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::UniformField;

    struct Spring {
        k: Scalar,
    }

    impl AccelerationField for Spring {
        fn at(&self, position: Vector, _velocity: Vector) -> Vector {
            -position * self.k
        }
    }

    #[test]
    fn test_symplectic_euler_simple_step() {
        let integrator = SymplecticEuler;

        let mut position = Vector::new(1.0, 0.0, 0.0);
        let mut velocity = Vector::new(0.0, 1.0, 0.0);
        let field = UniformField(Vector::new(0.0, 0.0, -9.81));
        let dt = 0.01;

        integrator.step(&mut position, &mut velocity, &field, dt);

        // Velocity first, then position with the new velocity
        assert_eq!(velocity.x, 0.0);
        assert_eq!(velocity.y, 1.0);
        assert!((velocity.z - -0.0981).abs() < 1e-12);

        assert!((position.x - 1.0).abs() < 1e-12);
        assert!((position.y - 0.01).abs() < 1e-12);
        assert!((position.z - -0.000981).abs() < 1e-12);
    }

    #[test]
    fn test_energy_stays_bounded_for_oscillator() {
        let integrator = SymplecticEuler;
        let field = Spring { k: 1.0 };

        let mut position = Vector::new(1.0, 0.0, 0.0);
        let mut velocity = Vector::ZERO;
        let dt = 0.01;
        let energy = |x: Vector, v: Vector| 0.5 * v.length_squared() + 0.5 * x.length_squared();
        let initial = energy(position, velocity);

        let mut max_error: Scalar = 0.0;
        for _ in 0..100_000 {
            integrator.step(&mut position, &mut velocity, &field, dt);
            let error = (energy(position, velocity) - initial).abs() / initial;
            max_error = max_error.max(error);
        }

        assert!(
            max_error < 0.01,
            "Energy error should stay bounded, got {max_error}"
        );
    }

    #[test]
    fn test_properties() {
        let integrator = SymplecticEuler;
        assert_eq!(integrator.name(), "symplectic_euler");
        assert_eq!(integrator.convergence_order(), 1);
        assert_eq!(integrator.aliases(), vec!["euler", "semi_implicit_euler"]);
    }
}
