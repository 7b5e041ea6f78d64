//! Second-order update under an acceleration held constant over the step

use super::{AccelerationField, Integrator};
use crate::physics::math::{Scalar, Vector};

/// Constant-acceleration ("suvat") integrator
///
/// Treats the acceleration sampled at the start of the step as constant for
/// the whole step, which makes the position update exact for uniform fields
/// such as gravity:
///
/// ```text
/// a = F(x(t), v(t)) / m
/// x(t+dt) = x(t) + v(t)*dt + 0.5*a*dt²
/// v(t+dt) = v(t) + a*dt
/// ```
///
/// With zero acceleration the position advances by exactly `v*dt`, so there
/// is no drift between two sample times.
#[derive(Debug, Copy, Clone, Default)]
pub struct ConstantAcceleration;

impl Integrator for ConstantAcceleration {
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

        *position += *velocity * dt + acceleration * (0.5 * dt * dt);
        *velocity += acceleration * dt;

        acceleration
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "constant_acceleration"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["suvat", "taylor"]
    }
}
