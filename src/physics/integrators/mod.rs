//! Numerical integration methods for particle motion

use crate::physics::math::{Scalar, Vector};

pub mod constant_acceleration;
pub mod registry;
pub mod symplectic_euler;

pub use constant_acceleration::ConstantAcceleration;
pub use registry::IntegratorRegistry;
pub use symplectic_euler::SymplecticEuler;

/// Acceleration as a function of the current kinematic state
///
/// Taking both position and velocity lets the same integrators drive
/// position-dependent laws (centripetal, Coulomb) and velocity-dependent
/// ones (Lorentz).
pub trait AccelerationField {
    fn at(&self, position: Vector, velocity: Vector) -> Vector;
}

/// A field that is the same everywhere, e.g. gravity near the ground
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformField(pub Vector);

impl AccelerationField for UniformField {
    #[inline]
    fn at(&self, _position: Vector, _velocity: Vector) -> Vector {
        self.0
    }
}

/// Base trait for all integrators
pub trait Integrator: Send + Sync {
    /// Create a boxed clone of this integrator
    fn clone_box(&self) -> Box<dyn Integrator>;

    /// Advance a single particle's state by one time step
    ///
    /// # Arguments
    /// * `position` - Mutable reference to position
    /// * `velocity` - Mutable reference to velocity vector
    /// * `field` - Acceleration field evaluated at the current state
    /// * `dt` - Time step
    ///
    /// Returns the acceleration that was applied.
    fn step(
        &self,
        position: &mut Vector,
        velocity: &mut Vector,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> Vector;

    /// Order of the global error for smooth, position-dependent fields
    fn convergence_order(&self) -> usize;

    /// Canonical name used in configuration files
    fn name(&self) -> &'static str;

    /// Alternative names accepted by the registry
    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

impl Clone for Box<dyn Integrator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
