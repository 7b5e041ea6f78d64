//! Accuracy tests for numerical integrators
//!
//! Tests each integrator against known analytical solutions and verifies
//! expected order of convergence.

use physicsim::physics::integrators::{
    AccelerationField, ConstantAcceleration, Integrator, IntegratorRegistry, SymplecticEuler,
    UniformField,
};
use physicsim::physics::math::{Scalar, Vector};

const PI: Scalar = std::f64::consts::PI;

/// Test fixture for a simple harmonic oscillator
///
/// With initial conditions x(0) = A, v(0) = 0:
/// x(t) = A * cos(ωt)
/// v(t) = -A * ω * sin(ωt)
struct HarmonicOscillator {
    omega: Scalar,
    amplitude: Scalar,
}

impl HarmonicOscillator {
    fn new(omega: Scalar, amplitude: Scalar) -> Self {
        Self { omega, amplitude }
    }

    /// Analytical position at time t
    fn exact_position(&self, t: Scalar) -> Vector {
        Vector::new(self.amplitude * (self.omega * t).cos(), 0.0, 0.0)
    }

    /// Total energy per unit mass
    fn energy(&self, position: Vector, velocity: Vector) -> Scalar {
        let kinetic = 0.5 * velocity.length_squared();
        let potential = 0.5 * self.omega * self.omega * position.length_squared();
        kinetic + potential
    }
}

impl AccelerationField for HarmonicOscillator {
    fn at(&self, position: Vector, _velocity: Vector) -> Vector {
        -self.omega * self.omega * position
    }
}

/// Run the oscillator from rest at its amplitude and return the final position
fn simulate_harmonic_oscillator(
    integrator: &dyn Integrator,
    oscillator: &HarmonicOscillator,
    dt: Scalar,
    steps: usize,
) -> Vector {
    let mut position = Vector::new(oscillator.amplitude, 0.0, 0.0);
    let mut velocity = Vector::ZERO;
    for _ in 0..steps {
        integrator.step(&mut position, &mut velocity, oscillator, dt);
    }
    position
}

/// Largest relative energy error seen over a run
fn max_energy_error(integrator: &dyn Integrator, dt: Scalar, steps: usize) -> Scalar {
    let oscillator = HarmonicOscillator::new(2.0 * PI, 1.0);
    let mut position = Vector::new(1.0, 0.0, 0.0);
    let mut velocity = Vector::ZERO;
    let initial_energy = oscillator.energy(position, velocity);

    let mut max_error = 0.0f64;
    for _ in 0..steps {
        integrator.step(&mut position, &mut velocity, &oscillator, dt);
        let error = ((oscillator.energy(position, velocity) - initial_energy) / initial_energy).abs();
        max_error = max_error.max(error);
    }
    max_error
}

fn measured_orders(integrator: &dyn Integrator) -> Vec<Scalar> {
    let oscillator = HarmonicOscillator::new(1.0, 1.0);
    let errors: Vec<Scalar> = [0.1, 0.05, 0.025, 0.0125]
        .into_iter()
        .map(|dt| {
            let steps = (1.0 / dt) as usize;
            let position = simulate_harmonic_oscillator(integrator, &oscillator, dt, steps);
            (position - oscillator.exact_position(1.0)).length()
        })
        .collect();

    errors
        .windows(2)
        .map(|pair| (pair[0] / pair[1]).log2())
        .collect()
}

#[test]
fn test_constant_acceleration_is_exact_under_gravity() {
    let gravity = Vector::new(0.0, -9.81, 0.0);
    let field = UniformField(gravity);
    let start = Vector::new(0.0, 20.0, 0.0);
    let launch = Vector::new(3.0, 10.0, -1.0);

    let mut position = start;
    let mut velocity = launch;
    let dt = 1.0 / 30.0;
    let steps = 45;
    for _ in 0..steps {
        ConstantAcceleration.step(&mut position, &mut velocity, &field, dt);
    }

    let t = dt * steps as Scalar;
    let exact_position = start + launch * t + gravity * (0.5 * t * t);
    let exact_velocity = launch + gravity * t;
    assert!((position - exact_position).length() < 1e-12);
    assert!((velocity - exact_velocity).length() < 1e-12);
}

#[test]
fn test_zero_field_moves_at_constant_velocity() {
    let velocity = Vector::new(2.0, 0.0, -0.5);
    for integrator in [
        Box::new(ConstantAcceleration) as Box<dyn Integrator>,
        Box::new(SymplecticEuler),
    ] {
        let mut position = Vector::ZERO;
        let mut v = velocity;
        for _ in 0..300 {
            integrator.step(&mut position, &mut v, &UniformField(Vector::ZERO), 0.01);
        }
        assert_eq!(v, velocity, "{}", integrator.name());
        assert!((position - velocity * 3.0).length() < 1e-12);
    }
}

#[test]
fn test_symplectic_euler_energy_conservation() {
    let max_error = max_energy_error(&SymplecticEuler, 0.001, 10_000);

    // Symplectic Euler should conserve energy to within ~1% for this test
    assert!(
        max_error < 0.01,
        "Energy drift too large: {:.2}%",
        max_error * 100.0
    );
}

#[test]
fn test_constant_acceleration_drifts_on_oscillators() {
    let symplectic = max_energy_error(&SymplecticEuler, 0.001, 10_000);
    let constant = max_energy_error(&ConstantAcceleration, 0.001, 10_000);

    assert!(
        constant > 10.0 * symplectic,
        "constant acceleration {constant}, symplectic {symplectic}"
    );
}

#[test]
fn test_symplectic_euler_order() {
    for order in measured_orders(&SymplecticEuler) {
        assert!(
            order > 0.8 && order < 1.5,
            "Unexpected convergence order: {order}"
        );
    }
}

#[test]
fn test_constant_acceleration_order() {
    let integrator = ConstantAcceleration;
    for order in measured_orders(&integrator) {
        assert!(
            (order - integrator.convergence_order() as Scalar).abs() < 0.2,
            "Unexpected convergence order: {order}"
        );
    }
}

#[test]
fn test_registry_resolves_names_and_aliases() {
    let registry = IntegratorRegistry::default();
    assert_eq!(
        registry.create("suvat").unwrap().name(),
        "constant_acceleration"
    );
    assert_eq!(registry.create("euler").unwrap().name(), "symplectic_euler");

    let error = registry.create("rk4").err().unwrap();
    assert!(error.contains("constant_acceleration"));
}
