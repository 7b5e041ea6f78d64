//! Per-nucleus Monte Carlo radioactive decay

use crate::physics::math::Scalar;
use rand::Rng;

/// One reading of the simulated and modelled nucleus counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySample {
    pub t: Scalar,
    pub n: u64,
    /// Analytic `N0·e^(-λt)` at the same time
    pub model: Scalar,
}

/// Probability that a single nucleus decays within `dt`, `1 - e^(-λ·dt)`.
pub fn decay_probability(lambda: Scalar, dt: Scalar) -> Scalar {
    1.0 - libm::exp(-lambda * dt)
}

/// Time at which the model curve falls to half a nucleus,
/// `ln(0.5 / N0) / -λ`. Zero when there is nothing to decay.
pub fn batch_horizon(n0: u64, lambda: Scalar) -> Scalar {
    if n0 == 0 || lambda <= 0.0 {
        return 0.0;
    }
    libm::log(0.5 / n0 as Scalar) / -lambda
}

/// Surviving nuclei and elapsed time of a decaying sample
///
/// `n` never increases and always stays within `0..=n0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayState {
    n: u64,
    n0: u64,
    lambda: Scalar,
    t: Scalar,
}

impl DecayState {
    /// A negative decay constant is coerced to its absolute value.
    pub fn new(n0: u64, lambda: Scalar) -> Self {
        Self {
            n: n0,
            n0,
            lambda: lambda.abs(),
            t: 0.0,
        }
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn n0(&self) -> u64 {
        self.n0
    }

    pub fn lambda(&self) -> Scalar {
        self.lambda
    }

    pub fn t(&self) -> Scalar {
        self.t
    }

    /// Closed-form expected count at time `t`.
    pub fn model(&self, t: Scalar) -> Scalar {
        self.n0 as Scalar * libm::exp(-self.lambda * t)
    }

    /// Current reading.
    pub fn sample(&self) -> DecaySample {
        DecaySample {
            t: self.t,
            n: self.n,
            model: self.model(self.t),
        }
    }

    /// Advance by one interval `dt`.
    ///
    /// Every surviving nucleus draws its own uniform number and decays when
    /// the draw is at most `p = 1 - e^(-λ·dt)`. Returns the reading taken
    /// at the start of the interval.
    pub fn step<R: Rng>(&mut self, dt: Scalar, rng: &mut R) -> DecaySample {
        let reading = self.sample();
        let p = decay_probability(self.lambda, dt.max(0.0));
        if p <= 0.0 {
            self.t += dt.max(0.0);
            return reading;
        }

        let decayed = (0..self.n)
            .filter(|_| rng.random::<Scalar>() <= p)
            .count() as u64;

        self.n -= decayed.min(self.n);
        self.t += dt.max(0.0);
        reading
    }
}
