//! The simulation variants behind a single polymorphic interface

use crate::config::SimulationConfig;
use crate::export::CsvTable;
use crate::physics::components::Particle;
use crate::physics::integrators::{Integrator, IntegratorRegistry};
use crate::physics::math::{Scalar, Vector};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

pub mod circular_motion;
pub mod clock;
pub mod collisions;
pub mod cyclotron;
pub mod interference;
pub mod nuclear_decay;
pub mod projectile;
pub mod runner;
pub mod scattering;
pub mod snells_law;

pub use circular_motion::CircularMotionSimulation;
pub use clock::SimulationClock;
pub use collisions::CollisionsSimulation;
pub use cyclotron::CyclotronSimulation;
pub use interference::InterferenceSimulation;
pub use nuclear_decay::NuclearDecaySimulation;
pub use projectile::ProjectileSimulation;
pub use runner::SimulationRunner;
pub use scattering::ScatteringSimulation;
pub use snells_law::SnellsLawSimulation;

/// A physical model that can be started, stepped and inspected
///
/// The host calls `init` once per (re)start and `step` once per frame, then
/// reads `state` to draw and chart. Parameters that may change while running
/// are picked up through `apply_live`.
pub trait Simulation: Send + Sync {
    fn kind(&self) -> SimulationKind;

    /// Discard all state and start again from `config`.
    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError>;

    /// Advance by `dt` seconds of simulated time.
    fn step(&mut self, dt: Scalar);

    /// Snapshot of everything a renderer or chart needs.
    fn state(&self) -> SimulationState;

    /// Pick up parameters that are allowed to change mid-run.
    fn apply_live(&mut self, _config: &SimulationConfig) {}

    /// Multiplier from wall-clock seconds to simulated seconds.
    fn time_scale(&self) -> Scalar {
        1.0
    }

    /// True once the run has reached its natural end.
    fn is_finished(&self) -> bool {
        false
    }

    /// Tabulated records for export, if this model keeps any.
    fn export(&self) -> Option<CsvTable> {
        None
    }
}

/// How a simulation is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Flat canvas with charts
    TwoD,
    /// Perspective scene with an orbit camera
    ThreeD,
}

/// Every available simulation, with its presentation declared up front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    Projectile,
    Collisions,
    CircularMotion,
    Cyclotron,
    Scattering,
    SnellsLaw,
    NuclearDecay,
    Interference,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 8] = [
        SimulationKind::Projectile,
        SimulationKind::Collisions,
        SimulationKind::CircularMotion,
        SimulationKind::Cyclotron,
        SimulationKind::Scattering,
        SimulationKind::SnellsLaw,
        SimulationKind::NuclearDecay,
        SimulationKind::Interference,
    ];

    /// Name used in configuration files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            SimulationKind::Projectile => "projectile",
            SimulationKind::Collisions => "collisions",
            SimulationKind::CircularMotion => "circular_motion",
            SimulationKind::Cyclotron => "cyclotron",
            SimulationKind::Scattering => "scattering",
            SimulationKind::SnellsLaw => "snells_law",
            SimulationKind::NuclearDecay => "nuclear_decay",
            SimulationKind::Interference => "interference",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SimulationKind::Projectile => "Projectile Motion",
            SimulationKind::Collisions => "Collisions",
            SimulationKind::CircularMotion => "Circular Motion",
            SimulationKind::Cyclotron => "Cyclotron",
            SimulationKind::Scattering => "Rutherford Scattering",
            SimulationKind::SnellsLaw => "Snell's Law",
            SimulationKind::NuclearDecay => "Nuclear Decay",
            SimulationKind::Interference => "Interference",
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            SimulationKind::NuclearDecay | SimulationKind::Interference => Dimension::TwoD,
            _ => Dimension::ThreeD,
        }
    }

    /// Static scenes are recomputed from their inputs every frame rather
    /// than evolved in time.
    pub fn is_static(self) -> bool {
        matches!(self, SimulationKind::SnellsLaw)
    }

    /// Build this simulation with default parameters. Call `init` before
    /// stepping to apply a configuration.
    pub fn create(self) -> Box<dyn Simulation> {
        match self {
            SimulationKind::Projectile => Box::<ProjectileSimulation>::default(),
            SimulationKind::Collisions => Box::<CollisionsSimulation>::default(),
            SimulationKind::CircularMotion => Box::<CircularMotionSimulation>::default(),
            SimulationKind::Cyclotron => Box::<CyclotronSimulation>::default(),
            SimulationKind::Scattering => Box::<ScatteringSimulation>::default(),
            SimulationKind::SnellsLaw => Box::<SnellsLawSimulation>::default(),
            SimulationKind::NuclearDecay => Box::<NuclearDecaySimulation>::default(),
            SimulationKind::Interference => Box::<InterferenceSimulation>::default(),
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimulationKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| {
                let available: Vec<&str> = Self::ALL.iter().map(|kind| kind.name()).collect();
                format!(
                    "Unknown simulation: '{}'. Available simulations: {}",
                    name,
                    available.join(", ")
                )
            })
    }
}

/// Errors raised while setting up a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A named integrator could not be resolved
    UnknownIntegrator(String),
    /// A parameter that cannot be coerced into something usable
    InvalidParameter { name: &'static str, reason: String },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::UnknownIntegrator(msg) => write!(f, "{msg}"),
            SimulationError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Reject NaN and infinite inputs, which no coercion can make physical.
pub(crate) fn require_finite(name: &'static str, value: Scalar) -> Result<Scalar, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::InvalidParameter {
            name,
            reason: format!("expected a finite number, got {value}"),
        })
    }
}

/// Reject a user vector with any non-finite component.
pub(crate) fn require_finite_vector(
    name: &'static str,
    value: [Scalar; 3],
) -> Result<[Scalar; 3], SimulationError> {
    for component in value {
        require_finite(name, component)?;
    }
    Ok(value)
}

/// Look up the integrator named in a configuration section.
pub(crate) fn resolve_integrator(name: &str) -> Result<Box<dyn Integrator>, SimulationError> {
    IntegratorRegistry::default()
        .create(name)
        .map_err(SimulationError::UnknownIntegrator)
}

/// A drawable body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vector,
    pub velocity: Vector,
    pub radius: Scalar,
}

impl From<&Particle> for Body {
    fn from(particle: &Particle) -> Self {
        Self {
            position: particle.position,
            velocity: particle.velocity,
            radius: particle.radius,
        }
    }
}

/// A polyline, optionally continuing to infinity from its last point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub points: Vec<Vector>,
    pub open_direction: Option<Vector>,
}

/// A labelled numeric read-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub label: &'static str,
    pub value: Scalar,
    pub unit: &'static str,
}

impl Readout {
    pub const fn new(label: &'static str, value: Scalar, unit: &'static str) -> Self {
        Self { label, value, unit }
    }
}

/// Everything the host reads after a step
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub kind: SimulationKind,
    /// Simulated seconds since `init`
    pub time: Scalar,
    pub bodies: Vec<Body>,
    pub paths: Vec<Path>,
    pub readouts: Vec<Readout>,
}

impl SimulationState {
    pub fn new(kind: SimulationKind, time: Scalar) -> Self {
        Self {
            kind,
            time,
            bodies: Vec::new(),
            paths: Vec::new(),
            readouts: Vec::new(),
        }
    }

    /// Value of the first read-out with this label.
    pub fn readout(&self, label: &str) -> Option<Scalar> {
        self.readouts
            .iter()
            .find(|readout| readout.label == label)
            .map(|readout| readout.value)
    }
}

/// Fixed-capacity series that drops its oldest entries
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    samples: VecDeque<T>,
    limit: usize,
}

impl<T> History<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(limit.min(4096)),
            limit,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.limit == 0 {
            return;
        }
        while self.samples.len() >= self.limit {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(0)
    }
}
