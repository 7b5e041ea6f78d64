use crate::physics::math::Scalar;
use crate::simulations::SimulationKind;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Every user-adjustable parameter, grouped per simulation
///
/// Vectors are `[x, y, z]` in the user's frame where z points up.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub runtime: RuntimeConfig,
    pub projectile: ProjectileConfig,
    pub collisions: CollisionsConfig,
    pub circular_motion: CircularMotionConfig,
    pub cyclotron: CyclotronConfig,
    pub scattering: ScatteringConfig,
    pub snells_law: SnellsLawConfig,
    pub nuclear_decay: NuclearDecayConfig,
    pub interference: InterferenceConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub simulation: SimulationKind,
    /// Target frames per second of the host loop
    pub frame_rate: Scalar,
    /// Use this step instead of measured frame time
    pub fixed_dt: Option<Scalar>,
    pub seed: Option<u64>,
    pub start_paused: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationKind::Projectile,
            frame_rate: 30.0,
            fixed_dt: None,
            seed: None,
            start_paused: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ProjectileConfig {
    pub mass: Scalar,
    pub initial_velocity: [Scalar; 3],
    pub initial_position: [Scalar; 3],
    pub gravity: Scalar,
    pub restitution: Scalar,
    /// Half-width of the floor; the run stops when the particle leaves it
    pub size: Scalar,
    pub radius_scale: Scalar,
    pub integrator: String,
    pub history_limit: usize,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            mass: 2.0,
            initial_velocity: [0.0, 0.0, 10.0],
            initial_position: [0.0, 0.0, 20.0],
            gravity: 9.81,
            restitution: 1.0,
            size: 250.0,
            radius_scale: 4.0,
            integrator: "constant_acceleration".to_string(),
            history_limit: 200,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CollisionsConfig {
    pub mass_a: Scalar,
    pub mass_b: Scalar,
    pub velocity_a: [Scalar; 3],
    pub velocity_b: [Scalar; 3],
    pub position_a: [Scalar; 3],
    pub position_b: [Scalar; 3],
    pub restitution: Scalar,
    /// Half-extent of the box in metres, before `unit_scale`
    pub size: Scalar,
    /// Display units per metre; scales both displacement and the box
    pub unit_scale: Scalar,
    pub radius_scale: Scalar,
    /// Pause once both particles have come to rest
    pub stop_when_at_rest: bool,
    pub rest_decimals: u32,
}

impl Default for CollisionsConfig {
    fn default() -> Self {
        Self {
            mass_a: 0.5,
            mass_b: 1.0,
            velocity_a: [2.5, 0.0, 0.0],
            velocity_b: [-2.5, 0.0, 0.0],
            position_a: [-20.0, 0.0, 0.0],
            position_b: [20.0, 0.0, 0.0],
            restitution: 1.0,
            size: 10.0,
            unit_scale: 10.0,
            radius_scale: 10.0,
            stop_when_at_rest: true,
            rest_decimals: 2,
        }
    }
}

/// Which input drives the circular motion speed
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpeedInput {
    #[default]
    Tangential,
    Angular,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CircularMotionConfig {
    pub mass: Scalar,
    pub radius: Scalar,
    pub tangential_speed: Scalar,
    pub angular_velocity: Scalar,
    pub speed_input: SpeedInput,
    pub unit_scale: Scalar,
    pub integrator: String,
    pub history_limit: usize,
}

impl Default for CircularMotionConfig {
    fn default() -> Self {
        Self {
            mass: 5.0,
            radius: 20.0,
            tangential_speed: 10.0,
            angular_velocity: 0.0,
            speed_input: SpeedInput::Tangential,
            unit_scale: 10.0,
            integrator: "symplectic_euler".to_string(),
            history_limit: 500,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CyclotronConfig {
    /// In units of 1e-27 kg
    pub mass: Scalar,
    /// In units of 1e-19 C
    pub charge: Scalar,
    /// Tesla
    pub magnetic_field: Scalar,
    /// Volts
    pub potential: Scalar,
    /// Applied to `potential` to keep speeds displayable
    pub potential_scale: Scalar,
    pub gap_width: Scalar,
    pub dee_radius: Scalar,
    pub trail_limit: usize,
    pub history_limit: usize,
}

impl Default for CyclotronConfig {
    fn default() -> Self {
        Self {
            mass: 1.7,
            charge: 1.6,
            magnetic_field: 1.2,
            potential: 10_000.0,
            potential_scale: 0.01,
            gap_width: 2.0,
            dee_radius: 150.0,
            trail_limit: 300,
            history_limit: 500,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScatteringConfig {
    pub proton_number: u32,
    /// Launch speed of every alpha particle in m/s
    pub alpha_speed: Scalar,
    /// The grid holds `(grid_size + 1)²` alpha particles
    pub grid_size: u32,
    /// Metres between neighbouring alpha particles
    pub grid_spacing: Scalar,
    /// Metres upstream of the nucleus at which alphas start
    pub start_distance: Scalar,
    /// Beyond this distance the Coulomb force is not evaluated
    pub coulomb_cutoff: Scalar,
    /// Simulated seconds per real second
    pub time_scale: Scalar,
    pub nucleus_recoil: bool,
    /// Alphas farther than this from the nucleus count as scattered
    pub escape_distance: Scalar,
    pub trail_limit: usize,
}

impl Default for ScatteringConfig {
    fn default() -> Self {
        Self {
            proton_number: 79,
            alpha_speed: 1.0e7,
            grid_size: 4,
            grid_spacing: 25.0e-15,
            start_distance: 1_000.0e-15,
            coulomb_cutoff: 1.0e-11,
            time_scale: 3.0e-21,
            nucleus_recoil: false,
            escape_distance: 2_000.0e-15,
            trail_limit: 1_000,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SnellsLawConfig {
    pub source_position: [Scalar; 3],
    pub source_direction: [Scalar; 3],
    /// Refractive index of the medium the source sits in
    pub source_index: Scalar,
    pub refractive_index: Scalar,
    pub ambient_index: Scalar,
    pub box_center: [Scalar; 3],
    /// Extent along the user's x, y and z axes
    pub box_size: [Scalar; 3],
    pub max_depth: usize,
    pub epsilon: Scalar,
}

impl Default for SnellsLawConfig {
    fn default() -> Self {
        Self {
            source_position: [-25.0, 0.0, 25.0],
            source_direction: [3.0, 0.0, -3.0],
            source_index: 1.0,
            refractive_index: 1.5,
            ambient_index: 1.0,
            box_center: [0.0, 0.0, 0.0],
            box_size: [75.0, 40.0, 15.0],
            max_depth: 10,
            epsilon: 1e-6,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NuclearDecayConfig {
    pub initial_nuclei: u64,
    pub decay_constant: Scalar,
    /// Seconds between samples
    pub interval: Scalar,
    /// Sample once per `interval` of elapsed time instead of all at once
    pub real_time: bool,
}

impl Default for NuclearDecayConfig {
    fn default() -> Self {
        Self {
            initial_nuclei: 1_000,
            decay_constant: 0.5,
            interval: 1.0,
            real_time: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InterferenceConfig {
    pub wavelength: Scalar,
    pub wave_speed: Scalar,
    /// Distance between the walls in metres
    pub width: Scalar,
    /// Starting observer position as a fraction of `width`
    pub observer_fraction: Scalar,
    /// Metres per second, zero keeps the observer still
    pub observer_speed: Scalar,
}

impl Default for InterferenceConfig {
    fn default() -> Self {
        Self {
            wavelength: 1.5,
            wave_speed: 343.0,
            width: 19.2,
            observer_fraction: 0.5,
            observer_speed: 0.15,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path);
                Self::default()
            }
        }
    }

    /// Load `config.toml` from the platform configuration directory
    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => Self::load_or_default(&path.to_string_lossy()),
            None => {
                warn!("Could not determine user config directory. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn user_config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("uk.co", "physicsim", "physicsim")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
