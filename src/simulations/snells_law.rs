//! A light ray refracting through a glass block

use super::{
    Body, Path, Readout, Simulation, SimulationError, SimulationKind, SimulationState,
    require_finite,
};
use crate::config::{SimulationConfig, SnellsLawConfig};
use crate::export::CsvTable;
use crate::physics::math::{Scalar, Vector, from_user_frame};
use crate::physics::optics::{BoxGeometry, Interaction, Ray, RayTracer};
use bevy::log::{debug, warn};

/// Static scene: the ray chain is rebuilt from the current inputs on every
/// step rather than evolved.
pub struct SnellsLawSimulation {
    tracer: RayTracer,
    scene: Vec<BoxGeometry>,
    source_position: Vector,
    source_direction: Vector,
    source_index: Scalar,
    ray: Ray,
    time: Scalar,
}

impl SnellsLawSimulation {
    fn build(config: &SnellsLawConfig) -> Self {
        let size = from_user_frame(config.box_size);
        let geometry = BoxGeometry::new(
            from_user_frame(config.box_center),
            size.x,
            size.y,
            size.z,
            config.refractive_index,
        );
        let tracer = RayTracer {
            max_depth: config.max_depth.max(1),
            epsilon: config.epsilon.abs(),
            ambient_index: config.ambient_index.abs(),
        };

        let mut source_position = from_user_frame(config.source_position);
        if geometry.is_inside(source_position, tracer.epsilon) {
            warn!("Ray source cannot start inside the block. Using the default position.");
            source_position = from_user_frame(SnellsLawConfig::default().source_position);
        }

        let mut simulation = Self {
            tracer,
            scene: vec![geometry],
            source_position,
            source_direction: from_user_frame(config.source_direction),
            source_index: config.source_index.abs(),
            ray: Ray::new(source_position, Vector::X, 1.0, true),
            time: 0.0,
        };
        simulation.retrace();
        simulation
    }

    fn retrace(&mut self) {
        self.ray = self.tracer.trace(
            &self.scene,
            self.source_position,
            self.source_direction,
            self.source_index,
        );
    }

    /// Move the source unless that would put it inside a geometry.
    ///
    /// Returns whether the move was accepted.
    pub fn move_source(&mut self, position: Vector) -> bool {
        let blocked = self
            .scene
            .iter()
            .any(|geometry| geometry.is_inside(position, self.tracer.epsilon));
        if blocked {
            debug!("Keeping ray source outside the block");
            return false;
        }
        self.source_position = position;
        true
    }

    pub fn source_position(&self) -> Vector {
        self.source_position
    }

    /// The traced chain, starting at the source ray.
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.ray.interactions()
    }

    pub fn geometry(&self) -> &[BoxGeometry] {
        &self.scene
    }
}

impl Default for SnellsLawSimulation {
    fn default() -> Self {
        Self::build(&SnellsLawConfig::default())
    }
}

impl Simulation for SnellsLawSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::SnellsLaw
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        require_finite("snells_law.refractive_index", config.snells_law.refractive_index)?;
        require_finite("snells_law.source_index", config.snells_law.source_index)?;
        *self = Self::build(&config.snells_law);
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        self.time += dt;
        self.retrace();
    }

    fn state(&self) -> SimulationState {
        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies.push(Body {
            position: self.source_position,
            velocity: Vector::ZERO,
            radius: 1.0,
        });

        let points: Vec<Vector> = self.ray.segments().map(|ray| ray.origin).collect();
        let last = self.ray.segments().last().unwrap_or(&self.ray);
        state.paths.push(Path {
            points,
            open_direction: Some(last.direction),
        });

        state
            .readouts
            .push(Readout::new("segments", self.ray.chain_len() as Scalar, ""));
        if let Some(first) = self.ray.interaction {
            let [incidence, critical, refraction] = first.angles_in_degrees();
            if let Some(angle) = incidence {
                state.readouts.push(Readout::new("incidence angle", angle, "°"));
            }
            if let Some(angle) = refraction {
                state.readouts.push(Readout::new("refraction angle", angle, "°"));
            }
            if let Some(angle) = critical {
                state.readouts.push(Readout::new("critical angle", angle, "°"));
            }
        }
        state
    }

    fn apply_live(&mut self, config: &SimulationConfig) {
        let live = &config.snells_law;
        for geometry in &mut self.scene {
            geometry.set_refractive_index(live.refractive_index);
        }
        self.source_index = live.source_index.abs();
        self.source_direction = from_user_frame(live.source_direction);
        self.tracer.max_depth = live.max_depth.max(1);
        self.tracer.ambient_index = live.ambient_index.abs();
        self.move_source(from_user_frame(live.source_position));
        self.retrace();
    }

    fn export(&self) -> Option<CsvTable> {
        let mut table = CsvTable::new(Interaction::HEADER);
        for interaction in self.ray.interactions() {
            table.push_row(interaction.row());
        }
        Some(table)
    }
}
