//! Two particles colliding inside a reflecting box

use super::{
    Body, Readout, Simulation, SimulationError, SimulationKind, SimulationState, require_finite,
    require_finite_vector,
};
use crate::config::{CollisionsConfig, SimulationConfig};
use crate::export::CsvTable;
use crate::physics::collision::{
    CollisionRecord, CollisionResolver, all_at_rest, reflect_at_edges, total_momentum,
};
use crate::physics::components::Particle;
use crate::physics::math::{Scalar, from_user_frame, to_user_frame};
use bevy::log::{debug, info};

const MOMENTUM_LABELS: [[&str; 3]; 3] = [
    ["A momentum x", "A momentum y", "A momentum z"],
    ["B momentum x", "B momentum y", "B momentum z"],
    ["total momentum x", "total momentum y", "total momentum z"],
];

pub struct CollisionsSimulation {
    particles: [Particle; 2],
    resolver: CollisionResolver,
    /// Display units per metre
    unit_scale: Scalar,
    half_extent: Scalar,
    stop_when_at_rest: bool,
    rest_decimals: u32,
    time: Scalar,
    log: Vec<CollisionRecord>,
    finished: bool,
}

impl CollisionsSimulation {
    fn build(config: &CollisionsConfig) -> Self {
        let particle = |mass, position, velocity| {
            Particle::new(mass, from_user_frame(position), from_user_frame(velocity))
                .with_radius_scale(config.radius_scale)
        };

        Self {
            particles: [
                particle(config.mass_a, config.position_a, config.velocity_a),
                particle(config.mass_b, config.position_b, config.velocity_b),
            ],
            resolver: CollisionResolver::new(config.restitution),
            unit_scale: config.unit_scale.abs(),
            half_extent: config.size.abs() * config.unit_scale.abs(),
            stop_when_at_rest: config.stop_when_at_rest,
            rest_decimals: config.rest_decimals,
            time: 0.0,
            log: Vec::new(),
            finished: false,
        }
    }

    pub fn particles(&self) -> &[Particle; 2] {
        &self.particles
    }

    /// Every collision since the last `init`, oldest first.
    pub fn log(&self) -> &[CollisionRecord] {
        &self.log
    }
}

impl Default for CollisionsSimulation {
    fn default() -> Self {
        Self::build(&CollisionsConfig::default())
    }
}

impl Simulation for CollisionsSimulation {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Collisions
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        let collisions = &config.collisions;
        require_finite("collisions.mass_a", collisions.mass_a)?;
        require_finite("collisions.mass_b", collisions.mass_b)?;
        require_finite_vector("collisions.velocity_a", collisions.velocity_a)?;
        require_finite_vector("collisions.velocity_b", collisions.velocity_b)?;
        require_finite_vector("collisions.position_a", collisions.position_a)?;
        require_finite_vector("collisions.position_b", collisions.position_b)?;
        require_finite("collisions.restitution", collisions.restitution)?;
        require_finite("collisions.size", collisions.size)?;
        require_finite("collisions.unit_scale", collisions.unit_scale)?;
        require_finite("collisions.radius_scale", collisions.radius_scale)?;
        *self = Self::build(collisions);
        Ok(())
    }

    fn step(&mut self, dt: Scalar) {
        if self.finished {
            return;
        }

        let [a, b] = &mut self.particles;
        if let Some(record) = self.resolver.resolve(a, b) {
            debug!("Collision {} at t = {:.3} s", self.log.len() + 1, self.time);
            self.log.push(record);
        }

        for particle in &mut self.particles {
            particle.position += particle.velocity * (dt * self.unit_scale);
            reflect_at_edges(particle, self.half_extent);
        }
        self.time += dt;

        if self.stop_when_at_rest && all_at_rest(&self.particles, self.rest_decimals) {
            self.finished = true;
            info!("Both particles at rest after {} collisions", self.log.len());
        }
    }

    fn state(&self) -> SimulationState {
        let mut state = SimulationState::new(self.kind(), self.time);
        state.bodies = self.particles.iter().map(Body::from).collect();

        let momenta = [
            self.particles[0].momentum(),
            self.particles[1].momentum(),
            total_momentum(&self.particles),
        ];
        for (labels, momentum) in MOMENTUM_LABELS.into_iter().zip(momenta) {
            for (label, value) in labels.into_iter().zip(to_user_frame(momentum)) {
                state.readouts.push(Readout::new(label, value, "kg m/s"));
            }
        }
        state
            .readouts
            .push(Readout::new("collisions", self.log.len() as Scalar, ""));
        state
    }

    fn apply_live(&mut self, config: &SimulationConfig) {
        self.resolver = CollisionResolver::new(config.collisions.restitution);
        self.half_extent = config.collisions.size.abs() * self.unit_scale;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn export(&self) -> Option<CsvTable> {
        let mut table = CsvTable::new(CollisionRecord::HEADER);
        for record in &self.log {
            table.push_values(record.values());
        }
        Some(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_on(separation: Scalar, radius_scale: Scalar) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.collisions = CollisionsConfig {
            mass_a: 1.0,
            mass_b: 1.0,
            velocity_a: [2.0, 0.0, 0.0],
            velocity_b: [-2.0, 0.0, 0.0],
            position_a: [-separation / 2.0, 0.0, 0.0],
            position_b: [separation / 2.0, 0.0, 0.0],
            unit_scale: 1.0,
            size: 100.0,
            radius_scale,
            ..CollisionsConfig::default()
        };
        config
    }

    #[test]
    fn test_separated_particles_move_linearly() {
        let mut simulation = CollisionsSimulation::default();
        simulation.init(&head_on(20.0, 4.0)).unwrap();

        simulation.step(1.0 / 30.0);

        let [a, b] = simulation.particles();
        assert!((a.position.x - (-10.0 + 2.0 / 30.0)).abs() < 1e-12);
        assert!((b.position.x - (10.0 - 2.0 / 30.0)).abs() < 1e-12);
        assert_eq!(a.velocity.x, 2.0);
        assert_eq!(b.velocity.x, -2.0);
        assert!(simulation.log().is_empty());
    }

    #[test]
    fn test_touching_equal_masses_swap_velocities() {
        let mut simulation = CollisionsSimulation::default();
        simulation.init(&head_on(20.0, 10.0)).unwrap();

        simulation.step(1.0 / 30.0);

        let [a, b] = simulation.particles();
        assert!((a.velocity.x + 2.0).abs() < 1e-12);
        assert!((b.velocity.x - 2.0).abs() < 1e-12);
        assert_eq!(simulation.log().len(), 1);
    }

    #[test]
    fn test_export_has_one_row_per_collision() {
        let mut simulation = CollisionsSimulation::default();
        simulation.init(&head_on(20.0, 10.0)).unwrap();
        for _ in 0..10 {
            simulation.step(1.0 / 30.0);
        }

        let table = simulation.export().unwrap();
        assert_eq!(table.header.len(), 12);
        assert_eq!(table.len(), simulation.log().len());
        assert_eq!(table.rows[0][0], Some(2.0));
        assert_eq!(table.rows[0][6], Some(-2.0));
    }

    #[test]
    fn test_inelastic_collision_stops_at_rest() {
        let mut config = head_on(20.0, 10.0);
        config.collisions.restitution = 0.0;
        let mut simulation = CollisionsSimulation::default();
        simulation.init(&config).unwrap();

        simulation.step(1.0 / 30.0);

        assert!(simulation.is_finished());
    }

    #[test]
    fn test_edges_keep_particles_in_box() {
        let mut simulation = CollisionsSimulation::default();
        for _ in 0..2_000 {
            simulation.step(1.0 / 30.0);
        }
        for particle in simulation.particles() {
            assert!(particle.position.abs().max_element() <= 100.0);
        }
    }

    #[test]
    fn test_total_momentum_readout() {
        let simulation = CollisionsSimulation::default();
        let state = simulation.state();
        let expected = 0.5 * 2.5 + 1.0 * -2.5;
        assert_eq!(state.readout("total momentum x"), Some(expected));
    }

    #[test]
    fn test_non_finite_inputs_are_rejected() {
        let mut config = SimulationConfig::default();
        config.collisions.mass_a = Scalar::NAN;
        let result = CollisionsSimulation::default().init(&config);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidParameter {
                name: "collisions.mass_a",
                ..
            })
        ));

        let mut config = SimulationConfig::default();
        config.collisions.velocity_b = [0.0, Scalar::INFINITY, 0.0];
        let result = CollisionsSimulation::default().init(&config);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidParameter {
                name: "collisions.velocity_b",
                ..
            })
        ));
    }
}
