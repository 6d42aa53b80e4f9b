//! Point-to-point driving: reach a goal marker, keep controls small.
//!
//! Residual layout:
//! - `[0..2]` car (x, y) minus goal (x, y)
//! - `[2]` forward control
//! - `[3]` turn control
//!
//! Weights live with the host's cost definition, not here.

use std::path::PathBuf;

use glam::{DVec2, DVec3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::{GoalSeeding, SimpleCarConfig};
use crate::scene::{Scene, SceneGeom};
use crate::sim::{ObjectKind, Simulation};
use crate::task::Task;
use crate::Color;

pub const RESIDUAL_DIM: usize = 4;

fn read(values: &[f64], i: usize) -> f64 {
    values.get(i).copied().unwrap_or(0.0)
}

pub struct SimpleCar {
    config: SimpleCarConfig,
    rng: Xoshiro256StarStar,
}

impl SimpleCar {
    pub fn new(config: SimpleCarConfig) -> Self {
        let rng = match config.seeding {
            GoalSeeding::Seeded(seed) => Xoshiro256StarStar::seed_from_u64(seed),
            GoalSeeding::Entropy => Xoshiro256StarStar::from_rng(&mut rand::rng()),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &SimpleCarConfig {
        &self.config
    }

    pub fn residual_vector(&self, sim: &dyn Simulation) -> [f64; RESIDUAL_DIM] {
        let (qpos, goal, ctrl) = (sim.qpos(), sim.mocap_pos(), sim.ctrl());
        [
            read(qpos, 0) - read(goal, 0),
            read(qpos, 1) - read(goal, 1),
            read(ctrl, 0),
            read(ctrl, 1),
        ]
    }

    /// Planar distance from the car to the goal marker.
    pub fn goal_distance(sim: &dyn Simulation) -> f64 {
        let car = DVec2::new(read(sim.qpos(), 0), read(sim.qpos(), 1));
        let goal = DVec2::new(read(sim.mocap_pos(), 0), read(sim.mocap_pos(), 1));
        car.distance(goal)
    }

    /// Uniform in `goal_bounds`. Empty or non-finite bounds pin the goal to
    /// the finite end, or to the origin when neither end is finite.
    fn sample_coordinate(&mut self) -> f64 {
        let (lo, hi) = self.config.goal_bounds;
        if lo.is_finite() && hi.is_finite() && lo < hi && (hi - lo).is_finite() {
            return self.rng.random_range(lo..hi);
        }
        if lo.is_finite() {
            lo
        } else if hi.is_finite() {
            hi
        } else {
            0.0
        }
    }
}

impl Default for SimpleCar {
    fn default() -> Self {
        Self::new(SimpleCarConfig::default())
    }
}

impl Task for SimpleCar {
    fn name(&self) -> &str {
        "SimpleCar"
    }

    fn xml_path(&self) -> PathBuf {
        self.config.model_root.join("simple_car").join("task.xml")
    }

    fn residual_dim(&self) -> usize {
        RESIDUAL_DIM
    }

    fn residual(&self, sim: &dyn Simulation, residual: &mut [f64]) {
        let values = self.residual_vector(sim);
        let n = residual.len().min(RESIDUAL_DIM);
        residual[..n].copy_from_slice(&values[..n]);
    }

    /// Respawns the goal uniformly in the configured square once the car is
    /// within tolerance of it.
    fn transition_locked(&mut self, sim: &mut dyn Simulation) {
        if Self::goal_distance(&*sim) >= self.config.goal_tolerance {
            return;
        }
        let x = self.sample_coordinate();
        let y = self.sample_coordinate();
        let z = self.config.goal_height;
        if let Some(goal) = sim.mocap_pos_mut().get_mut(0..3) {
            goal.copy_from_slice(&[x, y, z]);
            log::debug!("goal reached, respawned at ({:.3}, {:.3})", x, y);
        }
    }

    fn modify_scene(&self, sim: &dyn Simulation, scene: &mut Scene) {
        let Some(car) = sim.name_to_id(ObjectKind::Body, "car") else {
            log::trace!("no `car` body, skipping speed label");
            return;
        };
        let Some(velocity) = sim.sensor_by_name("car_velocity") else {
            log::trace!("no `car_velocity` sensor, skipping speed label");
            return;
        };
        let Some(car_pos) = sim.body_xpos(car) else {
            return;
        };

        let speed_ms = DVec3::new(read(velocity, 0), read(velocity, 1), read(velocity, 2)).length();
        let speed_kmh = speed_ms * 3.6;
        let text = format!("Speed: {:.2} m/s ({:.1} km/h)", speed_ms, speed_kmh);
        let pos = car_pos + DVec3::new(0.0, 0.0, self.config.label_height);

        if !scene.push(SceneGeom::label(&text, pos, self.config.label_size, Color::WHITE)) {
            log::trace!("scene buffer full, dropping speed label");
        }
    }
}
