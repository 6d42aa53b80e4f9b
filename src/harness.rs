//! Minimal host stand-in: a kinematic car and a goal-seeking policy.
//!
//! Takes the place of the physics engine and the trajectory optimizer so the
//! dashboard and task hooks can be driven end to end.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::sim::{ObjectKind, SimData, Simulation};

fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unicycle model over the SimpleCar layout.
#[derive(Debug, Clone, Copy)]
pub struct KinematicCar {
    /// m/s at full forward control.
    pub max_speed: f64,
    /// rad/s at full turn control.
    pub max_yaw_rate: f64,
    pub ride_height: f64,
    pub marker_height: f64,
}

impl Default for KinematicCar {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            max_yaw_rate: 3.0,
            ride_height: 0.05,
            marker_height: 0.3,
        }
    }
}

impl KinematicCar {
    /// Integrates one step from the current controls and refreshes the derived
    /// body, site and sensor values.
    pub fn step(&self, data: &mut SimData, dt: f64) {
        let forward = data.ctrl.first().copied().unwrap_or(0.0).clamp(-1.0, 1.0);
        let turn = data.ctrl.get(1).copied().unwrap_or(0.0).clamp(-1.0, 1.0);
        if data.qpos.len() < 4 || data.qvel.len() < 4 {
            return;
        }

        let yaw = data.qpos[3];
        let speed = forward * self.max_speed;
        let velocity = [speed * yaw.cos(), speed * yaw.sin(), 0.0, turn * self.max_yaw_rate];
        data.qvel[..4].copy_from_slice(&velocity);
        for (q, v) in data.qpos[..4].iter_mut().zip(velocity) {
            *q += v * dt;
        }
        data.qpos[2] = self.ride_height;
        data.qpos[3] = wrap_angle(data.qpos[3]);
        data.time += dt;

        let car_pos = DVec3::new(data.qpos[0], data.qpos[1], self.ride_height);
        if let Some(car) = data.name_to_id(ObjectKind::Body, "car") {
            data.set_body_xpos(car, car_pos);
        }
        if let Some(marker) = data.name_to_id(ObjectKind::Site, "dashboard_marker") {
            data.set_site_xpos(marker, car_pos + DVec3::new(0.0, 0.0, self.marker_height));
        }
        if let Some(sensor) = data.name_to_id(ObjectKind::Sensor, "car_velocity") {
            if let Some(out) = data.sensor_data_mut(sensor) {
                let n = out.len().min(3);
                out[..n].copy_from_slice(&velocity[..n]);
            }
        }
    }
}

/// Steers toward the goal marker and slows down on approach.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPolicy {
    pub heading_gain: f64,
    /// Distance below which forward control ramps down linearly.
    pub slow_radius: f64,
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self {
            heading_gain: 2.0,
            slow_radius: 0.5,
        }
    }
}

impl GreedyPolicy {
    pub fn control(&self, sim: &dyn Simulation) -> [f64; 2] {
        let (qpos, goal) = (sim.qpos(), sim.mocap_pos());
        if qpos.len() < 4 || goal.len() < 2 {
            return [0.0, 0.0];
        }
        let (dx, dy) = (goal[0] - qpos[0], goal[1] - qpos[1]);
        let distance = dx.hypot(dy);
        let error = wrap_angle(dy.atan2(dx) - qpos[3]);
        let turn = (self.heading_gain * error).clamp(-1.0, 1.0);
        let forward = (distance / self.slow_radius).min(1.0) * error.cos().max(0.0);
        [forward, turn]
    }

    pub fn apply(&self, data: &mut SimData) {
        let ctrl = self.control(&*data);
        let n = data.ctrl.len().min(2);
        data.ctrl[..n].copy_from_slice(&ctrl[..n]);
    }
}
