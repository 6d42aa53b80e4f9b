//! Host simulation interface.
//!
//! The physics engine owns the state; the dashboard and tasks only see it
//! through [`Simulation`]. [`SimData`] is a plain in-memory implementation used
//! by the demo host and by tests.

use glam::DVec3;

/// Kinds of named entities the host can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Body,
    Site,
    Sensor,
}

/// Per-step state accessors and named-entity lookup.
///
/// Array accessors use the host's fixed layout. Lookups return `None` where the
/// host would return its not-found sentinel.
pub trait Simulation {
    fn qpos(&self) -> &[f64];
    fn qvel(&self) -> &[f64];
    fn ctrl(&self) -> &[f64];
    fn mocap_pos(&self) -> &[f64];
    fn mocap_pos_mut(&mut self) -> &mut [f64];

    fn name_to_id(&self, kind: ObjectKind, name: &str) -> Option<usize>;

    /// World position of a body.
    fn body_xpos(&self, id: usize) -> Option<DVec3>;

    /// World position of a site.
    fn site_xpos(&self, id: usize) -> Option<DVec3>;

    /// Output slice of a sensor.
    fn sensor_data(&self, id: usize) -> Option<&[f64]>;

    fn sensor_by_name(&self, name: &str) -> Option<&[f64]> {
        let id = self.name_to_id(ObjectKind::Sensor, name)?;
        self.sensor_data(id)
    }
}

#[derive(Debug, Clone)]
struct SensorSlot {
    name: String,
    adr: usize,
    dim: usize,
}

/// In-memory simulation state with named bodies, sites and sensors.
#[derive(Debug, Clone, Default)]
pub struct SimData {
    pub time: f64,
    pub qpos: Vec<f64>,
    pub qvel: Vec<f64>,
    pub ctrl: Vec<f64>,
    pub mocap_pos: Vec<f64>,
    /// Body positions, three entries per body.
    pub xpos: Vec<f64>,
    /// Site positions, three entries per site.
    pub site_xpos: Vec<f64>,
    pub sensordata: Vec<f64>,
    body_names: Vec<String>,
    site_names: Vec<String>,
    sensors: Vec<SensorSlot>,
}

impl SimData {
    pub fn new(nq: usize, nv: usize, nu: usize, nmocap: usize) -> Self {
        Self {
            qpos: vec![0.0; nq],
            qvel: vec![0.0; nv],
            ctrl: vec![0.0; nu],
            mocap_pos: vec![0.0; 3 * nmocap],
            ..Self::default()
        }
    }

    /// Layout of the SimpleCar model.
    ///
    /// qpos `[x, y, z, yaw]`, qvel `[vx, vy, vz, yaw_rate]`, ctrl
    /// `[forward, turn]`, one goal mocap body. Bodies `world` and `car`, site
    /// `dashboard_marker`, sensor `car_velocity` (3 values).
    pub fn simple_car() -> Self {
        let mut data = Self::new(4, 4, 2, 1);
        data.add_body("world", DVec3::ZERO);
        data.add_body("car", DVec3::ZERO);
        data.add_site("dashboard_marker", DVec3::new(0.0, 0.0, 0.3));
        data.add_sensor("car_velocity", 3);
        data.mocap_pos[2] = 0.01;
        data
    }

    pub fn add_body(&mut self, name: &str, pos: DVec3) -> usize {
        self.body_names.push(name.to_string());
        self.xpos.extend_from_slice(&pos.to_array());
        self.body_names.len() - 1
    }

    pub fn add_site(&mut self, name: &str, pos: DVec3) -> usize {
        self.site_names.push(name.to_string());
        self.site_xpos.extend_from_slice(&pos.to_array());
        self.site_names.len() - 1
    }

    pub fn add_sensor(&mut self, name: &str, dim: usize) -> usize {
        let adr = self.sensordata.len();
        self.sensors.push(SensorSlot {
            name: name.to_string(),
            adr,
            dim,
        });
        self.sensordata.resize(adr + dim, 0.0);
        self.sensors.len() - 1
    }

    pub fn set_body_xpos(&mut self, id: usize, pos: DVec3) {
        if let Some(slot) = self.xpos.get_mut(3 * id..3 * id + 3) {
            slot.copy_from_slice(&pos.to_array());
        }
    }

    pub fn set_site_xpos(&mut self, id: usize, pos: DVec3) {
        if let Some(slot) = self.site_xpos.get_mut(3 * id..3 * id + 3) {
            slot.copy_from_slice(&pos.to_array());
        }
    }

    pub fn sensor_data_mut(&mut self, id: usize) -> Option<&mut [f64]> {
        let slot = self.sensors.get(id)?;
        self.sensordata.get_mut(slot.adr..slot.adr + slot.dim)
    }
}

fn vec3_at(values: &[f64], id: usize) -> Option<DVec3> {
    values
        .get(3 * id..3 * id + 3)
        .map(|v| DVec3::new(v[0], v[1], v[2]))
}

impl Simulation for SimData {
    fn qpos(&self) -> &[f64] {
        &self.qpos
    }

    fn qvel(&self) -> &[f64] {
        &self.qvel
    }

    fn ctrl(&self) -> &[f64] {
        &self.ctrl
    }

    fn mocap_pos(&self) -> &[f64] {
        &self.mocap_pos
    }

    fn mocap_pos_mut(&mut self) -> &mut [f64] {
        &mut self.mocap_pos
    }

    fn name_to_id(&self, kind: ObjectKind, name: &str) -> Option<usize> {
        match kind {
            ObjectKind::Body => self.body_names.iter().position(|n| n == name),
            ObjectKind::Site => self.site_names.iter().position(|n| n == name),
            ObjectKind::Sensor => self.sensors.iter().position(|s| s.name == name),
        }
    }

    fn body_xpos(&self, id: usize) -> Option<DVec3> {
        vec3_at(&self.xpos, id)
    }

    fn site_xpos(&self, id: usize) -> Option<DVec3> {
        vec3_at(&self.site_xpos, id)
    }

    fn sensor_data(&self, id: usize) -> Option<&[f64]> {
        let slot = self.sensors.get(id)?;
        self.sensordata.get(slot.adr..slot.adr + slot.dim)
    }
}
