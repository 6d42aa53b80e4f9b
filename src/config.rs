use std::path::{Path, PathBuf};

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tuning for the dashboard telemetry model and its fixed screen layout
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Linear RPM estimate: rpm = km/h * this. Placeholder, not an engine model.
    #[builder(default = 100.0)]
    pub rpm_per_kmh: f64,
    #[builder(default = 8000.0)]
    pub max_rpm: f64,
    /// Percentage points burned per `update_data` call.
    #[builder(default = 0.001)]
    pub fuel_burn_per_step: f64,
    #[builder(default = 100.0)]
    pub initial_fuel_pct: f64,

    // Layout
    #[builder(default = 150.0)]
    pub speedometer_radius: f64,
    #[builder(default = 80.0)]
    pub small_gauge_radius: f64,
    #[builder(default = 20.0)]
    pub gauge_gap: f64,
    /// Pixels the anchor is moved from the rect's vertical center.
    #[builder(default = 100.0)]
    pub vertical_offset: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// How the goal-respawn generator is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalSeeding {
    /// Seed once from the process entropy source.
    Entropy,
    /// Fixed seed; respawn sequences are reproducible.
    Seeded(u64),
}

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleCarConfig {
    /// Directory holding `simple_car/task.xml`.
    #[builder(default = PathBuf::from("models"))]
    pub model_root: PathBuf,
    #[builder(default = 0.2)]
    pub goal_tolerance: f64,
    /// Inclusive-exclusive bounds for both goal coordinates.
    #[builder(default = (-2.0, 2.0))]
    pub goal_bounds: (f64, f64),
    #[builder(default = 0.01)]
    pub goal_height: f64,
    #[builder(default = GoalSeeding::Entropy)]
    pub seeding: GoalSeeding,

    // Speed label
    #[builder(default = 0.2)]
    pub label_height: f64,
    #[builder(default = 0.15)]
    pub label_size: f64,
}

impl Default for SimpleCarConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for the demo window
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    #[builder(default = "SimpleCar dashboard".to_string())]
    pub title: String,
    #[builder(default = 1024)]
    pub width: u32,
    #[builder(default = 640)]
    pub height: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// Physics substeps per rendered frame.
    #[builder(default = 8)]
    pub substeps: usize,
    #[builder(default = 0.002)]
    pub timestep: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for fonts and text rendering
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType/OpenType file. Without one, text draw calls are skipped.
    pub path: Option<PathBuf>,
    #[builder(default = 14.0)]
    pub normal_size: f32,
    #[builder(default = 28.0)]
    pub big_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Main configuration struct, as read from a RON file
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[builder(default)]
    pub dashboard: DashboardConfig,
    #[builder(default)]
    pub task: SimpleCarConfig,
    #[builder(default)]
    pub window: WindowConfig,
    #[builder(default)]
    pub font: FontConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_ron(text: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}
