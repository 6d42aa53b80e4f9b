// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

//! Vehicle HUD gauges (speedometer, tachometer, fuel gauge) and the `SimpleCar`
//! task module, written against small host interfaces: a [`Simulation`] that
//! exposes per-step state and named entities, and a [`RenderBackend`] that can
//! fill rectangles and draw text.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod gauge;
pub mod harness;
pub mod render;
pub mod scene;
pub mod sim;
pub mod task;
pub mod tasks;

use serde::{Deserialize, Serialize};

pub use config::{AppConfig, DashboardConfig, FontConfig, GoalSeeding, SimpleCarConfig, WindowConfig};
pub use dashboard::{Dashboard, DashboardState, Placement, Projected, ScreenCenter};
pub use error::{Error, Result};
pub use gauge::{Gauge, GaugeKind, GaugeSpec};
pub use render::{FontStyle, Rect, RenderBackend};
pub use scene::{GeomKind, Scene, SceneGeom};
pub use sim::{ObjectKind, SimData, Simulation};
pub use task::Task;
pub use tasks::simple_car::SimpleCar;

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

/// RGBA color with float channels in `[0, 1]`, the form the host renderer takes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }

    /// Channels quantized to bytes, alpha included.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_quantization_clamps() {
        assert_eq!(Color::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::new(2.0, -1.0, 0.5, 0.0).to_rgba8(), [255, 0, 128, 0]);
    }
}
