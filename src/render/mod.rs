// ============================================================================
// RENDERING BACKEND INTERFACE
// ============================================================================

//! The two primitives the host renderer offers, plus backends implementing them.
//!
//! Coordinates are pixels with the origin at the bottom-left of the viewport
//! and y growing upward.

pub mod canvas;
pub mod draw_list;
pub mod primitives;

pub use canvas::Canvas;
pub use draw_list::{DrawCommand, DrawList};

use serde::{Deserialize, Serialize};

use crate::Color;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Shadow,
    Big,
}

pub trait RenderBackend {
    fn draw_rectangle(&mut self, rect: Rect, color: Color);

    /// Draws `text` anchored at `(x, y)`. The host ignores `color.a` for text.
    fn draw_text(&mut self, style: FontStyle, text: &str, x: f32, y: f32, color: Color);
}
