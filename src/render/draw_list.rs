// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use super::{FontStyle, Rect, RenderBackend};
use crate::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rectangle {
        rect: Rect,
        color: Color,
    },
    Text {
        style: FontStyle,
        text: String,
        x: f32,
        y: f32,
        color: Color,
    },
}

/// Backend that records draw calls instead of rasterizing them.
///
/// A recorded frame can be replayed onto any other backend.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text strings in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Rectangle { .. } => None,
        })
    }

    pub fn replay<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for command in &self.commands {
            match command {
                DrawCommand::Rectangle { rect, color } => {
                    backend.draw_rectangle(*rect, *color);
                }
                DrawCommand::Text {
                    style,
                    text,
                    x,
                    y,
                    color,
                } => {
                    backend.draw_text(*style, text, *x, *y, *color);
                }
            }
        }
    }
}

impl RenderBackend for DrawList {
    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rectangle { rect, color });
    }

    fn draw_text(&mut self, style: FontStyle, text: &str, x: f32, y: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            style,
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}
