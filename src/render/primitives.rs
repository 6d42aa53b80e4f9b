//! Curves and lines approximated with small filled squares, since the host can
//! only fill rectangles.

use std::f64::consts::TAU;

use super::{Rect, RenderBackend};
use crate::Color;

/// Samples per circle or arc.
pub const CIRCLE_SEGMENTS: usize = 100;

/// A `size`-pixel square whose lower-left corner sits `half` below and left of `(x, y)`.
fn square(x: f64, y: f64, half: f64, size: f64) -> Rect {
    Rect::new(
        (x - half) as i32,
        (y - half) as i32,
        size as i32,
        size as i32,
    )
}

/// Arc from `start_angle` to `end_angle` (radians, counter-clockwise positive).
/// Either direction works; `end_angle` itself is not sampled.
pub fn draw_arc<B: RenderBackend + ?Sized>(
    backend: &mut B,
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    color: Color,
) {
    let angle_step = (end_angle - start_angle) / CIRCLE_SEGMENTS as f64;
    let segment_length = radius * 0.05;
    for i in 0..CIRCLE_SEGMENTS {
        let angle = start_angle + i as f64 * angle_step;
        let x = cx + radius * angle.cos();
        let y = cy + radius * angle.sin();
        backend.draw_rectangle(
            square(x, y, segment_length / 2.0, segment_length),
            color,
        );
    }
}

pub fn draw_circle<B: RenderBackend + ?Sized>(
    backend: &mut B,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Color,
) {
    draw_arc(backend, cx, cy, radius, 0.0, TAU, color);
}

/// Concentric rings every 2px from `radius` inward.
pub fn draw_filled_circle<B: RenderBackend + ?Sized>(
    backend: &mut B,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Color,
) {
    let rings = (radius / 2.0) as i32;
    for i in 0..rings {
        let ring_radius = radius - (i * 2) as f64;
        if ring_radius < 0.0 {
            break;
        }
        draw_circle(backend, cx, cy, ring_radius, color);
    }
}

/// Line from `(x0, y0)` to `(x1, y1)` as `segments` squares, both endpoints included.
pub fn draw_segmented_line<B: RenderBackend + ?Sized>(
    backend: &mut B,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    segments: usize,
    half_width: f64,
    size: i32,
    color: Color,
) {
    let denom = segments.saturating_sub(1).max(1) as f64;
    for i in 0..segments {
        let t = i as f64 / denom;
        let x = x0 + t * (x1 - x0);
        let y = y0 + t * (y1 - y0);
        backend.draw_rectangle(square(x, y, half_width, size as f64), color);
    }
}

/// 3x3 scale mark centered near `(x, y)`.
pub fn draw_mark<B: RenderBackend + ?Sized>(backend: &mut B, x: f64, y: f64, color: Color) {
    backend.draw_rectangle(square(x, y, 1.0, 3.0), color);
}
