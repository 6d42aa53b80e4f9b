//! Circular dashboard dials.
//!
//! The three kinds share one drawing routine; everything that differs between
//! them lives in a static [`GaugeSpec`].

use std::f64::consts::FRAC_PI_2;

use crate::render::primitives::{
    draw_arc, draw_circle, draw_filled_circle, draw_mark, draw_segmented_line,
};
use crate::render::{FontStyle, RenderBackend};
use crate::Color;

/// A colored stretch of the scale, as fractions of the value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub from: f64,
    pub to: f64,
    pub color: Color,
}

/// Immutable per-kind configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    /// Angle of the first tick, radians.
    pub start_angle: f64,
    /// Angle of the last tick, radians.
    pub end_angle: f64,
    /// Scale reads from `max` at `start_angle` down to `min` at `end_angle`.
    pub descending: bool,
    pub num_marks: usize,
    /// Every `label_stride`-th mark gets a number.
    pub label_stride: usize,
    /// Displayed numbers are divided by this.
    pub display_divisor: f64,
    pub label_inset: f64,
    pub arc_inset: f64,
    pub needle_inset: f64,
    pub needle_segments: usize,
    pub needle_half_width: f64,
    pub needle_size: i32,
    pub hub_radius: f64,
    /// Ordered from `min` upward.
    pub bands: [Band; 3],
}

const BACKGROUND: Color = Color::gray(0.1);
const OUTLINE: Color = Color::gray(0.8);
const INNER_RING: Color = Color::gray(0.2);
const UNIT_TEXT: Color = Color::gray(0.8);

pub static SPEEDOMETER: GaugeSpec = GaugeSpec {
    name: "SPEED",
    unit: "km/h",
    min: 0.0,
    max: 240.0,
    start_angle: -FRAC_PI_2,
    end_angle: FRAC_PI_2,
    descending: false,
    num_marks: 13,
    label_stride: 2,
    display_divisor: 1.0,
    label_inset: 30.0,
    arc_inset: 20.0,
    needle_inset: 40.0,
    needle_segments: 20,
    needle_half_width: 2.0,
    needle_size: 5,
    hub_radius: 15.0,
    bands: [
        Band { from: 0.0, to: 1.0 / 3.0, color: Color::GREEN },
        Band { from: 1.0 / 3.0, to: 2.0 / 3.0, color: Color::YELLOW },
        Band { from: 2.0 / 3.0, to: 1.0, color: Color::RED },
    ],
};

pub static TACHOMETER: GaugeSpec = GaugeSpec {
    name: "TACH",
    unit: "RPM",
    min: 0.0,
    max: 8000.0,
    start_angle: -FRAC_PI_2,
    end_angle: FRAC_PI_2,
    descending: false,
    num_marks: 9,
    label_stride: 1,
    display_divisor: 1000.0,
    label_inset: 25.0,
    arc_inset: 15.0,
    needle_inset: 30.0,
    needle_segments: 15,
    needle_half_width: 1.5,
    needle_size: 4,
    hub_radius: 10.0,
    bands: [
        Band { from: 0.0, to: 0.5, color: Color::GREEN },
        Band { from: 0.5, to: 0.75, color: Color::YELLOW },
        Band { from: 0.75, to: 1.0, color: Color::RED },
    ],
};

pub static FUEL_GAUGE: GaugeSpec = GaugeSpec {
    name: "FUEL",
    unit: "%",
    min: 0.0,
    max: 100.0,
    start_angle: FRAC_PI_2,
    end_angle: -FRAC_PI_2,
    descending: true,
    num_marks: 11,
    label_stride: 2,
    display_divisor: 1.0,
    label_inset: 25.0,
    arc_inset: 15.0,
    needle_inset: 30.0,
    needle_segments: 15,
    needle_half_width: 1.5,
    needle_size: 4,
    hub_radius: 10.0,
    bands: [
        Band { from: 0.0, to: 0.25, color: Color::RED },
        Band { from: 0.25, to: 0.75, color: Color::YELLOW },
        Band { from: 0.75, to: 1.0, color: Color::GREEN },
    ],
};

impl GaugeSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Needle angle for a value, clamped to the scale.
    pub fn angle_of(&self, value: f64) -> f64 {
        let mut frac = (self.clamp(value) - self.min) / (self.max - self.min);
        if self.descending {
            frac = 1.0 - frac;
        }
        self.start_angle + (self.end_angle - self.start_angle) * frac
    }

    pub fn tick_angle(&self, i: usize) -> f64 {
        let t = i as f64 / (self.num_marks - 1) as f64;
        self.start_angle + (self.end_angle - self.start_angle) * t
    }

    /// Scale value at tick `i`, rounded to a whole unit.
    pub fn tick_value(&self, i: usize) -> f64 {
        let t = i as f64 / (self.num_marks - 1) as f64;
        let value = if self.descending {
            self.max - (self.max - self.min) * t
        } else {
            self.min + (self.max - self.min) * t
        };
        value.round()
    }

    /// Text for tick `i`, if that tick is labeled.
    pub fn tick_label(&self, i: usize) -> Option<String> {
        (i % self.label_stride == 0)
            .then(|| format!("{}", (self.tick_value(i) / self.display_divisor) as i64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeKind {
    Speedometer,
    Tachometer,
    FuelGauge,
}

impl GaugeKind {
    pub fn spec(self) -> &'static GaugeSpec {
        match self {
            GaugeKind::Speedometer => &SPEEDOMETER,
            GaugeKind::Tachometer => &TACHOMETER,
            GaugeKind::FuelGauge => &FUEL_GAUGE,
        }
    }
}

/// One dial on screen. Stores the last value it was given, unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    kind: GaugeKind,
    x: f64,
    y: f64,
    radius: f64,
    value: f64,
}

impl Gauge {
    pub fn new(kind: GaugeKind, x: f64, y: f64, radius: f64) -> Self {
        Self {
            kind,
            x,
            y,
            radius,
            value: 0.0,
        }
    }

    pub fn kind(&self) -> GaugeKind {
        self.kind
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn update(&mut self, value: f64) {
        self.value = value;
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn clamped_value(&self) -> f64 {
        self.kind.spec().clamp(self.value)
    }

    /// Draws the dial. Without a backend this does nothing.
    pub fn render<B: RenderBackend + ?Sized>(&self, backend: Option<&mut B>) {
        let Some(backend) = backend else {
            return;
        };
        let spec = self.kind.spec();
        let value = self.clamped_value();
        let (cx, cy, radius) = (self.x, self.y, self.radius);

        // Background
        draw_filled_circle(backend, cx, cy, radius, BACKGROUND);
        draw_circle(backend, cx, cy, radius, OUTLINE);
        draw_circle(backend, cx, cy, radius - 5.0, INNER_RING);

        // Scale
        for i in 0..spec.num_marks {
            let angle = spec.tick_angle(i);
            let mark_radius = radius - 10.0;
            draw_mark(
                backend,
                cx + mark_radius * angle.cos(),
                cy + mark_radius * angle.sin(),
                Color::WHITE,
            );
            if let Some(label) = spec.tick_label(i) {
                let label_radius = radius - spec.label_inset;
                backend.draw_text(
                    FontStyle::Normal,
                    &label,
                    (cx + label_radius * angle.cos()) as f32,
                    (cy + label_radius * angle.sin()) as f32,
                    Color::WHITE,
                );
            }
        }

        // Bands, filled from the low end of the scale up to the value
        let span = spec.max - spec.min;
        let arc_radius = radius - spec.arc_inset;
        for band in &spec.bands {
            let lo = spec.min + band.from * span;
            if value < lo {
                break;
            }
            let hi = (spec.min + band.to * span).min(value);
            draw_arc(
                backend,
                cx,
                cy,
                arc_radius,
                spec.angle_of(lo),
                spec.angle_of(hi),
                band.color,
            );
        }

        // Needle
        let angle = spec.angle_of(value);
        let needle_length = radius - spec.needle_inset;
        draw_segmented_line(
            backend,
            (cx, cy),
            (cx + needle_length * angle.cos(), cy + needle_length * angle.sin()),
            spec.needle_segments,
            spec.needle_half_width,
            spec.needle_size,
            Color::RED,
        );

        // Hub and readouts
        draw_filled_circle(backend, cx, cy, spec.hub_radius, Color::BLACK);
        draw_circle(backend, cx, cy, spec.hub_radius, Color::WHITE);
        backend.draw_text(
            FontStyle::Normal,
            &format!("{:.0}", value / spec.display_divisor),
            cx as f32,
            (cy + 5.0) as f32,
            Color::WHITE,
        );
        backend.draw_text(FontStyle::Normal, spec.unit, cx as f32, (cy - 15.0) as f32, UNIT_TEXT);
        backend.draw_text(
            FontStyle::Normal,
            spec.name,
            cx as f32,
            (cy - radius - 10.0) as f32,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitives::CIRCLE_SEGMENTS;
    use crate::render::{DrawCommand, DrawList};
    use approx::assert_relative_eq;

    fn rendered(kind: GaugeKind, value: f64) -> DrawList {
        let mut gauge = Gauge::new(kind, 300.0, 200.0, 150.0);
        gauge.update(value);
        let mut list = DrawList::new();
        gauge.render(Some(&mut list));
        list
    }

    fn arc_colors(list: &DrawList) -> Vec<Color> {
        // band arcs are the only green/yellow rectangles
        let mut colors: Vec<Color> = Vec::new();
        for command in list.commands() {
            if let DrawCommand::Rectangle { color, .. } = command {
                if (*color == Color::GREEN || *color == Color::YELLOW || *color == Color::RED)
                    && colors.last() != Some(color)
                {
                    colors.push(*color);
                }
            }
        }
        colors
    }

    #[test]
    fn test_render_without_backend_is_noop() {
        let gauge = Gauge::new(GaugeKind::Speedometer, 0.0, 0.0, 150.0);
        gauge.render(None::<&mut DrawList>);
    }

    #[test]
    fn test_update_is_plain_assignment() {
        let mut gauge = Gauge::new(GaugeKind::Tachometer, 0.0, 0.0, 80.0);
        gauge.update(-42.0);
        assert_eq!(gauge.value(), -42.0);
        assert_eq!(gauge.clamped_value(), 0.0);
        gauge.update(f64::INFINITY);
        assert_eq!(gauge.clamped_value(), 8000.0);
    }

    #[test]
    fn test_out_of_range_values_render_like_bounds() {
        assert_eq!(
            rendered(GaugeKind::Speedometer, -10.0).commands(),
            rendered(GaugeKind::Speedometer, 0.0).commands()
        );
        assert_eq!(
            rendered(GaugeKind::Speedometer, 999.0).commands(),
            rendered(GaugeKind::Speedometer, 240.0).commands()
        );
        assert_eq!(
            rendered(GaugeKind::FuelGauge, 130.0).commands(),
            rendered(GaugeKind::FuelGauge, 100.0).commands()
        );
    }

    #[test]
    fn test_tachometer_tick_labels() {
        let spec = GaugeKind::Tachometer.spec();
        for i in 0..9 {
            assert_eq!(spec.tick_value(i), (1000 * i) as f64);
            assert_eq!(spec.tick_label(i), Some(i.to_string()));
        }
    }

    #[test]
    fn test_speedometer_labels_every_other_tick() {
        let spec = GaugeKind::Speedometer.spec();
        let labels: Vec<String> = (0..spec.num_marks).filter_map(|i| spec.tick_label(i)).collect();
        assert_eq!(labels, ["0", "40", "80", "120", "160", "200", "240"]);
    }

    #[test]
    fn test_fuel_labels_run_from_full_to_empty() {
        let spec = GaugeKind::FuelGauge.spec();
        let labels: Vec<String> = (0..spec.num_marks).filter_map(|i| spec.tick_label(i)).collect();
        assert_eq!(labels, ["100", "80", "60", "40", "20", "0"]);
    }

    #[test]
    fn test_angles() {
        let speed = GaugeKind::Speedometer.spec();
        assert_relative_eq!(speed.angle_of(0.0), -FRAC_PI_2);
        assert_relative_eq!(speed.angle_of(120.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(speed.angle_of(240.0), FRAC_PI_2);

        let fuel = GaugeKind::FuelGauge.spec();
        assert_relative_eq!(fuel.angle_of(100.0), FRAC_PI_2);
        assert_relative_eq!(fuel.angle_of(0.0), -FRAC_PI_2);
        assert_relative_eq!(fuel.tick_angle(0), fuel.angle_of(fuel.tick_value(0)));
    }

    #[test]
    fn test_band_arcs_follow_value() {
        assert_eq!(arc_colors(&rendered(GaugeKind::Speedometer, 50.0)), [Color::GREEN, Color::RED]);
        assert_eq!(
            arc_colors(&rendered(GaugeKind::Speedometer, 200.0)),
            [Color::GREEN, Color::YELLOW, Color::RED]
        );
        assert_eq!(
            arc_colors(&rendered(GaugeKind::Tachometer, 5000.0)),
            [Color::GREEN, Color::YELLOW, Color::RED]
        );
        // fuel scans up from empty: red first, green only above 75%
        assert_eq!(arc_colors(&rendered(GaugeKind::FuelGauge, 10.0)), [Color::RED]);
        assert_eq!(
            arc_colors(&rendered(GaugeKind::FuelGauge, 90.0)),
            [Color::RED, Color::YELLOW, Color::GREEN, Color::RED]
        );
    }

    #[test]
    fn test_draw_call_counts() {
        // value 0: one degenerate band arc
        let list = rendered(GaugeKind::Speedometer, 0.0);
        let background = 75 * CIRCLE_SEGMENTS + 2 * CIRCLE_SEGMENTS;
        let marks = 13;
        let labels = 7;
        let arcs = CIRCLE_SEGMENTS;
        let needle = 20;
        let hub = 7 * CIRCLE_SEGMENTS + CIRCLE_SEGMENTS;
        let texts = 3;
        assert_eq!(
            list.len(),
            background + marks + labels + arcs + needle + hub + texts
        );
    }

    #[test]
    fn test_center_texts() {
        let list = rendered(GaugeKind::Tachometer, 6549.0);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(&texts[texts.len() - 3..], ["7", "RPM", "TACH"]);

        let list = rendered(GaugeKind::FuelGauge, 42.4);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(&texts[texts.len() - 3..], ["42", "%", "FUEL"]);
    }

    #[test]
    fn test_degenerate_radius_does_not_panic() {
        let mut gauge = Gauge::new(GaugeKind::FuelGauge, 0.0, 0.0, 0.0);
        gauge.update(50.0);
        let mut list = DrawList::new();
        gauge.render(Some(&mut list));
        gauge.set_position(-5.0, -5.0);
        let mut tiny = Gauge::new(GaugeKind::Speedometer, 0.0, 0.0, -3.0);
        tiny.update(100.0);
        tiny.render(Some(&mut list));
        assert!(!list.is_empty());
    }
}
