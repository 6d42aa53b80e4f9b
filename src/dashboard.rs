use glam::DVec3;

use crate::config::DashboardConfig;
use crate::gauge::{Gauge, GaugeKind};
use crate::render::{Rect, RenderBackend};
use crate::sim::{ObjectKind, Simulation};

/// Derived vehicle telemetry, recomputed on every `update_data` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardState {
    pub speed_kmh: f64,
    pub rpm: f64,
    pub fuel_level_pct: f64,
}

// ============================================================================
// PLACEMENT
// ============================================================================

/// Decides where the speedometer is centered each frame.
pub trait Placement {
    fn anchor(&self, sim: &dyn Simulation, rect: &Rect, vertical_offset: f64) -> (f64, f64);
}

/// Fixed screen-space anchor: horizontal center, vertical center minus the offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenCenter;

impl Placement for ScreenCenter {
    fn anchor(&self, _sim: &dyn Simulation, rect: &Rect, vertical_offset: f64) -> (f64, f64) {
        (
            rect.width as f64 / 2.0,
            rect.height as f64 / 2.0 - vertical_offset,
        )
    }
}

/// Follows the car on screen through a caller-supplied world-to-screen projection.
///
/// Tracks site `dashboard_marker`, else body `car`. Falls back to
/// [`ScreenCenter`] when neither exists or the projection returns `None`
/// (e.g. the point is behind the camera).
pub struct Projected<F> {
    project: F,
}

impl<F> Projected<F>
where
    F: Fn(DVec3, &Rect) -> Option<(f64, f64)>,
{
    pub fn new(project: F) -> Self {
        Self { project }
    }

    fn tracked_point(sim: &dyn Simulation) -> Option<DVec3> {
        sim.name_to_id(ObjectKind::Site, "dashboard_marker")
            .and_then(|id| sim.site_xpos(id))
            .or_else(|| {
                let id = sim.name_to_id(ObjectKind::Body, "car")?;
                sim.body_xpos(id)
            })
    }
}

impl<F> Placement for Projected<F>
where
    F: Fn(DVec3, &Rect) -> Option<(f64, f64)>,
{
    fn anchor(&self, sim: &dyn Simulation, rect: &Rect, vertical_offset: f64) -> (f64, f64) {
        match Self::tracked_point(sim).and_then(|p| (self.project)(p, rect)) {
            Some((x, y)) => (x, y - vertical_offset),
            None => {
                log::trace!("dashboard anchor not projectable, using screen center");
                ScreenCenter.anchor(sim, rect, vertical_offset)
            }
        }
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Gauges {
    pub speedometer: Gauge,
    pub tachometer: Gauge,
    pub fuel_gauge: Gauge,
}

impl Gauges {
    fn iter(&self) -> impl Iterator<Item = &Gauge> {
        [&self.speedometer, &self.tachometer, &self.fuel_gauge].into_iter()
    }
}

/// Screen centers for the three gauges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub speedometer: (f64, f64),
    pub tachometer: (f64, f64),
    pub fuel_gauge: (f64, f64),
}

/// Speedometer flanked by tachometer (left) and fuel gauge (right).
///
/// Gauges are created on the first [`render`](Dashboard::render), once a
/// destination rect is known, and only repositioned afterwards.
pub struct Dashboard {
    config: DashboardConfig,
    state: DashboardState,
    gauges: Option<Gauges>,
    placement: Box<dyn Placement>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let state = DashboardState {
            speed_kmh: 0.0,
            rpm: 0.0,
            fuel_level_pct: config.initial_fuel_pct.clamp(0.0, 100.0),
        };
        Self {
            config,
            state,
            gauges: None,
            placement: Box::new(ScreenCenter),
        }
    }

    pub fn with_placement(mut self, placement: impl Placement + 'static) -> Self {
        self.placement = Box::new(placement);
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn gauges(&self) -> Option<&Gauges> {
        self.gauges.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gauges.is_some()
    }

    pub fn update_data(&mut self, sim: &dyn Simulation) {
        let qvel = sim.qvel();
        let component = |i: usize| qvel.get(i).copied().unwrap_or(0.0);
        let velocity = DVec3::new(component(0), component(1), component(2));
        self.state.speed_kmh = velocity.length() * 3.6;

        // Placeholder: linear in speed.
        let rpm = self.state.speed_kmh * self.config.rpm_per_kmh;
        self.state.rpm = if rpm > self.config.max_rpm {
            self.config.max_rpm
        } else if rpm < 0.0 {
            0.0
        } else {
            rpm
        };

        // a negative burn from config must not refill the tank
        let burn = self.config.fuel_burn_per_step.max(0.0);
        self.state.fuel_level_pct = (self.state.fuel_level_pct - burn).clamp(0.0, 100.0);

        self.push_values();
    }

    pub fn layout(&self, sim: &dyn Simulation, rect: &Rect) -> Layout {
        let (cx, cy) = self
            .placement
            .anchor(sim, rect, self.config.vertical_offset);
        let spacing =
            self.config.speedometer_radius + self.config.small_gauge_radius + self.config.gauge_gap;
        Layout {
            speedometer: (cx, cy),
            tachometer: (cx - spacing, cy),
            fuel_gauge: (cx + spacing, cy),
        }
    }

    /// Updates telemetry, lays out and draws all three gauges into `rect`.
    ///
    /// Without a backend the state still advances and the gauges are still
    /// installed, but nothing is drawn.
    pub fn render<B: RenderBackend + ?Sized>(
        &mut self,
        sim: &dyn Simulation,
        mut backend: Option<&mut B>,
        rect: &Rect,
    ) {
        self.update_data(sim);
        let layout = self.layout(sim, rect);

        match self.gauges.as_mut() {
            Some(gauges) => {
                gauges.speedometer.set_position(layout.speedometer.0, layout.speedometer.1);
                gauges.tachometer.set_position(layout.tachometer.0, layout.tachometer.1);
                gauges.fuel_gauge.set_position(layout.fuel_gauge.0, layout.fuel_gauge.1);
            }
            None => {
                let (big, small) = (self.config.speedometer_radius, self.config.small_gauge_radius);
                log::debug!("installing dashboard gauges for {}x{} viewport", rect.width, rect.height);
                self.gauges = Some(Gauges {
                    speedometer: Gauge::new(
                        GaugeKind::Speedometer,
                        layout.speedometer.0,
                        layout.speedometer.1,
                        big,
                    ),
                    tachometer: Gauge::new(
                        GaugeKind::Tachometer,
                        layout.tachometer.0,
                        layout.tachometer.1,
                        small,
                    ),
                    fuel_gauge: Gauge::new(
                        GaugeKind::FuelGauge,
                        layout.fuel_gauge.0,
                        layout.fuel_gauge.1,
                        small,
                    ),
                });
                // fresh gauges must not show their initial zero
                self.push_values();
            }
        }

        if let Some(gauges) = &self.gauges {
            for gauge in gauges.iter() {
                gauge.render(backend.as_deref_mut());
            }
        }
    }

    fn push_values(&mut self) {
        if let Some(gauges) = self.gauges.as_mut() {
            gauges.speedometer.update(self.state.speed_kmh);
            gauges.tachometer.update(self.state.rpm);
            gauges.fuel_gauge.update(self.state.fuel_level_pct);
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}
