use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use dashboard::harness::{GreedyPolicy, KinematicCar};
use dashboard::render::canvas::load_font;
use dashboard::render::{Canvas, DrawList};
use dashboard::scene::Scene;
use dashboard::{
    AppConfig, Color, Dashboard, FontStyle, GoalSeeding, Projected, Rect, RenderBackend, SimData,
    SimpleCar, Task,
};
use glam::DVec3;
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

/// Half-width of the arena shown in the top-down view, meters.
const VIEW_HALF_EXTENT: f64 = 2.5;
const SCENE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the SimpleCar task with the HUD dashboard", long_about = None)]
struct Args {
    /// RON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the goal respawn generator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// TrueType/OpenType font for gauge text
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Keep the dashboard centered on the car instead of the screen
    #[arg(long)]
    follow: bool,

    /// Run this many physics steps without a window, then exit
    #[arg(long, value_name = "STEPS")]
    headless: Option<usize>,
}

/// World to screen for the top-down view, origin at the viewport center.
fn top_down(p: DVec3, rect: &Rect) -> Option<(f64, f64)> {
    let scale = rect.width.min(rect.height) as f64 / (2.0 * VIEW_HALF_EXTENT);
    if scale <= 0.0 {
        return None;
    }
    Some((
        rect.left as f64 + rect.width as f64 / 2.0 + p.x * scale,
        rect.bottom as f64 + rect.height as f64 / 2.0 + p.y * scale,
    ))
}

/// `(values[0], values[1])` on the ground plane, missing entries read as zero.
fn planar(values: &[f64]) -> DVec3 {
    let at = |i: usize| values.get(i).copied().unwrap_or(0.0);
    DVec3::new(at(0), at(1), 0.0)
}

/// Everything the real host would own: state, dynamics, optimizer, task, HUD.
struct Host {
    data: SimData,
    car: KinematicCar,
    policy: GreedyPolicy,
    task: SimpleCar,
    dashboard: Dashboard,
    scene: Scene,
    timestep: f64,
    substeps: usize,
    respawns: usize,
}

impl Host {
    fn new(config: &AppConfig, follow: bool) -> Self {
        let mut data = SimData::simple_car();
        if let Some(goal) = data.mocap_pos.get_mut(0..3) {
            goal.copy_from_slice(&[1.0, 1.0, config.task.goal_height]);
        }

        let mut dashboard = Dashboard::new(config.dashboard.clone());
        if follow {
            dashboard = dashboard.with_placement(Projected::new(top_down));
        }

        Self {
            data,
            car: KinematicCar::default(),
            policy: GreedyPolicy::default(),
            task: SimpleCar::new(config.task.clone()),
            dashboard,
            scene: Scene::with_capacity(SCENE_CAPACITY),
            timestep: config.window.timestep,
            substeps: config.window.substeps.max(1),
            respawns: 0,
        }
    }

    fn step(&mut self) {
        self.policy.apply(&mut self.data);
        self.car.step(&mut self.data, self.timestep);

        // `&mut self` is the exclusive hold on the state for the transition
        let before = planar(&self.data.mocap_pos);
        self.task.transition_locked(&mut self.data);
        let goal = planar(&self.data.mocap_pos);
        if before != goal {
            self.respawns += 1;
            log::info!(
                "goal {} reached at t={:.2}s, next goal ({:.2}, {:.2})",
                self.respawns,
                self.data.time,
                goal.x,
                goal.y
            );
        }
    }

    fn step_frame(&mut self) {
        for _ in 0..self.substeps {
            self.step();
        }
    }

    fn cost(&self) -> f64 {
        let mut residual = vec![0.0; self.task.residual_dim()];
        self.task.residual(&self.data, &mut residual);
        residual.iter().map(|r| r * r).sum::<f64>() * 0.5
    }

    /// Dashboard and scene annotations for one frame.
    fn draw<B: RenderBackend>(&mut self, backend: &mut B, rect: &Rect) {
        let goal = planar(&self.data.mocap_pos);
        let car = planar(&self.data.qpos);
        for (pos, color, size) in [(goal, Color::GREEN, 10), (car, Color::RED, 14)] {
            if let Some((x, y)) = top_down(pos, rect) {
                backend.draw_rectangle(
                    Rect::new(x as i32 - size / 2, y as i32 - size / 2, size, size),
                    color,
                );
            }
        }

        self.dashboard.render(&self.data, Some(&mut *backend), rect);

        self.scene.clear();
        self.task.modify_scene(&self.data, &mut self.scene);
        for geom in self.scene.geoms() {
            if let Some((x, y)) = top_down(geom.pos, rect) {
                backend.draw_text(FontStyle::Shadow, &geom.label, x as f32, y as f32, geom.rgba);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).context("loading config")?,
        None => AppConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.task.seeding = GoalSeeding::Seeded(seed);
    }
    if let Some(font) = args.font {
        config.font.path = Some(font);
    }
    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }
    log::debug!("{:?}", config);

    let host = Host::new(&config, args.follow);
    match args.headless {
        Some(steps) => run_headless(host, steps, &config),
        None => {
            let font = match &config.font.path {
                Some(path) => Some(load_font(path).context("loading font")?),
                None => {
                    log::warn!("no font configured, gauge text will not be drawn");
                    None
                }
            };
            run_window(host, &config, font)
        }
    }
}

fn run_headless(mut host: Host, steps: usize, config: &AppConfig) -> anyhow::Result<()> {
    let rect = Rect::new(0, 0, config.window.width as i32, config.window.height as i32);
    let mut frame = DrawList::new();
    log::info!("running {} steps headless", steps);

    for i in 0..steps {
        host.step();
        if i % host.substeps == 0 {
            frame.clear();
            host.draw(&mut frame, &rect);
        }
    }

    let state = host.dashboard.state();
    log::info!(
        "t={:.2}s goals={} cost={:.4} speed={:.1}km/h rpm={:.0} fuel={:.3}% last frame={} draw calls",
        host.data.time,
        host.respawns,
        host.cost(),
        state.speed_kmh,
        state.rpm,
        state.fuel_level_pct,
        frame.len()
    );
    Ok(())
}

fn run_window(mut host: Host, config: &AppConfig, font: Option<Font<'static>>) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.window.title)
        .with_inner_size(LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .build(&event_loop)?;

    let window = Arc::new(window);
    let window_clone = window.clone();
    let size = window.inner_size();
    let mut fb_width = size.width;
    let mut fb_height = size.height;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

    let font_config = config.font.clone();
    let frame_duration = Duration::from_secs_f64(1.0 / config.window.max_framerate.max(1.0));
    let mut last_frame = Instant::now();

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!("closing after {} goals", host.respawns);
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    fb_width = new_size.width;
                    fb_height = new_size.height;
                    if let Err(err) = pixels.resize_buffer(fb_width, fb_height) {
                        log::error!("resize_buffer failed: {}", err);
                    }
                    if let Err(err) = pixels.resize_surface(fb_width, fb_height) {
                        log::error!("resize_surface failed: {}", err);
                    }
                }
                WindowEvent::RedrawRequested => {
                    host.step_frame();

                    let rect = Rect::new(0, 0, fb_width as i32, fb_height as i32);
                    let mut canvas = Canvas::new(pixels.frame_mut(), fb_width as usize, fb_height as usize);
                    if let Some(font) = &font {
                        canvas = canvas.with_font(font, &font_config);
                    }
                    canvas.clear(Color::gray(0.05));
                    host.draw(&mut canvas, &rect);

                    if let Err(err) = pixels.render() {
                        log::error!("render failed: {}", err);
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_reads_missing_entries_as_zero() {
        assert_eq!(planar(&[1.5, -2.0, 9.0]), DVec3::new(1.5, -2.0, 0.0));
        assert_eq!(planar(&[3.0]), DVec3::new(3.0, 0.0, 0.0));
        assert_eq!(planar(&[]), DVec3::ZERO);
    }

    #[test]
    fn test_host_tolerates_empty_state() {
        let mut host = Host::new(&AppConfig::default(), false);
        host.data = SimData::new(0, 0, 0, 0);
        host.step_frame();
        let mut frame = DrawList::new();
        host.draw(&mut frame, &Rect::new(0, 0, 640, 480));
        assert_eq!(host.respawns, 0);
        assert!(!frame.is_empty());
    }
}
