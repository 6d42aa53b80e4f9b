use approx::assert_relative_eq;
use dashboard::render::{Canvas, DrawCommand, DrawList};
use dashboard::{
    Color, Dashboard, DashboardConfig, Gauge, GaugeKind, GoalSeeding, Rect, Scene, SceneGeom,
    SimData, SimpleCar, SimpleCarConfig, Task,
};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

fn moving(v: [f64; 3]) -> SimData {
    let mut data = SimData::simple_car();
    data.qvel[..3].copy_from_slice(&v);
    data
}

fn rendered(gauge: &Gauge) -> Vec<DrawCommand> {
    let mut list = DrawList::new();
    gauge.render(Some(&mut list));
    list.commands().to_vec()
}

#[test]
fn test_speed_and_rpm_stay_in_range() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(7);
    let mut dashboard = Dashboard::default();
    for _ in 0..500 {
        let v = [
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
        ];
        dashboard.update_data(&moving(v));
        let state = dashboard.state();
        assert!(state.speed_kmh >= 0.0);
        assert!((0.0..=8000.0).contains(&state.rpm));
        let expected = DVec3::from_array(v).length() * 3.6;
        assert_relative_eq!(state.speed_kmh, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_fuel_never_increases_and_floors_at_empty() {
    let config = DashboardConfig::builder().fuel_burn_per_step(0.7).build();
    let mut dashboard = Dashboard::new(config);
    let data = moving([1.0, 0.0, 0.0]);
    let mut last = dashboard.state().fuel_level_pct;
    assert_eq!(last, 100.0);
    for _ in 0..200 {
        dashboard.update_data(&data);
        let fuel = dashboard.state().fuel_level_pct;
        assert!(fuel <= last);
        assert!((0.0..=100.0).contains(&fuel));
        last = fuel;
    }
    assert_eq!(last, 0.0);
}

#[test]
fn test_out_of_range_values_render_like_their_clamp() {
    let cases = [
        (GaugeKind::Speedometer, 300.0, 240.0),
        (GaugeKind::Speedometer, -20.0, 0.0),
        (GaugeKind::Tachometer, 12000.0, 8000.0),
        (GaugeKind::FuelGauge, 120.0, 100.0),
        (GaugeKind::FuelGauge, -5.0, 0.0),
    ];
    for (kind, raw, clamped) in cases {
        let mut over = Gauge::new(kind, 300.0, 200.0, 80.0);
        over.update(raw);
        let mut edge = Gauge::new(kind, 300.0, 200.0, 80.0);
        edge.update(clamped);
        assert_eq!(rendered(&over), rendered(&edge), "{:?} at {}", kind, raw);
    }
}

#[test]
fn test_tachometer_labels_in_thousands() {
    let gauge = Gauge::new(GaugeKind::Tachometer, 100.0, 100.0, 80.0);
    let mut list = DrawList::new();
    gauge.render(Some(&mut list));
    let texts: Vec<&str> = list.texts().collect();
    for label in ["0", "1", "2", "3", "4", "5", "6", "7", "8", "RPM", "TACH"] {
        assert!(texts.contains(&label), "missing {label:?} in {texts:?}");
    }
}

#[test]
fn test_dashboard_rasterizes_onto_canvas() {
    let (w, h) = (800usize, 600usize);
    let mut frame = vec![0u8; w * h * 4];
    let mut dashboard = Dashboard::default();
    let data = moving([10.0, 0.0, 0.0]);
    {
        let mut canvas = Canvas::new(&mut frame, w, h);
        canvas.clear(Color::BLACK);
        dashboard.render(&data, Some(&mut canvas), &Rect::new(0, 0, w as i32, h as i32));
    }
    assert!(dashboard.is_active());
    assert_relative_eq!(dashboard.state().speed_kmh, 36.0, epsilon = 1e-9);
    let lit = frame.chunks_exact(4).filter(|px| px[..3] != [0, 0, 0]).count();
    assert!(lit > 1000, "only {lit} pixels drawn");
}

#[test]
fn test_layout_centers_speedometer_below_middle() {
    let dashboard = Dashboard::default();
    let data = SimData::simple_car();
    for (w, h) in [(800, 600), (1920, 1080), (1, 1), (0, 0), (1023, 767)] {
        let layout = dashboard.layout(&data, &Rect::new(0, 0, w, h));
        let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0 - 100.0);
        assert_eq!(layout.speedometer, (cx, cy));
        assert_eq!(layout.tachometer, (cx - 250.0, cy));
        assert_eq!(layout.fuel_gauge, (cx + 250.0, cy));
    }
}

#[test]
fn test_residual_vanishes_at_goal_with_zero_controls() {
    let task = SimpleCar::default();
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    for _ in 0..20 {
        let (x, y) = (rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
        let mut data = SimData::simple_car();
        data.qpos[..2].copy_from_slice(&[x, y]);
        data.mocap_pos[..2].copy_from_slice(&[x, y]);
        let mut residual = [1.0; 4];
        task.residual(&data, &mut residual);
        assert_eq!(residual, [0.0; 4]);
    }
}

#[test]
fn test_goal_transition_respawns_only_when_reached() {
    let mut task = SimpleCar::new(
        SimpleCarConfig::builder()
            .seeding(GoalSeeding::Seeded(2024))
            .build(),
    );

    let mut far = SimData::simple_car();
    far.mocap_pos[..2].copy_from_slice(&[1.0, -1.0]);
    task.transition_locked(&mut far);
    assert_eq!(far.mocap_pos, vec![1.0, -1.0, 0.01]);

    for _ in 0..50 {
        let mut near = SimData::simple_car();
        near.mocap_pos[..2].copy_from_slice(&[0.05, -0.05]);
        task.transition_locked(&mut near);
        let goal = &near.mocap_pos;
        assert!((-2.0..=2.0).contains(&goal[0]));
        assert!((-2.0..=2.0).contains(&goal[1]));
        assert_eq!(goal[2], 0.01);
    }
}

#[test]
fn test_modify_scene_leaves_full_buffer_untouched() {
    let task = SimpleCar::default();
    let data = SimData::simple_car();
    let mut scene = Scene::with_capacity(3);
    for name in ["a", "b", "c"] {
        assert!(scene.push(SceneGeom::label(name, DVec3::ZERO, 0.1, Color::GREEN)));
    }
    task.modify_scene(&data, &mut scene);
    assert_eq!(scene.ngeom(), 3);
    let labels: Vec<&str> = scene.geoms().iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, ["a", "b", "c"]);
}
