use std::path::PathBuf;

use crate::scene::Scene;
use crate::sim::Simulation;

/// A task module as the predictive-control host sees it.
///
/// The host calls [`residual`](Task::residual) every control step,
/// [`transition_locked`](Task::transition_locked) once per physics step and
/// [`modify_scene`](Task::modify_scene) once per rendered frame. None of the
/// hooks can fail.
pub trait Task {
    fn name(&self) -> &str;

    /// Model file the host loads for this task.
    fn xml_path(&self) -> PathBuf;

    fn residual_dim(&self) -> usize;

    /// Writes `residual_dim()` entries into the front of `residual`.
    fn residual(&self, sim: &dyn Simulation, residual: &mut [f64]);

    /// Updates task-driven state (goal markers and the like) after a step.
    ///
    /// Precondition: the caller holds exclusive access to `sim` for the whole
    /// call; the task takes no locks of its own.
    fn transition_locked(&mut self, sim: &mut dyn Simulation);

    /// Appends task annotations to the frame's scene buffer.
    fn modify_scene(&self, _sim: &dyn Simulation, _scene: &mut Scene) {}
}
