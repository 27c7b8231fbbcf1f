use crate::scenes::SimulationScene;
use crate::utils::utils_errors::BenchmarkError;

pub mod logging_checker;
pub mod shape_checkers;

/// A collision checking engine.  Checks read the current scene state; callers hold the scene lock
/// while setting state and checking.
pub trait CollisionChecker {
    fn engine_name(&self) -> String;
    /// True if the given body intersects any other body in the scene.
    fn check_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError>;
    /// True if any two non-adjacent parts of the given body intersect.
    fn check_self_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError>;
}
