use serde::{Serialize, Deserialize};
use strum_macros::{Display, EnumString};
use crate::collision_checkers::CollisionChecker;
use crate::scenes::SimulationScene;
use crate::utils::utils_errors::BenchmarkError;

/// Which collision query a log record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum CheckMethod {
    CheckCollision,
    CheckSelfCollision
}

/// One collision check, with the robot DOF values at the time of the call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionCheckRecord {
    pub method_name: CheckMethod,
    pub body_name: String,
    pub dof_values: Vec<f64>
}

/// A collision checker that never reports a collision and records every call it receives.
/// Replaying the log against a real engine reproduces the exact checks a planner issued.
#[derive(Clone, Debug, Default)]
pub struct LoggingCollisionChecker {
    log: Vec<CollisionCheckRecord>
}
impl LoggingCollisionChecker {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn log(&self) -> &Vec<CollisionCheckRecord> {
        &self.log
    }
    pub fn take_log(&mut self) -> Vec<CollisionCheckRecord> {
        std::mem::take(&mut self.log)
    }
    fn record(&mut self, method_name: CheckMethod, scene: &dyn SimulationScene, body_name: &str) {
        self.log.push(CollisionCheckRecord {
            method_name,
            body_name: body_name.to_string(),
            dof_values: scene.dof_values().iter().cloned().collect()
        });
    }
}
impl CollisionChecker for LoggingCollisionChecker {
    fn engine_name(&self) -> String {
        "logging".to_string()
    }
    fn check_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError> {
        self.record(CheckMethod::CheckCollision, scene, body_name);
        Ok(false)
    }
    fn check_self_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError> {
        self.record(CheckMethod::CheckSelfCollision, scene, body_name);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use crate::scenes::planar_arm_scene::PlanarArmScene;

    #[test]
    fn records_one_entry_per_check_with_current_dofs() {
        let mut scene = PlanarArmScene::default();
        let mut checker = LoggingCollisionChecker::new();

        scene.set_dof_values(&DVector::from_vec(vec![0.25])).unwrap();
        assert!(!checker.check_collision(&scene, "robot").unwrap());
        scene.set_dof_values(&DVector::from_vec(vec![-0.5])).unwrap();
        assert!(!checker.check_self_collision(&scene, "robot").unwrap());

        let log = checker.take_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], CollisionCheckRecord { method_name: CheckMethod::CheckCollision, body_name: "robot".to_string(), dof_values: vec![0.25] });
        assert_eq!(log[1].method_name, CheckMethod::CheckSelfCollision);
        assert_eq!(log[1].dof_values, vec![-0.5]);
        assert!(checker.log().is_empty());
    }
}
