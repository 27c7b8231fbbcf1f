use std::path::Path;
use nalgebra::DVector;
use serde::{Serialize, Deserialize};
use tracing::info;
use crate::benchmarks::result::CollisionBenchmarkResult;
use crate::collision_checkers::CollisionChecker;
use crate::collision_checkers::logging_checker::CheckMethod;
use crate::scenes::SharedScene;
use crate::utils::utils_console::BenchProgress;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_timing::Timer;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayedCheck {
    pub method_name: CheckMethod,
    pub body_name: String,
    pub in_collision: bool,
    pub elapsed_ms: f64
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionReplayResult {
    pub engine: String,
    pub elapsed_ms: f64,
    pub checks: usize,
    pub data: Vec<ReplayedCheck>
}
impl CollisionReplayResult {
    pub fn load_from_file(path: &Path) -> Result<Self, BenchmarkError> {
        FileUtils::load_object_from_file(path)
    }
    pub fn save_to_file(&self, path: &Path) -> Result<(), BenchmarkError> {
        FileUtils::save_object_to_file_as_yaml(self, path)
    }
}

pub struct CollisionReplay;
impl CollisionReplay {
    /// Loads the logged scene and re-issues every logged check against `checker`, timing each one.
    pub fn run(scene: &SharedScene, checker: &mut dyn CollisionChecker, log: &CollisionBenchmarkResult, show_progress: bool) -> Result<CollisionReplayResult, BenchmarkError> {
        let mut guard = scene.lock()?;
        guard.deserialize_scene(&log.scene_snapshot)?;
        info!("replaying {} collision checks in scene {:?} with the {} engine", log.collision_log.len(), guard.scene_name(), checker.engine_name());

        let mut progress = BenchProgress::new(log.collision_log.len() as u64, "replay", show_progress);
        let mut data = Vec::with_capacity(log.collision_log.len());
        let mut total_ms = 0.0;
        for record in &log.collision_log {
            guard.set_dof_values(&DVector::from_vec(record.dof_values.clone()))?;

            let timer = Timer::start();
            let in_collision = match record.method_name {
                CheckMethod::CheckCollision => { checker.check_collision(&**guard, &record.body_name)? }
                CheckMethod::CheckSelfCollision => { checker.check_self_collision(&**guard, &record.body_name)? }
            };
            let elapsed_ms = timer.elapsed_ms();

            total_ms += elapsed_ms;
            data.push(ReplayedCheck {
                method_name: record.method_name,
                body_name: record.body_name.clone(),
                in_collision,
                elapsed_ms
            });
            progress.inc();
        }
        progress.finish();

        let result = CollisionReplayResult {
            engine: checker.engine_name(),
            elapsed_ms: total_ms,
            checks: data.len(),
            data
        };
        info!("replayed {} checks in {:.3} ms", result.checks, result.elapsed_ms);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_checkers::logging_checker::CollisionCheckRecord;
    use crate::collision_checkers::shape_checkers::ShapeCollisionChecker;
    use crate::registry::CollisionEngineName;
    use crate::scenes::SimulationScene;
    use crate::scenes::planar_arm_scene::PlanarArmScene;
    use crate::scenes::scene_descriptor::{BodyDescriptor, BodyShapeDescriptor, RobotDescriptor, SceneDescriptor};

    #[test]
    fn replay_reports_collisions_of_each_logged_state() {
        let arm = PlanarArmScene::new(SceneDescriptor {
            name: "cell".to_string(),
            robot: RobotDescriptor { name: "arm".to_string(), base_position: [0.0; 3], link_lengths: vec![1.0], link_radius: 0.05, joint_limits: None },
            bodies: vec![BodyDescriptor { name: "post".to_string(), shape: BodyShapeDescriptor::Sphere { radius: 0.1 }, position: [0.0, 0.8, 0.0] }]
        }).unwrap();
        let log = CollisionBenchmarkResult {
            scene_snapshot: arm.serialize_scene().unwrap(),
            collision_log: vec![
                CollisionCheckRecord { method_name: CheckMethod::CheckCollision, body_name: "arm".to_string(), dof_values: vec![0.0] },
                CollisionCheckRecord { method_name: CheckMethod::CheckSelfCollision, body_name: "arm".to_string(), dof_values: vec![0.0] },
                CollisionCheckRecord { method_name: CheckMethod::CheckCollision, body_name: "arm".to_string(), dof_values: vec![std::f64::consts::FRAC_PI_2] }
            ]
        };

        let scene = SharedScene::new_default();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let result = CollisionReplay::run(&scene, &mut checker, &log, false).unwrap();

        assert_eq!(result.engine, "exact");
        assert_eq!(result.checks, 3);
        let flags: Vec<bool> = result.data.iter().map(|d| d.in_collision).collect();
        assert_eq!(flags, vec![false, false, true]);
        assert_eq!(result.data[1].method_name, CheckMethod::CheckSelfCollision);
        assert_eq!(scene.lock().unwrap().scene_name(), "cell");
    }
}
