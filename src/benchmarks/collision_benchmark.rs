use std::path::{Path, PathBuf};
use nalgebra::{DVector, Isometry3, Vector3};
use serde::{Serialize, Deserialize};
use tracing::info;
use crate::collision_checkers::CollisionChecker;
use crate::scenes::{SharedScene, SimulationScene};
use crate::utils::utils_console::BenchProgress;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_sampling::{BenchRng, SimpleSamplers};
use crate::utils::utils_statistics::RunningStatistics;
use crate::utils::utils_timing::Timer;

#[derive(Clone, Debug)]
pub struct CollisionBenchmarkOptions {
    /// Check random DOF configurations for self collision instead of random robot placements
    /// for environment collision.
    pub self_collision: bool,
    pub num_samples: usize,
    /// Edge length of the cube robot placements are sampled from.
    pub extent: f64,
    /// Replays the samples of a previous result file instead of sampling.
    pub test_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub show_progress: bool
}
impl Default for CollisionBenchmarkOptions {
    fn default() -> Self {
        Self {
            self_collision: false,
            num_samples: 50000,
            extent: 2.0,
            test_file: None,
            seed: None,
            show_progress: false
        }
    }
}

/// One timed check.  For environment checks `pt` is the robot placement as translation followed
/// by scaled rotation axis; for self checks it is the DOF vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionCheckSample {
    pub pt: Vec<f64>,
    pub elapsed_ms: f64,
    pub collision: bool
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionCheckingBenchmarkResult {
    pub engine: String,
    pub body: String,
    pub self_collision: bool,
    pub elapsed_ms: f64,
    pub checks: usize,
    pub collisions: usize,
    pub mean_ms: f64,
    pub variance_ms: f64,
    pub data: Vec<CollisionCheckSample>
}
impl CollisionCheckingBenchmarkResult {
    pub fn load_from_file(path: &Path) -> Result<Self, BenchmarkError> {
        FileUtils::load_object_from_file(path)
    }
    pub fn save_to_file(&self, path: &Path) -> Result<(), BenchmarkError> {
        FileUtils::save_object_to_file_as_yaml(self, path)
    }
}

pub struct CollisionBenchmark;
impl CollisionBenchmark {
    /// Times `num_samples` collision checks of the scene's robot.  The robot state is restored
    /// afterwards.
    pub fn run(scene: &SharedScene, checker: &mut dyn CollisionChecker, options: &CollisionBenchmarkOptions) -> Result<CollisionCheckingBenchmarkResult, BenchmarkError> {
        if !options.extent.is_finite() || options.extent < 0.0 {
            return Err(BenchmarkError::new_invalid_parameter_error("extent", &format!("Expected a finite non-negative value, got {}.", options.extent), file!(), line!()));
        }
        let (self_collision, points) = match &options.test_file {
            None => { (options.self_collision, None) }
            Some(test_file) => {
                let previous = CollisionCheckingBenchmarkResult::load_from_file(test_file)?;
                info!("replaying {} samples from {}", previous.data.len(), test_file.display());
                (previous.self_collision, Some(previous.data.into_iter().map(|d| d.pt).collect::<Vec<Vec<f64>>>()))
            }
        };

        let mut guard = scene.lock()?;
        let body = guard.robot_name().to_string();
        let initial_dofs = guard.dof_values();
        let initial_transform = guard.robot_transform();

        let points = match points {
            Some(points) => { points }
            None => {
                let mut rng = BenchRng::new(options.seed);
                let (lower, upper) = guard.dof_limits();
                (0..options.num_samples).map(|_| {
                    if self_collision {
                        SimpleSamplers::uniform_dof_sample(&lower, &upper, &mut rng).iter().cloned().collect::<Vec<f64>>()
                    } else {
                        Self::transform_to_point(&SimpleSamplers::random_transform_in_cube(options.extent, &mut rng))
                    }
                }).collect()
            }
        };

        let kind = if self_collision { "self" } else { "environment" };
        info!("running {} {} collision checks of {:?} with the {} engine", points.len(), kind, body, checker.engine_name());

        let res = Self::time_checks(&mut **guard, checker, &body, self_collision, points, options.show_progress);
        guard.set_dof_values(&initial_dofs)?;
        guard.set_robot_transform(&initial_transform);
        let (data, stats) = res?;

        let result = CollisionCheckingBenchmarkResult {
            engine: checker.engine_name(),
            body,
            self_collision,
            elapsed_ms: data.iter().map(|d| d.elapsed_ms).sum(),
            checks: data.len(),
            collisions: data.iter().filter(|d| d.collision).count(),
            mean_ms: stats.mean(),
            variance_ms: stats.variance(),
            data
        };
        info!("{} checks in {:.3} ms ({} in collision), mean {:.6} ms, variance {:.3e}", result.checks, result.elapsed_ms, result.collisions, result.mean_ms, result.variance_ms);

        Ok(result)
    }
    /// Sets each point on the scene and times one check.  Leaves the scene at the last point.
    fn time_checks(scene: &mut dyn SimulationScene,
                   checker: &mut dyn CollisionChecker,
                   body: &str,
                   self_collision: bool,
                   points: Vec<Vec<f64>>,
                   show_progress: bool) -> Result<(Vec<CollisionCheckSample>, RunningStatistics), BenchmarkError> {
        let mut progress = BenchProgress::new(points.len() as u64, "collision checks", show_progress);
        let mut stats = RunningStatistics::new();
        let mut data = Vec::with_capacity(points.len());
        for pt in points {
            if self_collision {
                scene.set_dof_values(&DVector::from_vec(pt.clone()))?;
            } else {
                scene.set_robot_transform(&Self::point_to_transform(&pt)?);
            }

            let timer = Timer::start();
            let collision = if self_collision {
                checker.check_self_collision(&*scene, body)?
            } else {
                checker.check_collision(&*scene, body)?
            };
            let elapsed_ms = timer.elapsed_ms();

            stats.update(elapsed_ms);
            data.push(CollisionCheckSample { pt, elapsed_ms, collision });
            progress.inc();
        }
        progress.finish();
        Ok((data, stats))
    }
    pub fn transform_to_point(transform: &Isometry3<f64>) -> Vec<f64> {
        let t = transform.translation.vector;
        let r = transform.rotation.scaled_axis();
        vec![t[0], t[1], t[2], r[0], r[1], r[2]]
    }
    pub fn point_to_transform(pt: &[f64]) -> Result<Isometry3<f64>, BenchmarkError> {
        if pt.len() != 6 {
            return Err(BenchmarkError::new_parse_error("robot placement", &format!("expected 6 values (translation and scaled axis), got {}", pt.len()), file!(), line!()));
        }
        Ok(Isometry3::new(Vector3::new(pt[0], pt[1], pt[2]), Vector3::new(pt[3], pt[4], pt[5])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::collision_checkers::logging_checker::LoggingCollisionChecker;
    use crate::utils::utils_statistics::StatisticsUtils;

    /// Fails on the call after `ok_calls` successful ones.
    struct FailingChecker { ok_calls: usize }
    impl CollisionChecker for FailingChecker {
        fn engine_name(&self) -> String { "failing".to_string() }
        fn check_collision(&mut self, _scene: &dyn SimulationScene, _body_name: &str) -> Result<bool, BenchmarkError> {
            if self.ok_calls == 0 { return Err(BenchmarkError::new_scene_error("engine crashed", file!(), line!())); }
            self.ok_calls -= 1;
            Ok(false)
        }
        fn check_self_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError> {
            self.check_collision(scene, body_name)
        }
    }

    #[test]
    fn placement_points_round_trip() {
        let t = Isometry3::new(Vector3::new(0.5, 1.0, 1.5), Vector3::new(0.1, -0.2, 0.3));
        let back = CollisionBenchmark::point_to_transform(&CollisionBenchmark::transform_to_point(&t)).unwrap();
        assert_relative_eq!(back, t, epsilon = 1e-12);
        assert!(CollisionBenchmark::point_to_transform(&[1.0]).is_err());
    }

    #[test]
    fn records_every_check_and_restores_state() {
        let scene = SharedScene::new_default();
        let mut checker = LoggingCollisionChecker::new();
        let options = CollisionBenchmarkOptions { num_samples: 25, seed: Some(5), ..Default::default() };
        let result = CollisionBenchmark::run(&scene, &mut checker, &options).unwrap();

        assert_eq!(result.checks, 25);
        assert_eq!(checker.log().len(), 25);
        assert_eq!(result.collisions, 0);
        assert_eq!(result.data[0].pt.len(), 6);
        let times: Vec<f64> = result.data.iter().map(|d| d.elapsed_ms).collect();
        assert_relative_eq!(result.mean_ms, StatisticsUtils::mean(&times).unwrap(), epsilon = 1e-9);
        assert_eq!(scene.lock().unwrap().robot_transform(), Isometry3::identity());
    }

    #[test]
    fn replays_previous_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("self.yaml");
        let scene = SharedScene::new_default();
        let mut checker = LoggingCollisionChecker::new();

        let options = CollisionBenchmarkOptions { self_collision: true, num_samples: 10, seed: Some(1), ..Default::default() };
        let first = CollisionBenchmark::run(&scene, &mut checker, &options).unwrap();
        first.save_to_file(&path).unwrap();

        let options = CollisionBenchmarkOptions { test_file: Some(path), ..Default::default() };
        let second = CollisionBenchmark::run(&scene, &mut checker, &options).unwrap();
        assert!(second.self_collision);
        let first_pts: Vec<&Vec<f64>> = first.data.iter().map(|d| &d.pt).collect();
        let second_pts: Vec<&Vec<f64>> = second.data.iter().map(|d| &d.pt).collect();
        assert_eq!(first_pts, second_pts);
    }

    #[test]
    fn bad_extent_is_a_parameter_error() {
        let scene = SharedScene::new_default();
        let mut checker = LoggingCollisionChecker::new();
        for extent in [-1.0, f64::NAN, f64::INFINITY] {
            let options = CollisionBenchmarkOptions { extent, num_samples: 3, ..Default::default() };
            let res = CollisionBenchmark::run(&scene, &mut checker, &options);
            assert!(matches!(res, Err(BenchmarkError::InvalidParameter(_))));
        }
        assert!(checker.log().is_empty());
    }

    #[test]
    fn failed_check_restores_scene_state() {
        let scene = SharedScene::new_default();
        let mut checker = FailingChecker { ok_calls: 2 };
        let options = CollisionBenchmarkOptions { num_samples: 5, seed: Some(8), ..Default::default() };
        assert!(matches!(CollisionBenchmark::run(&scene, &mut checker, &options), Err(BenchmarkError::Scene(_))));
        assert_eq!(scene.lock().unwrap().robot_transform(), Isometry3::identity());

        let mut checker = FailingChecker { ok_calls: 2 };
        let options = CollisionBenchmarkOptions { self_collision: true, num_samples: 5, seed: Some(8), ..Default::default() };
        assert!(CollisionBenchmark::run(&scene, &mut checker, &options).is_err());
        assert_eq!(scene.lock().unwrap().dof_values(), DVector::from_vec(vec![0.0]));
    }
}
