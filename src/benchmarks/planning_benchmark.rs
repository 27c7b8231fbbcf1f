use std::path::{Path, PathBuf};
use nalgebra::DVector;
use serde::{Serialize, Deserialize};
use tracing::info;
use crate::collision_checkers::CollisionChecker;
use crate::planners::{MotionPlanner, PlanningError, PlanningOptions, PlanningUtils};
use crate::scenes::{SerializedScene, SharedScene, SimulationScene};
use crate::utils::utils_console::BenchProgress;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_sampling::BenchRng;
use crate::utils::utils_timing::Timer;

/// One start/goal pair.  Timing and outcome are filled in once the pair has been planned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfiguration {
    pub start: Vec<f64>,
    pub end: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_solution: Option<bool>
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanningBenchmarkData {
    pub environment: SerializedScene,
    pub configurations: Vec<PlanningConfiguration>
}
impl PlanningBenchmarkData {
    pub fn load_from_file(path: &Path) -> Result<Self, BenchmarkError> {
        FileUtils::load_object_from_file(path)
    }
    pub fn save_to_file(&self, path: &Path) -> Result<(), BenchmarkError> {
        FileUtils::save_object_to_file_as_yaml(self, path)
    }
    pub fn num_solved(&self) -> usize {
        self.configurations.iter().filter(|c| c.found_solution == Some(true)).count()
    }
}

#[derive(Clone, Debug)]
pub struct PlanningBenchmarkOptions {
    pub num_samples: usize,
    /// Plans between the pairs of a previous run (in its scene) instead of sampling new pairs.
    pub test_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub planning_options: PlanningOptions,
    /// Rejection sampling budget per configuration.
    pub max_sample_attempts: usize,
    pub show_progress: bool
}
impl Default for PlanningBenchmarkOptions {
    fn default() -> Self {
        Self {
            num_samples: 100,
            test_file: None,
            seed: None,
            planning_options: PlanningOptions::default(),
            max_sample_attempts: 10000,
            show_progress: false
        }
    }
}

pub struct PlanningBenchmark;
impl PlanningBenchmark {
    /// Samples `count` start/goal pairs that are both valid under `checker`.
    pub fn sample_valid_configuration_pairs(scene: &mut dyn SimulationScene,
                                           checker: &mut dyn CollisionChecker,
                                           count: usize,
                                           rng: &mut BenchRng,
                                           max_attempts: usize) -> Result<Vec<(DVector<f64>, DVector<f64>)>, BenchmarkError> {
        let initial_dofs = scene.dof_values();
        let mut out = vec![];
        for _ in 0..count {
            let start = PlanningUtils::sample_valid_configuration(scene, checker, rng, max_attempts)?;
            let end = PlanningUtils::sample_valid_configuration(scene, checker, rng, max_attempts)?;
            out.push((start, end));
        }
        scene.set_dof_values(&initial_dofs)?;
        Ok(out)
    }
    /// Plans between every pair with `planner` and records per-pair time and success.
    pub fn run(scene: &SharedScene,
               planner: &mut dyn MotionPlanner,
               checker: &mut dyn CollisionChecker,
               options: &PlanningBenchmarkOptions) -> Result<PlanningBenchmarkData, BenchmarkError> {
        let mut guard = scene.lock()?;

        let mut data = match &options.test_file {
            Some(test_file) => {
                let data = PlanningBenchmarkData::load_from_file(test_file)?;
                guard.deserialize_scene(&data.environment)?;
                info!("loaded {} configuration pairs from {}", data.configurations.len(), test_file.display());
                data
            }
            None => {
                info!("generating {} valid configuration pairs...", options.num_samples);
                let mut rng = BenchRng::new(options.seed);
                let pairs = Self::sample_valid_configuration_pairs(&mut **guard, checker, options.num_samples, &mut rng, options.max_sample_attempts)?;
                PlanningBenchmarkData {
                    environment: guard.serialize_scene()?,
                    configurations: pairs.into_iter().map(|(s, e)| PlanningConfiguration {
                        start: s.iter().cloned().collect(),
                        end: e.iter().cloned().collect(),
                        elapsed_ms: None,
                        found_solution: None
                    }).collect()
                }
            }
        };
        let initial_dofs = guard.dof_values();

        let res = Self::plan_configurations(&mut **guard, planner, checker, &mut data.configurations, options);
        guard.set_dof_values(&initial_dofs)?;
        let total_ms = res?;

        let num_tests = data.configurations.len();
        info!("planner solved {} of {} problems", data.num_solved(), num_tests);
        if num_tests > 0 {
            info!("average plan time: {:.3} ms ({} tests)", total_ms / num_tests as f64, num_tests);
        }

        Ok(data)
    }
    /// Plans from each start to its end, filling in time and outcome.  Returns the total time in
    /// ms.  Leaves the scene wherever the last planner call left it.
    fn plan_configurations(scene: &mut dyn SimulationScene,
                           planner: &mut dyn MotionPlanner,
                           checker: &mut dyn CollisionChecker,
                           configurations: &mut [PlanningConfiguration],
                           options: &PlanningBenchmarkOptions) -> Result<f64, BenchmarkError> {
        let mut progress = BenchProgress::new(configurations.len() as u64, planner.planner_name().as_str(), options.show_progress);
        let mut total_ms = 0.0;
        for config in configurations.iter_mut() {
            scene.set_dof_values(&DVector::from_vec(config.start.clone()))?;
            let goal = DVector::from_vec(config.end.clone());
            BenchmarkError::new_check_for_dof_length_mismatch(scene.num_dofs(), goal.len(), file!(), line!())?;

            let timer = Timer::start();
            let res = planner.plan_to_configuration(scene, checker, &goal, &options.planning_options);
            let elapsed_ms = timer.elapsed_ms();

            let found_solution = match res {
                Ok(_) => { true }
                Err(PlanningError::Fatal(e)) => { return Err(e); }
                Err(_) => { false }
            };
            config.elapsed_ms = Some(elapsed_ms);
            config.found_solution = Some(found_solution);
            total_ms += elapsed_ms;
            progress.inc();
        }
        progress.finish();
        Ok(total_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_checkers::shape_checkers::ShapeCollisionChecker;
    use crate::planners::snap_planner::SnapPlanner;
    use crate::planners::Trajectory;
    use crate::registry::CollisionEngineName;

    /// Wanders off to the goal and then fails hard.
    struct CrashingPlanner;
    impl MotionPlanner for CrashingPlanner {
        fn planner_name(&self) -> String { "Crashing".to_string() }
        fn plan_to_configuration(&mut self, scene: &mut dyn SimulationScene, _: &mut dyn CollisionChecker, goal: &DVector<f64>, _: &PlanningOptions) -> Result<Trajectory, PlanningError> {
            scene.set_dof_values(goal)?;
            Err(PlanningError::Fatal(BenchmarkError::new_generic_error_str("planner crashed", file!(), line!())))
        }
    }

    #[test]
    fn plans_every_sampled_pair_and_replays_them() {
        let scene = SharedScene::new_default();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let mut planner = SnapPlanner::new(0.1).unwrap();
        let options = PlanningBenchmarkOptions { num_samples: 4, seed: Some(2), ..Default::default() };

        let data = PlanningBenchmark::run(&scene, &mut planner, &mut checker, &options).unwrap();
        assert_eq!(data.configurations.len(), 4);
        // Nothing to hit in an empty scene.
        assert_eq!(data.num_solved(), 4);
        assert!(data.configurations.iter().all(|c| c.elapsed_ms.is_some()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planning.yaml");
        data.save_to_file(&path).unwrap();
        let options = PlanningBenchmarkOptions { test_file: Some(path), ..Default::default() };
        let replayed = PlanningBenchmark::run(&scene, &mut planner, &mut checker, &options).unwrap();
        let starts: Vec<&Vec<f64>> = replayed.configurations.iter().map(|c| &c.start).collect();
        let expected: Vec<&Vec<f64>> = data.configurations.iter().map(|c| &c.start).collect();
        assert_eq!(starts, expected);
    }

    #[test]
    fn pending_pairs_omit_outcome_keys() {
        let c = PlanningConfiguration { start: vec![0.0], end: vec![1.0], elapsed_ms: None, found_solution: None };
        let s = serde_yaml::to_string(&c).unwrap();
        assert!(!s.contains("elapsed_ms"));
        let back: PlanningConfiguration = serde_yaml::from_str(&s).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn fatal_planner_error_restores_scene_state() {
        let scene = SharedScene::new_default();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let options = PlanningBenchmarkOptions { num_samples: 3, seed: Some(6), ..Default::default() };

        let res = PlanningBenchmark::run(&scene, &mut CrashingPlanner, &mut checker, &options);
        assert!(matches!(res, Err(BenchmarkError::GenericError(_))));
        assert_eq!(scene.lock().unwrap().dof_values(), DVector::from_vec(vec![0.0]));
    }
}
