use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::benchmarks::planner_metadata::BenchmarkPlannerMetadata;
use crate::benchmarks::query::BenchmarkQuery;
use crate::benchmarks::result::{BenchmarkResult, CollisionBenchmarkResult};
use crate::collision_checkers::CollisionChecker;
use crate::collision_checkers::logging_checker::LoggingCollisionChecker;
use crate::planners::{PlanningError, PlanningMethod, PlanningOptions, Trajectory};
use crate::registry::BenchmarkRegistry;
use crate::scenes::{SerializedScene, SharedScene};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_timing::Timer;
use crate::utils::utils_traits::ExternalFormat;

#[derive(Clone, Debug, Default)]
pub struct ExecutionOptions {
    /// When set, the result is written to this file.
    pub outfile: Option<PathBuf>,
    /// Defaults handed to the planner; query keyword arguments override them.
    pub planning_options: PlanningOptions
}

/// Runs single benchmark queries against the shared scene.
pub struct BenchmarkExecutor {
    scene: SharedScene
}
impl BenchmarkExecutor {
    pub fn new(scene: SharedScene) -> Self {
        Self { scene }
    }
    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }
    /// Loads the query and planner files, plans once inside a timed region and builds the
    /// result.  Planning soft failures give an unsuccessful result; every other error propagates.
    pub fn execute_benchmark(&self, query_file: &Path, planner_file: &Path, options: &ExecutionOptions) -> Result<BenchmarkResult, BenchmarkError> {
        let loaded = LoadedBenchmark::load(query_file, planner_file)?;
        let mut checker = BenchmarkRegistry::get_collision_checker_for_planner_parameters(loaded.metadata.planner_parameters())?;

        let invocation = self.invoke(&loaded, checker.as_mut(), &options.planning_options)?;
        let result = BenchmarkResult::new(FileUtils::basename(query_file),
                                          loaded.query_checksum.clone(),
                                          FileUtils::basename(planner_file),
                                          loaded.planner_checksum.clone(),
                                          invocation.elapsed_seconds,
                                          invocation.path);
        info!("{} with {}: success = {}, time = {:.6} s", result.source_query_id(), result.source_planner_id(), result.succeeded(), result.elapsed_time());

        if let Some(outfile) = &options.outfile {
            result.save_to_yaml_file(outfile)?;
            info!("Results written to file {}", outfile.display());
        }

        Ok(result)
    }
    /// Runs the query with a collision checker that records every check instead of computing it.
    pub fn log_collision_checks(&self, query_file: &Path, planner_file: &Path, options: &ExecutionOptions) -> Result<CollisionBenchmarkResult, BenchmarkError> {
        let loaded = LoadedBenchmark::load(query_file, planner_file)?;
        let mut checker = LoggingCollisionChecker::new();

        let invocation = self.invoke(&loaded, &mut checker, &options.planning_options)?;
        let result = CollisionBenchmarkResult {
            scene_snapshot: invocation.scene_snapshot,
            collision_log: checker.take_log()
        };
        info!("{} with {}: logged {} collision checks", FileUtils::basename(query_file), FileUtils::basename(planner_file), result.collision_log.len());

        if let Some(outfile) = &options.outfile {
            result.save_to_json_file(outfile)?;
            info!("Collision log written to file {}", outfile.display());
        }

        Ok(result)
    }
    fn invoke(&self, loaded: &LoadedBenchmark, checker: &mut dyn CollisionChecker, planning_options: &PlanningOptions) -> Result<Invocation, BenchmarkError> {
        let mut guard = self.scene.lock()?;
        guard.deserialize_scene(loaded.query.serialized_scene())?;
        let scene_snapshot = guard.serialize_scene()?;

        let metadata = &loaded.metadata;
        let mut planner = BenchmarkRegistry::get_planner(metadata.planner_module(), metadata.planner_class_name(), metadata.planner_parameters())?;
        let method = PlanningMethod::from_name(loaded.query.planning_method())?;
        debug!("invoking {}.{} with {} engine", planner.planner_name(), method, checker.engine_name());

        let timer = Timer::start();
        let res = method.invoke(planner.as_mut(), &mut **guard, checker, loaded.query.args(), loaded.query.kwargs(), planning_options);
        let elapsed_seconds = timer.elapsed_seconds();

        let path = match res {
            Ok(path) => { Some(path) }
            Err(PlanningError::Fatal(e)) => { return Err(e); }
            Err(e) => {
                info!("planning failed: {}", e);
                None
            }
        };

        Ok(Invocation { path, elapsed_seconds, scene_snapshot })
    }
}

struct LoadedBenchmark {
    query: BenchmarkQuery,
    metadata: BenchmarkPlannerMetadata,
    query_checksum: String,
    planner_checksum: String
}
impl LoadedBenchmark {
    fn load(query_file: &Path, planner_file: &Path) -> Result<Self, BenchmarkError> {
        let query = BenchmarkQuery::load_from_yaml_file(query_file)?;
        let metadata = BenchmarkPlannerMetadata::load_from_yaml_file(planner_file)?;
        Ok(Self {
            query,
            metadata,
            query_checksum: FileUtils::compute_checksum_of_file(query_file)?,
            planner_checksum: FileUtils::compute_checksum_of_file(planner_file)?
        })
    }
}

struct Invocation {
    path: Option<Trajectory>,
    elapsed_seconds: f64,
    scene_snapshot: SerializedScene
}
