use std::path::{Path, PathBuf};
use tracing::info;
use crate::benchmarks::planning_benchmark::PlanningBenchmark;
use crate::benchmarks::query::BenchmarkQuery;
use crate::collision_checkers::CollisionChecker;
use crate::scenes::SharedScene;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_sampling::BenchRng;
use crate::utils::utils_traits::ExternalFormat;

#[derive(Clone, Debug)]
pub struct QueryGenerationOptions {
    pub count: usize,
    /// Written into each query as the `timelimit` keyword argument.
    pub timelimit: Option<f64>,
    pub seed: Option<u64>,
    pub max_sample_attempts: usize
}
impl Default for QueryGenerationOptions {
    fn default() -> Self {
        Self { count: 10, timelimit: None, seed: None, max_sample_attempts: 10000 }
    }
}

pub struct QueryGenerator;
impl QueryGenerator {
    /// Writes one `PlanToConfiguration` query per valid start/goal pair into `outdir`, named
    /// `<scene name>_<index>.yaml`.  Each query stores the scene with the robot at the start.
    pub fn generate_queries(scene: &SharedScene,
                            checker: &mut dyn CollisionChecker,
                            outdir: &Path,
                            options: &QueryGenerationOptions) -> Result<Vec<PathBuf>, BenchmarkError> {
        FileUtils::create_directory_if_necessary(outdir)?;
        let mut guard = scene.lock()?;
        let initial_dofs = guard.dof_values();
        let scene_name = guard.scene_name().to_string();

        let mut rng = BenchRng::new(options.seed);
        let pairs = PlanningBenchmark::sample_valid_configuration_pairs(&mut **guard, checker, options.count, &mut rng, options.max_sample_attempts)?;

        let mut out = vec![];
        for (i, (start, end)) in pairs.iter().enumerate() {
            guard.set_dof_values(start)?;
            let goal: Vec<f64> = end.iter().cloned().collect();
            let query = BenchmarkQuery::new_plan_to_configuration(guard.serialize_scene()?, &goal, options.timelimit)?;

            let path = outdir.join(format!("{}_{}.yaml", scene_name, i));
            query.save_to_yaml_file(&path)?;
            out.push(path);
        }
        guard.set_dof_values(&initial_dofs)?;
        info!("wrote {} queries to {}", out.len(), outdir.display());

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_checkers::logging_checker::LoggingCollisionChecker;

    #[test]
    fn writes_one_loadable_query_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let scene = SharedScene::new_default();
        let mut checker = LoggingCollisionChecker::new();
        let options = QueryGenerationOptions { count: 3, timelimit: Some(2.0), seed: Some(9), ..Default::default() };

        let files = QueryGenerator::generate_queries(&scene, &mut checker, dir.path(), &options).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(FileUtils::basename(&files[0]), "empty_0.yaml");
        let q = BenchmarkQuery::load_from_yaml_file(&files[2]).unwrap();
        assert_eq!(q.planning_method(), "PlanToConfiguration");
        assert_eq!(q.args().len(), 1);
        assert!(q.kwargs().contains_key("timelimit"));
    }
}
