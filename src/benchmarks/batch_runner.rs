use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use itertools::Itertools;
use serde::{Serialize, Deserialize};
use tracing::info;
use crate::benchmarks::executor::{BenchmarkExecutor, ExecutionOptions};
use crate::benchmarks::result::BenchmarkResult;
use crate::utils::utils_console::BenchProgress;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;

/// A YAML file listing query and planner file names.  Names resolve against the `queries/` and
/// `planners/` directories next to the suite file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    #[serde(default)]
    pub queries: Vec<String>,
    #[serde(default)]
    pub planners: Vec<String>
}
impl BenchmarkSuite {
    pub fn load_from_file(path: &Path) -> Result<Self, BenchmarkError> {
        FileUtils::load_object_from_yaml_file(path)
    }
    /// Query and planner paths of the suite stored at `suite_file`.
    pub fn resolve(&self, suite_file: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let base = suite_file.parent().unwrap_or(Path::new("."));
        let queries = self.queries.iter().map(|q| base.join("queries").join(q)).collect();
        let planners = self.planners.iter().map(|p| base.join("planners").join(p)).collect();
        (queries, planners)
    }
}

/// Collects query and planner files and executes every query with every planner.
pub struct BatchRunner {
    executor: BenchmarkExecutor,
    queries: BTreeSet<PathBuf>,
    planners: BTreeSet<PathBuf>
}
impl BatchRunner {
    pub fn new(executor: BenchmarkExecutor) -> Self {
        Self { executor, queries: BTreeSet::new(), planners: BTreeSet::new() }
    }
    pub fn add_query_file(&mut self, path: &Path) {
        self.queries.insert(path.to_path_buf());
    }
    pub fn add_planner_file(&mut self, path: &Path) {
        self.planners.insert(path.to_path_buf());
    }
    pub fn add_suite_file(&mut self, path: &Path) -> Result<(), BenchmarkError> {
        let suite = BenchmarkSuite::load_from_file(path)?;
        let (queries, planners) = suite.resolve(path);
        for q in queries { self.queries.insert(q); }
        for p in planners { self.planners.insert(p); }
        Ok(())
    }
    pub fn num_runs(&self) -> usize {
        self.queries.len() * self.planners.len()
    }
    /// Name of the result file for a query/planner pair: `<query_stem>_<planner_stem>.result`.
    pub fn result_file_name(query_file: &Path, planner_file: &Path) -> String {
        format!("{}_{}.result", FileUtils::basename_without_extension(query_file), FileUtils::basename_without_extension(planner_file))
    }
    /// Runs the cartesian product of queries and planners in order.  Stops at the first error.
    pub fn run(&self, outdir: Option<&Path>, show_progress: bool) -> Result<Vec<BenchmarkResult>, BenchmarkError> {
        if let Some(outdir) = outdir { FileUtils::create_directory_if_necessary(outdir)?; }
        info!("running {} queries x {} planners", self.queries.len(), self.planners.len());

        let mut progress = BenchProgress::new(self.num_runs() as u64, "benchmarks", show_progress);
        let mut out = vec![];
        for (query_file, planner_file) in self.queries.iter().cartesian_product(self.planners.iter()) {
            let options = ExecutionOptions {
                outfile: outdir.map(|d| d.join(Self::result_file_name(query_file, planner_file))),
                ..Default::default()
            };
            out.push(self.executor.execute_benchmark(query_file, planner_file, &options)?);
            progress.inc();
        }
        progress.finish();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_file_naming() {
        assert_eq!(BatchRunner::result_file_name(Path::new("/a/queries/table_3.yaml"), Path::new("planners/snap.yaml")), "table_3_snap.result");
    }

    #[test]
    fn suite_paths_resolve_next_to_suite_file() {
        let suite: BenchmarkSuite = FileUtils::load_object_from_yaml_string("queries: [a.yaml]\nplanners: [p.yaml, r.yaml]\n").unwrap();
        let (q, p) = suite.resolve(Path::new("/data/suite.yaml"));
        assert_eq!(q, vec![PathBuf::from("/data/queries/a.yaml")]);
        assert_eq!(p, vec![PathBuf::from("/data/planners/p.yaml"), PathBuf::from("/data/planners/r.yaml")]);
    }

    #[test]
    fn inputs_are_deduplicated() {
        let mut runner = BatchRunner::new(BenchmarkExecutor::new(crate::scenes::SharedScene::new_default()));
        runner.add_query_file(Path::new("q1.yaml"));
        runner.add_query_file(Path::new("q1.yaml"));
        runner.add_query_file(Path::new("q2.yaml"));
        runner.add_planner_file(Path::new("p.yaml"));
        assert_eq!(runner.num_runs(), 2);
    }
}
