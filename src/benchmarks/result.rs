use std::path::Path;
use serde::{Serialize, Deserialize};
use serde_yaml::Mapping;
use crate::collision_checkers::logging_checker::CollisionCheckRecord;
use crate::planners::Trajectory;
use crate::scenes::SerializedScene;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_traits::{ExternalFormat, MappingUtils};

/// Outcome of executing one query with one planner.  Built only by the executor after a completed
/// invocation, or by loading a result file.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
    source_query_id: String,
    query_checksum: String,
    source_planner_id: String,
    planner_checksum: String,
    elapsed_time: f64,
    succeeded: bool,
    output_path: Option<Trajectory>
}
impl BenchmarkResult {
    pub(crate) fn new(source_query_id: String,
                      query_checksum: String,
                      source_planner_id: String,
                      planner_checksum: String,
                      elapsed_time: f64,
                      output_path: Option<Trajectory>) -> Self {
        Self {
            source_query_id,
            query_checksum,
            source_planner_id,
            planner_checksum,
            elapsed_time,
            succeeded: output_path.is_some(),
            output_path
        }
    }
    /// File name of the query that produced this result.
    pub fn source_query_id(&self) -> &str {
        &self.source_query_id
    }
    pub fn query_checksum(&self) -> &str {
        &self.query_checksum
    }
    /// File name of the planner metadata that produced this result.
    pub fn source_planner_id(&self) -> &str {
        &self.source_planner_id
    }
    pub fn planner_checksum(&self) -> &str {
        &self.planner_checksum
    }
    /// Seconds.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }
    pub fn output_path(&self) -> Option<&Trajectory> {
        self.output_path.as_ref()
    }
}
impl ExternalFormat for BenchmarkResult {
    fn to_external_format(&self) -> Result<Mapping, BenchmarkError> {
        let mut out = Mapping::new();
        MappingUtils::insert(&mut out, "query_file", &self.source_query_id)?;
        MappingUtils::insert(&mut out, "query_checksum", &self.query_checksum)?;
        MappingUtils::insert(&mut out, "planner_file", &self.source_planner_id)?;
        MappingUtils::insert(&mut out, "planner_checksum", &self.planner_checksum)?;
        MappingUtils::insert(&mut out, "time", &self.elapsed_time)?;
        MappingUtils::insert(&mut out, "success", &self.succeeded)?;
        MappingUtils::insert(&mut out, "path", &self.output_path)?;
        Ok(out)
    }
    fn from_external_format(mapping: &Mapping) -> Result<Self, BenchmarkError> where Self: Sized {
        let context = "benchmark result";
        Ok(Self {
            source_query_id: MappingUtils::get_or_default(mapping, "query_file", context, String::new())?,
            query_checksum: MappingUtils::get_or_default(mapping, "query_checksum", context, String::new())?,
            source_planner_id: MappingUtils::get_or_default(mapping, "planner_file", context, String::new())?,
            planner_checksum: MappingUtils::get_or_default(mapping, "planner_checksum", context, String::new())?,
            elapsed_time: MappingUtils::get_or_default(mapping, "time", context, 0.0)?,
            succeeded: MappingUtils::get_or_default(mapping, "success", context, false)?,
            output_path: MappingUtils::get_optional(mapping, "path", context)?
        })
    }
}

/// The scene a logged run started from plus every collision check the planner issued.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionBenchmarkResult {
    #[serde(rename = "environment")]
    pub scene_snapshot: SerializedScene,
    pub collision_log: Vec<CollisionCheckRecord>
}
impl CollisionBenchmarkResult {
    pub fn save_to_json_file(&self, path: &Path) -> Result<(), BenchmarkError> {
        FileUtils::save_object_to_file_as_json(self, path)
    }
    pub fn load_from_json_file(path: &Path) -> Result<Self, BenchmarkError> {
        FileUtils::load_object_from_json_file(path)
    }
}
