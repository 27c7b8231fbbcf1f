use serde_yaml::{Mapping, Value};
use crate::planners::PlanningMethod;
use crate::scenes::SerializedScene;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_traits::{ExternalFormat, MappingUtils};

/// A single planning request: the method to call, the scene to call it in, and its arguments.
/// The planning method name is resolved when the query is executed.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkQuery {
    planning_method: String,
    serialized_scene: SerializedScene,
    args: Vec<Value>,
    kwargs: Mapping
}
impl BenchmarkQuery {
    pub fn new(planning_method: &str, serialized_scene: SerializedScene, args: Vec<Value>, kwargs: Mapping) -> Self {
        Self {
            planning_method: planning_method.to_string(),
            serialized_scene,
            args,
            kwargs
        }
    }
    /// Query that plans from the scene's current configuration to `goal`.
    pub fn new_plan_to_configuration(serialized_scene: SerializedScene, goal: &[f64], timelimit: Option<f64>) -> Result<Self, BenchmarkError> {
        let args = vec![MappingUtils::to_value(&goal.to_vec(), "goal")?];
        let mut kwargs = Mapping::new();
        if let Some(timelimit) = timelimit { MappingUtils::insert(&mut kwargs, "timelimit", &timelimit)?; }
        Ok(Self::new(&PlanningMethod::PlanToConfiguration.to_string(), serialized_scene, args, kwargs))
    }
    pub fn planning_method(&self) -> &str {
        &self.planning_method
    }
    pub fn serialized_scene(&self) -> &SerializedScene {
        &self.serialized_scene
    }
    pub fn args(&self) -> &Vec<Value> {
        &self.args
    }
    pub fn kwargs(&self) -> &Mapping {
        &self.kwargs
    }
    /// SHA-256 hex digest of the YAML serialization of the query.
    pub fn checksum(&self) -> Result<String, BenchmarkError> {
        let s = self.to_yaml_string()?;
        Ok(FileUtils::compute_checksum_of_bytes(s.as_bytes()))
    }
}
impl ExternalFormat for BenchmarkQuery {
    fn to_external_format(&self) -> Result<Mapping, BenchmarkError> {
        let mut out = Mapping::new();
        MappingUtils::insert(&mut out, "planning_method", &self.planning_method)?;
        MappingUtils::insert(&mut out, "env", &self.serialized_scene)?;
        MappingUtils::insert(&mut out, "args", &self.args)?;
        out.insert(Value::String("kwargs".to_string()), Value::Mapping(self.kwargs.clone()));
        Ok(out)
    }
    fn from_external_format(mapping: &Mapping) -> Result<Self, BenchmarkError> where Self: Sized {
        let context = "benchmark query";
        let planning_method = MappingUtils::get_required_string(mapping, "planning_method", context)?;
        let env = MappingUtils::get_required(mapping, "env", context)?;
        let serialized_scene: SerializedScene = MappingUtils::from_value(env, "field \"env\" of benchmark query")?;
        let args = MappingUtils::get_or_default(mapping, "args", context, vec![])?;
        let kwargs = MappingUtils::get_or_default(mapping, "kwargs", context, Mapping::new())?;

        Ok(Self { planning_method, serialized_scene, args, kwargs })
    }
}
