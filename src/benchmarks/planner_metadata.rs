use serde_yaml::{Mapping, Value};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_traits::{ExternalFormat, MappingUtils};

/// Names a planner and the keyword parameters it is constructed with.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkPlannerMetadata {
    planner_module: String,
    planner_class_name: String,
    planner_parameters: Mapping
}
impl BenchmarkPlannerMetadata {
    pub fn new(planner_module: &str, planner_class_name: &str, planner_parameters: Mapping) -> Self {
        Self {
            planner_module: planner_module.to_string(),
            planner_class_name: planner_class_name.to_string(),
            planner_parameters
        }
    }
    pub fn planner_module(&self) -> &str {
        &self.planner_module
    }
    pub fn planner_class_name(&self) -> &str {
        &self.planner_class_name
    }
    pub fn planner_parameters(&self) -> &Mapping {
        &self.planner_parameters
    }
}
impl ExternalFormat for BenchmarkPlannerMetadata {
    fn to_external_format(&self) -> Result<Mapping, BenchmarkError> {
        let mut out = Mapping::new();
        MappingUtils::insert(&mut out, "planner_module", &self.planner_module)?;
        MappingUtils::insert(&mut out, "planner_class_name", &self.planner_class_name)?;
        out.insert(Value::String("planner_parameters".to_string()), Value::Mapping(self.planner_parameters.clone()));
        Ok(out)
    }
    fn from_external_format(mapping: &Mapping) -> Result<Self, BenchmarkError> where Self: Sized {
        let context = "planner metadata";
        let planner_module = MappingUtils::get_required_string(mapping, "planner_module", context)?;
        let planner_class_name = MappingUtils::get_required_string(mapping, "planner_class_name", context)?;
        let planner_parameters = MappingUtils::get_or_default(mapping, "planner_parameters", context, Mapping::new())?;

        Ok(Self { planner_module, planner_class_name, planner_parameters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_format_round_trip() {
        let parameters: Mapping = serde_yaml::from_str("step_size: 0.2\nmax_iterations: 300\ncollision_checker: sphere").unwrap();
        let metadata = BenchmarkPlannerMetadata::new("motion_benchmarks.planners.rrt_connect", "RRTConnectPlanner", parameters);
        let loaded = BenchmarkPlannerMetadata::from_yaml_str(&metadata.to_yaml_string().unwrap()).unwrap();
        assert_eq!(loaded, metadata);
        assert_eq!(loaded.planner_parameters().len(), 3);
    }

    #[test]
    fn parameters_default_to_empty() {
        let loaded = BenchmarkPlannerMetadata::from_yaml_str("planner_module: m\nplanner_class_name: C\n").unwrap();
        assert!(loaded.planner_parameters().is_empty());
    }

    #[test]
    fn missing_class_name_is_missing_field() {
        let err = BenchmarkPlannerMetadata::from_yaml_str("planner_module: m\n").unwrap_err();
        assert!(matches!(err, BenchmarkError::MissingField(_)));
    }
}
