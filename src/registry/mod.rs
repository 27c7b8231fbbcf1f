use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;
use crate::collision_checkers::CollisionChecker;
use crate::collision_checkers::shape_checkers::ShapeCollisionChecker;
use crate::planners::MotionPlanner;
use crate::planners::rrt_connect_planner::RRTConnectPlanner;
use crate::planners::snap_planner::SnapPlanner;
use crate::utils::utils_enums::EnumUtils;
use crate::utils::utils_errors::BenchmarkError;

/// Planner parameter naming the collision engine used while planning.
pub const COLLISION_CHECKER_PARAMETER: &str = "collision_checker";

/// Modules that provide planners.  A planner class must be looked up in the module that defines it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum PlannerModule {
    #[strum(serialize = "motion_benchmarks.planners.snap")]
    Snap,
    #[strum(serialize = "motion_benchmarks.planners.rrt_connect")]
    RRTConnect
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum PlannerName {
    SnapPlanner,
    RRTConnectPlanner
}
impl PlannerName {
    pub fn module(&self) -> PlannerModule {
        return match self {
            PlannerName::SnapPlanner => { PlannerModule::Snap }
            PlannerName::RRTConnectPlanner => { PlannerModule::RRTConnect }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum CollisionEngineName {
    Exact,
    Sphere,
    Aabb
}

/// Maps symbolic planner and collision engine names to instances.
pub struct BenchmarkRegistry;
impl BenchmarkRegistry {
    pub fn get_planner(planner_module: &str, planner_class_name: &str, parameters: &Mapping) -> Result<Box<dyn MotionPlanner>, BenchmarkError> {
        let module: PlannerModule = EnumUtils::parse_name("planner module", planner_module)?;
        let name: PlannerName = EnumUtils::parse_name("planner class", planner_class_name)?;
        if name.module() != module {
            let supported = vec![name.module().to_string()];
            return Err(BenchmarkError::new_unrecognized_name_error(&format!("module for planner class {}", name), planner_module, &supported, file!(), line!()));
        }
        debug!("resolving planner {} from {}", name, module);

        return match name {
            PlannerName::SnapPlanner => { Ok(Box::new(SnapPlanner::new_from_parameters(parameters)?)) }
            PlannerName::RRTConnectPlanner => { Ok(Box::new(RRTConnectPlanner::new_from_parameters(parameters)?)) }
        }
    }
    /// Resolves a planner from the short names accepted on the command line (`snap`, `rrt_connect`).
    pub fn get_planner_by_short_name(short_name: &str, parameters: &Mapping) -> Result<Box<dyn MotionPlanner>, BenchmarkError> {
        let (module, class_name) = Self::planner_module_and_class_from_short_name(short_name)?;
        Self::get_planner(&module.to_string(), &class_name.to_string(), parameters)
    }
    pub fn planner_module_and_class_from_short_name(short_name: &str) -> Result<(PlannerModule, PlannerName), BenchmarkError> {
        return match short_name {
            "snap" => { Ok((PlannerModule::Snap, PlannerName::SnapPlanner)) }
            "rrt_connect" => { Ok((PlannerModule::RRTConnect, PlannerName::RRTConnectPlanner)) }
            _ => {
                Err(BenchmarkError::new_unrecognized_name_error("planner", short_name, &["snap".to_string(), "rrt_connect".to_string()], file!(), line!()))
            }
        }
    }
    /// Recognized parameters: `margin` (non-negative float, default 0.0).
    pub fn get_collision_checker(engine_name: &str, parameters: &Mapping) -> Result<Box<dyn CollisionChecker>, BenchmarkError> {
        let engine: CollisionEngineName = EnumUtils::parse_name("collision engine", engine_name)?;
        ParameterUtils::check_for_unknown_parameters(parameters, &["margin"])?;
        let margin = ParameterUtils::get_f64(parameters, "margin", 0.0)?;
        Ok(Box::new(ShapeCollisionChecker::new(engine, margin)?))
    }
    /// The collision engine named by planner parameters, `exact` when unspecified.
    pub fn get_collision_checker_for_planner_parameters(planner_parameters: &Mapping) -> Result<Box<dyn CollisionChecker>, BenchmarkError> {
        let engine_name = ParameterUtils::get_string(planner_parameters, COLLISION_CHECKER_PARAMETER, &CollisionEngineName::Exact.to_string())?;
        Self::get_collision_checker(&engine_name, &Mapping::new())
    }
    pub fn supported_collision_engines() -> Vec<String> {
        EnumUtils::convert_all_variants_of_enum_into_strings::<CollisionEngineName>()
    }
}

/// Typed access to keyword parameter mappings.
pub struct ParameterUtils;
impl ParameterUtils {
    pub fn get_f64(parameters: &Mapping, key: &str, default: f64) -> Result<f64, BenchmarkError> {
        return match parameters.get(&Value::String(key.to_string())) {
            None | Some(Value::Null) => { Ok(default) }
            Some(Value::Number(n)) => {
                match n.as_f64() {
                    Some(f) => { Ok(f) }
                    None => { Err(BenchmarkError::new_invalid_parameter_error(key, "Expected a number.", file!(), line!())) }
                }
            }
            Some(v) => { Err(BenchmarkError::new_invalid_parameter_error(key, &format!("Expected a number, got {:?}.", v), file!(), line!())) }
        }
    }
    pub fn get_usize(parameters: &Mapping, key: &str, default: usize) -> Result<usize, BenchmarkError> {
        let out: Option<usize> = Self::get_typed(parameters, key, "a non-negative integer")?;
        Ok(out.unwrap_or(default))
    }
    pub fn get_optional_u64(parameters: &Mapping, key: &str) -> Result<Option<u64>, BenchmarkError> {
        Self::get_typed(parameters, key, "a non-negative integer")
    }
    pub fn get_string(parameters: &Mapping, key: &str, default: &str) -> Result<String, BenchmarkError> {
        let out: Option<String> = Self::get_typed(parameters, key, "a string")?;
        Ok(out.unwrap_or(default.to_string()))
    }
    /// Fails with `InvalidParameter` for any key outside `allowed`.  The collision checker
    /// parameter is always allowed.
    pub fn check_for_unknown_parameters(parameters: &Mapping, allowed: &[&str]) -> Result<(), BenchmarkError> {
        for key in parameters.keys() {
            let key_str = match key {
                Value::String(s) => { s.as_str() }
                _ => { return Err(BenchmarkError::new_invalid_parameter_error(&format!("{:?}", key), "Parameter names must be strings.", file!(), line!())) }
            };
            if key_str == COLLISION_CHECKER_PARAMETER { continue; }
            if !allowed.contains(&key_str) {
                return Err(BenchmarkError::new_invalid_parameter_error(key_str, &format!("Unknown parameter.  Supported parameters are {:?}.", allowed), file!(), line!()));
            }
        }
        Ok(())
    }
    fn get_typed<T: DeserializeOwned>(parameters: &Mapping, key: &str, expected: &str) -> Result<Option<T>, BenchmarkError> {
        return match parameters.get(&Value::String(key.to_string())) {
            None | Some(Value::Null) => { Ok(None) }
            Some(v) => {
                match serde_yaml::from_value(v.clone()) {
                    Ok(t) => { Ok(Some(t)) }
                    Err(_) => { Err(BenchmarkError::new_invalid_parameter_error(key, &format!("Expected {}, got {:?}.", expected, v), file!(), line!())) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(s: &str) -> Mapping {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn resolves_known_planners() {
        let p = BenchmarkRegistry::get_planner("motion_benchmarks.planners.snap", "SnapPlanner", &Mapping::new()).unwrap();
        assert_eq!(p.planner_name(), "SnapPlanner");
        let p = BenchmarkRegistry::get_planner_by_short_name("rrt_connect", &params("step_size: 0.2\ncollision_checker: aabb")).unwrap();
        assert_eq!(p.planner_name(), "RRTConnectPlanner");
    }

    #[test]
    fn unknown_names_are_unrecognized() {
        let e = BenchmarkRegistry::get_planner("motion_benchmarks.planners.snap", "CHOMPPlanner", &Mapping::new()).err().unwrap();
        assert!(matches!(e, BenchmarkError::UnrecognizedName(_)));
        let e = BenchmarkRegistry::get_planner("prpy.planning", "SnapPlanner", &Mapping::new()).err().unwrap();
        assert!(matches!(e, BenchmarkError::UnrecognizedName(_)));
        let e = BenchmarkRegistry::get_planner("motion_benchmarks.planners.rrt_connect", "SnapPlanner", &Mapping::new()).err().unwrap();
        assert!(matches!(e, BenchmarkError::UnrecognizedName(_)));
        let e = BenchmarkRegistry::get_collision_checker("ode", &Mapping::new()).err().unwrap();
        assert!(matches!(e, BenchmarkError::UnrecognizedName(_)));
    }

    #[test]
    fn bad_parameters_are_invalid() {
        let e = BenchmarkRegistry::get_planner_by_short_name("snap", &params("step_size: fast")).err().unwrap();
        assert!(matches!(e, BenchmarkError::InvalidParameter(_)));
        let e = BenchmarkRegistry::get_planner_by_short_name("snap", &params("unknown_knob: 1")).err().unwrap();
        assert!(matches!(e, BenchmarkError::InvalidParameter(_)));
        assert!(BenchmarkRegistry::get_collision_checker("sphere", &params("margin: 0.1")).is_ok());
    }

    #[test]
    fn planner_collision_checker_defaults_to_exact() {
        let c = BenchmarkRegistry::get_collision_checker_for_planner_parameters(&Mapping::new()).unwrap();
        assert_eq!(c.engine_name(), "exact");
        let c = BenchmarkRegistry::get_collision_checker_for_planner_parameters(&params("collision_checker: aabb")).unwrap();
        assert_eq!(c.engine_name(), "aabb");
        assert_eq!(BenchmarkRegistry::supported_collision_engines(), vec!["exact", "sphere", "aabb"]);
    }

    #[test]
    fn integer_parameters_read_as_floats() {
        assert_eq!(ParameterUtils::get_f64(&params("a: 2"), "a", 0.0).unwrap(), 2.0);
        assert_eq!(ParameterUtils::get_usize(&params("a: 2"), "b", 7).unwrap(), 7);
        assert!(ParameterUtils::get_usize(&params("a: -2"), "a", 7).is_err());
    }
}
