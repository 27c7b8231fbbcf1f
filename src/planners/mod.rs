use nalgebra::DVector;
use serde::{Serialize, Deserialize};
use serde_yaml::{Mapping, Value};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use crate::collision_checkers::CollisionChecker;
use crate::registry::ParameterUtils;
use crate::scenes::SimulationScene;
use crate::utils::utils_enums::EnumUtils;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_sampling::{BenchRng, SimpleSamplers};
use crate::utils::utils_timing::Timer;
use crate::utils::utils_traits::MappingUtils;

pub mod rrt_connect_planner;
pub mod snap_planner;

/// Outcome of a planning call that did not produce a trajectory.  `NoSolution` and
/// `TimeLimitExceeded` are soft failures recorded in results; `Fatal` aborts the run.
#[derive(Clone, Debug, Error)]
pub enum PlanningError {
    #[error("no solution found: {0}")]
    NoSolution(String),
    #[error("planning time limit of {0} seconds exceeded")]
    TimeLimitExceeded(f64),
    #[error(transparent)]
    Fatal(#[from] BenchmarkError)
}
impl PlanningError {
    pub fn is_soft_failure(&self) -> bool {
        !matches!(self, PlanningError::Fatal(_))
    }
}

/// A motion planner.  Planners plan from the current robot configuration of the scene, query
/// validity through the given collision checker and leave the scene in its starting configuration.
pub trait MotionPlanner {
    fn planner_name(&self) -> String;
    fn plan_to_configuration(&mut self,
                             scene: &mut dyn SimulationScene,
                             checker: &mut dyn CollisionChecker,
                             goal: &DVector<f64>,
                             options: &PlanningOptions) -> Result<Trajectory, PlanningError>;
    /// Plans to any one of the goals, trying them in order within one shared time limit.
    fn plan_to_configurations(&mut self,
                              scene: &mut dyn SimulationScene,
                              checker: &mut dyn CollisionChecker,
                              goals: &[DVector<f64>],
                              options: &PlanningOptions) -> Result<Trajectory, PlanningError> {
        if goals.is_empty() {
            return Err(PlanningError::NoSolution("no goal configurations were given".to_string()));
        }
        let deadline = Deadline::new(options.timelimit);
        let mut last_error = None;
        for goal in goals {
            deadline.check()?;
            let goal_options = PlanningOptions { timelimit: deadline.remaining(), seed: options.seed };
            match self.plan_to_configuration(scene, checker, goal, &goal_options) {
                Ok(trajectory) => { return Ok(trajectory); }
                Err(e) if e.is_soft_failure() => { last_error = Some(e); }
                Err(e) => { return Err(e); }
            }
        }
        Err(last_error.unwrap_or(PlanningError::NoSolution("no goal configuration was reachable".to_string())))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanningOptions {
    /// Seconds.  `None` means no limit.
    pub timelimit: Option<f64>,
    pub seed: Option<u64>
}

/// Planning entry points a query can name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum PlanningMethod {
    PlanToConfiguration,
    PlanToConfigurations
}
impl PlanningMethod {
    pub fn from_name(name: &str) -> Result<Self, BenchmarkError> {
        EnumUtils::parse_name("planning method", name)
    }
    /// Decodes the positional and keyword arguments of a query and invokes the planner.
    ///
    /// `PlanToConfiguration` takes `goal` (first positional argument or keyword) and
    /// `PlanToConfigurations` takes `goals`.  Both accept a `timelimit` keyword in seconds.
    pub fn invoke(&self,
                  planner: &mut dyn MotionPlanner,
                  scene: &mut dyn SimulationScene,
                  checker: &mut dyn CollisionChecker,
                  args: &[Value],
                  kwargs: &Mapping,
                  options: &PlanningOptions) -> Result<Trajectory, PlanningError> {
        let arg_name = match self {
            PlanningMethod::PlanToConfiguration => { "goal" }
            PlanningMethod::PlanToConfigurations => { "goals" }
        };
        ParameterUtils::check_for_unknown_parameters(kwargs, &[arg_name, "timelimit"])?;
        if args.len() > 1 {
            return Err(BenchmarkError::new_invalid_parameter_error("args", &format!("{} takes at most one positional argument, got {}.", self, args.len()), file!(), line!()).into());
        }
        let arg = match (args.first(), MappingUtils::get(kwargs, arg_name)) {
            (Some(_), Some(_)) => { return Err(BenchmarkError::new_invalid_parameter_error(arg_name, "Given both as a positional and as a keyword argument.", file!(), line!()).into()); }
            (Some(a), None) | (None, Some(a)) => { a }
            (None, None) => { return Err(BenchmarkError::new_missing_field_error(arg_name, &format!("{} arguments", self), file!(), line!()).into()); }
        };

        let mut options = options.clone();
        if MappingUtils::get(kwargs, "timelimit").is_some() {
            options.timelimit = Some(ParameterUtils::get_f64(kwargs, "timelimit", 0.0)?);
        }

        return match self {
            PlanningMethod::PlanToConfiguration => {
                let goal: Vec<f64> = MappingUtils::from_value(arg, "goal configuration")?;
                BenchmarkError::new_check_for_dof_length_mismatch(scene.num_dofs(), goal.len(), file!(), line!())?;
                planner.plan_to_configuration(scene, checker, &DVector::from_vec(goal), &options)
            }
            PlanningMethod::PlanToConfigurations => {
                let goals: Vec<Vec<f64>> = MappingUtils::from_value(arg, "goal configurations")?;
                let mut out_goals = vec![];
                for goal in goals {
                    BenchmarkError::new_check_for_dof_length_mismatch(scene.num_dofs(), goal.len(), file!(), line!())?;
                    out_goals.push(DVector::from_vec(goal));
                }
                planner.plan_to_configurations(scene, checker, &out_goals, &options)
            }
        }
    }
}

/// Ordered list of DOF waypoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    waypoints: Vec<Vec<f64>>
}
impl Trajectory {
    pub fn new(waypoints: &[DVector<f64>]) -> Self {
        Self { waypoints: waypoints.iter().map(|w| w.iter().cloned().collect()).collect() }
    }
    pub fn waypoints(&self) -> &Vec<Vec<f64>> {
        &self.waypoints
    }
    pub fn num_waypoints(&self) -> usize {
        self.waypoints.len()
    }
    pub fn waypoint(&self, idx: usize) -> Option<DVector<f64>> {
        self.waypoints.get(idx).map(|w| DVector::from_vec(w.clone()))
    }
    /// Sum of joint-space distances between consecutive waypoints.
    pub fn length(&self) -> f64 {
        self.waypoints.windows(2).map(|w| {
            w[0].iter().zip(w[1].iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt()
        }).sum()
    }
}

/// Wall-clock budget for one planning call.
#[derive(Clone, Debug)]
pub struct Deadline {
    timer: Timer,
    timelimit: Option<f64>
}
impl Deadline {
    pub fn new(timelimit: Option<f64>) -> Self {
        Self { timer: Timer::start(), timelimit }
    }
    pub fn check(&self) -> Result<(), PlanningError> {
        if let Some(timelimit) = self.timelimit {
            if self.timer.elapsed_seconds() >= timelimit { return Err(PlanningError::TimeLimitExceeded(timelimit)); }
        }
        Ok(())
    }
    pub fn remaining(&self) -> Option<f64> {
        self.timelimit.map(|t| (t - self.timer.elapsed_seconds()).max(0.0))
    }
}

pub struct PlanningUtils;
impl PlanningUtils {
    /// Sets the configuration and checks it: joint limits, then environment collision, then self
    /// collision.  Stops at the first failed test.
    pub fn is_configuration_valid(scene: &mut dyn SimulationScene,
                                  checker: &mut dyn CollisionChecker,
                                  q: &DVector<f64>) -> Result<bool, BenchmarkError> {
        let (lower, upper) = scene.dof_limits();
        BenchmarkError::new_check_for_dof_length_mismatch(lower.len(), q.len(), file!(), line!())?;
        for i in 0..q.len() {
            if q[i] < lower[i] || q[i] > upper[i] { return Ok(false); }
        }
        scene.set_dof_values(q)?;
        let robot_name = scene.robot_name().to_string();
        if checker.check_collision(&*scene, &robot_name)? { return Ok(false); }
        if checker.check_self_collision(&*scene, &robot_name)? { return Ok(false); }
        Ok(true)
    }
    /// Checks interpolated configurations from `from` (exclusive) to `to` (inclusive), spaced at
    /// most `resolution` apart in every joint.
    pub fn is_segment_valid(scene: &mut dyn SimulationScene,
                            checker: &mut dyn CollisionChecker,
                            from: &DVector<f64>,
                            to: &DVector<f64>,
                            resolution: f64,
                            deadline: &Deadline) -> Result<bool, PlanningError> {
        let diff = to - from;
        let max_diff = diff.amax();
        let num_steps = ((max_diff / resolution).ceil() as usize).max(1);
        for step in 1..=num_steps {
            deadline.check()?;
            let q = from + &diff * (step as f64 / num_steps as f64);
            if !Self::is_configuration_valid(scene, checker, &q)? { return Ok(false); }
        }
        Ok(true)
    }
    /// Rejection-samples a configuration inside the joint limits that passes the validity checks.
    pub fn sample_valid_configuration(scene: &mut dyn SimulationScene,
                                      checker: &mut dyn CollisionChecker,
                                      rng: &mut BenchRng,
                                      max_attempts: usize) -> Result<DVector<f64>, BenchmarkError> {
        let (lower, upper) = scene.dof_limits();
        for _ in 0..max_attempts {
            let q = SimpleSamplers::uniform_dof_sample(&lower, &upper, rng);
            if Self::is_configuration_valid(scene, checker, &q)? { return Ok(q); }
        }
        Err(BenchmarkError::new_scene_error(&format!("Could not sample a valid configuration of {:?} in {} attempts.", scene.robot_name(), max_attempts), file!(), line!()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_checkers::logging_checker::LoggingCollisionChecker;
    use crate::scenes::planar_arm_scene::PlanarArmScene;

    struct AlwaysFails;
    impl MotionPlanner for AlwaysFails {
        fn planner_name(&self) -> String { "AlwaysFails".to_string() }
        fn plan_to_configuration(&mut self, _: &mut dyn SimulationScene, _: &mut dyn CollisionChecker, _: &DVector<f64>, _: &PlanningOptions) -> Result<Trajectory, PlanningError> {
            Err(PlanningError::NoSolution("never".to_string()))
        }
    }

    #[test]
    fn method_names_parse() {
        assert_eq!(PlanningMethod::from_name("PlanToConfiguration").unwrap(), PlanningMethod::PlanToConfiguration);
        assert!(matches!(PlanningMethod::from_name("PlanToEndEffectorPose"), Err(BenchmarkError::UnrecognizedName(_))));
    }

    #[test]
    fn invoke_decodes_arguments() {
        let mut scene = PlanarArmScene::default();
        let mut checker = LoggingCollisionChecker::new();
        let mut planner = AlwaysFails;
        let args = vec![serde_yaml::to_value(vec![0.5]).unwrap()];

        let res = PlanningMethod::PlanToConfiguration.invoke(&mut planner, &mut scene, &mut checker, &args, &Mapping::new(), &PlanningOptions::default());
        assert!(matches!(res, Err(PlanningError::NoSolution(_))));

        let res = PlanningMethod::PlanToConfiguration.invoke(&mut planner, &mut scene, &mut checker, &[], &Mapping::new(), &PlanningOptions::default());
        assert!(matches!(res, Err(PlanningError::Fatal(BenchmarkError::MissingField(_)))));

        let kwargs: Mapping = serde_yaml::from_str("goals: [[0.1], [0.2]]\ntimelimit: 1.0").unwrap();
        let res = PlanningMethod::PlanToConfigurations.invoke(&mut planner, &mut scene, &mut checker, &[], &kwargs, &PlanningOptions::default());
        assert!(matches!(res, Err(PlanningError::NoSolution(_))));

        let kwargs: Mapping = serde_yaml::from_str("goal: [0.1, 0.2]").unwrap();
        let res = PlanningMethod::PlanToConfiguration.invoke(&mut planner, &mut scene, &mut checker, &[], &kwargs, &PlanningOptions::default());
        assert!(matches!(res, Err(PlanningError::Fatal(BenchmarkError::Scene(_)))));
    }

    #[test]
    fn trajectory_length() {
        let t = Trajectory::new(&[DVector::from_vec(vec![0.0, 0.0]), DVector::from_vec(vec![3.0, 4.0]), DVector::from_vec(vec![3.0, 5.0])]);
        assert_eq!(t.num_waypoints(), 3);
        assert!((t.length() - 6.0).abs() < 1e-12);
        assert_eq!(t.waypoint(1), Some(DVector::from_vec(vec![3.0, 4.0])));
    }

    #[test]
    fn out_of_limit_configurations_are_invalid() {
        let mut scene = PlanarArmScene::default();
        let mut checker = LoggingCollisionChecker::new();
        assert!(!PlanningUtils::is_configuration_valid(&mut scene, &mut checker, &DVector::from_vec(vec![4.0])).unwrap());
        assert!(checker.log().is_empty());
        assert!(PlanningUtils::is_configuration_valid(&mut scene, &mut checker, &DVector::from_vec(vec![1.0])).unwrap());
        assert_eq!(checker.log().len(), 2);
    }
}
