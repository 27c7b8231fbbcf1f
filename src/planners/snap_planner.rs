use nalgebra::DVector;
use serde_yaml::Mapping;
use tracing::debug;
use crate::collision_checkers::CollisionChecker;
use crate::planners::{Deadline, MotionPlanner, PlanningError, PlanningOptions, PlanningUtils, Trajectory};
use crate::registry::ParameterUtils;
use crate::scenes::SimulationScene;
use crate::utils::utils_errors::BenchmarkError;

/// Plans a straight line in joint space and succeeds only if every interpolated configuration
/// is valid.
///
/// Parameters: `step_size` (max joint change between checked configurations, default 0.05 rad).
#[derive(Clone, Debug)]
pub struct SnapPlanner {
    step_size: f64
}
impl SnapPlanner {
    pub fn new(step_size: f64) -> Result<Self, BenchmarkError> {
        if !(step_size > 0.0) {
            return Err(BenchmarkError::new_invalid_parameter_error("step_size", &format!("Expected a positive value, got {}.", step_size), file!(), line!()));
        }
        Ok(Self { step_size })
    }
    pub fn new_from_parameters(parameters: &Mapping) -> Result<Self, BenchmarkError> {
        ParameterUtils::check_for_unknown_parameters(parameters, &["step_size"])?;
        Self::new(ParameterUtils::get_f64(parameters, "step_size", 0.05)?)
    }
    fn plan(&self,
            scene: &mut dyn SimulationScene,
            checker: &mut dyn CollisionChecker,
            start: &DVector<f64>,
            goal: &DVector<f64>,
            deadline: &Deadline) -> Result<Trajectory, PlanningError> {
        if !PlanningUtils::is_configuration_valid(scene, checker, start)? {
            return Err(PlanningError::NoSolution("start configuration is invalid".to_string()));
        }
        if !PlanningUtils::is_segment_valid(scene, checker, start, goal, self.step_size, deadline)? {
            return Err(PlanningError::NoSolution("straight line to goal is in collision".to_string()));
        }
        Ok(Trajectory::new(&[start.clone(), goal.clone()]))
    }
}
impl MotionPlanner for SnapPlanner {
    fn planner_name(&self) -> String {
        "SnapPlanner".to_string()
    }
    fn plan_to_configuration(&mut self,
                             scene: &mut dyn SimulationScene,
                             checker: &mut dyn CollisionChecker,
                             goal: &DVector<f64>,
                             options: &PlanningOptions) -> Result<Trajectory, PlanningError> {
        let deadline = Deadline::new(options.timelimit);
        let start = scene.dof_values();

        let res = self.plan(scene, checker, &start, goal, &deadline);
        scene.set_dof_values(&start)?;
        debug!("snap planner finished: success = {}", res.is_ok());

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_checkers::shape_checkers::ShapeCollisionChecker;
    use crate::registry::CollisionEngineName;
    use crate::scenes::planar_arm_scene::PlanarArmScene;
    use crate::scenes::scene_descriptor::{BodyDescriptor, BodyShapeDescriptor, RobotDescriptor, SceneDescriptor};

    fn scene() -> PlanarArmScene {
        // One-link arm of length 1 with a ball blocking the arm at heading pi/2.
        PlanarArmScene::new(SceneDescriptor {
            name: "blocked".to_string(),
            robot: RobotDescriptor { name: "arm".to_string(), base_position: [0.0; 3], link_lengths: vec![1.0], link_radius: 0.05, joint_limits: None },
            bodies: vec![BodyDescriptor { name: "post".to_string(), shape: BodyShapeDescriptor::Sphere { radius: 0.1 }, position: [0.0, 0.8, 0.0] }]
        }).unwrap()
    }

    #[test]
    fn straight_line_success_and_failure() {
        let mut scene = scene();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let mut planner = SnapPlanner::new(0.05).unwrap();

        let t = planner.plan_to_configuration(&mut scene, &mut checker, &DVector::from_vec(vec![-1.0]), &PlanningOptions::default()).unwrap();
        assert_eq!(t.num_waypoints(), 2);
        assert_eq!(scene.dof_values(), DVector::from_vec(vec![0.0]));

        let res = planner.plan_to_configuration(&mut scene, &mut checker, &DVector::from_vec(vec![3.0]), &PlanningOptions::default());
        assert!(matches!(res, Err(PlanningError::NoSolution(_))));
        assert_eq!(scene.dof_values(), DVector::from_vec(vec![0.0]));
    }

    #[test]
    fn plan_to_configurations_takes_first_reachable_goal() {
        let mut scene = scene();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let mut planner = SnapPlanner::new(0.05).unwrap();
        let goals = vec![DVector::from_vec(vec![2.0]), DVector::from_vec(vec![-2.0])];
        let t = planner.plan_to_configurations(&mut scene, &mut checker, &goals, &PlanningOptions::default()).unwrap();
        assert_eq!(t.waypoint(1), Some(DVector::from_vec(vec![-2.0])));
    }

    #[test]
    fn non_positive_step_size_is_invalid() {
        assert!(SnapPlanner::new(0.0).is_err());
    }
}
