use nalgebra::DVector;
use serde_yaml::Mapping;
use tracing::debug;
use crate::collision_checkers::CollisionChecker;
use crate::planners::{Deadline, MotionPlanner, PlanningError, PlanningOptions, PlanningUtils, Trajectory};
use crate::registry::ParameterUtils;
use crate::scenes::SimulationScene;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_sampling::{BenchRng, SimpleSamplers};

/// Bidirectional RRT that grows one tree from the start and one from the goal and alternates
/// between extending one tree toward a random sample and greedily connecting the other tree to
/// the new node.
///
/// Parameters: `step_size` (default 0.1 rad), `collision_resolution` (default 0.05 rad),
/// `max_iterations` (default 5000) and `seed` (optional, overridden by a seed in the options).
#[derive(Clone, Debug)]
pub struct RRTConnectPlanner {
    step_size: f64,
    collision_resolution: f64,
    max_iterations: usize,
    seed: Option<u64>
}
impl RRTConnectPlanner {
    pub fn new(step_size: f64, collision_resolution: f64, max_iterations: usize, seed: Option<u64>) -> Result<Self, BenchmarkError> {
        if !(step_size > 0.0) {
            return Err(BenchmarkError::new_invalid_parameter_error("step_size", &format!("Expected a positive value, got {}.", step_size), file!(), line!()));
        }
        if !(collision_resolution > 0.0) {
            return Err(BenchmarkError::new_invalid_parameter_error("collision_resolution", &format!("Expected a positive value, got {}.", collision_resolution), file!(), line!()));
        }
        Ok(Self { step_size, collision_resolution, max_iterations, seed })
    }
    pub fn new_from_parameters(parameters: &Mapping) -> Result<Self, BenchmarkError> {
        ParameterUtils::check_for_unknown_parameters(parameters, &["step_size", "collision_resolution", "max_iterations", "seed"])?;
        Self::new(ParameterUtils::get_f64(parameters, "step_size", 0.1)?,
                  ParameterUtils::get_f64(parameters, "collision_resolution", 0.05)?,
                  ParameterUtils::get_usize(parameters, "max_iterations", 5000)?,
                  ParameterUtils::get_optional_u64(parameters, "seed")?)
    }
    fn plan(&self,
            scene: &mut dyn SimulationScene,
            checker: &mut dyn CollisionChecker,
            start: &DVector<f64>,
            goal: &DVector<f64>,
            rng: &mut BenchRng,
            deadline: &Deadline) -> Result<Trajectory, PlanningError> {
        if !PlanningUtils::is_configuration_valid(scene, checker, start)? {
            return Err(PlanningError::NoSolution("start configuration is invalid".to_string()));
        }
        if !PlanningUtils::is_configuration_valid(scene, checker, goal)? {
            return Err(PlanningError::NoSolution("goal configuration is invalid".to_string()));
        }

        let (lower, upper) = scene.dof_limits();
        let mut tree_a = Tree::new(start.clone());
        let mut tree_b = Tree::new(goal.clone());
        let mut a_is_start_tree = true;

        for iteration in 0..self.max_iterations {
            deadline.check()?;
            let sample = SimpleSamplers::uniform_dof_sample(&lower, &upper, rng);

            if let ExtendStatus::Advanced(new_idx) | ExtendStatus::Reached(new_idx) = self.extend(scene, checker, &mut tree_a, &sample, deadline)? {
                let target = tree_a.nodes[new_idx].q.clone();
                if let ExtendStatus::Reached(connect_idx) = self.connect(scene, checker, &mut tree_b, &target, deadline)? {
                    debug!("rrt_connect connected trees after {} iterations ({} + {} nodes)", iteration + 1, tree_a.nodes.len(), tree_b.nodes.len());
                    let (start_tree, start_idx, goal_tree, goal_idx) = if a_is_start_tree {
                        (&tree_a, new_idx, &tree_b, connect_idx)
                    } else {
                        (&tree_b, connect_idx, &tree_a, new_idx)
                    };
                    let mut waypoints = start_tree.path_to_root(start_idx);
                    waypoints.reverse();
                    let mut goal_half = goal_tree.path_to_root(goal_idx);
                    // Both halves contain the connection node.
                    goal_half.remove(0);
                    waypoints.extend(goal_half);
                    return Ok(Trajectory::new(&waypoints));
                }
            }

            std::mem::swap(&mut tree_a, &mut tree_b);
            a_is_start_tree = !a_is_start_tree;
        }

        Err(PlanningError::NoSolution(format!("trees did not connect within {} iterations", self.max_iterations)))
    }
    fn extend(&self,
              scene: &mut dyn SimulationScene,
              checker: &mut dyn CollisionChecker,
              tree: &mut Tree,
              target: &DVector<f64>,
              deadline: &Deadline) -> Result<ExtendStatus, PlanningError> {
        let nearest_idx = tree.nearest(target);
        let nearest = tree.nodes[nearest_idx].q.clone();
        let diff = target - &nearest;
        let dist = diff.norm();

        let (q_new, reached) = if dist <= self.step_size {
            (target.clone(), true)
        } else {
            (&nearest + diff * (self.step_size / dist), false)
        };

        if !PlanningUtils::is_segment_valid(scene, checker, &nearest, &q_new, self.collision_resolution, deadline)? {
            return Ok(ExtendStatus::Trapped);
        }
        let new_idx = tree.add(q_new, nearest_idx);
        return if reached { Ok(ExtendStatus::Reached(new_idx)) } else { Ok(ExtendStatus::Advanced(new_idx)) };
    }
    fn connect(&self,
               scene: &mut dyn SimulationScene,
               checker: &mut dyn CollisionChecker,
               tree: &mut Tree,
               target: &DVector<f64>,
               deadline: &Deadline) -> Result<ExtendStatus, PlanningError> {
        loop {
            let status = self.extend(scene, checker, tree, target, deadline)?;
            match status {
                ExtendStatus::Advanced(_) => { continue; }
                _ => { return Ok(status); }
            }
        }
    }
}
impl MotionPlanner for RRTConnectPlanner {
    fn planner_name(&self) -> String {
        "RRTConnectPlanner".to_string()
    }
    fn plan_to_configuration(&mut self,
                             scene: &mut dyn SimulationScene,
                             checker: &mut dyn CollisionChecker,
                             goal: &DVector<f64>,
                             options: &PlanningOptions) -> Result<Trajectory, PlanningError> {
        let deadline = Deadline::new(options.timelimit);
        let mut rng = BenchRng::new(options.seed.or(self.seed));
        let start = scene.dof_values();

        let res = self.plan(scene, checker, &start, goal, &mut rng, &deadline);
        scene.set_dof_values(&start)?;

        res
    }
}

enum ExtendStatus {
    Advanced(usize),
    Reached(usize),
    Trapped
}

struct TreeNode {
    q: DVector<f64>,
    parent: Option<usize>
}

struct Tree {
    nodes: Vec<TreeNode>
}
impl Tree {
    fn new(root: DVector<f64>) -> Self {
        Self { nodes: vec![TreeNode { q: root, parent: None }] }
    }
    fn add(&mut self, q: DVector<f64>, parent: usize) -> usize {
        self.nodes.push(TreeNode { q, parent: Some(parent) });
        self.nodes.len() - 1
    }
    fn nearest(&self, q: &DVector<f64>) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (i, n) in self.nodes.iter().enumerate() {
            let d = (&n.q - q).norm_squared();
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }
        best_idx
    }
    /// Configurations from the given node back to the root.
    fn path_to_root(&self, idx: usize) -> Vec<DVector<f64>> {
        let mut out = vec![];
        let mut curr = Some(idx);
        while let Some(i) = curr {
            out.push(self.nodes[i].q.clone());
            curr = self.nodes[i].parent;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_checkers::shape_checkers::ShapeCollisionChecker;
    use crate::registry::CollisionEngineName;
    use crate::scenes::planar_arm_scene::PlanarArmScene;
    use crate::scenes::scene_descriptor::{BodyDescriptor, BodyShapeDescriptor, RobotDescriptor, SceneDescriptor};

    fn blocked_scene() -> PlanarArmScene {
        // Two-link arm; a post above the base forces the second link to bend while the first swings through pi/2.
        PlanarArmScene::new(SceneDescriptor {
            name: "blocked".to_string(),
            robot: RobotDescriptor { name: "arm".to_string(), base_position: [0.0; 3], link_lengths: vec![1.0, 0.6], link_radius: 0.05, joint_limits: None },
            bodies: vec![BodyDescriptor { name: "post".to_string(), shape: BodyShapeDescriptor::Sphere { radius: 0.1 }, position: [0.0, 1.3, 0.0] }]
        }).unwrap()
    }

    #[test]
    fn finds_valid_path_around_obstacle() {
        let mut scene = blocked_scene();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let mut planner = RRTConnectPlanner::new(0.2, 0.05, 20000, Some(11)).unwrap();
        let goal = DVector::from_vec(vec![2.5, 0.0]);

        let t = planner.plan_to_configuration(&mut scene, &mut checker, &goal, &PlanningOptions::default()).unwrap();
        assert_eq!(t.waypoint(0), Some(DVector::from_vec(vec![0.0, 0.0])));
        assert_eq!(t.waypoint(t.num_waypoints() - 1), Some(goal));
        assert_eq!(scene.dof_values(), DVector::from_vec(vec![0.0, 0.0]));

        for i in 1..t.num_waypoints() {
            let from = t.waypoint(i - 1).unwrap();
            let to = t.waypoint(i).unwrap();
            assert!(PlanningUtils::is_segment_valid(&mut scene, &mut checker, &from, &to, 0.05, &Deadline::new(None)).unwrap());
        }
    }

    #[test]
    fn invalid_goal_is_no_solution() {
        let mut scene = blocked_scene();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let mut planner = RRTConnectPlanner::new(0.2, 0.05, 100, Some(1)).unwrap();
        let res = planner.plan_to_configuration(&mut scene, &mut checker, &DVector::from_vec(vec![std::f64::consts::FRAC_PI_2, 0.0]), &PlanningOptions::default());
        assert!(matches!(res, Err(PlanningError::NoSolution(_))));
    }

    #[test]
    fn zero_time_limit_is_exceeded() {
        let mut scene = blocked_scene();
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        let mut planner = RRTConnectPlanner::new(0.2, 0.05, 100000, Some(1)).unwrap();
        let options = PlanningOptions { timelimit: Some(0.0), seed: None };
        let res = planner.plan_to_configuration(&mut scene, &mut checker, &DVector::from_vec(vec![2.5, 0.0]), &options);
        assert!(matches!(res, Err(PlanningError::TimeLimitExceeded(_))));
    }
}
