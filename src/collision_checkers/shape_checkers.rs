use tracing::trace;
use crate::collision_checkers::CollisionChecker;
use crate::registry::CollisionEngineName;
use crate::scenes::SimulationScene;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_shape_geometry::geometric_shape::{GeometricShapeQueries, PosedShape};

/// Collision engine over the parry3d shapes of a scene.  The engine name selects the test used on
/// each shape pair: `exact` runs the narrow phase, `sphere` and `aabb` only compare bounding
/// volumes and therefore over-report collisions.  A positive `margin` treats shapes closer than
/// the margin as colliding.
#[derive(Clone, Debug)]
pub struct ShapeCollisionChecker {
    engine: CollisionEngineName,
    margin: f64
}
impl ShapeCollisionChecker {
    pub fn new(engine: CollisionEngineName, margin: f64) -> Result<Self, BenchmarkError> {
        if margin < 0.0 || !margin.is_finite() {
            return Err(BenchmarkError::new_invalid_parameter_error("margin", &format!("Expected a finite non-negative value, got {}.", margin), file!(), line!()));
        }
        Ok(Self { engine, margin })
    }
    fn pair_in_collision(&self, a: &PosedShape, b: &PosedShape) -> Result<bool, BenchmarkError> {
        return match self.engine {
            CollisionEngineName::Exact => {
                if self.margin > 0.0 {
                    Ok(GeometricShapeQueries::distance(a, b)? <= self.margin)
                } else {
                    GeometricShapeQueries::intersection_test(a, b)
                }
            }
            CollisionEngineName::Sphere => { Ok(GeometricShapeQueries::bounding_sphere_test(a, b, self.margin)) }
            CollisionEngineName::Aabb => { Ok(GeometricShapeQueries::aabb_test(a, b, self.margin)) }
        }
    }
}
impl CollisionChecker for ShapeCollisionChecker {
    fn engine_name(&self) -> String {
        self.engine.to_string()
    }
    fn check_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError> {
        let body_shapes = scene.body_shapes(body_name)?;
        let other_shapes = scene.other_body_shapes(body_name)?;

        for a in &body_shapes {
            for b in &other_shapes {
                if self.pair_in_collision(a, b)? {
                    trace!("{} collision between {:?} and {:?}", self.engine, a.shape.signature(), b.shape.signature());
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
    fn check_self_collision(&mut self, scene: &dyn SimulationScene, body_name: &str) -> Result<bool, BenchmarkError> {
        let shapes = scene.body_shapes(body_name)?;
        let pairs = scene.self_collision_pairs(body_name)?;

        for (i, j) in pairs {
            let (a, b) = match (shapes.get(i), shapes.get(j)) {
                (Some(a), Some(b)) => { (a, b) }
                _ => { return Err(BenchmarkError::new_scene_error(&format!("Self collision pair ({}, {}) is out of range for body {:?}.", i, j, body_name), file!(), line!())) }
            };
            if self.pair_in_collision(a, b)? {
                trace!("{} self collision between {:?} and {:?}", self.engine, a.shape.signature(), b.shape.signature());
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use crate::scenes::planar_arm_scene::PlanarArmScene;
    use crate::scenes::scene_descriptor::{BodyDescriptor, BodyShapeDescriptor, RobotDescriptor, SceneDescriptor};

    fn scene_with_ball(ball_position: [f64; 3]) -> PlanarArmScene {
        PlanarArmScene::new(SceneDescriptor {
            name: "cell".to_string(),
            robot: RobotDescriptor {
                name: "arm".to_string(),
                base_position: [0.0; 3],
                link_lengths: vec![1.0, 1.0, 1.0],
                link_radius: 0.05,
                joint_limits: None
            },
            bodies: vec![BodyDescriptor { name: "ball".to_string(), shape: BodyShapeDescriptor::Sphere { radius: 0.2 }, position: ball_position }]
        }).unwrap()
    }

    #[test]
    fn environment_collision_per_engine() {
        let far = scene_with_ball([0.0, 3.0, 0.0]);
        let touching = scene_with_ball([1.5, 0.1, 0.0]);
        for engine in [CollisionEngineName::Exact, CollisionEngineName::Sphere, CollisionEngineName::Aabb] {
            let mut checker = ShapeCollisionChecker::new(engine, 0.0).unwrap();
            assert!(!checker.check_collision(&far, "arm").unwrap());
            assert!(checker.check_collision(&touching, "arm").unwrap());
            assert!(checker.check_collision(&touching, "ball").unwrap());
        }
    }

    #[test]
    fn bounding_volumes_are_conservative() {
        // Inside the bounding sphere of the middle link, away from the capsule itself.
        let scene = scene_with_ball([1.5, 0.45, 0.0]);
        assert!(!ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap().check_collision(&scene, "arm").unwrap());
        assert!(ShapeCollisionChecker::new(CollisionEngineName::Sphere, 0.0).unwrap().check_collision(&scene, "arm").unwrap());
        assert!(ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.3).unwrap().check_collision(&scene, "arm").unwrap());
    }

    #[test]
    fn folded_arm_self_collides() {
        let mut scene = scene_with_ball([0.0, 5.0, 0.0]);
        let mut checker = ShapeCollisionChecker::new(CollisionEngineName::Exact, 0.0).unwrap();
        assert!(!checker.check_self_collision(&scene, "arm").unwrap());
        scene.set_dof_values(&DVector::from_vec(vec![0.0, 3.0, 3.0])).unwrap();
        assert!(checker.check_self_collision(&scene, "arm").unwrap());
        assert!(checker.check_collision(&scene, "missing").is_err());
    }

    #[test]
    fn margin_widens_bounding_volume_engines() {
        // The ball's box is 2.75 above the arm's box; the sphere gap is larger.
        let scene = scene_with_ball([0.0, 3.0, 0.0]);
        assert!(!ShapeCollisionChecker::new(CollisionEngineName::Aabb, 2.0).unwrap().check_collision(&scene, "arm").unwrap());
        assert!(ShapeCollisionChecker::new(CollisionEngineName::Aabb, 3.0).unwrap().check_collision(&scene, "arm").unwrap());
        assert!(ShapeCollisionChecker::new(CollisionEngineName::Sphere, 10.0).unwrap().check_collision(&scene, "arm").unwrap());
    }

    #[test]
    fn negative_margin_is_invalid() {
        assert!(matches!(ShapeCollisionChecker::new(CollisionEngineName::Aabb, -1.0), Err(BenchmarkError::InvalidParameter(_))));
    }
}
