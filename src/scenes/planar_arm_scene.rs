use nalgebra::{DVector, Isometry3, Vector3};
use serde::{Serialize, Deserialize};
use tracing::debug;
use crate::scenes::scene_descriptor::{RobotDescriptor, SceneDescriptor};
use crate::scenes::{SerializedScene, SimulationScene};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_shape_geometry::geometric_shape::{GeometricShape, GeometricShapeSignature, PosedShape};

/// A serial arm whose revolute joints all rotate about the z axis of the robot frame, placed in
/// a work cell of static spheres and cuboids.  Each link is a capsule from one joint to the next.
#[derive(Clone, Debug)]
pub struct PlanarArmScene {
    descriptor: SceneDescriptor,
    dof_values: DVector<f64>,
    robot_transform: Isometry3<f64>,
    body_shapes: Vec<GeometricShape>
}
impl PlanarArmScene {
    pub fn new(descriptor: SceneDescriptor) -> Result<Self, BenchmarkError> {
        descriptor.validate()?;
        let dof_values = DVector::zeros(descriptor.robot.link_lengths.len());
        let body_shapes = descriptor.bodies.iter().enumerate().map(|(i, b)| b.to_geometric_shape(i)).collect();

        Ok(Self {
            descriptor,
            dof_values,
            robot_transform: Isometry3::identity(),
            body_shapes
        })
    }
    pub fn descriptor(&self) -> &SceneDescriptor {
        &self.descriptor
    }
    /// Forward kinematics in the robot frame: the position of every joint plus the tip, and the
    /// cumulative heading of every link.
    pub fn joint_positions_and_headings(&self) -> (Vec<Vector3<f64>>, Vec<f64>) {
        let robot = &self.descriptor.robot;
        let mut positions = vec![Vector3::new(robot.base_position[0], robot.base_position[1], robot.base_position[2])];
        let mut headings = vec![];

        let mut heading = 0.0;
        for (i, length) in robot.link_lengths.iter().enumerate() {
            heading += self.dof_values[i];
            let prev = positions[i];
            positions.push(prev + Vector3::new(length * heading.cos(), length * heading.sin(), 0.0));
            headings.push(heading);
        }

        (positions, headings)
    }
    fn link_shapes(&self) -> Vec<PosedShape> {
        let robot = &self.descriptor.robot;
        let (positions, headings) = self.joint_positions_and_headings();

        let mut out = vec![];
        for (i, length) in robot.link_lengths.iter().enumerate() {
            let midpoint = (positions[i] + positions[i + 1]) * 0.5;
            let local_pose = Isometry3::new(midpoint, Vector3::new(0.0, 0.0, headings[i]));
            let shape = GeometricShape::new_capsule_x(length * 0.5, robot.link_radius, GeometricShapeSignature::RobotLink { link_idx: i });
            out.push(PosedShape::new(shape, self.robot_transform * local_pose));
        }
        out
    }
}
impl Default for PlanarArmScene {
    fn default() -> Self {
        let descriptor = SceneDescriptor {
            name: "empty".to_string(),
            robot: RobotDescriptor {
                name: "robot".to_string(),
                base_position: [0.0; 3],
                link_lengths: vec![1.0],
                link_radius: 0.05,
                joint_limits: None
            },
            bodies: vec![]
        };
        Self {
            descriptor,
            dof_values: DVector::zeros(1),
            robot_transform: Isometry3::identity(),
            body_shapes: vec![]
        }
    }
}
impl SimulationScene for PlanarArmScene {
    fn scene_name(&self) -> &str {
        &self.descriptor.name
    }
    fn robot_name(&self) -> &str {
        &self.descriptor.robot.name
    }
    fn serialize_scene(&self) -> Result<SerializedScene, BenchmarkError> {
        let snapshot = PlanarArmSceneSnapshot {
            scene: self.descriptor.clone(),
            dof_values: self.dof_values.iter().cloned().collect(),
            robot_transform: self.robot_transform
        };
        return match serde_json::to_value(&snapshot) {
            Ok(v) => { Ok(SerializedScene(v)) }
            Err(e) => { Err(BenchmarkError::new_parse_error("planar arm scene", &e.to_string(), file!(), line!())) }
        }
    }
    fn deserialize_scene(&mut self, serialized_scene: &SerializedScene) -> Result<(), BenchmarkError> {
        let snapshot: PlanarArmSceneSnapshot = match serde_json::from_value(serialized_scene.value().clone()) {
            Ok(s) => { s }
            Err(e) => { return Err(BenchmarkError::new_parse_error("serialized planar arm scene", &e.to_string(), file!(), line!())) }
        };
        let mut scene = Self::new(snapshot.scene)?;
        scene.set_dof_values(&DVector::from_vec(snapshot.dof_values))?;
        scene.set_robot_transform(&snapshot.robot_transform);
        debug!("deserialized scene {:?} with {} bodies", scene.descriptor.name, scene.body_shapes.len());
        *self = scene;
        Ok(())
    }
    fn num_dofs(&self) -> usize {
        self.descriptor.robot.link_lengths.len()
    }
    fn dof_limits(&self) -> (DVector<f64>, DVector<f64>) {
        let limits = self.descriptor.robot.joint_limits_or_default();
        let lower = DVector::from_iterator(limits.len(), limits.iter().map(|l| l.0));
        let upper = DVector::from_iterator(limits.len(), limits.iter().map(|l| l.1));
        (lower, upper)
    }
    fn dof_values(&self) -> DVector<f64> {
        self.dof_values.clone()
    }
    fn set_dof_values(&mut self, dof_values: &DVector<f64>) -> Result<(), BenchmarkError> {
        BenchmarkError::new_check_for_dof_length_mismatch(self.num_dofs(), dof_values.len(), file!(), line!())?;
        self.dof_values = dof_values.clone();
        Ok(())
    }
    fn robot_transform(&self) -> Isometry3<f64> {
        self.robot_transform
    }
    fn set_robot_transform(&mut self, transform: &Isometry3<f64>) {
        self.robot_transform = *transform;
    }
    fn body_names(&self) -> Vec<String> {
        let mut out = vec![self.descriptor.robot.name.clone()];
        for b in &self.descriptor.bodies { out.push(b.name.clone()); }
        out
    }
    fn body_shapes(&self, body_name: &str) -> Result<Vec<PosedShape>, BenchmarkError> {
        if body_name == self.descriptor.robot.name { return Ok(self.link_shapes()); }

        for (i, b) in self.descriptor.bodies.iter().enumerate() {
            if b.name == body_name {
                let pose = Isometry3::translation(b.position[0], b.position[1], b.position[2]);
                return Ok(vec![PosedShape::new(self.body_shapes[i].clone(), pose)]);
            }
        }

        Err(BenchmarkError::new_scene_error(&format!("No body with name {:?} in scene {:?}.", body_name, self.descriptor.name), file!(), line!()))
    }
    fn self_collision_pairs(&self, body_name: &str) -> Result<Vec<(usize, usize)>, BenchmarkError> {
        if body_name != self.descriptor.robot.name {
            if !self.has_body(body_name) {
                return Err(BenchmarkError::new_scene_error(&format!("No body with name {:?} in scene {:?}.", body_name, self.descriptor.name), file!(), line!()));
            }
            return Ok(vec![]);
        }

        // Adjacent links share a joint and always touch.
        let n = self.num_dofs();
        let mut out = vec![];
        for i in 0..n {
            for j in (i + 2)..n { out.push((i, j)); }
        }
        Ok(out)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PlanarArmSceneSnapshot {
    scene: SceneDescriptor,
    dof_values: Vec<f64>,
    robot_transform: Isometry3<f64>
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;
    use crate::scenes::scene_descriptor::{BodyDescriptor, BodyShapeDescriptor};

    pub(crate) fn two_link_scene() -> PlanarArmScene {
        let descriptor = SceneDescriptor {
            name: "cell".to_string(),
            robot: RobotDescriptor {
                name: "arm".to_string(),
                base_position: [0.0; 3],
                link_lengths: vec![1.0, 1.0, 0.5],
                link_radius: 0.05,
                joint_limits: None
            },
            bodies: vec![BodyDescriptor {
                name: "ball".to_string(),
                shape: BodyShapeDescriptor::Sphere { radius: 0.2 },
                position: [0.0, 2.0, 0.0]
            }]
        };
        PlanarArmScene::new(descriptor).unwrap()
    }

    #[test]
    fn forward_kinematics() {
        let mut scene = two_link_scene();
        scene.set_dof_values(&DVector::from_vec(vec![FRAC_PI_2, -FRAC_PI_2, 0.0])).unwrap();
        let (positions, headings) = scene.joint_positions_and_headings();
        assert_relative_eq!(positions[1], Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(positions[2], Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(headings[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn wrong_dof_length_is_rejected() {
        let mut scene = two_link_scene();
        assert!(scene.set_dof_values(&DVector::zeros(2)).is_err());
    }

    #[test]
    fn serialization_round_trip_restores_state() {
        let mut scene = two_link_scene();
        scene.set_dof_values(&DVector::from_vec(vec![0.3, -0.2, 0.1])).unwrap();
        scene.set_robot_transform(&Isometry3::translation(1.0, 2.0, 3.0));
        let serialized = scene.serialize_scene().unwrap();

        let mut other = PlanarArmScene::default();
        other.deserialize_scene(&serialized).unwrap();
        assert_eq!(other.scene_name(), "cell");
        assert_eq!(other.dof_values(), scene.dof_values());
        assert_relative_eq!(other.robot_transform().translation.vector, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(other.body_names(), vec!["arm".to_string(), "ball".to_string()]);
        assert_eq!(other.serialize_scene().unwrap(), serialized);
    }

    #[test]
    fn self_collision_pairs_skip_adjacent_links() {
        let scene = two_link_scene();
        assert_eq!(scene.self_collision_pairs("arm").unwrap(), vec![(0, 2)]);
        assert!(scene.self_collision_pairs("ball").unwrap().is_empty());
        assert!(scene.self_collision_pairs("nothing").is_err());
        assert_eq!(scene.other_body_shapes("arm").unwrap().len(), 1);
    }
}
