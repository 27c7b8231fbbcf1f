use std::f64::consts::PI;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_shape_geometry::geometric_shape::{GeometricShape, GeometricShapeSignature};

/// Description of a planar arm work cell, as written in scene description files.
///
/// ```yaml
/// name: table_cell
/// robot:
///   name: arm
///   link_lengths: [0.5, 0.4, 0.3]
///   link_radius: 0.04
/// bodies:
///   - name: table
///     shape: cuboid
///     half_extents: [0.3, 0.3, 0.05]
///     position: [0.6, 0.4, 0.0]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub name: String,
    pub robot: RobotDescriptor,
    #[serde(default)]
    pub bodies: Vec<BodyDescriptor>
}
impl SceneDescriptor {
    pub fn load_from_file(path: &Path) -> Result<Self, BenchmarkError> {
        let descriptor: Self = FileUtils::load_object_from_file(path)?;
        descriptor.validate()?;
        Ok(descriptor)
    }
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        let num_links = self.robot.link_lengths.len();
        if num_links == 0 {
            return Err(BenchmarkError::new_scene_error(&format!("Robot {:?} has no links.", self.robot.name), file!(), line!()));
        }
        if self.robot.link_lengths.iter().any(|l| !(l.is_finite() && *l > 0.0)) || !(self.robot.link_radius.is_finite() && self.robot.link_radius > 0.0) {
            return Err(BenchmarkError::new_scene_error(&format!("Robot {:?} must have finite positive link lengths and radius.", self.robot.name), file!(), line!()));
        }
        if let Some(joint_limits) = &self.robot.joint_limits {
            if joint_limits.len() != num_links {
                return Err(BenchmarkError::new_scene_error(&format!("Robot {:?} has {} links but {} joint limits.", self.robot.name, num_links, joint_limits.len()), file!(), line!()));
            }
            for (lower, upper) in joint_limits {
                if !lower.is_finite() || !upper.is_finite() {
                    return Err(BenchmarkError::new_scene_error(&format!("Joint limit ({}, {}) must be finite.", lower, upper), file!(), line!()));
                }
                if lower > upper {
                    return Err(BenchmarkError::new_scene_error(&format!("Joint limit ({}, {}) has lower bound above upper bound.", lower, upper), file!(), line!()));
                }
            }
        }
        for (i, body) in self.bodies.iter().enumerate() {
            let dims = match &body.shape {
                BodyShapeDescriptor::Sphere { radius } => { vec![*radius] }
                BodyShapeDescriptor::Cuboid { half_extents } => { half_extents.to_vec() }
            };
            if dims.iter().chain(body.position.iter()).any(|v| !v.is_finite()) || dims.iter().any(|v| *v <= 0.0) {
                return Err(BenchmarkError::new_scene_error(&format!("Body {:?} needs finite positive dimensions and a finite position.", body.name), file!(), line!()));
            }
            if body.name == self.robot.name || self.bodies[..i].iter().any(|b| b.name == body.name) {
                return Err(BenchmarkError::new_scene_error(&format!("Body name {:?} is used more than once.", body.name), file!(), line!()));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotDescriptor {
    pub name: String,
    #[serde(default)]
    pub base_position: [f64; 3],
    pub link_lengths: Vec<f64>,
    pub link_radius: f64,
    /// Defaults to [-pi, pi] for every joint.
    #[serde(default)]
    pub joint_limits: Option<Vec<(f64, f64)>>
}
impl RobotDescriptor {
    pub fn joint_limits_or_default(&self) -> Vec<(f64, f64)> {
        return match &self.joint_limits {
            None => { vec![(-PI, PI); self.link_lengths.len()] }
            Some(joint_limits) => { joint_limits.clone() }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub shape: BodyShapeDescriptor,
    #[serde(default)]
    pub position: [f64; 3]
}
impl BodyDescriptor {
    pub fn to_geometric_shape(&self, body_idx: usize) -> GeometricShape {
        let signature = GeometricShapeSignature::EnvironmentBody { body_idx, body_name: self.name.clone() };
        return match &self.shape {
            BodyShapeDescriptor::Sphere { radius } => { GeometricShape::new_sphere(*radius, signature) }
            BodyShapeDescriptor::Cuboid { half_extents } => {
                GeometricShape::new_cube(half_extents[0], half_extents[1], half_extents[2], signature)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BodyShapeDescriptor {
    Sphere { radius: f64 },
    Cuboid { half_extents: [f64; 3] }
}
