use std::fmt;
use std::sync::Arc;
use nalgebra::{Isometry3, Vector3};
use parry3d_f64::bounding_volume::{BoundingSphere, BoundingVolume, AABB};
use parry3d_f64::shape::{Ball, Capsule, Cuboid, Shape};
use crate::utils::utils_errors::BenchmarkError;

/// A `GeometricShape` wraps a parry3d shape together with a `GeometricShapeSignature` used to
/// recognize which robot link or environment body the shape belongs to.  Shapes are stored
/// in their local frame; every query takes the world pose of each shape as an argument, so a
/// `GeometricShape` itself is never stateful.
pub struct GeometricShape {
    shape: Arc<dyn Shape>,
    signature: GeometricShapeSignature
}
impl GeometricShape {
    pub fn new_cube(half_extent_x: f64,
                    half_extent_y: f64,
                    half_extent_z: f64,
                    signature: GeometricShapeSignature) -> Self {
        let cube = Cuboid::new(Vector3::new(half_extent_x, half_extent_y, half_extent_z));

        Self {
            shape: Arc::new(cube),
            signature
        }
    }
    pub fn new_sphere(radius: f64, signature: GeometricShapeSignature) -> Self {
        let sphere = Ball::new(radius);

        Self {
            shape: Arc::new(sphere),
            signature
        }
    }
    /// Capsule whose segment lies along the local x axis, centered on the origin.
    pub fn new_capsule_x(half_length: f64, radius: f64, signature: GeometricShapeSignature) -> Self {
        let capsule = Capsule::new_x(half_length, radius);

        Self {
            shape: Arc::new(capsule),
            signature
        }
    }
    pub fn signature(&self) -> &GeometricShapeSignature {
        &self.signature
    }
    pub fn aabb(&self, pose: &Isometry3<f64>) -> AABB {
        self.shape.compute_aabb(pose)
    }
    pub fn bounding_sphere(&self, pose: &Isometry3<f64>) -> BoundingSphere {
        self.shape.compute_bounding_sphere(pose)
    }
}
impl Clone for GeometricShape {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            signature: self.signature.clone()
        }
    }
}
impl fmt::Debug for GeometricShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometricShape").field("signature", &self.signature).finish()
    }
}

#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum GeometricShapeSignature {
    RobotLink { link_idx: usize },
    EnvironmentBody { body_idx: usize, body_name: String }
}

/// A shape placed at a world pose.
#[derive(Clone, Debug)]
pub struct PosedShape {
    pub shape: GeometricShape,
    pub pose: Isometry3<f64>
}
impl PosedShape {
    pub fn new(shape: GeometricShape, pose: Isometry3<f64>) -> Self {
        Self { shape, pose }
    }
}

pub struct GeometricShapeQueries;
impl GeometricShapeQueries {
    /// Exact intersection test between the two shapes.
    pub fn intersection_test(object1: &PosedShape, object2: &PosedShape) -> Result<bool, BenchmarkError> {
        return match parry3d_f64::query::intersection_test(&object1.pose, &*object1.shape.shape, &object2.pose, &*object2.shape.shape) {
            Ok(b) => { Ok(b) }
            Err(_) => {
                Err(BenchmarkError::new_generic_error_str(&format!("Unsupported intersection test between {:?} and {:?}.", object1.shape.signature, object2.shape.signature), file!(), line!()))
            }
        }
    }
    /// Conservative test: true when the bounding spheres of the two shapes come within `margin`
    /// of each other.  `margin` must be non-negative.
    pub fn bounding_sphere_test(object1: &PosedShape, object2: &PosedShape, margin: f64) -> bool {
        object1.shape.bounding_sphere(&object1.pose).loosened(margin).intersects(&object2.shape.bounding_sphere(&object2.pose))
    }
    /// Conservative test: true when the world-space AABBs of the two shapes come within `margin`
    /// of each other along every axis.  `margin` must be non-negative.
    pub fn aabb_test(object1: &PosedShape, object2: &PosedShape, margin: f64) -> bool {
        object1.shape.aabb(&object1.pose).loosened(margin).intersects(&object2.shape.aabb(&object2.pose))
    }
    pub fn distance(object1: &PosedShape, object2: &PosedShape) -> Result<f64, BenchmarkError> {
        return match parry3d_f64::query::distance(&object1.pose, &*object1.shape.shape, &object2.pose, &*object2.shape.shape) {
            Ok(d) => { Ok(d) }
            Err(_) => {
                Err(BenchmarkError::new_generic_error_str(&format!("Unsupported distance query between {:?} and {:?}.", object1.shape.signature, object2.shape.signature), file!(), line!()))
            }
        }
    }
}
