use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use nalgebra::{DVector, Isometry3};
use serde::{Serialize, Deserialize};
use crate::scenes::planar_arm_scene::PlanarArmScene;
use crate::scenes::scene_descriptor::SceneDescriptor;
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_shape_geometry::geometric_shape::PosedShape;

pub mod planar_arm_scene;
pub mod scene_descriptor;

/// The simulation environment a benchmark runs against: one robot plus any number of
/// environment bodies.  Implementations own the geometry; the harness only sets state and hands
/// the scene to collision checkers and planners.
pub trait SimulationScene: Send {
    fn scene_name(&self) -> &str;
    fn robot_name(&self) -> &str;
    /// Snapshot of the full scene, including the current robot state.
    fn serialize_scene(&self) -> Result<SerializedScene, BenchmarkError>;
    /// Replaces the whole scene with the given snapshot.
    fn deserialize_scene(&mut self, serialized_scene: &SerializedScene) -> Result<(), BenchmarkError>;
    fn num_dofs(&self) -> usize;
    /// Lower and upper joint limits.
    fn dof_limits(&self) -> (DVector<f64>, DVector<f64>);
    fn dof_values(&self) -> DVector<f64>;
    fn set_dof_values(&mut self, dof_values: &DVector<f64>) -> Result<(), BenchmarkError>;
    fn robot_transform(&self) -> Isometry3<f64>;
    fn set_robot_transform(&mut self, transform: &Isometry3<f64>);
    /// Names of every body in the scene, robot included.
    fn body_names(&self) -> Vec<String>;
    /// World-space shapes of the given body at the current state.
    fn body_shapes(&self, body_name: &str) -> Result<Vec<PosedShape>, BenchmarkError>;
    /// Pairs of indices into `body_shapes(body_name)` that are checked for self collision.
    fn self_collision_pairs(&self, body_name: &str) -> Result<Vec<(usize, usize)>, BenchmarkError>;

    fn has_body(&self, body_name: &str) -> bool {
        self.body_names().iter().any(|n| n == body_name)
    }
    /// Shapes of every body other than `body_name`.
    fn other_body_shapes(&self, body_name: &str) -> Result<Vec<PosedShape>, BenchmarkError> {
        if !self.has_body(body_name) {
            return Err(BenchmarkError::new_scene_error(&format!("No body with name {:?} in scene {:?}.", body_name, self.scene_name()), file!(), line!()));
        }
        let mut out = vec![];
        for name in self.body_names() {
            if name == body_name { continue; }
            out.extend(self.body_shapes(&name)?);
        }
        Ok(out)
    }
}

/// Opaque serialized form of a scene.  Only the scene implementation interprets it; the
/// harness stores and forwards it untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedScene(pub serde_json::Value);
impl SerializedScene {
    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// The single mutable scene shared by every component of a run.  Every sequence of
/// state-setting calls followed by a query must happen while holding the guard returned by
/// `lock`.
#[derive(Clone)]
pub struct SharedScene {
    scene: Arc<Mutex<Box<dyn SimulationScene>>>
}
impl SharedScene {
    pub fn new(scene: Box<dyn SimulationScene>) -> Self {
        Self { scene: Arc::new(Mutex::new(scene)) }
    }
    /// Loads a scene description file (YAML or JSON) into a planar arm scene.
    pub fn new_from_description_file(path: &Path) -> Result<Self, BenchmarkError> {
        let descriptor = SceneDescriptor::load_from_file(path)?;
        let scene = PlanarArmScene::new(descriptor)?;
        Ok(Self::new(Box::new(scene)))
    }
    /// Scene used when a query carries the whole environment; it is overwritten on deserialization.
    pub fn new_default() -> Self {
        Self::new(Box::new(PlanarArmScene::default()))
    }
    pub fn lock(&self) -> Result<MutexGuard<'_, Box<dyn SimulationScene>>, BenchmarkError> {
        return match self.scene.lock() {
            Ok(guard) => { Ok(guard) }
            Err(_) => { Err(BenchmarkError::new_scene_error("Scene lock was poisoned by a previous panic.", file!(), line!())) }
        }
    }
}
