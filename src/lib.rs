//! Motion benchmarks is a harness for measuring robot motion planners and collision checking
//! engines against each other.  Queries, planner descriptions and results are plain YAML files,
//! so that runs can be generated, executed and analyzed independently.
//!
//! The simulation side lives behind the [`scenes::SimulationScene`] and
//! [`collision_checkers::CollisionChecker`] traits; a small planar arm scene ships as the
//! reference backend.

pub mod analysis;
pub mod benchmarks;
pub mod collision_checkers;
pub mod planners;
pub mod registry;
pub mod scenes;
pub mod utils;
