//! Benchmark data model and runners.

pub mod batch_runner;
pub mod collision_benchmark;
pub mod collision_replay;
pub mod executor;
pub mod planner_metadata;
pub mod planning_benchmark;
pub mod query;
pub mod query_generation;
pub mod result;
