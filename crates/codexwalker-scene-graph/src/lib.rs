//! Codex Walker — Scene Graph.
//!
//! Loads chapter and lore data through a cascade of strategies (embedded
//! dataset, device files, fetched files), validates it, and indexes scenes
//! and codex entries by id.

pub mod application;
pub mod domain;
pub mod embedded;

pub use application::config::{LoaderConfig, RetryPolicy};
pub use application::store::SceneGraphStore;
pub use domain::graph::GraphData;
