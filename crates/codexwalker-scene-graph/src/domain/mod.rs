//! Domain layer for the Scene Graph context.

pub mod fallback;
pub mod graph;
pub mod validation;
