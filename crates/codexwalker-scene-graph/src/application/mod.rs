//! Application layer for the Scene Graph context.

pub mod config;
pub mod sources;
pub mod store;
