//! Domain layer for the Director context.

pub mod actions;
pub mod events;
pub mod timer;
