//! Domain layer for the Routes context.

pub mod definition;
pub mod ending;
pub mod requirement;
