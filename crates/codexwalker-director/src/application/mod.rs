//! Application layer for the Director context.

pub mod config;
pub mod director;
