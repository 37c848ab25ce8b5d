//! Application layer for the Routes context.

pub mod registry;
