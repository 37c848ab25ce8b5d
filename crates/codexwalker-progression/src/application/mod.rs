//! Application layer for the Progression context.

pub mod save_handlers;
