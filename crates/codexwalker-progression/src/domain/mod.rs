//! Domain layer for the Progression context.

pub mod progression;
pub mod save;
pub mod state;
