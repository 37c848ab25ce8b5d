//! Codex Walker — Routes.
//!
//! Responsible for the four branch routes: their unlock requirements,
//! starting and completing them against the player's progression, and
//! scoring which ending the player has earned.

pub mod application;
pub mod domain;

pub use application::registry::RouteRegistry;
pub use domain::definition::{RouteDefinition, RouteReward, default_definitions};
pub use domain::ending::EndingCondition;
pub use domain::requirement::Requirement;
