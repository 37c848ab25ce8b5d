//! Codex Walker — Progression.
//!
//! Responsible for the game state machine, the progression record (routes,
//! relationship, choices, flags, unlocked codex), and save slots.

pub mod application;
pub mod domain;

pub use domain::progression::{ChoiceRecord, ProgressionData, ProgressionState, RouteProgress};
pub use domain::save::{SaveInfo, SaveRecord, SaveSlot};
pub use domain::state::GameState;
