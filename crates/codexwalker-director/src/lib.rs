//! Codex Walker — Director.
//!
//! Plays scenes from the loaded graph through host-supplied presentation
//! ports, applies choices and route starts to the player's progression, and
//! schedules timed advances for autoplay.

pub mod application;
pub mod domain;

pub use application::config::DirectorConfig;
pub use application::director::{DirectorPorts, NarrativeDirector};
pub use domain::actions::UserAction;
pub use domain::events::NarrativeEvent;
