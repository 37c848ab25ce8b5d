//! Director configuration.

use std::time::Duration;

use codexwalker_core::presentation::TransitionKind;

/// Scene the opening of a new game plays.
pub const DEFAULT_OPENING_SCENE: &str = "dream_prologue_1_1";

/// Tunables for a [`NarrativeDirector`](super::director::NarrativeDirector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorConfig {
    /// First scene of a new game.
    pub opening_scene: String,
    /// Pause before an autoplay advance.
    pub autoplay_delay: Duration,
    /// Pause before a manual advance.
    pub manual_delay: Duration,
    /// Transition used when the background changes.
    pub transition: TransitionKind,
    /// Destination of the about page.
    pub about_url: String,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            opening_scene: DEFAULT_OPENING_SCENE.to_owned(),
            autoplay_delay: Duration::from_millis(1500),
            manual_delay: Duration::ZERO,
            transition: TransitionKind::Fade,
            about_url: "about.html".to_owned(),
        }
    }
}
