//! Events published by the director.

use codexwalker_core::scene::SceneKind;
use codexwalker_progression::GameState;

/// Notifications for hosts and observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeEvent {
    /// A new scene became current.
    SceneChanged {
        /// The scene id.
        scene_id: String,
        /// Its kind.
        kind: SceneKind,
    },
    /// A choice list is on screen.
    ChoicePresented {
        /// The choice node.
        scene_id: String,
        /// Choice texts, in order.
        choices: Vec<String>,
    },
    /// A codex entry was unlocked for the first time.
    CodexUnlocked {
        /// The entry id.
        codex_id: String,
        /// The entry title.
        title: String,
    },
    /// The game state changed.
    StateChanged {
        /// State that was left.
        from: GameState,
        /// State that was entered.
        to: GameState,
    },
    /// A route was started.
    RouteStarted {
        /// The route id.
        route_id: String,
    },
    /// Autoplay was switched on or off.
    AutoplayChanged {
        /// The new flag.
        enabled: bool,
    },
    /// The narrative handed off to an external destination.
    Redirected {
        /// Where to.
        url: String,
    },
}

impl NarrativeEvent {
    /// Stable event name, e.g. `narrative.scene_changed`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SceneChanged { .. } => "narrative.scene_changed",
            Self::ChoicePresented { .. } => "narrative.choice_presented",
            Self::CodexUnlocked { .. } => "narrative.codex_unlocked",
            Self::StateChanged { .. } => "narrative.state_changed",
            Self::RouteStarted { .. } => "narrative.route_started",
            Self::AutoplayChanged { .. } => "narrative.autoplay_changed",
            Self::Redirected { .. } => "narrative.redirected",
        }
    }
}
