//! The progression state machine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::{debug, info};

use super::state::GameState;

/// One entry in the choice history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRecord {
    /// Scene the choice was made in.
    pub scene_id: String,
    /// Position of the picked choice.
    pub choice_index: usize,
    /// Text of the picked choice.
    pub choice_text: String,
}

/// Progress through one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProgress {
    /// When the route was (re)started, ISO-8601.
    pub start_time: String,
    /// Index of the current scene within the route.
    pub current_scene: u32,
    /// Choices made on this route.
    pub choices: Vec<ChoiceRecord>,
    /// Whether the route has been completed.
    pub completed: bool,
    /// When the route was completed, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl RouteProgress {
    /// A fresh record started at `start_time`.
    #[must_use]
    pub fn started_at(start_time: String) -> Self {
        Self {
            start_time,
            current_scene: 0,
            choices: Vec::new(),
            completed: false,
            end_time: None,
        }
    }
}

/// Everything a save slot persists besides the game state.
///
/// Every field defaults when absent so older saves keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionData {
    player_name: String,
    heroine_relationship: i32,
    #[serde(deserialize_with = "distinct_routes")]
    completed_routes: Vec<String>,
    #[serde(deserialize_with = "route_number")]
    current_route: Option<u8>,
    route_progress: BTreeMap<String, RouteProgress>,
    choices: Vec<ChoiceRecord>,
    flags: BTreeMap<String, serde_json::Value>,
    unlocked_codex: BTreeSet<String>,
}

/// Reads a route number written either as `2` or as `"2"`.
fn route_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RouteNumber {
        Number(u8),
        Text(String),
    }

    match Option::<RouteNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RouteNumber::Number(n)) => Ok(Some(n)),
        Some(RouteNumber::Text(text)) => text
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid route number `{text}`"))),
    }
}

/// Drops repeated route ids, keeping first-seen order.
fn distinct_routes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let mut routes = Vec::<String>::deserialize(deserializer)?;
    let mut seen = BTreeSet::new();
    routes.retain(|route| seen.insert(route.clone()));
    Ok(routes)
}

impl ProgressionData {
    /// The running relationship total.
    #[must_use]
    pub fn relationship(&self) -> i32 {
        self.heroine_relationship
    }

    /// Adds `delta` to the relationship total.
    pub fn add_relationship(&mut self, delta: i32) {
        self.heroine_relationship = self.heroine_relationship.saturating_add(delta);
    }

    /// Completed route ids, in completion order.
    #[must_use]
    pub fn completed_routes(&self) -> &[String] {
        &self.completed_routes
    }

    /// Returns `true` if `route_id` has been completed.
    #[must_use]
    pub fn has_completed_route(&self, route_id: &str) -> bool {
        self.completed_routes.iter().any(|r| r == route_id)
    }

    /// Records `route_id` as completed. Returns `false` if it already was.
    pub fn mark_route_completed(&mut self, route_id: &str) -> bool {
        if self.has_completed_route(route_id) {
            return false;
        }
        self.completed_routes.push(route_id.to_owned());
        true
    }

    /// The route currently being played, by number.
    #[must_use]
    pub fn current_route(&self) -> Option<u8> {
        self.current_route
    }

    /// Progress record for `route_id`.
    #[must_use]
    pub fn route_progress(&self, route_id: &str) -> Option<&RouteProgress> {
        self.route_progress.get(route_id)
    }

    /// Mutable progress record for `route_id`.
    pub fn route_progress_mut(&mut self, route_id: &str) -> Option<&mut RouteProgress> {
        self.route_progress.get_mut(route_id)
    }

    /// Replaces the progress record for `route_id`.
    pub fn set_route_progress(&mut self, route_id: &str, progress: RouteProgress) {
        self.route_progress.insert(route_id.to_owned(), progress);
    }

    /// The choice history, oldest first.
    #[must_use]
    pub fn choices(&self) -> &[ChoiceRecord] {
        &self.choices
    }

    /// Appends to the choice history.
    pub fn record_choice(&mut self, record: ChoiceRecord) {
        self.choices.push(record);
    }

    /// Reads a story flag.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<&serde_json::Value> {
        self.flags.get(key)
    }

    /// Sets a story flag.
    pub fn set_flag(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.flags.insert(key.into(), value);
    }

    /// Unlocked codex ids, in sorted order.
    #[must_use]
    pub fn unlocked_codex(&self) -> &BTreeSet<String> {
        &self.unlocked_codex
    }
}

/// The player's state machine plus the progression record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionState {
    state: GameState,
    auto_play: bool,
    data: ProgressionData,
}

impl ProgressionState {
    /// A session-start state: title menu, autoplay off, empty progression.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a state from persisted parts. Autoplay starts off.
    #[must_use]
    pub fn from_parts(state: GameState, data: ProgressionData) -> Self {
        Self {
            state,
            auto_play: false,
            data,
        }
    }

    /// The current game state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The progression record.
    #[must_use]
    pub fn data(&self) -> &ProgressionData {
        &self.data
    }

    /// Mutable progression record.
    pub fn data_mut(&mut self) -> &mut ProgressionData {
        &mut self.data
    }

    /// Moves to `new_state` unconditionally and runs its entry hook.
    /// Returns the state that was left.
    pub fn set_state(&mut self, new_state: GameState, data: &serde_json::Value) -> GameState {
        let previous = self.state;
        info!(from = %previous, to = %new_state, "state transition");
        self.state = new_state;
        self.on_state_entered(new_state, data);
        previous
    }

    fn on_state_entered(&mut self, state: GameState, data: &serde_json::Value) {
        match state {
            GameState::MalePerformance => debug!(%data, "male lead performance begins"),
            GameState::MeetHeroine => debug!(%data, "heroine encounter begins"),
            GameState::BranchSelection => debug!(%data, "route selection opened"),
            GameState::Route1 | GameState::Route2 | GameState::Route3 | GameState::Route4 => {
                self.data.current_route = state.route_number();
                debug!(route = ?self.data.current_route, %data, "route begins");
            }
            GameState::Ending => debug!(%data, "ending begins"),
            GameState::StartMenu | GameState::GameStart => {}
        }
    }

    /// Reinitializes the progression record and moves to `GAME_START`.
    /// The autoplay preference is kept.
    pub fn reset_game(&mut self) {
        info!("resetting game state");
        self.state = GameState::GameStart;
        self.data = ProgressionData::default();
    }

    /// Whether autoplay is on.
    #[must_use]
    pub fn is_auto_play(&self) -> bool {
        self.auto_play
    }

    /// Sets autoplay. Setting the current value does nothing. Returns the
    /// resulting flag.
    pub fn set_auto_play(&mut self, on: bool) -> bool {
        if self.auto_play != on {
            self.auto_play = on;
            info!(auto_play = on, "autoplay changed");
        }
        self.auto_play
    }

    /// Flips autoplay and returns the new flag.
    pub fn toggle_auto_play(&mut self) -> bool {
        self.auto_play = !self.auto_play;
        info!(auto_play = self.auto_play, "autoplay toggled");
        self.auto_play
    }

    /// Unlocks a codex entry. Returns `true` only the first time `codex_id`
    /// is unlocked.
    pub fn unlock_codex_entry(&mut self, codex_id: &str) -> bool {
        let inserted = self.data.unlocked_codex.insert(codex_id.to_owned());
        if inserted {
            info!(codex_id, "codex entry unlocked");
        }
        inserted
    }

    /// Whether `codex_id` has been unlocked.
    #[must_use]
    pub fn is_codex_entry_unlocked(&self, codex_id: &str) -> bool {
        self.data.unlocked_codex.contains(codex_id)
    }
}
