//! The narrative director.

use std::sync::Arc;

use codexwalker_core::clock::Clock;
use codexwalker_core::error::NarrativeError;
use codexwalker_core::presentation::{
    AssetPrefetcher, DialogueCompletion, Navigator, Renderer, Screen,
};
use codexwalker_core::scene::{SceneKind, SceneNode};
use codexwalker_core::storage::PersistentStore;
use codexwalker_progression::application::save_handlers;
use codexwalker_progression::{ChoiceRecord, GameState, ProgressionState, SaveInfo};
use codexwalker_routes::{EndingCondition, RouteRegistry, RouteReward};
use codexwalker_scene_graph::SceneGraphStore;
use codexwalker_scene_graph::domain::graph::route_entry_scene;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use super::config::DirectorConfig;
use crate::domain::actions::UserAction;
use crate::domain::events::NarrativeEvent;
use crate::domain::timer::{ScheduledAdvance, TimerQueue};

const EVENT_CAPACITY: usize = 64;

/// Host-side collaborators the director drives.
pub struct DirectorPorts {
    /// Draws scenes.
    pub renderer: Box<dyn Renderer>,
    /// Warms assets of upcoming scenes.
    pub prefetcher: Box<dyn AssetPrefetcher>,
    /// Handles redirects.
    pub navigator: Box<dyn Navigator>,
    /// Backs save slots.
    pub store: Box<dyn PersistentStore>,
    /// Timestamps saves and route progress.
    pub clock: Arc<dyn Clock>,
}

/// Walks the scene graph on behalf of the player.
///
/// Every input arrives through [`NarrativeDirector::handle_user_action`];
/// timed advances are queued internally and fired by the host via
/// [`NarrativeDirector::fire_due_timers`].
pub struct NarrativeDirector {
    config: DirectorConfig,
    scenes: SceneGraphStore,
    progression: ProgressionState,
    routes: RouteRegistry,
    ports: DirectorPorts,
    events: broadcast::Sender<NarrativeEvent>,
    current: Option<SceneNode>,
    generation: u64,
    timers: TimerQueue,
    video_auto_advance: Option<u64>,
}

impl std::fmt::Debug for NarrativeDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeDirector")
            .field("config", &self.config)
            .field("state", &self.progression.state())
            .field("current", &self.current.as_ref().map(|s| s.id.as_str()))
            .field("generation", &self.generation)
            .field("pending_timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl NarrativeDirector {
    /// Creates a director over `scenes` with a fresh progression state and
    /// the standard routes.
    #[must_use]
    pub fn new(config: DirectorConfig, scenes: SceneGraphStore, ports: DirectorPorts) -> Self {
        Self::with_routes(config, scenes, RouteRegistry::new(), ports)
    }

    /// Creates a director with a custom route registry.
    #[must_use]
    pub fn with_routes(
        config: DirectorConfig,
        scenes: SceneGraphStore,
        routes: RouteRegistry,
        ports: DirectorPorts,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            scenes,
            progression: ProgressionState::new(),
            routes,
            ports,
            events,
            current: None,
            generation: 0,
            timers: TimerQueue::default(),
            video_auto_advance: None,
        }
    }

    /// Loads the scene graph.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::LoadExhausted`] when every strategy failed.
    pub async fn load(&mut self) -> Result<(), NarrativeError> {
        self.scenes.load().await
    }

    /// Subscribes to director events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NarrativeEvent> {
        self.events.subscribe()
    }

    /// The scene currently on screen.
    #[must_use]
    pub fn current_scene(&self) -> Option<&SceneNode> {
        self.current.as_ref()
    }

    /// The player's progression.
    #[must_use]
    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    /// The route registry.
    #[must_use]
    pub fn routes(&self) -> &RouteRegistry {
        &self.routes
    }

    /// The scene graph store.
    #[must_use]
    pub fn scenes(&self) -> &SceneGraphStore {
        &self.scenes
    }

    /// Dispatches one host input.
    ///
    /// # Errors
    ///
    /// Propagates [`NarrativeError::RedirectMissingUrl`] and save/load
    /// failures. Everything else is logged and absorbed.
    #[instrument(skip(self))]
    pub async fn handle_user_action(&mut self, action: UserAction) -> Result<(), NarrativeError> {
        match action {
            UserAction::StartGame => self.start_game().await,
            UserAction::BackToMenu => {
                self.back_to_menu();
                Ok(())
            }
            UserAction::ShowAbout => {
                self.show_about();
                Ok(())
            }
            UserAction::NextDialogue => {
                self.next_dialogue(true);
                Ok(())
            }
            UserAction::DialogueComplete => {
                self.on_dialogue_complete();
                Ok(())
            }
            UserAction::SelectChoice(index) => self.make_choice(index).await,
            UserAction::VideoEnded => self.on_video_ended().await,
            UserAction::SkipVideo => self.skip_video().await,
            UserAction::ToggleAutoplay => {
                self.toggle_autoplay();
                Ok(())
            }
            UserAction::Save(slot) => self.save(slot),
            UserAction::Load(slot) => self.load_slot(slot).map(|_| ()),
        }
    }

    /// Plays `scene_id`. An unknown id is logged and leaves everything as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::RedirectMissingUrl`] for a redirect node
    /// without a URL.
    #[instrument(skip(self))]
    pub async fn play_scene(&mut self, scene_id: &str) -> Result<(), NarrativeError> {
        let Some(scene) = self.scenes.get_scene_by_id(scene_id).cloned() else {
            warn!(scene_id, "cannot play missing scene");
            return Ok(());
        };

        let background_changing = self
            .current
            .as_ref()
            .is_none_or(|active| active.background != scene.background);
        let needs_transition = scene.kind != SceneKind::Video && background_changing;
        if needs_transition {
            self.ports.renderer.show_transition(self.config.transition).await;
        }

        self.generation += 1;
        self.timers.retain_generation(self.generation);
        self.video_auto_advance = None;
        self.current = Some(scene.clone());
        info!(scene_id, kind = scene.kind.as_str(), generation = self.generation, "playing scene");
        self.emit(NarrativeEvent::SceneChanged {
            scene_id: scene.id.clone(),
            kind: scene.kind,
        });

        if let Some(codex_id) = scene.unlocks_codex.as_deref() {
            self.unlock_codex(codex_id);
        }
        self.prefetch_successors(&scene);

        let renderer = &mut self.ports.renderer;
        match scene.kind {
            SceneKind::Narration | SceneKind::Dialogue => {
                renderer.show_screen(Screen::Game);
                renderer.set_background(&scene.background);
                renderer.update_dialogue(&scene.speaker, &scene.text, DialogueCompletion::Report);
            }
            SceneKind::Choice => {
                renderer.show_screen(Screen::Game);
                renderer.set_background(&scene.background);
                renderer.update_dialogue(&scene.speaker, &scene.text, DialogueCompletion::Silent);
                renderer.display_choices(&scene.choices);
                self.emit(NarrativeEvent::ChoicePresented {
                    scene_id: scene.id.clone(),
                    choices: scene.choices.iter().map(|c| c.text.clone()).collect(),
                });
            }
            SceneKind::Video => {
                let auto_advance = self.progression.is_auto_play() && scene.next.is_some();
                if auto_advance {
                    self.video_auto_advance = Some(self.generation);
                }
                renderer
                    .play_fullscreen_video(scene.video.as_deref().unwrap_or_default(), auto_advance);
                return Ok(());
            }
            SceneKind::Ending => {
                renderer.show_screen(Screen::Game);
                renderer.set_background(&scene.background);
                renderer.update_dialogue(&scene.speaker, &scene.text, DialogueCompletion::Silent);
            }
            SceneKind::Redirect => {
                if needs_transition {
                    renderer.hide_transition(self.config.transition).await;
                }
                let Some(url) = scene.url.as_deref() else {
                    error!(scene_id, "redirect scene has no url");
                    return Err(NarrativeError::RedirectMissingUrl(scene.id));
                };
                info!(scene_id, url, "redirecting");
                self.ports.navigator.navigate_to(url);
                self.emit(NarrativeEvent::Redirected { url: url.to_owned() });
                return Ok(());
            }
        }

        if needs_transition {
            self.ports.renderer.hide_transition(self.config.transition).await;
        }
        Ok(())
    }

    fn unlock_codex(&mut self, codex_id: &str) {
        if !self.progression.unlock_codex_entry(codex_id) {
            return;
        }
        let Some(title) = self
            .scenes
            .get_codex_entry_by_id(codex_id)
            .map(|entry| entry.title.clone())
        else {
            return;
        };
        self.ports.renderer.show_codex_unlock_toast(&title);
        self.emit(NarrativeEvent::CodexUnlocked {
            codex_id: codex_id.to_owned(),
            title,
        });
    }

    fn prefetch_successors(&mut self, scene: &SceneNode) {
        for id in scene.successors() {
            if let Some(target) = self.scenes.peek_scene(id) {
                self.ports.prefetcher.preload_for_scene(target);
            }
        }
    }

    /// Applies the choice at `index` of the current choice node.
    ///
    /// A route choice enters the route's state, starts it, and plays its
    /// entry scene; otherwise the choice's `next` plays.
    ///
    /// # Errors
    ///
    /// Propagates errors from playing the follow-up scene.
    #[instrument(skip(self))]
    pub async fn make_choice(&mut self, index: usize) -> Result<(), NarrativeError> {
        let Some(scene) = self.current.as_ref().filter(|s| s.kind == SceneKind::Choice) else {
            warn!(index, "no choice is on screen");
            return Ok(());
        };
        let Some(choice) = scene.choices.get(index).cloned() else {
            warn!(index, scene_id = %scene.id, "choice index out of range");
            return Ok(());
        };

        let record = ChoiceRecord {
            scene_id: scene.id.clone(),
            choice_index: index,
            choice_text: choice.text.clone(),
        };
        info!(scene_id = %record.scene_id, index, text = %record.choice_text, "choice made");
        self.record_choice(record);

        if let Some(route_id) = choice.route.as_deref() {
            self.start_route(route_id).await
        } else if let Some(next) = choice.next.as_deref() {
            self.play_scene(next).await
        } else {
            info!(index, "choice has no follow-up");
            Ok(())
        }
    }

    fn record_choice(&mut self, record: ChoiceRecord) {
        let data = self.progression.data_mut();
        if let Some(route) = data.current_route().map(|n| format!("route{n}"))
            && let Some(progress) = data.route_progress_mut(&route)
            && !progress.completed
        {
            progress.choices.push(record.clone());
        }
        data.record_choice(record);
    }

    async fn start_route(&mut self, route_id: &str) -> Result<(), NarrativeError> {
        let Some(state) = GameState::for_route_id(route_id) else {
            warn!(route_id, "route id does not map to a route state");
            return Ok(());
        };
        // The state follows the choice even when the registry rejects the id.
        self.set_state(state, &json!({ "route": route_id }));
        if self.routes.start_route(
            route_id,
            self.progression.data_mut(),
            self.ports.clock.as_ref(),
        ) {
            self.emit(NarrativeEvent::RouteStarted {
                route_id: route_id.to_owned(),
            });
        }
        self.play_scene(&route_entry_scene(route_id)).await
    }

    /// Schedules an advance to the current node's `next`.
    ///
    /// Manual requests are ignored while autoplay is on.
    pub fn next_dialogue(&mut self, manual: bool) {
        let auto_play = self.progression.is_auto_play();
        if manual && auto_play {
            debug!("manual advance ignored during autoplay");
            return;
        }
        if self.current.as_ref().and_then(|s| s.next.as_ref()).is_none() {
            return;
        }
        let delay = if auto_play && !manual {
            self.config.autoplay_delay
        } else {
            self.config.manual_delay
        };
        self.timers.schedule(ScheduledAdvance {
            due: Instant::now() + delay,
            generation: self.generation,
        });
        debug!(delay_ms = delay.as_millis(), manual, "advance scheduled");
    }

    /// When the next scheduled advance is due, if any.
    #[must_use]
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline(self.generation)
    }

    /// Fires every advance that is due. Advances scheduled for a scene that
    /// is no longer current are dropped. Returns how many advances played.
    ///
    /// # Errors
    ///
    /// Propagates errors from playing the follow-up scene.
    pub async fn fire_due_timers(&mut self) -> Result<usize, NarrativeError> {
        if self.timers.is_empty() {
            return Ok(0);
        }
        let mut fired = 0;
        for advance in self.timers.take_due(Instant::now()) {
            if advance.generation != self.generation {
                debug!(generation = advance.generation, "dropping stale advance");
                continue;
            }
            let Some(next) = self.current.as_ref().and_then(|s| s.next.clone()) else {
                continue;
            };
            self.play_scene(&next).await?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Stops background media and plays the current node's `next`, if any.
    ///
    /// # Errors
    ///
    /// Propagates errors from playing the follow-up scene.
    pub async fn skip_video(&mut self) -> Result<(), NarrativeError> {
        self.ports.renderer.stop_all_background_media();
        match self.current.as_ref().and_then(|s| s.next.clone()) {
            Some(next) => self.play_scene(&next).await,
            None => Ok(()),
        }
    }

    async fn on_video_ended(&mut self) -> Result<(), NarrativeError> {
        if self.video_auto_advance != Some(self.generation) {
            debug!("video ended; waiting for skip");
            return Ok(());
        }
        self.video_auto_advance = None;
        match self.current.as_ref().and_then(|s| s.next.clone()) {
            Some(next) => self.play_scene(&next).await,
            None => Ok(()),
        }
    }

    /// Reacts to the current line finishing: schedules an autoplay advance,
    /// or shows the continue indicator.
    pub fn on_dialogue_complete(&mut self) {
        if self.current.as_ref().and_then(|s| s.next.as_ref()).is_none() {
            return;
        }
        if self.progression.is_auto_play() {
            self.next_dialogue(false);
        } else {
            self.ports.renderer.show_continue_indicator();
        }
    }

    /// Flips autoplay. Switching it on over a node with a `next` behaves as
    /// if the current line just finished.
    pub fn toggle_autoplay(&mut self) -> bool {
        let enabled = self.progression.toggle_auto_play();
        self.emit(NarrativeEvent::AutoplayChanged { enabled });
        if enabled && self.current.as_ref().is_some_and(|s| s.next.is_some()) {
            self.on_dialogue_complete();
        }
        enabled
    }

    /// Resets progression and plays the opening scene.
    ///
    /// # Errors
    ///
    /// Propagates errors from playing the opening scene.
    pub async fn start_game(&mut self) -> Result<(), NarrativeError> {
        info!("starting new game");
        let from = self.progression.state();
        self.progression.reset_game();
        self.routes.sync_with(self.progression.data());
        self.emit(NarrativeEvent::StateChanged {
            from,
            to: self.progression.state(),
        });
        let opening = self.config.opening_scene.clone();
        self.play_scene(&opening).await
    }

    fn back_to_menu(&mut self) {
        self.generation += 1;
        self.timers.retain_generation(self.generation);
        self.video_auto_advance = None;
        self.ports.renderer.show_screen(Screen::StartMenu);
    }

    fn show_about(&mut self) {
        let url = self.config.about_url.clone();
        self.ports.navigator.navigate_to(&url);
        self.emit(NarrativeEvent::Redirected { url });
    }

    /// Moves the state machine and publishes the change.
    pub fn set_state(&mut self, state: GameState, data: &serde_json::Value) {
        let from = self.progression.set_state(state, data);
        self.emit(NarrativeEvent::StateChanged { from, to: state });
    }

    /// Completes a route for the player.
    pub fn complete_route(&mut self, route_id: &str) -> Option<RouteReward> {
        self.routes.complete_route(
            route_id,
            self.progression.data_mut(),
            self.ports.clock.as_ref(),
        )
    }

    /// The ending the player has earned so far.
    #[must_use]
    pub fn best_ending(&self) -> EndingCondition {
        self.routes.best_ending_condition(self.progression.data())
    }

    /// Saves into `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidSaveSlot`] or
    /// [`NarrativeError::Persistence`].
    pub fn save(&mut self, slot: u8) -> Result<(), NarrativeError> {
        save_handlers::save_game(
            &self.progression,
            slot,
            self.ports.clock.as_ref(),
            self.ports.store.as_mut(),
        )
    }

    /// Restores `slot`. Returns `false` if the slot was empty. The current
    /// scene is left on screen.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidSaveSlot`] or
    /// [`NarrativeError::Persistence`].
    pub fn load_slot(&mut self, slot: u8) -> Result<bool, NarrativeError> {
        let from = self.progression.state();
        let found =
            save_handlers::load_game(&mut self.progression, slot, self.ports.store.as_ref())?;
        if found {
            self.routes.sync_with(self.progression.data());
            self.emit(NarrativeEvent::StateChanged {
                from,
                to: self.progression.state(),
            });
        }
        Ok(found)
    }

    /// Summarizes `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidSaveSlot`] for a bad slot.
    pub fn save_info(&self, slot: u8) -> Result<SaveInfo, NarrativeError> {
        save_handlers::save_info(slot, self.ports.store.as_ref())
    }

    fn emit(&self, event: NarrativeEvent) {
        debug!(event_type = event.event_type(), "event");
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
