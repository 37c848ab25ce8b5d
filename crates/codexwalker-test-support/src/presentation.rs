//! Recording presentation collaborators.
//!
//! Each recorder is a cheap handle over shared state: clone it, hand one
//! clone to the director, and inspect the other.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use codexwalker_core::presentation::{
    AssetPrefetcher, DialogueCompletion, Navigator, Renderer, Screen, TransitionKind,
};
use codexwalker_core::scene::{Choice, SceneNode};

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    /// `show_screen`.
    ShowScreen(Screen),
    /// `set_background`.
    SetBackground(String),
    /// `update_dialogue`.
    Dialogue {
        /// Speaker shown.
        speaker: String,
        /// Line shown.
        text: String,
        /// Completion mode requested.
        completion: DialogueCompletion,
    },
    /// `display_choices`, recorded as the choice texts.
    Choices(Vec<String>),
    /// `play_fullscreen_video`.
    Video {
        /// Video reference.
        video: String,
        /// Whether the director armed auto-advance.
        auto_advance: bool,
    },
    /// `show_codex_unlock_toast`.
    CodexToast(String),
    /// `show_continue_indicator`.
    ContinueIndicator,
    /// `stop_all_background_media`.
    StopMedia,
    /// `show_transition`.
    ShowTransition(TransitionKind),
    /// `hide_transition`.
    HideTransition(TransitionKind),
}

/// A renderer that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl RecordingRenderer {
    /// Creates a renderer with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the log.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    fn show_screen(&mut self, screen: Screen) {
        self.record(RenderCall::ShowScreen(screen));
    }

    fn set_background(&mut self, background: &str) {
        self.record(RenderCall::SetBackground(background.to_owned()));
    }

    fn update_dialogue(&mut self, speaker: &str, text: &str, completion: DialogueCompletion) {
        self.record(RenderCall::Dialogue {
            speaker: speaker.to_owned(),
            text: text.to_owned(),
            completion,
        });
    }

    fn display_choices(&mut self, choices: &[Choice]) {
        self.record(RenderCall::Choices(
            choices.iter().map(|c| c.text.clone()).collect(),
        ));
    }

    fn play_fullscreen_video(&mut self, video: &str, auto_advance: bool) {
        self.record(RenderCall::Video {
            video: video.to_owned(),
            auto_advance,
        });
    }

    fn show_codex_unlock_toast(&mut self, title: &str) {
        self.record(RenderCall::CodexToast(title.to_owned()));
    }

    fn show_continue_indicator(&mut self) {
        self.record(RenderCall::ContinueIndicator);
    }

    fn stop_all_background_media(&mut self) {
        self.record(RenderCall::StopMedia);
    }

    async fn show_transition(&mut self, kind: TransitionKind) {
        self.record(RenderCall::ShowTransition(kind));
    }

    async fn hide_transition(&mut self, kind: TransitionKind) {
        self.record(RenderCall::HideTransition(kind));
    }
}

/// A prefetcher that records the id of every scene it was asked to warm.
#[derive(Debug, Clone, Default)]
pub struct RecordingPrefetcher {
    scene_ids: Arc<Mutex<Vec<String>>>,
}

impl RecordingPrefetcher {
    /// Creates a prefetcher with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ids requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn scene_ids(&self) -> Vec<String> {
        self.scene_ids.lock().unwrap().clone()
    }
}

impl AssetPrefetcher for RecordingPrefetcher {
    fn preload_for_scene(&mut self, scene: &SceneNode) {
        self.scene_ids.lock().unwrap().push(scene.id.clone());
    }
}

/// A navigator that records every destination.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    urls: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Creates a navigator with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the URLs navigated to, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, url: &str) {
        self.urls.lock().unwrap().push(url.to_owned());
    }
}
