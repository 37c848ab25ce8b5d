//! Presentation ports: what the director drives on the host side.
//!
//! None of these report back through callbacks. Completion signals
//! (dialogue finished, video ended, choice picked) come back to the director
//! as user actions.

use async_trait::async_trait;

use crate::scene::{Choice, SceneKind, SceneNode};

/// Top-level screens the director asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The title menu.
    StartMenu,
    /// The in-game dialogue screen.
    Game,
}

/// Visual transition styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionKind {
    /// Fade through black.
    #[default]
    Fade,
}

/// Whether the renderer should report when a line finishes displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueCompletion {
    /// Send `DialogueComplete` once the line is fully shown.
    Report,
    /// The line is static (choice prompts, endings).
    Silent,
}

/// Draws scenes. Implemented by the host UI.
#[async_trait]
pub trait Renderer: Send {
    /// Switches to `screen`.
    fn show_screen(&mut self, screen: Screen);

    /// Sets the backdrop behind the dialogue box.
    fn set_background(&mut self, background: &str);

    /// Shows a line of dialogue.
    fn update_dialogue(&mut self, speaker: &str, text: &str, completion: DialogueCompletion);

    /// Shows the choices of a choice node, in order.
    fn display_choices(&mut self, choices: &[Choice]);

    /// Plays a fullscreen video. When `auto_advance` is false the host should
    /// hold on the last frame until the player skips.
    fn play_fullscreen_video(&mut self, video: &str, auto_advance: bool);

    /// Announces a newly unlocked codex entry.
    fn show_codex_unlock_toast(&mut self, title: &str);

    /// Shows the "click to continue" hint.
    fn show_continue_indicator(&mut self);

    /// Stops every background video or track that is currently playing.
    fn stop_all_background_media(&mut self);

    /// Starts a transition and resolves once the screen is covered.
    async fn show_transition(&mut self, kind: TransitionKind);

    /// Removes a transition and resolves once the screen is visible again.
    async fn hide_transition(&mut self, kind: TransitionKind);
}

/// Warms caches for scenes that might play next. Best effort.
pub trait AssetPrefetcher: Send {
    /// Requests the assets of `scene`.
    fn preload_for_scene(&mut self, scene: &SceneNode);
}

/// Leaves the narrative for an external destination.
pub trait Navigator: Send {
    /// Navigates to `url`.
    fn navigate_to(&mut self, url: &str);
}

/// Returns the asset references worth preloading for `scene`: a video
/// background, then the fullscreen video of a video node.
#[must_use]
pub fn assets_for_scene(scene: &SceneNode) -> Vec<&str> {
    let mut assets = Vec::new();
    if scene.background.ends_with(".mp4") {
        assets.push(scene.background.as_str());
    }
    if scene.kind == SceneKind::Video
        && let Some(video) = scene.video.as_deref()
    {
        assets.push(video);
    }
    assets
}
