//! Terminal implementations of the presentation ports.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use colored::Colorize;
use codexwalker_core::presentation::{
    AssetPrefetcher, DialogueCompletion, Navigator, Renderer, Screen, TransitionKind,
    assets_for_scene,
};
use codexwalker_core::scene::{Choice, SceneNode};
use codexwalker_director::UserAction;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// A shared line-oriented output. Clones write to the same sink.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Console {
    /// A console over `out`.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    /// A console over the process's stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Writes one line. Write failures are logged, not raised.
    pub fn line(&self, args: fmt::Arguments<'_>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{args}").and_then(|()| out.flush()) {
            warn!(error = %e, "terminal write failed");
        }
    }
}

/// Prints scenes as text. Completion signals a real UI would send later are
/// sent right away, since a line is fully shown as soon as it is printed.
#[derive(Debug)]
pub struct TerminalRenderer {
    console: Console,
    completions: UnboundedSender<UserAction>,
}

impl TerminalRenderer {
    /// A renderer printing to `console` and reporting on `completions`.
    #[must_use]
    pub fn new(console: Console, completions: UnboundedSender<UserAction>) -> Self {
        Self {
            console,
            completions,
        }
    }

    fn report(&self, action: UserAction) {
        if self.completions.send(action).is_err() {
            debug!(?action, "session loop has stopped; completion dropped");
        }
    }
}

#[async_trait]
impl Renderer for TerminalRenderer {
    fn show_screen(&mut self, screen: Screen) {
        match screen {
            Screen::StartMenu => self
                .console
                .line(format_args!("{}", "== 万象行者 ==  (start / help / quit)".bold())),
            Screen::Game => debug!("game screen"),
        }
    }

    fn set_background(&mut self, background: &str) {
        debug!(background, "background");
    }

    fn update_dialogue(&mut self, speaker: &str, text: &str, completion: DialogueCompletion) {
        if speaker.is_empty() {
            self.console.line(format_args!("{text}"));
        } else {
            self.console.line(format_args!("【{speaker}】{text}"));
        }
        if completion == DialogueCompletion::Report {
            self.report(UserAction::DialogueComplete);
        }
    }

    fn display_choices(&mut self, choices: &[Choice]) {
        for (n, choice) in choices.iter().enumerate() {
            self.console.line(format_args!("  {}. {}", n + 1, choice.text));
        }
    }

    fn play_fullscreen_video(&mut self, video: &str, auto_advance: bool) {
        self.console.line(format_args!("[video] {video}"));
        if !auto_advance {
            self.console.line(format_args!("  (skip to continue)"));
        }
        self.report(UserAction::VideoEnded);
    }

    fn show_codex_unlock_toast(&mut self, title: &str) {
        self.console
            .line(format_args!("{}", format!("✦ 法典解锁：{title}").yellow()));
    }

    fn show_continue_indicator(&mut self) {
        self.console.line(format_args!("  ▼"));
    }

    fn stop_all_background_media(&mut self) {
        debug!("stopping background media");
    }

    async fn show_transition(&mut self, kind: TransitionKind) {
        debug!(?kind, "transition in");
    }

    async fn hide_transition(&mut self, kind: TransitionKind) {
        debug!(?kind, "transition out");
    }
}

/// Logs the assets of upcoming scenes, each reference once.
#[derive(Debug, Default)]
pub struct LoggingPrefetcher {
    seen: HashSet<String>,
}

impl LoggingPrefetcher {
    /// Number of distinct assets requested so far.
    #[must_use]
    pub fn distinct_assets(&self) -> usize {
        self.seen.len()
    }
}

impl AssetPrefetcher for LoggingPrefetcher {
    fn preload_for_scene(&mut self, scene: &SceneNode) {
        for asset in assets_for_scene(scene) {
            if self.seen.insert(asset.to_owned()) {
                debug!(scene_id = %scene.id, asset, "preloading asset");
            }
        }
    }
}

/// Announces redirects on the console.
#[derive(Debug)]
pub struct TerminalNavigator {
    console: Console,
}

impl TerminalNavigator {
    /// A navigator printing to `console`.
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate_to(&mut self, url: &str) {
        info!(url, "leaving the narrative");
        self.console.line(format_args!("→ {url}"));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use codexwalker_core::scene::SceneKind;
    use tokio::sync::mpsc;

    /// A cloneable in-memory sink.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn scene(id: &str, background: &str, kind: SceneKind, video: Option<&str>) -> SceneNode {
        SceneNode {
            id: id.into(),
            kind,
            background: background.into(),
            speaker: String::new(),
            text: String::new(),
            next: None,
            choices: Vec::new(),
            unlocks_codex: None,
            video: video.map(str::to_owned),
            url: None,
        }
    }

    #[test]
    fn test_dialogue_prints_speaker_and_reports_completion() {
        // Arrange
        let buffer = SharedBuffer::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut renderer = TerminalRenderer::new(Console::new(buffer.clone()), tx);

        // Act
        renderer.update_dialogue("辰星", "你好", DialogueCompletion::Report);
        renderer.update_dialogue("", "旁白", DialogueCompletion::Silent);

        // Assert
        assert_eq!(buffer.text(), "【辰星】你好\n旁白\n");
        assert_eq!(rx.try_recv().unwrap(), UserAction::DialogueComplete);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_choices_are_numbered_from_one() {
        let buffer = SharedBuffer::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut renderer = TerminalRenderer::new(Console::new(buffer.clone()), tx);

        renderer.display_choices(&[
            Choice { text: "开始游戏".into(), next: Some("a".into()), route: None },
            Choice { text: "查看法典".into(), next: Some("b".into()), route: None },
        ]);

        assert_eq!(buffer.text(), "  1. 开始游戏\n  2. 查看法典\n");
    }

    #[test]
    fn test_video_reports_end_immediately() {
        let buffer = SharedBuffer::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut renderer = TerminalRenderer::new(Console::new(buffer.clone()), tx);

        renderer.play_fullscreen_video("cg/intro.mp4", true);

        assert_eq!(buffer.text(), "[video] cg/intro.mp4\n");
        assert_eq!(rx.try_recv().unwrap(), UserAction::VideoEnded);
    }

    #[test]
    fn test_prefetcher_counts_each_asset_once() {
        let mut prefetcher = LoggingPrefetcher::default();

        prefetcher.preload_for_scene(&scene("a", "bg/day.mp4", SceneKind::Dialogue, None));
        prefetcher.preload_for_scene(&scene("b", "bg/day.mp4", SceneKind::Video, Some("cg/x.mp4")));
        prefetcher.preload_for_scene(&scene("c", "bg/still.png", SceneKind::Dialogue, None));

        assert_eq!(prefetcher.distinct_assets(), 2);
    }

    #[test]
    fn test_navigator_prints_destination() {
        let buffer = SharedBuffer::default();
        let mut navigator = TerminalNavigator::new(Console::new(buffer.clone()));

        navigator.navigate_to("about.html");

        assert_eq!(buffer.text(), "→ about.html\n");
    }
}
