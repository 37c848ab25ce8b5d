//! The scene graph store: strategy cascade, retries, and fail-soft lookup.

use std::sync::Arc;

use codexwalker_core::clock::Clock;
use codexwalker_core::error::NarrativeError;
use codexwalker_core::fetch::DataFetcher;
use codexwalker_core::scene::{CodexEntry, SceneNode};
use tracing::{error, info, instrument, warn};

use super::config::{LoaderConfig, RetryPolicy};
use super::sources::{EmbeddedSource, FetchSource, LocalFileSource, SceneSource, SourceKind};
use crate::domain::fallback::minimal_dataset;
use crate::domain::graph::{GraphData, SceneGraph};
use crate::domain::validation::check;

/// Loads the scene graph once per session and answers lookups against it.
pub struct SceneGraphStore {
    sources: Vec<Box<dyn SceneSource>>,
    retry: RetryPolicy,
    graph: Option<SceneGraph>,
    loaded_from: Option<SourceKind>,
}

impl std::fmt::Debug for SceneGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraphStore")
            .field("sources", &self.sources.iter().map(|s| s.kind()).collect::<Vec<_>>())
            .field("retry", &self.retry)
            .field("loaded_from", &self.loaded_from)
            .finish_non_exhaustive()
    }
}

impl SceneGraphStore {
    /// Creates a store that tries `sources` in order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn SceneSource>>, retry: RetryPolicy) -> Self {
        Self {
            sources,
            retry,
            graph: None,
            loaded_from: None,
        }
    }

    /// Builds the standard cascade: embedded data (if enabled), device files
    /// (if a directory is configured), then fetching by path prefix.
    #[must_use]
    pub fn from_config(
        config: &LoaderConfig,
        fetcher: Arc<dyn DataFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut sources: Vec<Box<dyn SceneSource>> = Vec::new();
        if config.use_embedded {
            sources.push(Box::new(EmbeddedSource::Bundled));
        }
        if let Some(dir) = &config.device_data_dir {
            sources.push(Box::new(LocalFileSource::new(
                dir.clone(),
                config.chapter_files.clone(),
                config.lore_file.clone(),
            )));
        }
        sources.push(Box::new(FetchSource::new(
            fetcher,
            clock,
            config.path_prefixes(),
            config.chapter_files.clone(),
            config.lore_file.clone(),
            !config.bridged_shell,
        )));
        Self::new(sources, config.retry)
    }

    /// Loads and indexes the graph. Does nothing once a load has succeeded.
    ///
    /// The cascade is retried as a whole according to the retry policy.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::LoadExhausted` when every attempt failed.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), NarrativeError> {
        if self.graph.is_some() {
            return Ok(());
        }

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(attempt, max_attempts, "loading scene data");

            match self.run_cascade().await {
                Ok((kind, data)) => {
                    let graph = SceneGraph::build(data);
                    info!(
                        strategy = kind.as_str(),
                        scenes = graph.scenes().len(),
                        codex_entries = graph.codex_entries().len(),
                        "scene data loaded"
                    );
                    self.graph = Some(graph);
                    self.loaded_from = Some(kind);
                    return Ok(());
                }
                Err(err) => {
                    error!(attempt, max_attempts, error = %err, "scene data load failed");
                    if attempt >= max_attempts {
                        return Err(NarrativeError::LoadExhausted {
                            attempts: attempt,
                            reason: err.to_string(),
                        });
                    }
                    info!(delay_ms = self.retry.delay.as_millis(), "retrying scene data load");
                    tokio::time::sleep(self.retry.delay).await;
                }
            }
        }
    }

    /// Runs every strategy once, in order, and returns the first dataset that
    /// passes validation.
    async fn run_cascade(&self) -> Result<(SourceKind, GraphData), NarrativeError> {
        let mut embedded_rejected = false;
        let mut last_error = None;

        for source in &self.sources {
            let kind = source.kind();
            let outcome = source.load().await.and_then(|data| {
                check(&data)
                    .map(|()| data)
                    .map_err(|e| NarrativeError::LoadStrategy {
                        strategy: kind.as_str(),
                        reason: e.to_string(),
                    })
            });

            match outcome {
                Ok(data) => return Ok((kind, data)),
                Err(err) => {
                    warn!(strategy = kind.as_str(), error = %err, "load strategy rejected");
                    if kind == SourceKind::Embedded {
                        embedded_rejected = true;
                    }
                    last_error = Some(err);
                }
            }
        }

        if embedded_rejected {
            warn!("all strategies failed; using the minimal fallback dataset");
            return Ok((SourceKind::Fallback, minimal_dataset()));
        }

        Err(last_error.unwrap_or_else(|| NarrativeError::LoadStrategy {
            strategy: "cascade",
            reason: "no load strategies configured".to_owned(),
        }))
    }

    /// Returns `true` once data has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.graph.is_some()
    }

    /// Which strategy supplied the loaded data.
    #[must_use]
    pub fn loaded_from(&self) -> Option<SourceKind> {
        self.loaded_from
    }

    /// Resolves a scene.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::DataNotLoaded` before a successful load and
    /// `NarrativeError::SceneNotFound` for an unknown id.
    pub fn find_scene(&self, id: &str) -> Result<&SceneNode, NarrativeError> {
        let graph = self.graph.as_ref().ok_or(NarrativeError::DataNotLoaded)?;
        graph
            .scene(id)
            .ok_or_else(|| NarrativeError::SceneNotFound(id.to_owned()))
    }

    /// Looks up a scene, logging when the store is not loaded or the id is
    /// unknown.
    #[must_use]
    pub fn get_scene_by_id(&self, id: &str) -> Option<&SceneNode> {
        self.find_scene(id)
            .inspect_err(|e| error!(scene_id = id, error = %e, "scene lookup failed"))
            .ok()
    }

    /// Looks up a scene without logging. Used for speculative work such as
    /// prefetching, where a miss is expected and harmless.
    #[must_use]
    pub fn peek_scene(&self, id: &str) -> Option<&SceneNode> {
        self.graph.as_ref().and_then(|g| g.scene(id))
    }

    /// Looks up a codex entry, logging when the store is not loaded or the id
    /// is unknown.
    #[must_use]
    pub fn get_codex_entry_by_id(&self, id: &str) -> Option<&CodexEntry> {
        let Some(graph) = &self.graph else {
            error!(codex_id = id, "codex entry requested before scene data finished loading");
            return None;
        };
        let entry = graph.codex_entry(id);
        if entry.is_none() {
            warn!(codex_id = id, "codex entry not found");
        }
        entry
    }

    /// All scenes in load order, or an empty slice before loading.
    #[must_use]
    pub fn get_all_scenes(&self) -> &[SceneNode] {
        match &self.graph {
            Some(graph) => graph.scenes(),
            None => {
                error!("scene list requested before scene data finished loading");
                &[]
            }
        }
    }

    /// All codex entries in load order, or an empty slice before loading.
    #[must_use]
    pub fn get_all_codex_entries(&self) -> &[CodexEntry] {
        match &self.graph {
            Some(graph) => graph.codex_entries(),
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use codexwalker_test_support::{FailingFetcher, FixedClock};

    use super::*;
    use crate::domain::graph::{parse_chapter, parse_lore};

    /// A source that counts calls and replays a fixed outcome.
    struct CountingSource {
        kind: SourceKind,
        outcome: Mutex<Option<GraphData>>,
        calls: Arc<AtomicUsize>,
    }

    impl CountingSource {
        fn boxed(
            kind: SourceKind,
            outcome: Option<GraphData>,
            calls: &Arc<AtomicUsize>,
        ) -> Box<dyn SceneSource> {
            Box::new(Self {
                kind,
                outcome: Mutex::new(outcome),
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait]
    impl SceneSource for CountingSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn load(&self) -> Result<GraphData, NarrativeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| NarrativeError::LoadStrategy {
                    strategy: self.kind.as_str(),
                    reason: "unavailable".into(),
                })
        }
    }

    fn valid_data(start_text: &str) -> GraphData {
        let chapter = format!(
            r#"[
                {{ "id": "start", "type": "choice", "text": "{start_text}", "choices": [
                    {{ "text": "开始游戏", "next": "dream_prologue_1_1" }},
                    {{ "text": "查看法典", "next": "codex_menu" }}
                ] }},
                {{ "id": "dream_prologue_1_1", "type": "narration", "next": "start" }},
                {{ "id": "codex_menu", "type": "dialogue", "next": "start" }}
            ]"#
        );
        GraphData::from_parts(
            vec![parse_chapter("act1.json", &chapter).unwrap()],
            parse_lore(
                "codex.json",
                r#"{ "codex_entries": [ { "id": "codex_walker", "title": "万象行者", "content": "x", "category": "概念" } ] }"#,
            )
            .unwrap(),
        )
    }

    fn no_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        // Arrange
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = SceneGraphStore::new(
            vec![CountingSource::boxed(
                SourceKind::Embedded,
                Some(valid_data("hello")),
                &calls,
            )],
            no_retry(),
        );

        // Act
        store.load().await.unwrap();
        let first: Vec<SceneNode> = store.get_all_scenes().to_vec();
        store.load().await.unwrap();

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get_all_scenes(), first.as_slice());
        assert_eq!(store.loaded_from(), Some(SourceKind::Embedded));
    }

    #[tokio::test]
    async fn test_empty_embedded_dataset_falls_through_to_next_strategy() {
        // Arrange
        let embedded_calls = Arc::new(AtomicUsize::new(0));
        let file_calls = Arc::new(AtomicUsize::new(0));
        let mut store = SceneGraphStore::new(
            vec![
                CountingSource::boxed(SourceKind::Embedded, Some(GraphData::default()), &embedded_calls),
                CountingSource::boxed(SourceKind::LocalFiles, Some(valid_data("files")), &file_calls),
            ],
            no_retry(),
        );

        // Act
        store.load().await.unwrap();

        // Assert
        assert_eq!(file_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.loaded_from(), Some(SourceKind::LocalFiles));
        assert_eq!(store.get_scene_by_id("start").unwrap().text, "files");
    }

    #[tokio::test]
    async fn test_empty_embedded_dataset_with_no_alternatives_uses_fallback() {
        // Arrange
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = SceneGraphStore::new(
            vec![
                CountingSource::boxed(SourceKind::Embedded, Some(GraphData::default()), &calls),
                CountingSource::boxed(SourceKind::Fetch, None, &calls),
            ],
            no_retry(),
        );

        // Act
        store.load().await.unwrap();

        // Assert
        assert_eq!(store.loaded_from(), Some(SourceKind::Fallback));
        assert_eq!(store.get_all_scenes().len(), 2);
        assert!(store.get_scene_by_id("demo_scene").is_some());
        assert!(store.get_codex_entry_by_id("demo_entry").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_retries_then_reports_exhaustion() {
        // Arrange
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = SceneGraphStore::new(
            vec![
                CountingSource::boxed(SourceKind::LocalFiles, None, &calls),
                CountingSource::boxed(SourceKind::Fetch, None, &calls),
            ],
            RetryPolicy::default(),
        );
        let started = tokio::time::Instant::now();

        // Act
        let result = store.load().await;

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert!(started.elapsed() >= Duration::from_secs(4));
        assert!(!store.is_loaded());
        match result.unwrap_err() {
            NarrativeError::LoadExhausted { attempts, reason } => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("fetch"));
            }
            other => panic!("expected LoadExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dangling_reference_rejects_strategy() {
        // Arrange
        let mut broken = valid_data("broken");
        broken.scenes[1].next = Some("does_not_exist".into());
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = SceneGraphStore::new(
            vec![
                CountingSource::boxed(SourceKind::LocalFiles, Some(broken), &calls),
                CountingSource::boxed(SourceKind::Fetch, Some(valid_data("fetched")), &calls),
            ],
            no_retry(),
        );

        // Act
        store.load().await.unwrap();

        // Assert
        assert_eq!(store.loaded_from(), Some(SourceKind::Fetch));
        assert!(store.get_scene_by_id("does_not_exist").is_none());
    }

    #[tokio::test]
    async fn test_lookups_before_load_fail_soft() {
        let store = SceneGraphStore::new(Vec::new(), no_retry());

        assert!(store.get_scene_by_id("start").is_none());
        assert!(store.get_codex_entry_by_id("codex_walker").is_none());
        assert!(store.get_all_scenes().is_empty());
        assert!(store.peek_scene("start").is_none());
        assert!(store.get_all_codex_entries().is_empty());
        assert!(matches!(
            store.find_scene("start"),
            Err(NarrativeError::DataNotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_find_scene_names_the_missing_id() {
        // Arrange
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = SceneGraphStore::new(
            vec![CountingSource::boxed(SourceKind::Embedded, Some(valid_data("embedded")), &calls)],
            no_retry(),
        );
        store.load().await.unwrap();

        // Act
        let missing = store.find_scene("nowhere");

        // Assert
        assert!(store.find_scene("start").is_ok());
        match missing {
            Err(NarrativeError::SceneNotFound(id)) => assert_eq!(id, "nowhere"),
            other => panic!("expected SceneNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_from_config_prefers_bundled_dataset() {
        // Arrange
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()));
        let mut store =
            SceneGraphStore::from_config(&LoaderConfig::default(), Arc::new(FailingFetcher), clock);

        // Act
        store.load().await.unwrap();

        // Assert
        assert_eq!(store.loaded_from(), Some(SourceKind::Embedded));
        let start = store.get_scene_by_id("start").unwrap();
        assert_eq!(start.choices[0].text, "开始游戏");
        assert_eq!(start.choices[0].next.as_deref(), Some("dream_prologue_1_1"));
    }

    #[tokio::test]
    async fn test_from_config_without_embedded_exhausts_when_fetch_fails() {
        // Arrange
        let config = LoaderConfig {
            use_embedded: false,
            retry: no_retry(),
            ..LoaderConfig::default()
        };
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()));
        let mut store = SceneGraphStore::from_config(&config, Arc::new(FailingFetcher), clock);

        // Act
        let result = store.load().await;

        // Assert
        assert!(matches!(
            result,
            Err(NarrativeError::LoadExhausted { attempts: 1, .. })
        ));
    }
}
