//! Load strategies.
//!
//! Each source produces raw [`GraphData`] or fails as a whole. Validation
//! and fallback are the store's job.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use codexwalker_core::clock::Clock;
use codexwalker_core::error::NarrativeError;
use codexwalker_core::fetch::DataFetcher;
use tracing::{debug, info, warn};

use crate::domain::graph::{GraphData, parse_chapter, parse_lore};
use crate::embedded;

/// Identifies which strategy produced the loaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// The compiled-in dataset.
    Embedded,
    /// Files read from the device data directory.
    LocalFiles,
    /// Files fetched by path prefix.
    Fetch,
    /// The minimal two-scene dataset.
    Fallback,
}

impl SourceKind {
    /// Strategy name used in logs and errors.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::LocalFiles => "local-files",
            Self::Fetch => "fetch",
            Self::Fallback => "fallback",
        }
    }
}

/// One way of obtaining the scene graph.
#[async_trait]
pub trait SceneSource: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> SourceKind;

    /// Produces the full dataset.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::LoadStrategy` if any part of the dataset could
    /// not be obtained or parsed.
    async fn load(&self) -> Result<GraphData, NarrativeError>;
}

fn strategy_error(kind: SourceKind, reason: impl Into<String>) -> NarrativeError {
    NarrativeError::LoadStrategy {
        strategy: kind.as_str(),
        reason: reason.into(),
    }
}

/// The compiled-in dataset, or a substitute supplied by the host.
#[derive(Debug, Clone)]
pub enum EmbeddedSource {
    /// The chapter and lore files bundled with this crate.
    Bundled,
    /// A dataset supplied in memory.
    Data(GraphData),
}

#[async_trait]
impl SceneSource for EmbeddedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Embedded
    }

    async fn load(&self) -> Result<GraphData, NarrativeError> {
        match self {
            Self::Bundled => {
                let chapters = embedded::CHAPTERS
                    .iter()
                    .map(|(file, text)| parse_chapter(file, text))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| strategy_error(SourceKind::Embedded, e))?;
                let (lore_file, lore_text) = embedded::LORE;
                let lore = parse_lore(lore_file, lore_text)
                    .map_err(|e| strategy_error(SourceKind::Embedded, e))?;
                Ok(GraphData::from_parts(chapters, lore))
            }
            Self::Data(data) => Ok(data.clone()),
        }
    }
}

/// Reads the chapter files and then the lore file from a device directory.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    dir: PathBuf,
    chapter_files: Vec<String>,
    lore_file: String,
}

impl LocalFileSource {
    /// Creates a source reading `chapter_files` and `lore_file` under `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, chapter_files: Vec<String>, lore_file: String) -> Self {
        Self {
            dir: dir.into(),
            chapter_files,
            lore_file,
        }
    }

    async fn read(&self, file: &str) -> Result<String, NarrativeError> {
        let path = self.dir.join(file);
        debug!(path = %path.display(), "reading data file");
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "data file read failed");
            strategy_error(SourceKind::LocalFiles, format!("{}: {e}", path.display()))
        })
    }
}

#[async_trait]
impl SceneSource for LocalFileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::LocalFiles
    }

    async fn load(&self) -> Result<GraphData, NarrativeError> {
        let mut chapters = Vec::with_capacity(self.chapter_files.len());
        for file in &self.chapter_files {
            let text = self.read(file).await?;
            let scenes =
                parse_chapter(file, &text).map_err(|e| strategy_error(SourceKind::LocalFiles, e))?;
            chapters.push(scenes);
        }
        let text = self.read(&self.lore_file).await?;
        let lore = parse_lore(&self.lore_file, &text)
            .map_err(|e| strategy_error(SourceKind::LocalFiles, e))?;
        Ok(GraphData::from_parts(chapters, lore))
    }
}

/// Fetches the data files under each candidate path prefix until one
/// prefix yields every file.
pub struct FetchSource {
    fetcher: Arc<dyn DataFetcher>,
    clock: Arc<dyn Clock>,
    prefixes: Vec<String>,
    chapter_files: Vec<String>,
    lore_file: String,
    cache_busting: bool,
}

impl std::fmt::Debug for FetchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchSource")
            .field("prefixes", &self.prefixes)
            .field("chapter_files", &self.chapter_files)
            .field("lore_file", &self.lore_file)
            .field("cache_busting", &self.cache_busting)
            .finish_non_exhaustive()
    }
}

impl FetchSource {
    /// Creates a fetch source. `cache_busting` appends `?v=<epoch millis>` to
    /// every request; hosts inside a bridged native shell turn it off.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn DataFetcher>,
        clock: Arc<dyn Clock>,
        prefixes: Vec<String>,
        chapter_files: Vec<String>,
        lore_file: String,
        cache_busting: bool,
    ) -> Self {
        Self {
            fetcher,
            clock,
            prefixes,
            chapter_files,
            lore_file,
            cache_busting,
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, String> {
        debug!(url, "fetching data file");
        let response = self.fetcher.fetch(url).await.map_err(|e| format!("{url}: {e}"))?;
        if !response.is_success() {
            return Err(format!("HTTP error status {} for {url}", response.status));
        }
        Ok(response.body)
    }

    async fn fetch_prefix(&self, prefix: &str) -> Result<GraphData, String> {
        let suffix = if self.cache_busting {
            format!("?v={}", self.clock.epoch_millis())
        } else {
            String::new()
        };

        let mut chapters = Vec::with_capacity(self.chapter_files.len());
        for file in &self.chapter_files {
            let text = self.fetch_text(&format!("{prefix}{file}{suffix}")).await?;
            chapters.push(parse_chapter(file, &text)?);
        }
        let text = self
            .fetch_text(&format!("{prefix}{}{suffix}", self.lore_file))
            .await?;
        let lore = parse_lore(&self.lore_file, &text)?;
        Ok(GraphData::from_parts(chapters, lore))
    }
}

#[async_trait]
impl SceneSource for FetchSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Fetch
    }

    async fn load(&self) -> Result<GraphData, NarrativeError> {
        let mut last_reason = String::from("no path prefixes configured");
        for prefix in &self.prefixes {
            match self.fetch_prefix(prefix).await {
                Ok(data) => {
                    info!(prefix = %prefix, "fetched data files");
                    return Ok(data);
                }
                Err(reason) => {
                    warn!(prefix = %prefix, %reason, "path prefix failed");
                    last_reason = reason;
                }
            }
        }
        Err(strategy_error(SourceKind::Fetch, last_reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use codexwalker_test_support::{FailingFetcher, FixedClock, ScriptedFetcher};

    const CHAPTER: &str = r#"[ { "id": "start", "type": "ending" } ]"#;
    const LORE: &str =
        r#"{ "codex_entries": [ { "id": "c", "title": "t", "content": "x", "category": "k" } ] }"#;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()))
    }

    fn files() -> (Vec<String>, String) {
        (vec!["act1.json".into(), "act2.json".into()], "codex.json".into())
    }

    #[tokio::test]
    async fn test_bundled_embedded_source_parses_all_chapters() {
        let data = EmbeddedSource::Bundled.load().await.unwrap();

        assert!(data.scenes.iter().any(|s| s.id == "start"));
        assert!(data.scenes.iter().any(|s| s.id == "route4_start"));
        assert_eq!(data.codex_entries.len(), 4);
    }

    #[tokio::test]
    async fn test_local_file_source_reads_chapters_in_order() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("act1.json"), CHAPTER).unwrap();
        std::fs::write(
            dir.path().join("act2.json"),
            r#"[ { "id": "two", "type": "ending" } ]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("codex.json"), LORE).unwrap();
        let (chapters, lore) = files();
        let source = LocalFileSource::new(dir.path(), chapters, lore);

        // Act
        let data = source.load().await.unwrap();

        // Assert
        let ids: Vec<&str> = data.scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "two"]);
        assert_eq!(data.codex_entries[0].id, "c");
    }

    #[tokio::test]
    async fn test_local_file_source_aborts_on_any_missing_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("act1.json"), CHAPTER).unwrap();
        std::fs::write(dir.path().join("codex.json"), LORE).unwrap();
        let (chapters, lore) = files();
        let source = LocalFileSource::new(dir.path(), chapters, lore);

        // Act
        let result = source.load().await;

        // Assert
        match result.unwrap_err() {
            NarrativeError::LoadStrategy { strategy, reason } => {
                assert_eq!(strategy, "local-files");
                assert!(reason.contains("act2.json"));
            }
            other => panic!("expected LoadStrategy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_source_falls_through_to_next_prefix() {
        // Arrange
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with("data/act1.json", 200, CHAPTER)
                .with("data/act2.json", 200, CHAPTER)
                .with("data/codex.json", 200, LORE),
        );
        let (chapters, lore) = files();
        let source = FetchSource::new(
            fetcher.clone(),
            clock(),
            vec!["./data/".into(), "data/".into()],
            chapters,
            lore,
            false,
        );

        // Act
        let data = source.load().await.unwrap();

        // Assert
        assert_eq!(data.scenes.len(), 2);
        let requested = fetcher.requested_urls();
        assert_eq!(requested[0], "./data/act1.json");
        assert_eq!(requested.last().unwrap(), "data/codex.json");
    }

    #[tokio::test]
    async fn test_fetch_source_appends_cache_buster_when_enabled() {
        // Arrange
        let fixed = clock();
        let millis = fixed.epoch_millis();
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with(&format!("data/act1.json?v={millis}"), 200, CHAPTER)
                .with(&format!("data/act2.json?v={millis}"), 200, CHAPTER)
                .with(&format!("data/codex.json?v={millis}"), 200, LORE),
        );
        let (chapters, lore) = files();
        let source = FetchSource::new(
            fetcher.clone(),
            fixed,
            vec!["data/".into()],
            chapters,
            lore,
            true,
        );

        // Act
        let result = source.load().await;

        // Assert
        assert!(result.is_ok());
        assert!(
            fetcher
                .requested_urls()
                .iter()
                .all(|u| u.ends_with(&format!("?v={millis}")))
        );
    }

    #[tokio::test]
    async fn test_fetch_source_rejects_non_success_status() {
        // Arrange
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with("data/act1.json", 200, CHAPTER)
                .with("data/act2.json", 404, "")
                .with("data/codex.json", 200, LORE),
        );
        let (chapters, lore) = files();
        let source = FetchSource::new(fetcher, clock(), vec!["data/".into()], chapters, lore, false);

        // Act
        let result = source.load().await;

        // Assert
        match result.unwrap_err() {
            NarrativeError::LoadStrategy { strategy, reason } => {
                assert_eq!(strategy, "fetch");
                assert!(reason.contains("404"));
            }
            other => panic!("expected LoadStrategy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_source_rejects_unparseable_body() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with("data/act1.json", 200, "<html>")
                .with("data/act2.json", 200, CHAPTER)
                .with("data/codex.json", 200, LORE),
        );
        let (chapters, lore) = files();
        let source = FetchSource::new(fetcher, clock(), vec!["data/".into()], chapters, lore, false);

        assert!(source.load().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_source_reports_transport_failure() {
        let (chapters, lore) = files();
        let source = FetchSource::new(
            Arc::new(FailingFetcher),
            clock(),
            vec!["data/".into()],
            chapters,
            lore,
            false,
        );

        match source.load().await.unwrap_err() {
            NarrativeError::LoadStrategy { reason, .. } => {
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected LoadStrategy, got {other:?}"),
        }
    }
}
