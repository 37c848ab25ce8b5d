//! A `DataFetcher` that serves URLs from a local web root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use codexwalker_core::fetch::{DataFetcher, FetchResponse};
use tracing::debug;

/// Resolves fetch URLs against a directory, the way a static web server
/// would. Missing files answer 404.
#[derive(Debug, Clone)]
pub struct WebRootFetcher {
    root: PathBuf,
}

impl WebRootFetcher {
    /// A fetcher serving from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps `url` to a file under the root, dropping any query string and
    /// `file://` scheme. Returns `None` for URLs that would leave the root.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_prefix("file://").unwrap_or(path);
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                std::path::Component::Normal(part) => resolved.push(part),
                std::path::Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl DataFetcher for WebRootFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, String> {
        let Some(path) = self.resolve(url) else {
            return Ok(FetchResponse {
                status: 404,
                body: String::new(),
            });
        };
        debug!(url, path = %path.display(), "fetching");
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(FetchResponse { status: 200, body }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse {
                status: 404,
                body: String::new(),
            }),
            Err(e) => Err(format!("{}: {e}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_query_scheme_and_dot_prefix() {
        let fetcher = WebRootFetcher::new("/srv/www");

        assert_eq!(
            fetcher.resolve("./data/act1.json?v=1768471200000"),
            Some(PathBuf::from("/srv/www/data/act1.json"))
        );
        assert_eq!(
            fetcher.resolve("file:///android_asset/www/data/codex.json"),
            Some(PathBuf::from("/srv/www/android_asset/www/data/codex.json"))
        );
        assert_eq!(fetcher.resolve("data/../../etc/passwd"), None);
    }

    #[tokio::test]
    async fn test_fetch_serves_files_and_404s_missing_ones() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(tmp.path().join("data/codex.json"), "{\"codex_entries\":[]}").unwrap();
        let fetcher = WebRootFetcher::new(tmp.path());

        // Act
        let found = fetcher.fetch("data/codex.json?v=1").await.unwrap();
        let missing = fetcher.fetch("data/act9.json").await.unwrap();

        // Assert
        assert!(found.is_success());
        assert_eq!(found.body, "{\"codex_entries\":[]}");
        assert_eq!(missing.status, 404);
        assert!(!missing.is_success());
    }
}
