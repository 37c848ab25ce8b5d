//! File-backed save storage.

use std::path::{Path, PathBuf};

use codexwalker_core::storage::PersistentStore;
use tracing::warn;

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{key}.json")))
    }
}

impl PersistentStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read stored item");
                None
            }
        }
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), String> {
        let path = self
            .path_for(key)
            .ok_or_else(|| format!("invalid storage key `{key}`"))?;
        std::fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;
        std::fs::write(&path, value).map_err(|e| format!("{}: {e}", path.display()))
    }
}
