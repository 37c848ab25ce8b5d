//! Loader configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Chapter files read by the file and fetch strategies, in play order.
pub const DEFAULT_CHAPTER_FILES: [&str; 4] = ["act1.json", "act2.json", "act3.json", "act4.json"];

/// Lore file read after the chapters.
pub const DEFAULT_LORE_FILE: &str = "codex.json";

/// How often and how patiently `load()` retries the whole cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Which strategies run, where they look, and how failures are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Try the compiled-in dataset first.
    pub use_embedded: bool,
    /// Device directory holding the data files. The local-file strategy is
    /// skipped when unset.
    pub device_data_dir: Option<PathBuf>,
    /// Running inside a bridged native shell. Adds the packaged-asset path
    /// prefixes and disables the cache-busting query suffix.
    pub bridged_shell: bool,
    /// Chapter file names, in play order.
    pub chapter_files: Vec<String>,
    /// Lore file name.
    pub lore_file: String,
    /// Retry behaviour for the whole cascade.
    pub retry: RetryPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            use_embedded: true,
            device_data_dir: None,
            bridged_shell: false,
            chapter_files: DEFAULT_CHAPTER_FILES.iter().map(|&f| f.to_owned()).collect(),
            lore_file: DEFAULT_LORE_FILE.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl LoaderConfig {
    /// Candidate path prefixes for the fetch strategy, highest priority first.
    #[must_use]
    pub fn path_prefixes(&self) -> Vec<String> {
        let mut prefixes = vec!["./data/".to_owned(), "data/".to_owned()];
        if self.bridged_shell {
            prefixes.push("/android_asset/www/data/".to_owned());
            prefixes.push("file:///android_asset/www/data/".to_owned());
        }
        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy_is_three_attempts_two_seconds_apart() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_browser_prefixes_are_relative_only() {
        let config = LoaderConfig::default();

        assert_eq!(config.path_prefixes(), vec!["./data/", "data/"]);
    }

    #[test]
    fn test_bridged_shell_adds_packaged_asset_prefixes() {
        let config = LoaderConfig {
            bridged_shell: true,
            ..LoaderConfig::default()
        };

        assert_eq!(
            config.path_prefixes(),
            vec![
                "./data/",
                "data/",
                "/android_asset/www/data/",
                "file:///android_asset/www/data/",
            ]
        );
    }
}
