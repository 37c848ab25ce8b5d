//! Host configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use codexwalker_director::DirectorConfig;
use codexwalker_scene_graph::LoaderConfig;

use crate::error::AppError;

/// How log lines are formatted on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Everything the host needs to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Scene data loading.
    pub loader: LoaderConfig,
    /// Director tunables.
    pub director: DirectorConfig,
    /// Directory the fetch strategy resolves relative URLs against.
    pub web_root: PathBuf,
    /// Directory holding save slots.
    pub save_dir: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let bridged_shell = lookup("CODEXWALKER_BRIDGED")
            .map(|raw| parse_bool("CODEXWALKER_BRIDGED", &raw))
            .transpose()?
            .unwrap_or(false);
        let use_embedded = lookup("CODEXWALKER_EMBEDDED")
            .map(|raw| parse_bool("CODEXWALKER_EMBEDDED", &raw))
            .transpose()?
            .unwrap_or(true);
        let loader = LoaderConfig {
            use_embedded,
            device_data_dir: lookup("CODEXWALKER_DATA_DIR").map(PathBuf::from),
            bridged_shell,
            ..LoaderConfig::default()
        };

        let defaults = DirectorConfig::default();
        let autoplay_delay = match lookup("CODEXWALKER_AUTOPLAY_DELAY_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|e| {
                AppError::Config(format!(
                    "CODEXWALKER_AUTOPLAY_DELAY_MS must be a number of milliseconds: {e}"
                ))
            })?),
            None => defaults.autoplay_delay,
        };
        let director = DirectorConfig {
            autoplay_delay,
            ..defaults
        };

        let log_format = match lookup("CODEXWALKER_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("" | "text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "CODEXWALKER_LOG_FORMAT must be `text` or `json`, got `{other}`"
                )));
            }
        };

        Ok(Self {
            loader,
            director,
            web_root: lookup("CODEXWALKER_WEB_ROOT").map_or_else(|| PathBuf::from("."), PathBuf::from),
            save_dir: lookup("CODEXWALKER_SAVE_DIR")
                .map_or_else(|| PathBuf::from(".codexwalker/saves"), PathBuf::from),
            log_format,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(AppError::Config(format!("{key} must be true or false, got `{raw}`"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.loader, LoaderConfig::default());
        assert_eq!(config.director, DirectorConfig::default());
        assert_eq!(config.web_root, PathBuf::from("."));
        assert_eq!(config.save_dir, PathBuf::from(".codexwalker/saves"));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_reads_every_variable() {
        // Arrange
        let vars = [
            ("CODEXWALKER_DATA_DIR", "/sdcard/codexwalker"),
            ("CODEXWALKER_WEB_ROOT", "www"),
            ("CODEXWALKER_SAVE_DIR", "/tmp/saves"),
            ("CODEXWALKER_BRIDGED", "true"),
            ("CODEXWALKER_EMBEDDED", "0"),
            ("CODEXWALKER_AUTOPLAY_DELAY_MS", "800"),
            ("CODEXWALKER_LOG_FORMAT", "json"),
        ];

        // Act
        let config = config_from(&vars).unwrap();

        // Assert
        assert_eq!(
            config.loader.device_data_dir,
            Some(PathBuf::from("/sdcard/codexwalker"))
        );
        assert!(config.loader.bridged_shell);
        assert!(!config.loader.use_embedded);
        assert_eq!(config.director.autoplay_delay, Duration::from_millis(800));
        assert_eq!(config.web_root, PathBuf::from("www"));
        assert_eq!(config.save_dir, PathBuf::from("/tmp/saves"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_delay_is_config_error() {
        let result = config_from(&[("CODEXWALKER_AUTOPLAY_DELAY_MS", "soon")]);

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("AUTOPLAY_DELAY_MS")));
    }

    #[test]
    fn test_invalid_bool_is_config_error() {
        let result = config_from(&[("CODEXWALKER_BRIDGED", "maybe")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_log_format_is_config_error() {
        let result = config_from(&[("CODEXWALKER_LOG_FORMAT", "xml")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
