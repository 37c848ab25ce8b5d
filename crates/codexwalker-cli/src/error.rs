//! Codex Walker — host error types.

use codexwalker_core::error::NarrativeError;
use thiserror::Error;

/// Startup and runtime errors for the terminal host.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal or filesystem I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The narrative engine failed fatally.
    #[error(transparent)]
    Narrative(#[from] NarrativeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrative_error_message_is_passed_through() {
        let err = AppError::from(NarrativeError::LoadExhausted {
            attempts: 3,
            reason: "offline".into(),
        });

        assert_eq!(
            err.to_string(),
            "scene data could not be loaded after 3 attempt(s): offline"
        );
    }

    #[test]
    fn test_config_error_message() {
        let err = AppError::Config("CODEXWALKER_BRIDGED must be true or false".into());

        assert!(err.to_string().starts_with("configuration error: "));
    }
}
