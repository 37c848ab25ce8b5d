//! Error taxonomy shared by every narrative component.

use thiserror::Error;

/// Top-level error type for the narrative engine.
///
/// Only [`NarrativeError::LoadExhausted`] and
/// [`NarrativeError::RedirectMissingUrl`] are expected to reach a host; the
/// remaining variants are logged and absorbed by the component that raised
/// them.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// A scene or codex query arrived before the scene graph finished loading.
    #[error("scene data has not been loaded yet")]
    DataNotLoaded,

    /// A scene id did not resolve in the loaded graph.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// A single load strategy failed; the loader moves on to the next one.
    #[error("load strategy `{strategy}` failed: {reason}")]
    LoadStrategy {
        /// Name of the strategy that failed.
        strategy: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// Every strategy failed on every attempt.
    #[error("scene data could not be loaded after {attempts} attempt(s): {reason}")]
    LoadExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last strategy failure seen.
        reason: String,
    },

    /// A redirect node has no URL to hand off to.
    #[error("redirect scene `{0}` has no url")]
    RedirectMissingUrl(String),

    /// Loaded data or a request violated a structural rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// A save slot outside the supported range was requested.
    #[error("save slot {0} is out of range")]
    InvalidSaveSlot(u8),

    /// A save record could not be written or read back.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl NarrativeError {
    /// Returns `true` for errors a host must surface to the player.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::LoadExhausted { .. } | Self::RedirectMissingUrl(_)
        )
    }
}
