//! Shared test mocks and utilities for the Codex Walker narrative engine.

mod clock;
mod fetch;
mod presentation;
mod storage;

pub use clock::FixedClock;
pub use fetch::{FailingFetcher, ScriptedFetcher};
pub use presentation::{RecordingNavigator, RecordingPrefetcher, RecordingRenderer, RenderCall};
pub use storage::{FailingStore, InMemoryStore};
