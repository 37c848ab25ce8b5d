//! Codex Walker Core — shared abstractions.
//!
//! This crate defines the scene data model, the clock, the error taxonomy,
//! and the ports (storage, fetching, presentation) that the narrative
//! components are wired to. It contains no I/O.

pub mod clock;
pub mod error;
pub mod fetch;
pub mod presentation;
pub mod scene;
pub mod storage;
