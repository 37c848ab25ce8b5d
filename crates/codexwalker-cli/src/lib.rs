//! Codex Walker — terminal host.
//!
//! Implements the presentation, storage, and fetch ports over a terminal and
//! the local filesystem, and runs an interactive session loop on top of the
//! director.

pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod session;
pub mod storage;
pub mod terminal;
