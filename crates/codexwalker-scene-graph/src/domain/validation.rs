//! Structural validation of loaded graph data.
//!
//! A dataset is adopted only when [`validate`] reports no issues; [`check`]
//! folds the issues into a single error.

use std::collections::HashSet;
use std::fmt;

use codexwalker_core::error::NarrativeError;
use codexwalker_core::scene::SceneKind;

use super::graph::{GraphData, START_SCENE_ID, route_entry_scene};

/// One reason a dataset cannot be adopted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// The scene list is empty.
    NoScenes,
    /// The lore list is empty.
    NoCodexEntries,
    /// No scene has the id `start`.
    MissingStartScene,
    /// Two scenes share an id.
    DuplicateScene(String),
    /// A choice node offers no choices.
    ChoiceWithoutOptions(String),
    /// A choice has neither a route nor a `next` target.
    ChoiceWithoutTarget {
        /// Scene that holds the choice.
        scene: String,
        /// Position of the choice.
        index: usize,
    },
    /// A video node has no video reference.
    VideoWithoutSource(String),
    /// A `next`, `choice.next`, or route entry id does not resolve.
    DanglingReference {
        /// Scene holding the reference.
        from: String,
        /// The id that was not found.
        to: String,
    },
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoScenes => write!(f, "scene list is empty"),
            Self::NoCodexEntries => write!(f, "codex entry list is empty"),
            Self::MissingStartScene => write!(f, "no scene with id `{START_SCENE_ID}`"),
            Self::DuplicateScene(id) => write!(f, "duplicate scene id `{id}`"),
            Self::ChoiceWithoutOptions(id) => write!(f, "choice scene `{id}` has no choices"),
            Self::ChoiceWithoutTarget { scene, index } => {
                write!(f, "choice {index} of `{scene}` has neither route nor next")
            }
            Self::VideoWithoutSource(id) => write!(f, "video scene `{id}` has no video"),
            Self::DanglingReference { from, to } => {
                write!(f, "`{from}` references missing scene `{to}`")
            }
        }
    }
}

/// Checks `data` and returns every issue found, in scene order.
#[must_use]
pub fn validate(data: &GraphData) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    if data.scenes.is_empty() {
        issues.push(GraphIssue::NoScenes);
    }
    if data.codex_entries.is_empty() {
        issues.push(GraphIssue::NoCodexEntries);
    }

    let mut ids = HashSet::with_capacity(data.scenes.len());
    for scene in &data.scenes {
        if !ids.insert(scene.id.as_str()) {
            issues.push(GraphIssue::DuplicateScene(scene.id.clone()));
        }
    }
    if !data.scenes.is_empty() && !ids.contains(START_SCENE_ID) {
        issues.push(GraphIssue::MissingStartScene);
    }

    for scene in &data.scenes {
        match scene.kind {
            SceneKind::Choice if scene.choices.is_empty() => {
                issues.push(GraphIssue::ChoiceWithoutOptions(scene.id.clone()));
            }
            SceneKind::Video if scene.video.is_none() => {
                issues.push(GraphIssue::VideoWithoutSource(scene.id.clone()));
            }
            _ => {}
        }

        for (index, choice) in scene.choices.iter().enumerate() {
            if choice.route.is_none() && choice.next.is_none() {
                issues.push(GraphIssue::ChoiceWithoutTarget {
                    scene: scene.id.clone(),
                    index,
                });
            }
            if let Some(route) = choice.route.as_deref() {
                let entry = route_entry_scene(route);
                if !ids.contains(entry.as_str()) {
                    issues.push(GraphIssue::DanglingReference {
                        from: scene.id.clone(),
                        to: entry,
                    });
                }
            }
        }

        for target in scene.successors() {
            if !ids.contains(target) {
                issues.push(GraphIssue::DanglingReference {
                    from: scene.id.clone(),
                    to: target.to_owned(),
                });
            }
        }
    }

    issues
}

/// Joins issues into a single strategy failure reason.
#[must_use]
pub fn describe(issues: &[GraphIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accepts `data`, or reports every issue as one validation error.
///
/// # Errors
///
/// Returns [`NarrativeError::Validation`] listing every issue found.
pub fn check(data: &GraphData) -> Result<(), NarrativeError> {
    let issues = validate(data);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(NarrativeError::Validation(describe(&issues)))
    }
}
