//! Raw graph data and the indexed graph built from it.

use std::collections::HashMap;

use codexwalker_core::scene::{CodexEntry, SceneNode};
use serde::{Deserialize, Serialize};

/// Id of the scene every valid dataset must contain.
pub const START_SCENE_ID: &str = "start";

/// Returns the id of the scene that opens `route_id`.
#[must_use]
pub fn route_entry_scene(route_id: &str) -> String {
    format!("{route_id}_start")
}

/// Shape of the lore file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreFile {
    /// Every codex entry, in authoring order.
    pub codex_entries: Vec<CodexEntry>,
}

/// Scenes and codex entries as produced by a load strategy, before indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphData {
    /// All scenes, chapters concatenated in file order.
    pub scenes: Vec<SceneNode>,
    /// All codex entries.
    pub codex_entries: Vec<CodexEntry>,
}

impl GraphData {
    /// Concatenates `chapters` in order and takes the entries of `lore`.
    #[must_use]
    pub fn from_parts(chapters: Vec<Vec<SceneNode>>, lore: LoreFile) -> Self {
        Self {
            scenes: chapters.into_iter().flatten().collect(),
            codex_entries: lore.codex_entries,
        }
    }
}

/// Parses one chapter file.
///
/// # Errors
///
/// Returns a message naming `file` if the text is not a JSON array of scenes.
pub fn parse_chapter(file: &str, text: &str) -> Result<Vec<SceneNode>, String> {
    serde_json::from_str(text).map_err(|e| format!("{file}: {e}"))
}

/// Parses the lore file.
///
/// # Errors
///
/// Returns a message naming `file` if the text is not a lore object.
pub fn parse_lore(file: &str, text: &str) -> Result<LoreFile, String> {
    serde_json::from_str(text).map_err(|e| format!("{file}: {e}"))
}

/// Scenes and codex entries indexed by id.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    scenes: Vec<SceneNode>,
    scene_index: HashMap<String, usize>,
    codex_entries: Vec<CodexEntry>,
    codex_index: HashMap<String, usize>,
}

impl SceneGraph {
    /// Builds the id maps. Later duplicates shadow earlier ones, which
    /// validation rules out for accepted data.
    #[must_use]
    pub fn build(data: GraphData) -> Self {
        let scene_index = data
            .scenes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let codex_index = data
            .codex_entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Self {
            scenes: data.scenes,
            scene_index,
            codex_entries: data.codex_entries,
            codex_index,
        }
    }

    /// Looks up a scene.
    #[must_use]
    pub fn scene(&self, id: &str) -> Option<&SceneNode> {
        self.scene_index.get(id).map(|&i| &self.scenes[i])
    }

    /// Looks up a codex entry.
    #[must_use]
    pub fn codex_entry(&self, id: &str) -> Option<&CodexEntry> {
        self.codex_index.get(id).map(|&i| &self.codex_entries[i])
    }

    /// All scenes in load order.
    #[must_use]
    pub fn scenes(&self) -> &[SceneNode] {
        &self.scenes
    }

    /// All codex entries in load order.
    #[must_use]
    pub fn codex_entries(&self) -> &[CodexEntry] {
        &self.codex_entries
    }
}
