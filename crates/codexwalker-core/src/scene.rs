//! Scene graph data model.
//!
//! Chapter files are JSON arrays of [`SceneNode`] records. Attribute names
//! follow the authoring format (`type`, `unlocksCodex`, ...), so the same
//! records deserialize from embedded data, device files, and fetched files.

use serde::{Deserialize, Serialize};

/// The closed set of node kinds a scene can be.
///
/// Unknown kinds fail deserialization, which rejects the dataset that
/// carried them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Narrator text over a background.
    Narration,
    /// A character line over a background.
    Dialogue,
    /// A line followed by a list of choices.
    Choice,
    /// A fullscreen video.
    Video,
    /// A terminal line that never advances.
    Ending,
    /// A hand-off to another page or app.
    Redirect,
}

impl SceneKind {
    /// Returns the authoring name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narration => "narration",
            Self::Dialogue => "dialogue",
            Self::Choice => "choice",
            Self::Video => "video",
            Self::Ending => "ending",
            Self::Redirect => "redirect",
        }
    }
}

/// One option offered by a choice node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the player.
    pub text: String,
    /// Scene to play when picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Route to start when picked. Takes precedence over `next`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// One unit of narrative content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    /// Unique scene identifier.
    pub id: String,
    /// What kind of node this is.
    #[serde(rename = "type")]
    pub kind: SceneKind,
    /// Background asset reference.
    #[serde(default)]
    pub background: String,
    /// Who is speaking.
    #[serde(default)]
    pub speaker: String,
    /// The line itself.
    #[serde(default)]
    pub text: String,
    /// Scene that follows this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Choices offered by a choice node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Codex entry unlocked when the scene plays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_codex: Option<String>,
    /// Fullscreen video reference for video nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Destination for redirect nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SceneNode {
    /// Every scene id this node can lead to: `next` first, then each
    /// choice's `next` in order.
    pub fn successors(&self) -> impl Iterator<Item = &str> {
        self.next
            .as_deref()
            .into_iter()
            .chain(self.choices.iter().filter_map(|c| c.next.as_deref()))
    }
}

/// A lore record the player can unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodexEntry {
    /// Unique entry identifier.
    pub id: String,
    /// Entry title, shown in the unlock toast.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Grouping label.
    pub category: String,
}
