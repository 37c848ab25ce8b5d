//! Last-resort dataset adopted when the embedded data is unusable and no
//! other strategy succeeds.

use codexwalker_core::scene::{Choice, CodexEntry, SceneKind, SceneNode};

use super::graph::{GraphData, START_SCENE_ID};

const FALLBACK_BACKGROUND: &str = "game/videos/bg/bg_school_day.mp4";

/// Builds the two-scene demo graph and its single placeholder codex entry.
#[must_use]
pub fn minimal_dataset() -> GraphData {
    let start = SceneNode {
        id: START_SCENE_ID.to_owned(),
        kind: SceneKind::Choice,
        background: FALLBACK_BACKGROUND.to_owned(),
        speaker: "系统".to_owned(),
        text: "欢迎来到万象行者的世界。数据加载遇到问题，当前使用简化版本。".to_owned(),
        next: None,
        choices: vec![Choice {
            text: "开始体验".to_owned(),
            next: Some("demo_scene".to_owned()),
            route: None,
        }],
        unlocks_codex: None,
        video: None,
        url: None,
    };
    let demo = SceneNode {
        id: "demo_scene".to_owned(),
        kind: SceneKind::Dialogue,
        background: FALLBACK_BACKGROUND.to_owned(),
        speaker: "陈星".to_owned(),
        text: "这是一个演示场景。完整版本包含更多精彩内容。".to_owned(),
        next: Some(START_SCENE_ID.to_owned()),
        choices: Vec::new(),
        unlocks_codex: None,
        video: None,
        url: None,
    };

    GraphData {
        scenes: vec![start, demo],
        codex_entries: vec![CodexEntry {
            id: "demo_entry".to_owned(),
            title: "演示词条".to_owned(),
            content: "这是一个演示法典词条。".to_owned(),
            category: "系统".to_owned(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::validate;

    #[test]
    fn test_minimal_dataset_passes_validation() {
        assert!(validate(&minimal_dataset()).is_empty());
    }

    #[test]
    fn test_minimal_dataset_is_deterministic() {
        assert_eq!(minimal_dataset(), minimal_dataset());
    }

    #[test]
    fn test_minimal_dataset_loops_back_to_start() {
        let data = minimal_dataset();

        assert_eq!(data.scenes.len(), 2);
        assert_eq!(data.scenes[1].next.as_deref(), Some(START_SCENE_ID));
        assert_eq!(data.codex_entries[0].id, "demo_entry");
    }
}
