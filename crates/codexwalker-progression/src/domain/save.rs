//! Save slots and persisted save records.

use codexwalker_core::error::NarrativeError;
use serde::{Deserialize, Serialize};

use super::progression::ProgressionData;
use super::state::GameState;

/// A validated save slot number, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaveSlot(u8);

impl SaveSlot {
    /// Lowest slot number.
    pub const FIRST: u8 = 1;
    /// Highest slot number.
    pub const LAST: u8 = 5;

    /// Validates a slot number.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidSaveSlot`] when `slot` is outside
    /// `1..=5`.
    pub fn new(slot: u8) -> Result<Self, NarrativeError> {
        if (Self::FIRST..=Self::LAST).contains(&slot) {
            Ok(Self(slot))
        } else {
            Err(NarrativeError::InvalidSaveSlot(slot))
        }
    }

    /// The slot number.
    #[must_use]
    pub fn number(self) -> u8 {
        self.0
    }

    /// Storage key for this slot.
    #[must_use]
    pub fn key(self) -> String {
        format!("game_save_{}", self.0)
    }
}

/// What a save slot holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Game state at save time.
    pub state: GameState,
    /// Progression snapshot.
    #[serde(alias = "gameData")]
    pub progression: ProgressionData,
    /// ISO-8601 save time.
    pub timestamp: String,
}

/// Summary of a slot, for slot pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveInfo {
    /// Whether the slot holds a readable record.
    pub exists: bool,
    /// When the record was written.
    pub timestamp: Option<String>,
    /// Saved game state.
    pub state: Option<GameState>,
    /// Route number being played at save time.
    pub route: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_accepts_one_through_five() {
        for n in 1..=5 {
            assert_eq!(SaveSlot::new(n).unwrap().number(), n);
        }
    }

    #[test]
    fn test_slot_rejects_out_of_range() {
        assert!(matches!(
            SaveSlot::new(0),
            Err(NarrativeError::InvalidSaveSlot(0))
        ));
        assert!(matches!(
            SaveSlot::new(6),
            Err(NarrativeError::InvalidSaveSlot(6))
        ));
    }

    #[test]
    fn test_slot_key_format() {
        assert_eq!(SaveSlot::new(3).unwrap().key(), "game_save_3");
    }

    #[test]
    fn test_record_accepts_legacy_game_data_field() {
        // Arrange
        let json = r#"{
            "state": "ROUTE_2",
            "gameData": { "heroineRelationship": 7, "currentRoute": 2 },
            "timestamp": "2026-01-15T10:00:00.000Z"
        }"#;

        // Act
        let record: SaveRecord = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(record.state, GameState::Route2);
        assert_eq!(record.progression.relationship(), 7);
        assert_eq!(record.progression.current_route(), Some(2));
    }

    #[test]
    fn test_record_accepts_route_number_written_as_text() {
        // Arrange
        let json = r#"{
            "state": "ROUTE_2",
            "gameData": {
                "playerName": "",
                "heroineRelationship": 15,
                "completedRoutes": ["route1"],
                "currentRoute": "2",
                "routeProgress": {},
                "choices": [
                    { "sceneId": "start", "choiceIndex": 1, "choiceText": "社团活动" }
                ],
                "flags": {},
                "unlockedCodex": ["codex_walker"]
            },
            "timestamp": "2026-01-15T10:00:00.000Z"
        }"#;

        // Act
        let record: SaveRecord = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(record.progression.current_route(), Some(2));
        assert_eq!(record.progression.completed_routes(), ["route1"]);
        assert_eq!(record.progression.choices().len(), 1);
    }

    #[test]
    fn test_record_rejects_non_numeric_route_text() {
        let json = r#"{
            "state": "ROUTE_2",
            "gameData": { "currentRoute": "two" },
            "timestamp": "2026-01-15T10:00:00.000Z"
        }"#;

        let err = serde_json::from_str::<SaveRecord>(json).unwrap_err();

        assert!(err.to_string().contains("invalid route number `two`"));
    }

    #[test]
    fn test_record_with_null_route_has_no_current_route() {
        let json = r#"{
            "state": "BRANCH_SELECTION",
            "gameData": { "currentRoute": null },
            "timestamp": "2026-01-15T10:00:00.000Z"
        }"#;

        let record: SaveRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.progression.current_route(), None);
    }

    #[test]
    fn test_record_collapses_repeated_completed_routes() {
        // Arrange
        let json = r#"{
            "state": "ENDING",
            "gameData": { "completedRoutes": ["route2", "route1", "route2", "route1"] },
            "timestamp": "2026-01-15T10:00:00.000Z"
        }"#;

        // Act
        let record: SaveRecord = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(record.progression.completed_routes(), ["route2", "route1"]);
    }
}
