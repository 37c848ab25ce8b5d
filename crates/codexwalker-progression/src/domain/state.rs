//! Game states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the player is in the overall story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Title menu.
    #[default]
    #[serde(rename = "START_MENU")]
    StartMenu,
    /// Fresh state after a new game is started.
    #[serde(rename = "GAME_START")]
    GameStart,
    /// The male lead's introduction.
    #[serde(rename = "MALE_PERFORMANCE")]
    MalePerformance,
    /// First encounter with the heroine.
    #[serde(rename = "MEET_HEROINE")]
    MeetHeroine,
    /// Picking one of the four routes.
    #[serde(rename = "BRANCH_SELECTION")]
    BranchSelection,
    /// Playing route 1.
    #[serde(rename = "ROUTE_1")]
    Route1,
    /// Playing route 2.
    #[serde(rename = "ROUTE_2")]
    Route2,
    /// Playing route 3.
    #[serde(rename = "ROUTE_3")]
    Route3,
    /// Playing route 4.
    #[serde(rename = "ROUTE_4")]
    Route4,
    /// Watching an ending.
    #[serde(rename = "ENDING")]
    Ending,
}

impl GameState {
    /// The route state for route number `n`, if there is one.
    #[must_use]
    pub fn for_route(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Route1),
            2 => Some(Self::Route2),
            3 => Some(Self::Route3),
            4 => Some(Self::Route4),
            _ => None,
        }
    }

    /// The route state named by the trailing digit of `route_id`
    /// (`"route3"` → `ROUTE_3`).
    #[must_use]
    pub fn for_route_id(route_id: &str) -> Option<Self> {
        let digit = route_id.chars().last()?.to_digit(10)?;
        u8::try_from(digit).ok().and_then(Self::for_route)
    }

    /// The route number of a route state.
    #[must_use]
    pub fn route_number(self) -> Option<u8> {
        match self {
            Self::Route1 => Some(1),
            Self::Route2 => Some(2),
            Self::Route3 => Some(3),
            Self::Route4 => Some(4),
            _ => None,
        }
    }

    /// The persisted name of the state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartMenu => "START_MENU",
            Self::GameStart => "GAME_START",
            Self::MalePerformance => "MALE_PERFORMANCE",
            Self::MeetHeroine => "MEET_HEROINE",
            Self::BranchSelection => "BRANCH_SELECTION",
            Self::Route1 => "ROUTE_1",
            Self::Route2 => "ROUTE_2",
            Self::Route3 => "ROUTE_3",
            Self::Route4 => "ROUTE_4",
            Self::Ending => "ENDING",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_state_from_trailing_digit() {
        assert_eq!(GameState::for_route_id("route1"), Some(GameState::Route1));
        assert_eq!(GameState::for_route_id("route4"), Some(GameState::Route4));
        assert_eq!(GameState::for_route_id("route9"), None);
        assert_eq!(GameState::for_route_id("routeX"), None);
        assert_eq!(GameState::for_route_id(""), None);
    }

    #[test]
    fn test_serialized_names_match_display() {
        for state in [
            GameState::StartMenu,
            GameState::GameStart,
            GameState::BranchSelection,
            GameState::Route2,
            GameState::Ending,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{state}\""));
        }
    }

    #[test]
    fn test_route_number_round_trips_through_for_route() {
        for n in 1..=4 {
            let state = GameState::for_route(n).unwrap();
            assert_eq!(state.route_number(), Some(n));
        }
        assert_eq!(GameState::Ending.route_number(), None);
    }
}
