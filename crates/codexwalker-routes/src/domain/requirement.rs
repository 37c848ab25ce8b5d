//! Route unlock requirements.

use codexwalker_progression::ProgressionData;
use serde::{Deserialize, Serialize};

/// One unlock condition. A route is available when all of its requirements
/// hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    /// Relationship total is at least `value`.
    Relationship {
        /// Inclusive threshold.
        value: i32,
    },
    /// Story flag `flag` equals `value`.
    Flag {
        /// Flag name.
        flag: String,
        /// Expected value.
        value: serde_json::Value,
    },
    /// Route `route` has been completed.
    CompletedRoute {
        /// Route id.
        route: String,
    },
}

impl Requirement {
    /// Evaluates this requirement against `data`.
    #[must_use]
    pub fn is_met(&self, data: &ProgressionData) -> bool {
        match self {
            Self::Relationship { value } => data.relationship() >= *value,
            Self::Flag { flag, value } => data.flag(flag) == Some(value),
            Self::CompletedRoute { route } => data.has_completed_route(route),
        }
    }
}

/// AND-combines `requirements`. An empty list always holds.
#[must_use]
pub fn all_met(requirements: &[Requirement], data: &ProgressionData) -> bool {
    requirements.iter().all(|r| r.is_met(data))
}
