//! The route registry: availability, start, completion, and scoring.

use codexwalker_core::clock::Clock;
use codexwalker_progression::{ProgressionData, RouteProgress};
use tracing::{info, warn};

use crate::domain::definition::{RouteDefinition, RouteReward, default_definitions};
use crate::domain::ending::EndingCondition;
use crate::domain::requirement::all_met;

/// Holds the route definitions for a session.
///
/// Per-route progress records live in [`ProgressionData`] so they are saved
/// with the rest of the game; the registry tracks only completion.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    definitions: Vec<RouteDefinition>,
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRegistry {
    /// A registry over the four standard routes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_definitions(default_definitions())
    }

    /// A registry over custom definitions.
    #[must_use]
    pub fn with_definitions(definitions: Vec<RouteDefinition>) -> Self {
        Self { definitions }
    }

    /// The definition for `route_id`.
    #[must_use]
    pub fn definition(&self, route_id: &str) -> Option<&RouteDefinition> {
        self.definitions.iter().find(|d| d.id == route_id)
    }

    /// Every definition, in declaration order.
    #[must_use]
    pub fn definitions(&self) -> &[RouteDefinition] {
        &self.definitions
    }

    /// Definitions whose requirements all hold for `data`.
    #[must_use]
    pub fn available_routes(&self, data: &ProgressionData) -> Vec<&RouteDefinition> {
        self.definitions
            .iter()
            .filter(|d| all_met(&d.requirements, data))
            .collect()
    }

    /// Starts (or restarts) `route_id`, overwriting any earlier progress.
    /// Returns `false`, without touching `data`, if the id is unknown.
    pub fn start_route(&self, route_id: &str, data: &mut ProgressionData, clock: &dyn Clock) -> bool {
        if self.definition(route_id).is_none() {
            warn!(route_id, "cannot start unknown route");
            return false;
        }
        data.set_route_progress(route_id, RouteProgress::started_at(clock.iso_timestamp()));
        info!(route_id, "route started");
        true
    }

    /// Completes `route_id` and applies its reward to `data`.
    ///
    /// Returns `None` if the route is unknown, was never started, or has
    /// already been completed.
    pub fn complete_route(
        &mut self,
        route_id: &str,
        data: &mut ProgressionData,
        clock: &dyn Clock,
    ) -> Option<RouteReward> {
        if data.has_completed_route(route_id) {
            warn!(route_id, "route already completed");
            return None;
        }
        let Some(definition) = self.definitions.iter_mut().find(|d| d.id == route_id) else {
            warn!(route_id, "cannot complete unknown route");
            return None;
        };
        let Some(progress) = data.route_progress_mut(route_id) else {
            warn!(route_id, "cannot complete a route that was never started");
            return None;
        };

        progress.completed = true;
        progress.end_time = Some(clock.iso_timestamp());
        definition.completed = true;
        let reward = definition.reward.clone();
        data.add_relationship(reward.relationship);
        data.mark_route_completed(route_id);
        info!(
            route_id,
            relationship_delta = reward.relationship,
            relationship = data.relationship(),
            "route completed"
        );
        Some(reward)
    }

    /// Progress for `route_id`, if it has been started.
    #[must_use]
    pub fn route_progress<'a>(
        &self,
        route_id: &str,
        data: &'a ProgressionData,
    ) -> Option<&'a RouteProgress> {
        data.route_progress(route_id)
    }

    /// Whether every route has been completed.
    #[must_use]
    pub fn all_routes_completed(&self) -> bool {
        self.definitions.iter().all(RouteDefinition::is_completed)
    }

    /// Re-derives completion flags from a restored progression record.
    pub fn sync_with(&mut self, data: &ProgressionData) {
        for definition in &mut self.definitions {
            definition.completed = data.has_completed_route(&definition.id);
        }
    }

    /// Scores the ending the player has earned so far.
    #[must_use]
    pub fn best_ending_condition(&self, data: &ProgressionData) -> EndingCondition {
        EndingCondition::for_totals(data.completed_routes().len(), data.relationship())
    }
}
