//! Static route definitions.

use super::requirement::Requirement;

/// What completing a route grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReward {
    /// Added to the relationship total.
    pub relationship: i32,
    /// Keepsake item names.
    pub items: Vec<String>,
}

/// A branch route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDefinition {
    /// Route id, e.g. `route1`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Unlock requirements, AND-combined.
    pub requirements: Vec<Requirement>,
    /// Completion reward.
    pub reward: RouteReward,
    pub(crate) completed: bool,
}

impl RouteDefinition {
    /// Creates an uncompleted definition.
    #[must_use]
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        requirements: Vec<Requirement>,
        reward: RouteReward,
    ) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            requirements,
            reward,
            completed: false,
        }
    }

    /// Whether the route has been completed this session.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

fn route(id: &str, name: &str, description: &str, relationship: i32, item: &str) -> RouteDefinition {
    RouteDefinition::new(
        id,
        name,
        description,
        Vec::new(),
        RouteReward {
            relationship,
            items: vec![item.to_owned()],
        },
    )
}

/// The four routes of the game, all unlocked from the start.
#[must_use]
pub fn default_definitions() -> Vec<RouteDefinition> {
    vec![
        route("route1", "学园祭准备", "帮助女主准备学园祭表演", 10, "学园祭纪念品"),
        route("route2", "社团活动", "加入女主的社团，一起参加活动", 15, "社团徽章"),
        route("route3", "课业辅导", "帮助女主提高学习成绩", 8, "学习笔记"),
        route("route4", "秘密探索", "和女主一起探索学校的秘密", 20, "神秘钥匙"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_definitions_rewards() {
        let definitions = default_definitions();

        let rewards: Vec<(&str, i32)> = definitions
            .iter()
            .map(|d| (d.id.as_str(), d.reward.relationship))
            .collect();
        assert_eq!(
            rewards,
            vec![("route1", 10), ("route2", 15), ("route3", 8), ("route4", 20)]
        );
        assert!(definitions.iter().all(|d| d.reward.items.len() == 1));
        assert!(definitions.iter().all(|d| !d.is_completed()));
    }
}
