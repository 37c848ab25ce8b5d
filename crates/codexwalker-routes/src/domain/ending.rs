//! Ending scoring.

use std::fmt;

/// Which ending the player has earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndingCondition {
    /// Every route completed with a relationship of 50 or more.
    Perfect,
    /// Three or more routes with 35 or more.
    Good,
    /// Two or more routes with 20 or more.
    Normal,
    /// Anything less.
    Bad,
}

impl EndingCondition {
    /// Scores `(completed_count, relationship)`. Thresholds are inclusive.
    #[must_use]
    pub fn for_totals(completed_count: usize, relationship: i32) -> Self {
        if completed_count == 4 && relationship >= 50 {
            Self::Perfect
        } else if completed_count >= 3 && relationship >= 35 {
            Self::Good
        } else if completed_count >= 2 && relationship >= 20 {
            Self::Normal
        } else {
            Self::Bad
        }
    }

    /// Stable identifier, e.g. `perfect_ending`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect_ending",
            Self::Good => "good_ending",
            Self::Normal => "normal_ending",
            Self::Bad => "bad_ending",
        }
    }
}

impl fmt::Display for EndingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_routes_with_fifty_is_perfect() {
        assert_eq!(EndingCondition::for_totals(4, 50), EndingCondition::Perfect);
    }

    #[test]
    fn test_four_routes_just_below_fifty_is_good() {
        assert_eq!(EndingCondition::for_totals(4, 49), EndingCondition::Good);
    }

    #[test]
    fn test_three_routes_with_thirty_five_is_good() {
        assert_eq!(EndingCondition::for_totals(3, 35), EndingCondition::Good);
    }

    #[test]
    fn test_two_routes_with_twenty_is_normal() {
        assert_eq!(EndingCondition::for_totals(2, 20), EndingCondition::Normal);
        assert_eq!(EndingCondition::for_totals(3, 34), EndingCondition::Normal);
    }

    #[test]
    fn test_one_route_is_bad() {
        assert_eq!(EndingCondition::for_totals(1, 10), EndingCondition::Bad);
        assert_eq!(EndingCondition::for_totals(0, 100), EndingCondition::Bad);
        assert_eq!(EndingCondition::for_totals(2, 19), EndingCondition::Bad);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(EndingCondition::Perfect.to_string(), "perfect_ending");
        assert_eq!(EndingCondition::Bad.as_str(), "bad_ending");
    }
}
