//! Read-only access to current ratings
//!
//! Balancers and the win-probability model only ever need "what is this
//! individual's rating right now", so they depend on this trait instead of the
//! full rating store.

use crate::error::{EngineError, Result};
use crate::types::{Individual, IndividualId, Team};
use std::collections::HashMap;

/// Trait for looking up an individual's current rating
pub trait RatingSource {
    /// Current rating of `name`, or `None` when the individual is unknown
    fn rating_of(&self, name: &str) -> Option<f64>;

    /// Rating of `name`, failing for unknown individuals
    fn require_rating(&self, name: &str) -> Result<f64> {
        self.rating_of(name).ok_or_else(|| {
            EngineError::IndividualNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}

impl RatingSource for HashMap<IndividualId, Individual> {
    fn rating_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|individual| individual.rating)
    }
}

impl RatingSource for HashMap<IndividualId, f64> {
    fn rating_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Sum of ratings over a team's filled slots; empty slots count as zero
pub fn team_rating_sum(ratings: &dyn RatingSource, team: &Team) -> Result<f64> {
    team.filled()
        .map(|name| ratings.require_rating(name))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> HashMap<IndividualId, f64> {
        [("a", 1500.0), ("b", 1600.0), ("c", 1400.0)]
            .into_iter()
            .map(|(name, rating)| (name.to_string(), rating))
            .collect()
    }

    #[test]
    fn test_team_rating_sum_skips_empty_slots() {
        let team = Team::from(["a", "", "b", "", "c"]);
        assert_eq!(team_rating_sum(&ratings(), &team).unwrap(), 4500.0);
        assert_eq!(team_rating_sum(&ratings(), &Team::empty()).unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_individual_is_an_error() {
        let team = Team::from(["a", "zed", "", "", ""]);
        let err = team_rating_sum(&ratings(), &team).unwrap_err();

        match err.downcast_ref::<EngineError>() {
            Some(EngineError::IndividualNotFound { name }) => assert_eq!(name, "zed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_individual_map_source() {
        let roster: HashMap<IndividualId, Individual> = [Individual::new("a", 1234.0, 150.0)]
            .into_iter()
            .map(|individual| (individual.name.clone(), individual))
            .collect();

        assert_eq!(roster.rating_of("a"), Some(1234.0));
        assert_eq!(roster.rating_of("b"), None);
    }
}
