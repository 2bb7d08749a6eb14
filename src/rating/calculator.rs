//! Rating calculator trait and the decaying Elo implementation
//!
//! Team strength is the mean rating over the five slots and the expected
//! score comes from the logistic paired-comparison curve with a 400-point
//! scale, as computed by `skillratings::elo`. Every participant moves by its
//! own learning rate, which then decays toward the configured floor.

use crate::config::RatingConfig;
use crate::error::{EngineError, Result};
use crate::types::{Individual, RatingChange, TEAM_SIZE};
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};

/// Result of rating one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCalculationResult {
    /// Rating changes for winners first, then losers, in slot order
    pub rating_changes: Vec<RatingChange>,
    /// Probability the winners were given before the match
    pub expected_score: f64,
}

/// Trait for calculating rating changes after a two-team match
pub trait RatingCalculator: Send + Sync {
    /// Probability that a team with mean rating `team_mean` beats one with
    /// mean rating `opponent_mean`
    fn win_probability(&self, team_mean: f64, opponent_mean: f64) -> f64;

    /// Calculate rating changes for a decided match
    ///
    /// Both slices must hold exactly one full team each.
    fn calculate_rating_changes(
        &self,
        winners: &[Individual],
        losers: &[Individual],
    ) -> Result<RatingCalculationResult>;

    /// Record for a newly created individual
    fn initial_individual(&self, name: &str) -> Individual;
}

/// Mean rating over a full team; the divisor is always the team size
pub fn team_mean(ratings: impl IntoIterator<Item = f64>) -> f64 {
    ratings.into_iter().sum::<f64>() / TEAM_SIZE as f64
}

/// Elo-style calculator with a per-individual decaying learning rate
#[derive(Debug, Clone, Default)]
pub struct DecayingEloCalculator {
    config: RatingConfig,
}

impl DecayingEloCalculator {
    /// Create a new calculator from validated configuration
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    fn apply(&self, individual: &Individual, signed_delta: f64, won: bool) -> RatingChange {
        RatingChange {
            name: individual.name.clone(),
            old_rating: individual.rating,
            new_rating: individual.rating + individual.learning_rate * signed_delta,
            old_learning_rate: individual.learning_rate,
            new_learning_rate: self.config.decay(individual.learning_rate),
            won,
        }
    }
}

impl RatingCalculator for DecayingEloCalculator {
    fn win_probability(&self, team_mean: f64, opponent_mean: f64) -> f64 {
        let (team_expected, _) = expected_score(
            &EloRating { rating: team_mean },
            &EloRating {
                rating: opponent_mean,
            },
        );
        team_expected
    }

    fn calculate_rating_changes(
        &self,
        winners: &[Individual],
        losers: &[Individual],
    ) -> Result<RatingCalculationResult> {
        if winners.len() != TEAM_SIZE || losers.len() != TEAM_SIZE {
            return Err(EngineError::IncompleteTeams.into());
        }

        let winners_mean = team_mean(winners.iter().map(|i| i.rating));
        let losers_mean = team_mean(losers.iter().map(|i| i.rating));

        let expected = self.win_probability(winners_mean, losers_mean);
        let delta = 1.0 - expected;

        let rating_changes = winners
            .iter()
            .map(|individual| self.apply(individual, delta, true))
            .chain(
                losers
                    .iter()
                    .map(|individual| self.apply(individual, -delta, false)),
            )
            .collect();

        Ok(RatingCalculationResult {
            rating_changes,
            expected_score: expected,
        })
    }

    fn initial_individual(&self, name: &str) -> Individual {
        Individual::new(
            name,
            self.config.initial_rating,
            self.config.initial_learning_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(prefix: &str, rating: f64, learning_rate: f64) -> Vec<Individual> {
        (0..TEAM_SIZE)
            .map(|i| Individual::new(format!("{prefix}{i}"), rating, learning_rate))
            .collect()
    }

    #[test]
    fn test_win_probability_matches_logistic_formula() {
        let calculator = DecayingEloCalculator::default();

        assert!((calculator.win_probability(1500.0, 1500.0) - 0.5).abs() < 1e-12);

        let expected = 1.0 / (1.0 + 10f64.powf((1400.0 - 1600.0) / 400.0));
        assert!((calculator.win_probability(1600.0, 1400.0) - expected).abs() < 1e-12);

        // 400 points apart is 10:1 odds
        assert!((calculator.win_probability(1900.0, 1500.0) - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_match_moves_half_a_learning_rate() {
        let calculator = DecayingEloCalculator::default();
        let winners = team("w", 1500.0, 150.0);
        let losers = team("l", 1500.0, 150.0);

        let result = calculator
            .calculate_rating_changes(&winners, &losers)
            .unwrap();

        assert!((result.expected_score - 0.5).abs() < 1e-12);
        assert_eq!(result.rating_changes.len(), 10);

        for change in &result.rating_changes {
            let expected_delta = if change.won { 75.0 } else { -75.0 };
            assert!((change.rating_delta() - expected_delta).abs() < 1e-9);
            assert!((change.new_learning_rate - (32.0 * 0.2 + 150.0 * 0.8)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_each_participant_uses_its_own_learning_rate() {
        let calculator = DecayingEloCalculator::default();
        let mut winners = team("w", 1500.0, 150.0);
        winners[0].learning_rate = 40.0;
        let mut losers = team("l", 1500.0, 150.0);
        losers[4].learning_rate = 60.0;

        let result = calculator
            .calculate_rating_changes(&winners, &losers)
            .unwrap();

        assert!((result.rating_changes[0].rating_delta() - 20.0).abs() < 1e-9);
        assert!((result.rating_changes[9].rating_delta() + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let calculator = DecayingEloCalculator::default();
        let strong = team("s", 1700.0, 50.0);
        let weak = team("w", 1300.0, 50.0);

        let expected_win = calculator.calculate_rating_changes(&strong, &weak).unwrap();
        let upset = calculator.calculate_rating_changes(&weak, &strong).unwrap();

        assert!(upset.rating_changes[0].rating_delta() > expected_win.rating_changes[0].rating_delta());
        assert!(expected_win.expected_score > 0.5);
        assert!(upset.expected_score < 0.5);
    }

    #[test]
    fn test_wrong_team_size_is_rejected() {
        let calculator = DecayingEloCalculator::default();
        let winners = team("w", 1500.0, 150.0);
        let losers = team("l", 1500.0, 150.0);

        let result = calculator.calculate_rating_changes(&winners[..4], &losers);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<EngineError>(),
            Some(EngineError::IncompleteTeams)
        ));
    }

    #[test]
    fn test_initial_individual_uses_config() {
        let calculator = DecayingEloCalculator::new(RatingConfig {
            initial_rating: 1200.0,
            initial_learning_rate: 120.0,
            ..RatingConfig::default()
        })
        .unwrap();

        let individual = calculator.initial_individual("newcomer");
        assert_eq!(individual.name, "newcomer");
        assert_eq!(individual.rating, 1200.0);
        assert_eq!(individual.learning_rate, 120.0);
    }

    #[test]
    fn test_team_mean_uses_fixed_divisor() {
        assert_eq!(team_mean([1500.0; TEAM_SIZE]), 1500.0);
        assert_eq!(team_mean([1500.0, 1500.0]), 600.0);
    }
}
