//! Exhaustive optimal partition of ten individuals into two teams
//!
//! The pool is shuffled, then every five-member subset containing the first
//! pool member is scored against its complement. Fixing that member visits
//! each partition exactly once: C(9, 4) = 210 candidates. The first strict
//! minimum wins, so after the shuffle ties resolve randomly, and a final coin
//! flip picks which side is labeled first.

use crate::balance::TeamBalancer;
use crate::error::Result;
use crate::rating::source::RatingSource;
use crate::types::{MatchAssignment, Team, POOL_SIZE, TEAM_SIZE};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

/// Globally optimal balancer over a full pool of ten
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustiveBalancer;

impl ExhaustiveBalancer {
    /// Distinct filled names across both teams, first team first
    fn pool(assignment: &MatchAssignment) -> Vec<&str> {
        let mut pool = Vec::with_capacity(POOL_SIZE);
        for name in assignment.filled_names() {
            if !pool.contains(&name) {
                pool.push(name);
            }
        }
        pool
    }

    fn team_from(names: &[&str]) -> Team {
        Team::new(std::array::from_fn(|slot| {
            names.get(slot).map(|name| name.to_string())
        }))
    }
}

impl TeamBalancer for ExhaustiveBalancer {
    fn balance(
        &self,
        ratings: &dyn RatingSource,
        assignment: &MatchAssignment,
        rng: &mut dyn RngCore,
    ) -> Result<MatchAssignment> {
        let mut pool = Self::pool(assignment);
        if pool.len() < POOL_SIZE {
            warn!(
                "Not enough individuals to balance teams: {} of {}",
                pool.len(),
                POOL_SIZE
            );
            return Ok(assignment.clone());
        }

        pool.shuffle(&mut *rng);

        let pool_ratings = pool
            .iter()
            .map(|name| ratings.require_rating(name))
            .collect::<Result<Vec<f64>>>()?;

        let mut best: Option<(f64, [bool; POOL_SIZE])> = None;
        for rest in (1..POOL_SIZE).combinations(TEAM_SIZE - 1) {
            let mut in_first = [false; POOL_SIZE];
            in_first[0] = true;
            for &index in &rest {
                in_first[index] = true;
            }

            let (first_sum, second_sum) =
                (0..POOL_SIZE).fold((0.0, 0.0), |(first, second), index| {
                    if in_first[index] {
                        (first + pool_ratings[index], second)
                    } else {
                        (first, second + pool_ratings[index])
                    }
                });
            let disparity = (first_sum - second_sum).abs();

            if best.map_or(true, |(best_disparity, _)| disparity < best_disparity) {
                best = Some((disparity, in_first));
            }
        }

        let Some((disparity, in_first)) = best else {
            return Ok(assignment.clone());
        };

        let (chosen, others): (Vec<(usize, &str)>, Vec<(usize, &str)>) = pool
            .iter()
            .copied()
            .enumerate()
            .partition(|(index, _)| in_first[*index]);
        let chosen: Vec<&str> = chosen.into_iter().map(|(_, name)| name).collect();
        let others: Vec<&str> = others.into_iter().map(|(_, name)| name).collect();

        let balanced = MatchAssignment::new(Self::team_from(&chosen), Self::team_from(&others));
        let balanced = if rng.random_bool(0.5) {
            balanced
        } else {
            balanced.swapped()
        };

        debug!("Hard balance reached disparity {:.1}", disparity);
        Ok(balanced)
    }

    fn name(&self) -> &'static str {
        "hard"
    }
}
