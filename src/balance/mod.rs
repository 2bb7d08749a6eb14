//! Team balancing strategies
//!
//! Both strategies minimize the disparity between the two teams' rating sums.
//! The exhaustive strategy re-partitions all ten individuals; the slot-swap
//! strategy only exchanges the two occupants of individual slots, keeping
//! everyone in the position they were placed in.
//!
//! Ties are broken randomly. The randomness is always supplied by the caller,
//! so a seeded generator gives reproducible results.

pub mod exhaustive;
pub mod slot_swap;

pub use exhaustive::ExhaustiveBalancer;
pub use slot_swap::SlotSwapBalancer;

use crate::error::Result;
use crate::rating::source::{team_rating_sum, RatingSource};
use crate::types::{MatchAssignment, Team};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Absolute difference between the two teams' rating sums
///
/// Empty slots contribute nothing to their team's sum.
pub fn disparity(ratings: &dyn RatingSource, team_a: &Team, team_b: &Team) -> Result<f64> {
    let sum_a = team_rating_sum(ratings, team_a)?;
    let sum_b = team_rating_sum(ratings, team_b)?;
    Ok((sum_a - sum_b).abs())
}

/// Trait for team balancing algorithms
pub trait TeamBalancer: Send + Sync {
    /// Produce a better balanced assignment from `assignment`
    fn balance(
        &self,
        ratings: &dyn RatingSource,
        assignment: &MatchAssignment,
        rng: &mut dyn RngCore,
    ) -> Result<MatchAssignment>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Available balancing strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceStrategy {
    /// Globally optimal re-partition of all ten individuals
    Hard,
    /// Per-slot swaps that keep positional choices
    Soft,
}

impl BalanceStrategy {
    pub fn balancer(self) -> Box<dyn TeamBalancer> {
        match self {
            BalanceStrategy::Hard => Box::new(ExhaustiveBalancer),
            BalanceStrategy::Soft => Box::new(SlotSwapBalancer),
        }
    }
}

impl fmt::Display for BalanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceStrategy::Hard => write!(f, "hard"),
            BalanceStrategy::Soft => write!(f, "soft"),
        }
    }
}

impl FromStr for BalanceStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hard" | "exhaustive" => Ok(BalanceStrategy::Hard),
            "soft" | "slot-swap" => Ok(BalanceStrategy::Soft),
            other => Err(format!("Unknown balance strategy: {other}")),
        }
    }
}

/// Balancer front-end owning the random source used for tie-breaking
#[derive(Debug, Clone)]
pub struct Balancer<R: RngCore = ChaCha8Rng> {
    rng: R,
}

impl Balancer<ChaCha8Rng> {
    /// Deterministic balancer for reproducible results
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Balancer seeded from the thread-local generator
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

impl<R: RngCore> Balancer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Run one strategy against the current ratings
    pub fn balance(
        &mut self,
        strategy: BalanceStrategy,
        ratings: &dyn RatingSource,
        assignment: &MatchAssignment,
    ) -> Result<MatchAssignment> {
        let balancer = strategy.balancer();
        debug!("Balancing with the {} strategy", balancer.name());
        balancer.balance(ratings, assignment, &mut self.rng)
    }

    /// Exhaustive optimal re-partition
    pub fn hard_balance(
        &mut self,
        ratings: &dyn RatingSource,
        assignment: &MatchAssignment,
    ) -> Result<MatchAssignment> {
        ExhaustiveBalancer.balance(ratings, assignment, &mut self.rng)
    }

    /// Constrained per-slot swap search
    pub fn soft_balance(
        &mut self,
        ratings: &dyn RatingSource,
        assignment: &MatchAssignment,
    ) -> Result<MatchAssignment> {
        SlotSwapBalancer.balance(ratings, assignment, &mut self.rng)
    }
}
