//! Constrained balancing by swapping occupants of individual slots
//!
//! Slots are positional, so an individual may only trade places with the
//! opposing occupant of the same slot. Slot 0 is decided by a coin flip and
//! every swap/keep combination of the remaining slots is scored, the first
//! strict minimum winning. The result is a bounded nudge of the input rather
//! than a fresh partition.

use crate::balance::{disparity, TeamBalancer};
use crate::error::Result;
use crate::rating::source::RatingSource;
use crate::types::{MatchAssignment, Team, TEAM_SIZE};
use rand::{Rng, RngCore};
use tracing::debug;

/// Per-slot swap balancer
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotSwapBalancer;

impl SlotSwapBalancer {
    /// Assignment with the occupants of every flagged slot exchanged
    pub fn swap_slots(assignment: &MatchAssignment, swapped: [bool; TEAM_SIZE]) -> MatchAssignment {
        let first = assignment.first.slots();
        let second = assignment.second.slots();

        let pick = |from_second: bool, slot: usize| {
            if from_second {
                second[slot].clone()
            } else {
                first[slot].clone()
            }
        };

        MatchAssignment::new(
            Team::new(std::array::from_fn(|slot| pick(swapped[slot], slot))),
            Team::new(std::array::from_fn(|slot| pick(!swapped[slot], slot))),
        )
    }
}

impl TeamBalancer for SlotSwapBalancer {
    fn balance(
        &self,
        ratings: &dyn RatingSource,
        assignment: &MatchAssignment,
        rng: &mut dyn RngCore,
    ) -> Result<MatchAssignment> {
        let invert_top = rng.random_bool(0.5);

        let mut best: Option<(f64, MatchAssignment)> = None;
        // Slot 1 is the most significant bit so "keep" is tried before "swap"
        // for earlier slots
        for mask in 0u32..1 << (TEAM_SIZE - 1) {
            let swapped: [bool; TEAM_SIZE] = std::array::from_fn(|slot| {
                if slot == 0 {
                    invert_top
                } else {
                    mask & (1 << (TEAM_SIZE - 1 - slot)) != 0
                }
            });

            let candidate = Self::swap_slots(assignment, swapped);
            let candidate_disparity = disparity(ratings, &candidate.first, &candidate.second)?;

            let improves = best
                .as_ref()
                .map_or(true, |(best_disparity, _)| candidate_disparity < *best_disparity);
            if improves {
                best = Some((candidate_disparity, candidate));
            }
        }

        match best {
            Some((best_disparity, balanced)) => {
                debug!("Soft balance reached disparity {:.1}", best_disparity);
                Ok(balanced)
            }
            None => Ok(assignment.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "soft"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndividualId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn ratings() -> HashMap<IndividualId, f64> {
        [
            ("top_a", 1800.0),
            ("jungle_a", 1500.0),
            ("mid_a", 1700.0),
            ("bot_a", 1450.0),
            ("support_a", 1600.0),
            ("top_b", 1300.0),
            ("jungle_b", 1520.0),
            ("mid_b", 1400.0),
            ("bot_b", 1480.0),
            ("support_b", 1350.0),
        ]
        .into_iter()
        .map(|(name, rating)| (name.to_string(), rating))
        .collect()
    }

    fn assignment() -> MatchAssignment {
        MatchAssignment::new(
            Team::from(["top_a", "jungle_a", "mid_a", "bot_a", "support_a"]),
            Team::from(["top_b", "jungle_b", "mid_b", "bot_b", "support_b"]),
        )
    }

    fn minimum_over_all_swaps(ratings: &HashMap<IndividualId, f64>, input: &MatchAssignment) -> f64 {
        (0u32..1 << TEAM_SIZE)
            .map(|mask| {
                let swapped = std::array::from_fn(|slot| mask & (1 << slot) != 0);
                let candidate = SlotSwapBalancer::swap_slots(input, swapped);
                disparity(ratings, &candidate.first, &candidate.second).unwrap()
            })
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_swap_slots() {
        let swapped = SlotSwapBalancer::swap_slots(&assignment(), [true, false, false, false, true]);

        assert_eq!(swapped.first.slot(0), Some("top_b"));
        assert_eq!(swapped.first.slot(1), Some("jungle_a"));
        assert_eq!(swapped.first.slot(4), Some("support_b"));
        assert_eq!(swapped.second.slot(0), Some("top_a"));
        assert_eq!(swapped.second.slot(4), Some("support_a"));
    }

    #[test]
    fn test_occupants_stay_in_their_slot() {
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let input = assignment();
            let result = SlotSwapBalancer.balance(&ratings(), &input, &mut rng).unwrap();

            for slot in 0..TEAM_SIZE {
                let options = [input.first.slot(slot), input.second.slot(slot)];
                assert!(options.contains(&result.first.slot(slot)));
                assert!(options.contains(&result.second.slot(slot)));
                assert_ne!(result.first.slot(slot), result.second.slot(slot));
            }
        }
    }

    #[test]
    fn test_reaches_best_slot_swap() {
        let input = assignment();
        let minimum = minimum_over_all_swaps(&ratings(), &input);

        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = SlotSwapBalancer.balance(&ratings(), &input, &mut rng).unwrap();
            let reached = disparity(&ratings(), &result.first, &result.second).unwrap();
            assert!((reached - minimum).abs() < 1e-9);
        }
    }

    #[test]
    fn test_partial_teams_are_accepted() {
        let mut input = assignment();
        input.first.set_slot(2, None);
        input.second.set_slot(4, None);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = SlotSwapBalancer.balance(&ratings(), &input, &mut rng).unwrap();

        assert_eq!(result.filled_names().count(), 8);
        let minimum = minimum_over_all_swaps(&ratings(), &input);
        let reached = disparity(&ratings(), &result.first, &result.second).unwrap();
        assert!((reached - minimum).abs() < 1e-9);
    }

    #[test]
    fn test_balanced_input_is_kept_up_to_top_slot() {
        let ratings: HashMap<IndividualId, f64> = (0..10)
            .map(|i| (format!("p{i}"), 1500.0))
            .collect();
        let input = MatchAssignment::new(
            Team::from(["p0", "p1", "p2", "p3", "p4"]),
            Team::from(["p5", "p6", "p7", "p8", "p9"]),
        );

        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = SlotSwapBalancer.balance(&ratings, &input, &mut rng).unwrap();
            // Everything ties, so only the coin-flipped top slot may move
            for slot in 1..TEAM_SIZE {
                assert_eq!(result.first.slot(slot), input.first.slot(slot));
                assert_eq!(result.second.slot(slot), input.second.slot(slot));
            }
        }
    }

    #[test]
    fn test_top_slot_is_randomized() {
        let ratings: HashMap<IndividualId, f64> = (0..10)
            .map(|i| (format!("p{i}"), 1500.0))
            .collect();
        let input = MatchAssignment::new(
            Team::from(["p0", "p1", "p2", "p3", "p4"]),
            Team::from(["p5", "p6", "p7", "p8", "p9"]),
        );

        let mut top_swapped = 0;
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = SlotSwapBalancer.balance(&ratings, &input, &mut rng).unwrap();
            if result.first.slot(0) == Some("p5") {
                top_swapped += 1;
            }
        }
        assert!(top_swapped > 0 && top_swapped < 64);
    }
}
