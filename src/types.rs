//! Common types used throughout the engine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Individuals are identified by their unique name
pub type IndividualId = String;

/// Number of slots on each team
pub const TEAM_SIZE: usize = 5;

/// Number of individuals taking part in one match
pub const POOL_SIZE: usize = TEAM_SIZE * 2;

/// A tracked individual with its current skill estimate
///
/// The serialized form keeps the field names of the roster document:
/// `score` is the rating and `k` the learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub name: IndividualId,
    #[serde(rename = "k")]
    pub learning_rate: f64,
    #[serde(rename = "score")]
    pub rating: f64,
}

impl Individual {
    pub fn new(name: impl Into<IndividualId>, rating: f64, learning_rate: f64) -> Self {
        Self {
            name: name.into(),
            learning_rate,
            rating,
        }
    }
}

/// Five positional slots, each either empty or holding an individual's name
///
/// Slot index carries meaning (the position played) and is never reordered by
/// the slot-swap balancer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team([Option<IndividualId>; TEAM_SIZE]);

impl Team {
    pub fn new(slots: [Option<IndividualId>; TEAM_SIZE]) -> Self {
        Self(slots)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Option<IndividualId>; TEAM_SIZE] {
        &self.0
    }

    pub fn slot(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|slot| slot.as_deref())
    }

    /// Put a name in a slot; an empty name clears it
    pub fn set_slot(&mut self, index: usize, name: Option<IndividualId>) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = name.filter(|n| !n.is_empty());
        }
    }

    /// Names in filled slots, in slot order
    pub fn filled(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().filter_map(|slot| slot.as_deref())
    }

    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filled().any(|n| n == name)
    }
}

impl From<[Option<IndividualId>; TEAM_SIZE]> for Team {
    fn from(slots: [Option<IndividualId>; TEAM_SIZE]) -> Self {
        Self(slots)
    }
}

impl From<[&str; TEAM_SIZE]> for Team {
    fn from(names: [&str; TEAM_SIZE]) -> Self {
        Self(names.map(|n| Some(n.to_string()).filter(|n| !n.is_empty())))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", slot.as_deref().unwrap_or("-"))?;
        }
        Ok(())
    }
}

/// A pair of teams facing each other
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAssignment {
    pub first: Team,
    pub second: Team,
}

impl MatchAssignment {
    pub fn new(first: Team, second: Team) -> Self {
        Self { first, second }
    }

    /// Filled names of the first team followed by those of the second
    pub fn filled_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.first.filled().chain(self.second.filled())
    }

    /// First name that occurs in more than one slot, if any
    pub fn duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.filled_names().find(|name| !seen.insert(*name))
    }

    /// All ten slots filled with distinct individuals
    pub fn is_complete(&self) -> bool {
        self.first.is_full() && self.second.is_full() && self.duplicate().is_none()
    }

    /// Same partition with the team labels exchanged
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

impl fmt::Display for MatchAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "First:\n{}\n\nSecond:\n{}", self.first, self.second)
    }
}

/// Rating change applied to one participant of a reported match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub name: IndividualId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub old_learning_rate: f64,
    pub new_learning_rate: f64,
    pub won: bool,
}

impl RatingChange {
    pub fn rating_delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}
