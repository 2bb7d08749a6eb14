//! Authoritative roster of individuals and their ratings
//!
//! `RatingStore` owns the roster and writes it back to its key/value
//! collaborator after every mutation. Each mutation builds the next roster on
//! the side, persists it as one document and only then swaps it in, so a
//! failed write leaves both the stored and the in-memory roster untouched.

use crate::config::RatingConfig;
use crate::error::{EngineError, Result};
use crate::rating::calculator::{
    team_mean, DecayingEloCalculator, RatingCalculationResult, RatingCalculator,
};
use crate::rating::source::{team_rating_sum, RatingSource};
use crate::rating::storage::KeyValueStore;
use crate::rating::transfer::{export_roster, parse_roster, Roster};
use crate::types::{Individual, Team, TEAM_SIZE};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info, warn};

/// Default key the roster document is stored under
pub const DEFAULT_ROSTER_KEY: &str = "playerbase";

/// Rating store backed by a key/value collaborator
#[derive(Debug)]
pub struct RatingStore<S: KeyValueStore> {
    storage: S,
    key: String,
    calculator: DecayingEloCalculator,
    roster: Roster,
}

impl<S: KeyValueStore> RatingStore<S> {
    /// Load the roster stored under `key`
    ///
    /// A missing document yields an empty roster. A document that cannot be
    /// read back as a roster is replaced with an empty one.
    pub fn load(storage: S, key: impl Into<String>, config: RatingConfig) -> Result<Self> {
        let key = key.into();
        let calculator = DecayingEloCalculator::new(config)?;

        let mut store = Self {
            storage,
            key,
            calculator,
            roster: Roster::new(),
        };

        match store.storage.get(&store.key)? {
            None => debug!("No roster stored under {}, starting empty", store.key),
            Some(text) => match parse_roster(&text) {
                Ok(roster) => {
                    debug!("Loaded {} individuals from {}", roster.len(), store.key);
                    store.roster = roster;
                }
                Err(e) => {
                    warn!(
                        "Stored roster under {} is corrupt ({}), reinitializing",
                        store.key, e
                    );
                    store.commit(Roster::new())?;
                }
            },
        }

        Ok(store)
    }

    /// Load with the default key and rating parameters
    pub fn with_defaults(storage: S) -> Result<Self> {
        Self::load(storage, DEFAULT_ROSTER_KEY, RatingConfig::default())
    }

    pub fn config(&self) -> &RatingConfig {
        self.calculator.config()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, name: &str) -> Option<&Individual> {
        self.roster.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roster.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> + '_ {
        self.roster.values()
    }

    /// Persist `next` and make it the current roster
    fn commit(&mut self, next: Roster) -> Result<()> {
        let document = export_roster(&next).map_err(|e| EngineError::Storage {
            message: format!("Failed to serialize roster: {}", e),
        })?;
        self.storage.set(&self.key, &document)?;
        self.roster = next;
        Ok(())
    }

    /// Add a new individual with the initial rating and learning rate
    ///
    /// Returns `false` without touching the roster when the name is taken.
    pub fn add_individual(&mut self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(EngineError::InvalidRecord {
                reason: "Name cannot be empty".to_string(),
            }
            .into());
        }

        if self.contains(name) {
            info!("Individual with name \"{}\" already exists", name);
            return Ok(false);
        }

        let mut next = self.roster.clone();
        next.insert(name.to_string(), self.calculator.initial_individual(name));
        self.commit(next)?;

        debug!("Added individual {}", name);
        Ok(true)
    }

    /// Remove an individual; absent names are ignored
    pub fn remove_individual(&mut self, name: &str) -> Result<bool> {
        if !self.contains(name) {
            return Ok(false);
        }

        let mut next = self.roster.clone();
        next.remove(name);
        self.commit(next)?;

        debug!("Removed individual {}", name);
        Ok(true)
    }

    /// Replace an individual's whole record, renaming it if the record
    /// carries a different name
    pub fn update_individual(&mut self, name: &str, record: Individual) -> Result<()> {
        if record.name.is_empty() {
            return Err(EngineError::InvalidRecord {
                reason: "Name cannot be empty".to_string(),
            }
            .into());
        }
        if !record.rating.is_finite() || !record.learning_rate.is_finite() {
            return Err(EngineError::InvalidRecord {
                reason: format!("Rating parameters of {} must be finite", record.name),
            }
            .into());
        }
        if !self.contains(name) {
            return Err(EngineError::IndividualNotFound {
                name: name.to_string(),
            }
            .into());
        }
        if record.name != name && self.contains(&record.name) {
            return Err(EngineError::NameConflict { name: record.name }.into());
        }

        let mut next = self.roster.clone();
        next.remove(name);
        if record.name != name {
            info!("Renaming individual {} to {}", name, record.name);
        }
        next.insert(record.name.clone(), record);
        self.commit(next)
    }

    /// Put an individual back to the initial rating and learning rate
    pub fn reset_individual(&mut self, name: &str) -> Result<bool> {
        let Some(current) = self.roster.get(name) else {
            return Ok(false);
        };

        let mut next = self.roster.clone();
        let reset = Individual {
            name: current.name.clone(),
            ..self.calculator.initial_individual(name)
        };
        next.insert(name.to_string(), reset);
        self.commit(next)?;

        debug!("Reset individual {}", name);
        Ok(true)
    }

    /// Put every rating back to the initial value, keeping learning rates
    pub fn reset_all_ratings(&mut self) -> Result<()> {
        let initial_rating = self.config().initial_rating;
        let next = self
            .roster
            .iter()
            .map(|(name, individual)| {
                let reset = Individual {
                    rating: initial_rating,
                    ..individual.clone()
                };
                (name.clone(), reset)
            })
            .collect();
        self.commit(next)?;

        info!("Reset ratings of {} individuals", self.len());
        Ok(())
    }

    /// Probability that `team_a` beats `team_b`
    ///
    /// Each team's strength is its rating sum divided by the full team size,
    /// so empty slots pull a partial team's mean down.
    pub fn win_probability(&self, team_a: &Team, team_b: &Team) -> Result<f64> {
        let mean_a = team_rating_sum(self, team_a)? / TEAM_SIZE as f64;
        let mean_b = team_rating_sum(self, team_b)? / TEAM_SIZE as f64;
        Ok(self.calculator.win_probability(mean_a, mean_b))
    }

    /// Apply a decided match to the ratings of all ten participants
    ///
    /// Nothing is changed unless both teams are full, no one appears twice and
    /// every participant is known. All ten updates are written in one commit.
    pub fn report_result(&mut self, winners: &Team, losers: &Team) -> Result<RatingCalculationResult> {
        if !winners.is_full() || !losers.is_full() {
            return Err(EngineError::IncompleteTeams.into());
        }

        let mut participants: Vec<&str> = Vec::with_capacity(TEAM_SIZE * 2);
        for name in winners.filled().chain(losers.filled()) {
            if participants.contains(&name) {
                return Err(EngineError::DuplicateIndividual {
                    name: name.to_string(),
                }
                .into());
            }
            participants.push(name);
        }

        let winners = self.lookup_team(winners)?;
        let losers = self.lookup_team(losers)?;

        let result = self.calculator.calculate_rating_changes(&winners, &losers)?;

        let mut next = self.roster.clone();
        for change in &result.rating_changes {
            if let Some(individual) = next.get_mut(&change.name) {
                individual.rating = change.new_rating;
                individual.learning_rate = change.new_learning_rate;
            }
        }
        self.commit(next)?;

        info!(
            "Recorded result: winners {:.0} vs losers {:.0}, expected {:.3}",
            team_mean(winners.iter().map(|i| i.rating)),
            team_mean(losers.iter().map(|i| i.rating)),
            result.expected_score
        );
        Ok(result)
    }

    fn lookup_team(&self, team: &Team) -> Result<Vec<Individual>> {
        let mut individuals = Vec::with_capacity(TEAM_SIZE);
        for name in team.filled() {
            let individual =
                self.roster
                    .get(name)
                    .ok_or_else(|| EngineError::IndividualNotFound {
                        name: name.to_string(),
                    })?;
            individuals.push(individual.clone());
        }
        Ok(individuals)
    }

    /// Individuals ordered by rating, highest first
    pub fn ranked_list(&self) -> RankedList<'_> {
        let mut entries: Vec<&Individual> = self.roster.values().collect();
        entries.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        RankedList {
            entries,
            config: self.config(),
        }
    }

    /// Serialize the whole roster for download
    pub fn export_json(&self) -> Result<String> {
        export_roster(&self.roster).map_err(|e| {
            EngineError::Storage {
                message: format!("Failed to serialize roster: {}", e),
            }
            .into()
        })
    }

    /// Replace the whole roster with a validated import document
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let roster = parse_roster(text)?;
        let count = roster.len();
        self.commit(roster)?;

        info!("Imported {} individuals", count);
        Ok(count)
    }
}

impl<S: KeyValueStore> RatingSource for RatingStore<S> {
    fn rating_of(&self, name: &str) -> Option<f64> {
        self.roster.rating_of(name)
    }
}

/// Rating-ordered view of the roster
///
/// Lines are produced lazily and the view can be walked any number of times.
#[derive(Debug, Clone)]
pub struct RankedList<'a> {
    entries: Vec<&'a Individual>,
    config: &'a RatingConfig,
}

impl<'a> RankedList<'a> {
    /// Formatted lines, `#<rank>: <name> - <rating>` with ` (?)` while the
    /// individual is still calibrating
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(move |(index, individual)| self.format_line(index + 1, individual))
    }

    /// Individuals in rank order
    pub fn individuals(&self) -> impl Iterator<Item = &'a Individual> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn format_line(&self, rank: usize, individual: &Individual) -> String {
        let mut line = format!(
            "#{}: {} - {}",
            rank,
            individual.name,
            // Halves round up, so -12.5 shows as -12
            (individual.rating + 0.5).floor() as i64
        );
        if self.config.is_calibrating(individual.learning_rate) {
            line.push_str(" (?)");
        }
        line
    }
}

impl fmt::Display for RankedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}
