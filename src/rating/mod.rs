//! Rating system: decaying Elo model, roster store and persistence
//!
//! This module provides rating calculations, the authoritative roster, the
//! key/value persistence interface and bulk import/export of the roster.

pub mod calculator;
pub mod source;
pub mod storage;
pub mod store;
pub mod transfer;

// Re-export commonly used types
pub use calculator::{DecayingEloCalculator, RatingCalculationResult, RatingCalculator};
pub use source::{team_rating_sum, RatingSource};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use store::{RankedList, RatingStore, DEFAULT_ROSTER_KEY};
pub use transfer::{export_roster, parse_roster, read_import_file, Roster};
