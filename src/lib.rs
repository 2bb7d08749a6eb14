//! Team Balancer - rating and balancing engine for five-versus-five matches
//!
//! This crate keeps an Elo-style skill estimate with a decaying learning rate
//! for every individual and splits ten individuals into two teams with as
//! little rating disparity as possible.

pub mod balance;
pub mod config;
pub mod error;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{EngineError, ImportError, Result};
pub use types::*;

// Re-export key components
pub use balance::{disparity, BalanceStrategy, Balancer, TeamBalancer};
pub use rating::{InMemoryKeyValueStore, KeyValueStore, RatingSource, RatingStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
