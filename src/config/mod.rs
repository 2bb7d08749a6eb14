//! Configuration management for the team balancer
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for the engine.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StorageSettings};
pub use rating::RatingConfig;
