//! Rating model configuration

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the Elo-style model with a decaying learning rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating given to new and reset individuals
    pub initial_rating: f64,
    /// Learning rate given to new and reset individuals
    pub initial_learning_rate: f64,
    /// Value the learning rate decays toward after each match
    pub learning_rate_floor: f64,
    /// Weight kept from the previous learning rate on each decay step
    pub decay_factor: f64,
    /// Individuals above this learning rate are still calibrating
    pub calibration_threshold: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            initial_learning_rate: 150.0,
            learning_rate_floor: 32.0,
            decay_factor: 0.8,
            calibration_threshold: 100.0,
        }
    }
}

impl RatingConfig {
    /// Learning rate after one more match
    ///
    /// First-order low-pass toward the floor: `floor * 0.2 + rate * 0.8` with
    /// the default decay factor.
    pub fn decay(&self, learning_rate: f64) -> f64 {
        self.learning_rate_floor * (1.0 - self.decay_factor) + learning_rate * self.decay_factor
    }

    /// Whether an individual with this learning rate is still calibrating
    pub fn is_calibrating(&self, learning_rate: f64) -> bool {
        learning_rate > self.calibration_threshold
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(EngineError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        if self.initial_learning_rate <= 0.0 || !self.initial_learning_rate.is_finite() {
            return Err(EngineError::ConfigurationError {
                message: "Initial learning rate must be positive".to_string(),
            }
            .into());
        }

        if self.learning_rate_floor <= 0.0 || !self.learning_rate_floor.is_finite() {
            return Err(EngineError::ConfigurationError {
                message: "Learning rate floor must be positive".to_string(),
            }
            .into());
        }

        if !(0.0..1.0).contains(&self.decay_factor) || self.decay_factor == 0.0 {
            return Err(EngineError::ConfigurationError {
                message: "Decay factor must be strictly between 0 and 1".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
