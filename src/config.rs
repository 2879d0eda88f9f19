//! World Configuration
//!
//! Parameters for one terrain generation pass. A config is immutable while
//! the pass runs; changing any field means a full clear-and-rebuild
//! regeneration, never an incremental update.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal footprint of the generated world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldShape {
    /// Tiles kept within `circle_radius / 2` of the origin.
    Circle,
    /// Full square of tiles, `circle_radius / 2` half-extent per axis.
    Rectangle,
}

/// Configuration errors surfaced before a generation pass starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric field was negative, NaN, or infinite.
    #[error("invalid configuration: {field} = {value} (must be finite and non-negative)")]
    InvalidConfiguration { field: &'static str, value: f32 },
}

/// Input for one terrain generation pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World extent driving the grid walk, cloud bounds, and cloud count.
    pub circle_radius: f32,
    /// Tallest possible tile column; band thresholds are fractions of this.
    pub max_height: f32,
    /// Circular or rectangular tile footprint.
    pub shape: WorldShape,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            circle_radius: 20.0,
            max_height: 8.0,
            shape: WorldShape::Circle,
        }
    }
}

impl WorldConfig {
    /// Checks that the numeric fields are finite and non-negative.
    ///
    /// `max_height == 0.0` is valid and produces an all-lowland flat world;
    /// negative or non-finite values are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("circle_radius", self.circle_radius),
            ("max_height", self.max_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidConfiguration { field, value });
            }
        }
        Ok(())
    }
}
