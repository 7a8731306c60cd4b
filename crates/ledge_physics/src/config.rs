//! Physics configuration.
//!
//! Constructed once by whoever builds the level and handed to the systems
//! that need it. Missing fields in a JSON document fall back to defaults.

use serde::{Deserialize, Serialize};

/// Downward acceleration in world units per second squared.
pub const DEFAULT_GRAVITY: f32 = 850.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity magnitude; velocity is reduced by `gravity * dt` each tick.
    pub gravity: f32,
    /// Terminal falling speed. `None` leaves falling speed unbounded.
    pub max_fall_speed: Option<f32>,
}

impl PhysicsConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `json` is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_max_fall_speed(mut self, speed: f32) -> Self {
        self.max_fall_speed = Some(speed);
        self
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: None,
        }
    }
}
