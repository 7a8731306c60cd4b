//! Runner configuration loaded from JSON.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use ledge_ecs::DEFAULT_MAX_DT;
use ledge_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};

use crate::tick::TickConfig;

/// Everything the runner can be configured with. Missing fields take their
/// defaults, so `{}` is a valid file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub physics: PhysicsConfig,
    pub tick: TickConfig,
    /// Longest step the scheduler will hand to systems, in seconds.
    pub max_dt: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            tick: TickConfig::default(),
            max_dt: DEFAULT_MAX_DT,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tick.tick_rate.is_finite() && self.tick.tick_rate > 0.0,
            "tick_rate must be positive, got {}",
            self.tick.tick_rate
        );
        ensure!(
            self.max_dt.is_finite() && self.max_dt > 0.0,
            "max_dt must be positive, got {}",
            self.max_dt
        );
        Ok(())
    }
}
