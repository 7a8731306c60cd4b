//! Fixed-timestep tick loop.
//!
//! Each tick hands the scheduler a nominal `1 / tick_rate` step. In real-time
//! mode the loop sleeps out the rest of each tick's budget and warns when a
//! tick overruns it; otherwise ticks run back to back.

use std::time::{Duration, Instant};

use ledge_ecs::{ComponentStore, Scheduler};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for the tick loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Sleep between ticks to hold `tick_rate` in wall-clock time.
    pub realtime: bool,
}

impl TickConfig {
    /// Wall-clock budget of one tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate)
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            realtime: false,
        }
    }
}

/// Owns the world and drives its scheduler.
#[derive(Debug)]
pub struct TickLoop {
    config: TickConfig,
    store: ComponentStore,
    scheduler: Scheduler,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, store: ComponentStore, scheduler: Scheduler) -> Self {
        Self {
            config,
            store,
            scheduler,
        }
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.scheduler.tick_count()
    }

    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    /// Run one tick with the nominal step. Returns the step the systems saw.
    pub fn tick(&mut self) -> f32 {
        let dt = self.config.tick_duration().as_secs_f32();
        self.scheduler.run_tick(dt, &mut self.store)
    }

    /// Run until `max_ticks` is reached, or forever when it is zero.
    pub fn run(&mut self) {
        let tick_duration = self.config.tick_duration();
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            realtime = self.config.realtime,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();
            self.tick();

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }
            if tick_count % 60 == 0 {
                debug!(tick_id = self.tick_id(), entities = self.store.entity_count(), "progress");
            }
            if !self.config.realtime {
                continue;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ledge_ecs::System;

    use super::*;

    struct Clock(f32);

    impl System for Clock {
        fn name(&self) -> &str {
            "clock"
        }

        fn update(&mut self, dt: f32, _store: &mut ComponentStore) {
            self.0 += dt;
        }
    }

    fn tick_loop(config: TickConfig) -> TickLoop {
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Clock(0.0), 0).unwrap();
        TickLoop::new(config, ComponentStore::new(), scheduler)
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = tick_loop(TickConfig::default());
        assert_eq!(tick_loop.tick_id(), 0);
        let dt = tick_loop.tick();
        assert!((dt - 1.0 / 60.0).abs() < 1e-6);
        tick_loop.tick();
        assert_eq!(tick_loop.tick_id(), 2);
    }

    #[test]
    fn test_slow_tick_rate_is_clamped() {
        let mut tick_loop = tick_loop(TickConfig {
            tick_rate: 2.0,
            ..TickConfig::default()
        });
        assert_eq!(tick_loop.tick(), ledge_ecs::DEFAULT_MAX_DT);
    }

    #[test]
    fn test_run_limited_ticks() {
        let mut tick_loop = tick_loop(TickConfig {
            tick_rate: 1000.0,
            max_ticks: 5,
            realtime: true,
        });
        tick_loop.run();
        assert_eq!(tick_loop.tick_id(), 5);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: TickConfig = serde_json::from_str(r#"{"max_ticks": 10}"#).unwrap();
        assert_eq!(config.max_ticks, 10);
        assert_eq!(config.tick_rate, 60.0);
        assert!(!config.realtime);
    }
}
