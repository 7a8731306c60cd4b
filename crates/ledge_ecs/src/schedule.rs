//! Priority-ordered system scheduler.
//!
//! The [`Scheduler`] holds systems sorted by ascending priority, ties broken
//! by registration order, and runs every one of them exactly once per tick.
//! Execution is strictly sequential: a system's `update` returns before the
//! next one starts, and the store is handed to one system at a time.
//!
//! The elapsed time is clamped once per tick to [`Scheduler::max_dt`] so a
//! long stall (a suspended laptop, a debugger breakpoint) cannot produce a
//! huge integration step.

use tracing::{debug, trace};

use crate::error::EcsError;
use crate::store::ComponentStore;

/// Default ceiling for the per-tick elapsed time, in seconds.
pub const DEFAULT_MAX_DT: f32 = 1.0 / 15.0;

/// A unit of behaviour run once per tick over every entity that holds the
/// components it needs.
///
/// Systems talk to each other only through component data. An update that
/// finds no matching entities must simply do nothing.
pub trait System {
    /// A unique, human-readable name (e.g. `"gravity"`).
    fn name(&self) -> &str;

    /// Advance this system's behaviour by `dt` seconds.
    fn update(&mut self, dt: f32, store: &mut ComponentStore);
}

/// A system together with its priority.
struct ScheduledSystem {
    priority: i32,
    system: Box<dyn System>,
}

/// Runs systems in a fixed, explicit priority order.
pub struct Scheduler {
    systems: Vec<ScheduledSystem>,
    max_dt: f32,
    tick_count: u64,
}

impl Scheduler {
    /// Create an empty scheduler with the default frame-time clamp.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_dt(DEFAULT_MAX_DT)
    }

    /// Create an empty scheduler that clamps `dt` to `max_dt` seconds.
    #[must_use]
    pub fn with_max_dt(max_dt: f32) -> Self {
        Self {
            systems: Vec::new(),
            max_dt: max_dt.max(0.0),
            tick_count: 0,
        }
    }

    /// Returns the ceiling applied to each tick's `dt`.
    #[must_use]
    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Register a system at `priority`. Lower priorities run first; equal
    /// priorities run in registration order.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateSystem`] if a system with the same name is
    /// already registered.
    pub fn add_system(&mut self, system: impl System + 'static, priority: i32) -> Result<(), EcsError> {
        self.add_boxed(Box::new(system), priority)
    }

    /// Boxed variant of [`Scheduler::add_system`].
    ///
    /// # Errors
    ///
    /// See [`Scheduler::add_system`].
    pub fn add_boxed(&mut self, system: Box<dyn System>, priority: i32) -> Result<(), EcsError> {
        if self.systems.iter().any(|s| s.system.name() == system.name()) {
            return Err(EcsError::DuplicateSystem(system.name().to_string()));
        }
        let index = self.systems.partition_point(|s| s.priority <= priority);
        debug!(system = system.name(), priority, index, "system registered");
        self.systems.insert(index, ScheduledSystem { priority, system });
        Ok(())
    }

    /// Run one tick: apply deferred removals, clamp `dt`, then update every
    /// system in priority order.
    ///
    /// Returns the `dt` that was actually handed to the systems.
    pub fn run_tick(&mut self, dt: f32, store: &mut ComponentStore) -> f32 {
        let removed = store.apply_deferred();
        if removed > 0 {
            debug!(removed, "applied deferred removals");
        }

        let dt = self.clamp_dt(dt);
        self.tick_count += 1;
        trace!(tick = self.tick_count, dt, "tick start");

        for scheduled in &mut self.systems {
            trace!(
                system = scheduled.system.name(),
                priority = scheduled.priority,
                "running system"
            );
            scheduled.system.update(dt, store);
        }
        dt
    }

    /// Clamp to `[0, max_dt]`. NaN becomes zero.
    fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, self.max_dt)
        }
    }

    /// Names of the registered systems in execution order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system.name()).collect()
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.system_names())
            .field("max_dt", &self.max_dt)
            .field("tick_count", &self.tick_count)
            .finish()
    }
}
