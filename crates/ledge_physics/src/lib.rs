//! # ledge_physics
//!
//! Platformer physics on top of [`ledge_ecs`]: components for bodies,
//! colliders, doors and buttons, a tile-grid [`Terrain`], and the systems
//! that move bodies and keep them out of walls.
//!
//! A typical setup registers everything at the default priorities with
//! [`install`] and then drives the scheduler once per frame:
//!
//! ```ignore
//! let mut scheduler = Scheduler::new();
//! ledge_physics::install(&mut scheduler, PhysicsConfig::default(), map)?;
//! scheduler.run_tick(dt, &mut store);
//! ```

pub mod components;
pub mod config;
pub mod snapshot;
pub mod systems;
pub mod terrain;

use ledge_ecs::{EcsError, Scheduler};
use tracing::debug;

pub use components::{
    Button, ButtonState, Door, Jumper, PlayerInput, Position, RectCollider, Velocity, VisualExtent,
};
pub use config::PhysicsConfig;
pub use snapshot::EntitySnapshot;
pub use systems::{
    ButtonSystem, ColliderTrackerSystem, DoorCollisionSystem, GravitySystem, JumperSystem,
    MapCollisionSystem, MovementSystem, WalkerSystem,
};
pub use terrain::{Terrain, TerrainError, TileMap};

/// Default execution order. Lower runs first.
pub mod priority {
    pub const JUMPER: i32 = 0;
    pub const WALKER: i32 = 10;
    pub const GRAVITY: i32 = 20;
    pub const MOVEMENT: i32 = 30;
    pub const TRACKER: i32 = 40;
    pub const MAP_COLLISION: i32 = 50;
    pub const DOORS: i32 = 60;
    pub const BUTTONS: i32 = 90;
}

/// Registers every physics system on `scheduler` at its default priority.
///
/// # Errors
///
/// Returns [`EcsError::DuplicateSystem`] if any of the systems is already
/// registered.
pub fn install(
    scheduler: &mut Scheduler,
    config: PhysicsConfig,
    terrain: impl Terrain + 'static,
) -> Result<(), EcsError> {
    scheduler.add_system(JumperSystem, priority::JUMPER)?;
    scheduler.add_system(WalkerSystem, priority::WALKER)?;
    scheduler.add_system(GravitySystem::new(config), priority::GRAVITY)?;
    scheduler.add_system(MovementSystem, priority::MOVEMENT)?;
    scheduler.add_system(ColliderTrackerSystem, priority::TRACKER)?;
    scheduler.add_system(MapCollisionSystem::new(terrain), priority::MAP_COLLISION)?;
    scheduler.add_system(DoorCollisionSystem, priority::DOORS)?;
    scheduler.add_system(ButtonSystem::new(), priority::BUTTONS)?;
    debug!(systems = scheduler.len(), "physics systems installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_orders_systems() {
        let mut scheduler = Scheduler::new();
        install(&mut scheduler, PhysicsConfig::default(), TileMap::new(4, 4, 16.0).unwrap()).unwrap();
        assert_eq!(
            scheduler.system_names(),
            vec![
                "jumper",
                "walker",
                "gravity",
                "movement",
                "collider_tracker",
                "map_collision",
                "door_collision",
                "buttons",
            ]
        );
    }

    #[test]
    fn test_install_twice_fails() {
        let mut scheduler = Scheduler::new();
        let map = || TileMap::new(4, 4, 16.0).unwrap();
        install(&mut scheduler, PhysicsConfig::default(), map()).unwrap();
        assert_eq!(
            install(&mut scheduler, PhysicsConfig::default(), map()),
            Err(EcsError::DuplicateSystem("jumper".to_string()))
        );
    }
}
