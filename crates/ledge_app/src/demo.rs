//! A small built-in level: a walled room, a player walking right, a closed
//! door in the way, and a crate that drops onto the button that opens it.

use anyhow::Result;
use glam::Vec2;
use ledge_ecs::{ComponentStore, Entity};
use ledge_physics::{
    Button, ButtonState, Door, Jumper, PlayerInput, Position, RectCollider, TileMap, Velocity,
};
use tracing::debug;

pub const TILE_SIZE: f32 = 16.0;

pub const DEMO_LEVEL: &str = "\
########################
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
########################";

/// Entities of interest in the demo level.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub player: Entity,
    pub door: Entity,
    pub button: Entity,
}

pub fn default_map() -> Result<TileMap> {
    Ok(TileMap::from_ascii(TILE_SIZE, DEMO_LEVEL)?)
}

/// Spawns the demo entities. Positions assume a floor whose top is at one
/// tile above the origin, as in [`DEMO_LEVEL`].
pub fn populate(store: &mut ComponentStore) -> Result<Demo> {
    let floor = TILE_SIZE;

    let door = store.create_entity();
    store.add_component(door, Position::new(224.0, floor))?;
    store.add_component(door, Door::closed(TILE_SIZE, 3.0 * TILE_SIZE))?;

    let button = store.create_entity();
    store.add_component(button, Position::new(96.0, floor))?;
    store.add_component(button, Button::new(TILE_SIZE, 4.0, Some(door)))?;

    let crate_box = store.create_entity();
    store.add_component(crate_box, Position::new(98.0, 80.0))?;
    store.add_component(crate_box, Velocity::default())?;
    store.add_component(crate_box, RectCollider::map_collider(12.0, 12.0))?;

    let player = store.create_entity();
    let mut input = PlayerInput::new();
    input.set(PlayerInput::HORIZONTAL, 1.0);
    store.add_component(player, Position::new(32.0, floor))?;
    store.add_component(player, Velocity::default())?;
    store.add_component(player, RectCollider::map_collider(TILE_SIZE, TILE_SIZE))?;
    store.add_component(player, Jumper::default())?;
    store.add_component(player, input)?;

    debug!(%player, %door, %button, "demo level populated");
    Ok(Demo {
        player,
        door,
        button,
    })
}

/// Where the player stands, for the end-of-run summary.
#[must_use]
pub fn player_position(store: &ComponentStore, demo: &Demo) -> Option<Vec2> {
    store.component_for::<Position>(demo.player).map(Position::vec)
}

/// Whether the button is held down and the door it controls is open.
#[must_use]
pub fn door_state(store: &ComponentStore, demo: &Demo) -> (Option<ButtonState>, bool) {
    let button = store.component_for::<Button>(demo.button).map(|b| b.state);
    let open = store
        .component_for::<Door>(demo.door)
        .is_some_and(|d| d.is_open);
    (button, open)
}

#[cfg(test)]
mod tests {
    use ledge_ecs::Scheduler;
    use ledge_physics::PhysicsConfig;

    use super::*;

    #[test]
    fn test_demo_level_parses() {
        let map = default_map().unwrap();
        assert_eq!(map.cols(), 24);
        assert_eq!(map.rows(), 8);
    }

    #[test]
    fn test_crate_opens_door_and_player_walks_through() {
        let mut store = ComponentStore::new();
        let demo = populate(&mut store).unwrap();
        let mut scheduler = Scheduler::new();
        ledge_physics::install(&mut scheduler, PhysicsConfig::default(), default_map().unwrap())
            .unwrap();

        for _ in 0..180 {
            scheduler.run_tick(1.0 / 60.0, &mut store);
        }

        assert_eq!(door_state(&store, &demo), (Some(ButtonState::Down), true));
        let pos = player_position(&store, &demo).unwrap();
        assert!(pos.x > 240.0, "player stopped at {pos}");
        assert_eq!(pos.y, TILE_SIZE);
    }
}
