//! Map collision: keeps map colliders out of solid terrain.
//!
//! For every entity with a map-colliding [`RectCollider`], a [`Velocity`],
//! and a [`Position`], the box is swept from `last_rect` to `hit_rect`
//! against the installed [`Terrain`]. The corrected box is written back to
//! the collider and the position. A horizontal correction stops horizontal
//! velocity; a vertical one stops vertical velocity, and an upward correction
//! (a floor was hit) also clears the entity's [`Jumper::in_air`] flag.

use glam::Vec2;
use ledge_ecs::{ComponentStore, System};
use tracing::trace;

use crate::components::{Jumper, Position, RectCollider, Velocity};
use crate::terrain::Terrain;

pub struct MapCollisionSystem {
    terrain: Option<Box<dyn Terrain>>,
}

impl MapCollisionSystem {
    #[must_use]
    pub fn new(terrain: impl Terrain + 'static) -> Self {
        Self {
            terrain: Some(Box::new(terrain)),
        }
    }

    /// A system with no terrain; every update is a no-op until
    /// [`MapCollisionSystem::set_terrain`] is called.
    #[must_use]
    pub fn empty() -> Self {
        Self { terrain: None }
    }

    pub fn set_terrain(&mut self, terrain: impl Terrain + 'static) {
        self.terrain = Some(Box::new(terrain));
    }
}

impl System for MapCollisionSystem {
    fn name(&self) -> &str {
        "map_collision"
    }

    fn update(&mut self, _dt: f32, store: &mut ComponentStore) {
        let Some(terrain) = self.terrain.as_deref() else {
            return;
        };

        for entity in store.entities_with::<RectCollider>() {
            let Some(collider) = store.component_for::<RectCollider>(entity).copied() else {
                continue;
            };
            if !collider.collide_with_map
                || !store.has::<Position>(entity)
                || !store.has::<Velocity>(entity)
            {
                continue;
            }

            let last = collider.last_rect.unwrap_or(collider.hit_rect);
            let resolved = terrain.resolve(last, collider.hit_rect);
            let delta = resolved.position() - collider.hit_rect.position();

            if let Some(c) = store.component_for_mut::<RectCollider>(entity) {
                c.hit_rect = resolved;
            }
            if let Some(pos) = store.component_for_mut::<Position>(entity) {
                pos.set(resolved.position());
            }
            if delta == Vec2::ZERO {
                continue;
            }

            trace!(%entity, dx = delta.x, dy = delta.y, "terrain contact");
            if let Some(vel) = store.component_for_mut::<Velocity>(entity) {
                if delta.x != 0.0 {
                    vel.vx = 0.0;
                }
                if delta.y != 0.0 {
                    vel.vy = 0.0;
                }
            }
            if delta.y > 0.0
                && let Some(jumper) = store.component_for_mut::<Jumper>(entity)
            {
                jumper.in_air = false;
            }
        }
    }
}

impl std::fmt::Debug for MapCollisionSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCollisionSystem")
            .field("has_terrain", &self.terrain.is_some())
            .finish()
    }
}
