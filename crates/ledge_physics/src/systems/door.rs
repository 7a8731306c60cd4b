//! Door collision: closed doors block map colliders horizontally.
//!
//! Each tick the door boxes are first moved onto their entities' positions.
//! Then every map collider whose vertical extent overlaps a closed door is
//! checked for having crossed one of the door's sides since the last tick;
//! if it did, it is clamped back to that side and its horizontal velocity is
//! stopped.

use ledge_ecs::{ComponentStore, System};
use ledge_math::{Rect, ranges_overlap};
use tracing::trace;

use crate::components::{Door, Position, RectCollider, Velocity};

#[derive(Debug, Clone, Default)]
pub struct DoorCollisionSystem;

impl DoorCollisionSystem {
    fn track_doors(store: &mut ComponentStore) {
        for entity in store.entities_with::<Door>() {
            let Some(pos) = store.component_for::<Position>(entity).copied() else {
                continue;
            };
            if let Some(door) = store.component_for_mut::<Door>(entity) {
                door.hit_rect.set_position(pos.vec());
            }
        }
    }
}

/// Clamp `hit` against one door side it crossed since `last`.
/// Returns `true` if the box was moved.
fn clamp_to_door(hit: &mut Rect, last: &Rect, door: &Rect) -> bool {
    if last.right() <= door.left() && hit.right() > door.left() {
        hit.set_right(door.left());
        true
    } else if last.left() >= door.right() && hit.left() < door.right() {
        hit.set_left(door.right());
        true
    } else {
        false
    }
}

impl System for DoorCollisionSystem {
    fn name(&self) -> &str {
        "door_collision"
    }

    fn update(&mut self, _dt: f32, store: &mut ComponentStore) {
        Self::track_doors(store);

        let closed: Vec<Rect> = store
            .all_with::<Door>()
            .filter(|(_, door)| !door.is_open)
            .map(|(_, door)| door.hit_rect)
            .collect();
        if closed.is_empty() {
            return;
        }

        for entity in store.entities_with::<RectCollider>() {
            let Some(mut collider) = store.component_for::<RectCollider>(entity).copied() else {
                continue;
            };
            if !collider.collide_with_map {
                continue;
            }
            let Some(last) = collider.last_rect else {
                continue;
            };

            let mut clamped = false;
            for door in &closed {
                let hit = &mut collider.hit_rect;
                if ranges_overlap((hit.bottom(), hit.top()), (door.bottom(), door.top())) {
                    clamped |= clamp_to_door(hit, &last, door);
                }
            }
            if !clamped {
                continue;
            }

            trace!(%entity, x = collider.hit_rect.x, "blocked by door");
            if let Some(c) = store.component_for_mut::<RectCollider>(entity) {
                c.hit_rect = collider.hit_rect;
            }
            if let Some(pos) = store.component_for_mut::<Position>(entity) {
                pos.set(collider.hit_rect.position());
            }
            if let Some(vel) = store.component_for_mut::<Velocity>(entity) {
                vel.vx = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ledge_ecs::Entity;

    use super::*;

    fn door(store: &mut ComponentStore, x: f32, y: f32, door: Door) -> Entity {
        let e = store.create_entity();
        store.add_component(e, Position::new(x, y)).unwrap();
        store.add_component(e, door).unwrap();
        e
    }

    fn mover(store: &mut ComponentStore, last: Rect, new: Rect) -> Entity {
        let e = store.create_entity();
        store.add_component(e, Position::new(new.x, new.y)).unwrap();
        store.add_component(e, Velocity::new(300.0, 0.0, false)).unwrap();
        let mut collider = RectCollider::map_collider(new.w, new.h);
        collider.hit_rect = new;
        collider.last_rect = Some(last);
        collider.synced = true;
        store.add_component(e, collider).unwrap();
        e
    }

    #[test]
    fn test_door_box_follows_position() {
        let mut store = ComponentStore::new();
        let d = door(&mut store, 64.0, 16.0, Door::open(16.0, 32.0));
        DoorCollisionSystem.update(0.0, &mut store);
        assert_eq!(
            store.component_for::<Door>(d).unwrap().hit_rect,
            Rect::new(64.0, 16.0, 16.0, 32.0)
        );
    }

    #[test]
    fn test_closed_door_blocks_from_left() {
        let mut store = ComponentStore::new();
        door(&mut store, 64.0, 16.0, Door::closed(16.0, 32.0));
        let m = mover(
            &mut store,
            Rect::new(50.0, 16.0, 8.0, 8.0),
            Rect::new(60.0, 16.0, 8.0, 8.0),
        );

        DoorCollisionSystem.update(0.0, &mut store);

        assert_eq!(store.component_for::<Position>(m), Some(&Position::new(56.0, 16.0)));
        assert_eq!(store.component_for::<Velocity>(m).unwrap().vx, 0.0);
    }

    #[test]
    fn test_closed_door_blocks_from_right() {
        let mut store = ComponentStore::new();
        door(&mut store, 64.0, 16.0, Door::closed(16.0, 32.0));
        let m = mover(
            &mut store,
            Rect::new(82.0, 20.0, 8.0, 8.0),
            Rect::new(76.0, 20.0, 8.0, 8.0),
        );

        DoorCollisionSystem.update(0.0, &mut store);
        assert_eq!(store.component_for::<Position>(m).unwrap().x, 80.0);
    }

    #[test]
    fn test_open_door_lets_bodies_through() {
        let mut store = ComponentStore::new();
        door(&mut store, 64.0, 16.0, Door::open(16.0, 32.0));
        let m = mover(
            &mut store,
            Rect::new(50.0, 16.0, 8.0, 8.0),
            Rect::new(60.0, 16.0, 8.0, 8.0),
        );

        DoorCollisionSystem.update(0.0, &mut store);
        assert_eq!(store.component_for::<Position>(m).unwrap().x, 60.0);
        assert_eq!(store.component_for::<Velocity>(m).unwrap().vx, 300.0);
    }

    #[test]
    fn test_body_above_door_is_not_blocked() {
        let mut store = ComponentStore::new();
        door(&mut store, 64.0, 16.0, Door::closed(16.0, 32.0));
        let m = mover(
            &mut store,
            Rect::new(50.0, 48.0, 8.0, 8.0),
            Rect::new(70.0, 48.0, 8.0, 8.0),
        );

        DoorCollisionSystem.update(0.0, &mut store);
        assert_eq!(store.component_for::<Position>(m).unwrap().x, 70.0);
    }
}
