//! Collider tracker: keeps every `RectCollider` on top of its entity.
//!
//! Runs after movement and before any collision system. It records the box
//! as it stood before this tick's movement in `last_rect`, resizes it to the
//! entity's [`VisualExtent`] if there is one, and then moves it to the
//! entity's current [`Position`].
//!
//! A collider that has never been placed has no previous box of its own.
//! On that first sync the pre-move box is rebuilt by stepping the position
//! back by this tick's velocity, so the first move is swept like any other.

use glam::Vec2;
use ledge_ecs::{ComponentStore, System};

use crate::components::{Position, RectCollider, Velocity, VisualExtent};

#[derive(Debug, Clone, Default)]
pub struct ColliderTrackerSystem;

impl System for ColliderTrackerSystem {
    fn name(&self) -> &str {
        "collider_tracker"
    }

    fn update(&mut self, dt: f32, store: &mut ComponentStore) {
        for entity in store.entities_with::<RectCollider>() {
            let Some(pos) = store.component_for::<Position>(entity).copied() else {
                continue;
            };
            let extent = store.component_for::<VisualExtent>(entity).copied();
            let step = store
                .component_for::<Velocity>(entity)
                .map_or(Vec2::ZERO, |v| v.vec() * dt);
            let Some(collider) = store.component_for_mut::<RectCollider>(entity) else {
                continue;
            };

            if let Some(extent) = extent {
                collider.hit_rect.w = extent.width.max(0.0);
                collider.hit_rect.h = extent.height.max(0.0);
            }
            let last = if collider.synced {
                collider.hit_rect
            } else {
                collider.hit_rect.at(pos.vec() - step)
            };
            collider.last_rect = Some(last);
            collider.hit_rect.set_position(pos.vec());
            collider.synced = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use ledge_math::Rect;

    use super::*;

    #[test]
    fn test_first_sync_of_a_resting_body() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Position::new(50.0, 100.0)).unwrap();
        store.add_component(e, RectCollider::map_collider(16.0, 16.0)).unwrap();

        ColliderTrackerSystem.update(0.1, &mut store);
        let c = store.component_for::<RectCollider>(e).unwrap();
        assert_eq!(c.hit_rect, Rect::new(50.0, 100.0, 16.0, 16.0));
        assert_eq!(c.last_rect, Some(c.hit_rect));
        assert!(c.synced);
    }

    #[test]
    fn test_first_sync_steps_back_along_velocity() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Position::new(70.0, 16.0)).unwrap();
        store.add_component(e, Velocity::new(400.0, -80.0, false)).unwrap();
        store.add_component(e, RectCollider::map_collider(8.0, 8.0)).unwrap();

        ColliderTrackerSystem.update(0.25, &mut store);
        let c = store.component_for::<RectCollider>(e).unwrap();
        assert_eq!(c.last_rect, Some(Rect::new(-30.0, 36.0, 8.0, 8.0)));
        assert_eq!(c.hit_rect, Rect::new(70.0, 16.0, 8.0, 8.0));
    }

    #[test]
    fn test_last_rect_is_pre_move_box() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Position::new(0.0, 0.0)).unwrap();
        store.add_component(e, RectCollider::new(8.0, 8.0)).unwrap();
        ColliderTrackerSystem.update(0.0, &mut store);

        store.component_for_mut::<Position>(e).unwrap().x = 5.0;
        ColliderTrackerSystem.update(0.0, &mut store);

        let c = store.component_for::<RectCollider>(e).unwrap();
        assert_eq!(c.last_rect, Some(Rect::new(0.0, 0.0, 8.0, 8.0)));
        assert_eq!(c.hit_rect, Rect::new(5.0, 0.0, 8.0, 8.0));
    }

    #[test]
    fn test_resizes_to_visual_extent() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Position::new(1.0, 2.0)).unwrap();
        store.add_component(e, RectCollider::new(0.0, 0.0)).unwrap();
        store
            .add_component(
                e,
                VisualExtent {
                    width: 12.0,
                    height: 20.0,
                },
            )
            .unwrap();

        ColliderTrackerSystem.update(0.0, &mut store);
        assert_eq!(
            store.component_for::<RectCollider>(e).unwrap().hit_rect,
            Rect::new(1.0, 2.0, 12.0, 20.0)
        );
    }

    #[test]
    fn test_collider_without_position_is_left_alone() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, RectCollider::new(4.0, 4.0)).unwrap();
        ColliderTrackerSystem.update(0.0, &mut store);
        assert!(!store.component_for::<RectCollider>(e).unwrap().synced);
    }
}
