//! Movement system: integrates velocity into position.

use ledge_ecs::{ComponentStore, System};

use crate::components::{Position, Velocity};

#[derive(Debug, Clone, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn update(&mut self, dt: f32, store: &mut ComponentStore) {
        for entity in store.entities_with::<Velocity>() {
            let Some(vel) = store.component_for::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(pos) = store.component_for_mut::<Position>(entity) {
                pos.x += vel.vx * dt;
                pos.y += vel.vy * dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_follows_velocity() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Position::new(10.0, 10.0)).unwrap();
        store.add_component(e, Velocity::new(20.0, -40.0, false)).unwrap();

        MovementSystem.update(0.5, &mut store);
        assert_eq!(store.component_for::<Position>(e), Some(&Position::new(20.0, -10.0)));
    }

    #[test]
    fn test_velocity_without_position_is_skipped() {
        let mut store = ComponentStore::new();
        let e = store.create_entity();
        store.add_component(e, Velocity::new(1.0, 1.0, false)).unwrap();
        MovementSystem.update(1.0, &mut store);
        assert!(store.component_for::<Position>(e).is_none());
    }
}
