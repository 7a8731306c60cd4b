//! Buttons: pressure plates that open doors.

use std::collections::BTreeSet;

use ledge_ecs::{ComponentStore, Entity, System};
use ledge_math::Rect;
use tracing::{debug, warn};

use crate::components::{Button, ButtonState, Door, Position, RectCollider};

/// Presses every [`Button`] that a map collider overlaps and opens the door
/// it points at. Opening is one-way: releasing the button leaves the door open.
#[derive(Debug, Clone, Default)]
pub struct ButtonSystem {
    /// Buttons already reported for pointing at a missing door.
    warned: BTreeSet<Entity>,
}

impl ButtonSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn open_door(&mut self, store: &mut ComponentStore, button: Entity, door: Entity) {
        match store.component_for_mut::<Door>(door) {
            Some(d) if !d.is_open => {
                d.is_open = true;
                debug!(%button, %door, "door opened");
            }
            Some(_) => {}
            None => {
                if self.warned.insert(button) {
                    warn!(%button, %door, "button points at an entity with no door");
                }
            }
        }
    }
}

impl System for ButtonSystem {
    fn name(&self) -> &str {
        "buttons"
    }

    fn update(&mut self, _dt: f32, store: &mut ComponentStore) {
        let colliders: Vec<(Entity, Rect)> = store
            .all_with::<RectCollider>()
            .filter(|(_, c)| c.collide_with_map)
            .map(|(e, c)| (e, c.hit_rect))
            .collect();

        for entity in store.entities_with::<Button>() {
            let Some(pos) = store.component_for::<Position>(entity).copied() else {
                continue;
            };
            let Some(button) = store.component_for_mut::<Button>(entity) else {
                continue;
            };

            let plate = Rect::new(pos.x, pos.y, button.width, button.height);
            let pressed = colliders
                .iter()
                .any(|(other, rect)| *other != entity && plate.intersects(rect));
            button.state = if pressed {
                ButtonState::Down
            } else {
                ButtonState::Up
            };

            if let (true, Some(door)) = (pressed, button.door) {
                self.open_door(store, entity, door);
            }
        }
    }
}
