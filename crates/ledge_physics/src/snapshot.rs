//! Read-only per-entity view for renderers and tooling.

use glam::Vec2;
use ledge_ecs::{ComponentStore, Entity};
use ledge_math::Rect;
use serde::{Deserialize, Serialize};

use crate::components::{Button, ButtonState, Door, Jumper, Position, RectCollider};

/// The drawable state of one entity at the end of a tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EntitySnapshot {
    pub entity: Entity,
    pub position: Option<Vec2>,
    pub hit_rect: Option<Rect>,
    pub in_air: Option<bool>,
    pub door_open: Option<bool>,
    pub button: Option<ButtonState>,
}

impl EntitySnapshot {
    /// Captures `entity`, or `None` if it is not alive.
    #[must_use]
    pub fn capture(store: &ComponentStore, entity: Entity) -> Option<Self> {
        if !store.is_alive(entity) {
            return None;
        }
        Some(Self {
            entity,
            position: store.component_for::<Position>(entity).map(Position::vec),
            hit_rect: store.component_for::<RectCollider>(entity).map(|c| c.hit_rect),
            in_air: store.component_for::<Jumper>(entity).map(|j| j.in_air),
            door_open: store.component_for::<Door>(entity).map(|d| d.is_open),
            button: store.component_for::<Button>(entity).map(|b| b.state),
        })
    }

    /// Captures every live entity in id order.
    #[must_use]
    pub fn capture_all(store: &ComponentStore) -> Vec<Self> {
        store
            .registry()
            .iter()
            .filter_map(|entity| Self::capture(store, entity))
            .collect()
    }
}
