//! Platformer component definitions.
//!
//! All positions are bottom-left corners in a y-up world, matching
//! [`Rect`]. Components that relate to another entity (a [`Button`] and the
//! [`Door`] it opens) store that entity's id and resolve it through the store
//! each time it is needed.

use std::collections::BTreeMap;

use glam::Vec2;
use ledge_ecs::{Component, Entity};
use ledge_math::Rect;
use serde::{Deserialize, Serialize};

/// World-space location of an entity's bottom-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Moves the corner to `v`.
    pub fn set(&mut self, v: Vec2) {
        self.x = v.x;
        self.y = v.y;
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// Rate of change of [`Position`], in world units per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
    /// Whether the gravity system accelerates this body.
    pub uses_gravity: bool,
}

impl Velocity {
    #[must_use]
    pub fn new(vx: f32, vy: f32, uses_gravity: bool) -> Self {
        Self {
            vx,
            vy,
            uses_gravity,
        }
    }

    #[must_use]
    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::new(0.0, 0.0, true)
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// A rectangular hit area.
///
/// `hit_rect` follows the entity's [`Position`]; `last_rect` is the box as it
/// stood before this tick's movement and is what collision systems sweep
/// from. Only colliders with `collide_with_map` take part in terrain, door,
/// and button interactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RectCollider {
    pub hit_rect: Rect,
    pub collide_with_map: bool,
    pub last_rect: Option<Rect>,
    /// Set once the tracker has placed `hit_rect` at the entity's position.
    /// Until then `hit_rect` is not a real previous box, and the tracker
    /// derives one from the position and velocity instead.
    #[serde(default)]
    pub synced: bool,
}

impl RectCollider {
    /// A collider of the given size that ignores the map.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            hit_rect: Rect::new(0.0, 0.0, width, height),
            collide_with_map: false,
            last_rect: None,
            synced: false,
        }
    }

    /// A collider of the given size that collides with terrain.
    #[must_use]
    pub fn map_collider(width: f32, height: f32) -> Self {
        Self {
            collide_with_map: true,
            ..Self::new(width, height)
        }
    }
}

impl Component for RectCollider {
    fn type_name() -> &'static str {
        "RectCollider"
    }
}

/// Grounded state and movement tuning of a platformer character.
///
/// `in_air` is cleared by the map collision system when the body lands on a
/// floor and set by the jumper system when the body leaves the ground.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Jumper {
    pub in_air: bool,
    /// Upward speed given by a jump.
    pub jump_speed: f32,
    /// Horizontal speed cap while walking.
    pub walk_speed: f32,
    /// Horizontal acceleration while input is held.
    pub acceleration: f32,
}

impl Jumper {
    #[must_use]
    pub fn new(jump_speed: f32, walk_speed: f32, acceleration: f32) -> Self {
        Self {
            in_air: false,
            jump_speed,
            walk_speed,
            acceleration,
        }
    }
}

impl Default for Jumper {
    fn default() -> Self {
        Self::new(200.0, 200.0, 500.0)
    }
}

impl Component for Jumper {
    fn type_name() -> &'static str {
        "Jumper"
    }
}

/// A rectangular obstacle that blocks horizontal movement while closed.
///
/// Doors only ever go from closed to open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Door {
    pub hit_rect: Rect,
    pub is_open: bool,
}

impl Door {
    #[must_use]
    pub fn closed(width: f32, height: f32) -> Self {
        Self {
            hit_rect: Rect::new(0.0, 0.0, width, height),
            is_open: false,
        }
    }

    #[must_use]
    pub fn open(width: f32, height: f32) -> Self {
        Self {
            is_open: true,
            ..Self::closed(width, height)
        }
    }
}

impl Component for Door {
    fn type_name() -> &'static str {
        "Door"
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
}

/// A pressure plate. While any map collider rests on it, it is `Down` and
/// opens the referenced door.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub width: f32,
    pub height: f32,
    pub state: ButtonState,
    /// The door this button opens. Resolved through the store each tick.
    pub door: Option<Entity>,
}

impl Button {
    #[must_use]
    pub fn new(width: f32, height: f32, door: Option<Entity>) -> Self {
        Self {
            width,
            height,
            state: ButtonState::Up,
            door,
        }
    }
}

impl Component for Button {
    fn type_name() -> &'static str {
        "Button"
    }
}

/// Size of the entity's current visual, written by the renderer. The
/// collider tracker resizes `hit_rect` to match it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VisualExtent {
    pub width: f32,
    pub height: f32,
}

impl Component for VisualExtent {
    fn type_name() -> &'static str {
        "VisualExtent"
    }
}

/// Per-player logical input values, filled in by the input layer before
/// each tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlayerInput {
    pub values: BTreeMap<String, f32>,
}

impl PlayerInput {
    pub const HORIZONTAL: &'static str = "HORIZONTAL_1";
    pub const JUMP: &'static str = "JUMP";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar value of a named input, zero when unset.
    #[must_use]
    pub fn axis(&self, name: &str) -> f32 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Whether a named button input is held.
    #[must_use]
    pub fn pressed(&self, name: &str) -> bool {
        self.axis(name) > 0.5
    }

    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.values.insert(name.into(), value);
    }
}

impl Component for PlayerInput {
    fn type_name() -> &'static str {
        "PlayerInput"
    }
}
