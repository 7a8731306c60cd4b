//! Player-driven movement: jumping and walking.
//!
//! Both systems read [`PlayerInput`] and only write [`Velocity`] (and the
//! jumper's `in_air` flag); the physics systems that run after them turn
//! that velocity into motion.

use ledge_ecs::{ComponentStore, System};

use crate::components::{Jumper, PlayerInput, Velocity};

/// Starts jumps from the ground.
///
/// Any body with vertical speed is marked as in the air before the jump
/// input is looked at, so walking off a ledge cannot be followed by a jump.
#[derive(Debug, Clone, Default)]
pub struct JumperSystem;

impl System for JumperSystem {
    fn name(&self) -> &str {
        "jumper"
    }

    fn update(&mut self, _dt: f32, store: &mut ComponentStore) {
        for entity in store.entities_with::<Jumper>() {
            let Some(jump) = store
                .component_for::<PlayerInput>(entity)
                .map(|input| input.pressed(PlayerInput::JUMP))
            else {
                continue;
            };
            let Some(vy) = store.component_for::<Velocity>(entity).map(|v| v.vy) else {
                continue;
            };
            let Some(jumper) = store.component_for_mut::<Jumper>(entity) else {
                continue;
            };

            if vy != 0.0 {
                jumper.in_air = true;
            }
            if jumper.in_air || !jump {
                continue;
            }
            jumper.in_air = true;
            let jump_speed = jumper.jump_speed;
            if let Some(vel) = store.component_for_mut::<Velocity>(entity) {
                vel.vy = jump_speed;
            }
        }
    }
}

/// Accelerates jumpers horizontally from input, and brakes them at twice
/// the acceleration when there is none.
#[derive(Debug, Clone, Default)]
pub struct WalkerSystem;

fn walk(vx: f32, input: f32, jumper: &Jumper, dt: f32) -> f32 {
    if input != 0.0 {
        return (vx + input * jumper.acceleration * dt).clamp(-jumper.walk_speed, jumper.walk_speed);
    }
    if vx == 0.0 {
        return 0.0;
    }
    let braked = vx - vx.signum() * jumper.acceleration * dt * 2.0;
    // Stop rather than reverse.
    if braked.signum() != vx.signum() { 0.0 } else { braked }
}

impl System for WalkerSystem {
    fn name(&self) -> &str {
        "walker"
    }

    fn update(&mut self, dt: f32, store: &mut ComponentStore) {
        for entity in store.entities_with::<Jumper>() {
            let Some(jumper) = store.component_for::<Jumper>(entity).copied() else {
                continue;
            };
            let Some(input) = store
                .component_for::<PlayerInput>(entity)
                .map(|input| input.axis(PlayerInput::HORIZONTAL))
            else {
                continue;
            };
            if let Some(vel) = store.component_for_mut::<Velocity>(entity) {
                vel.vx = walk(vel.vx, input, &jumper, dt);
            }
        }
    }
}
