//! Gravity system: accelerates every gravity-affected body downward.

use ledge_ecs::{ComponentStore, System};

use crate::components::Velocity;
use crate::config::PhysicsConfig;

#[derive(Debug, Clone)]
pub struct GravitySystem {
    config: PhysicsConfig,
}

impl GravitySystem {
    #[must_use]
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }
}

impl System for GravitySystem {
    fn name(&self) -> &str {
        "gravity"
    }

    fn update(&mut self, dt: f32, store: &mut ComponentStore) {
        for (_, vel) in store.all_with_mut::<Velocity>() {
            if !vel.uses_gravity {
                continue;
            }
            vel.vy -= self.config.gravity * dt;
            if let Some(max_fall) = self.config.max_fall_speed {
                vel.vy = vel.vy.max(-max_fall);
            }
        }
    }
}
