//! The per-tick systems, in the order they run by default.

pub mod button;
pub mod door;
pub mod gravity;
pub mod jumper;
pub mod map_collision;
pub mod movement;
pub mod tracker;

pub use button::ButtonSystem;
pub use door::DoorCollisionSystem;
pub use gravity::GravitySystem;
pub use jumper::{JumperSystem, WalkerSystem};
pub use map_collision::MapCollisionSystem;
pub use movement::MovementSystem;
pub use tracker::ColliderTrackerSystem;
