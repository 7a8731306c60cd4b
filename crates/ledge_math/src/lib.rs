//! # ledge_math
//!
//! Math types for the ledge engine. Re-exports [`glam`] for vector algebra
//! and defines the axis-aligned [`Rect`] used by every collider.

pub mod rect;

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use rect::{Rect, ranges_overlap};
