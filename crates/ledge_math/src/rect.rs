//! Axis-aligned rectangle.
//!
//! [`Rect`] is anchored at its **bottom-left** corner in a y-up world: `x`/`y`
//! is the bottom-left, `left <= right` and `bottom <= top`. Every collider in
//! the engine uses this convention, so a `Position` maps directly onto
//! [`Rect::position`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box with its origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width, never negative.
    pub w: f32,
    /// Height, never negative.
    pub h: f32,
}

impl Rect {
    /// Create a rectangle. Negative sizes are normalised so that `x`/`y`
    /// stays the bottom-left corner.
    #[must_use]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        Self { x, y, w, h }
    }

    /// Create a rectangle from its bottom-left corner and size.
    #[must_use]
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Bottom-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Move the bottom-left corner, keeping the size.
    pub fn set_position(&mut self, position: Vec2) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Resize, keeping the bottom-left corner.
    pub fn set_size(&mut self, size: Vec2) {
        self.w = size.x.max(0.0);
        self.h = size.y.max(0.0);
    }

    /// Move the box so its left edge sits at `left`.
    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    /// Move the box so its right edge sits at `right`.
    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.x += offset.x;
        self.y += offset.y;
        self
    }

    /// Returns a copy with the bottom-left corner at `position`.
    #[must_use]
    pub fn at(mut self, position: Vec2) -> Self {
        self.set_position(position);
        self
    }

    /// Strict overlap test. Boxes that only share an edge do not intersect,
    /// so a body resting on a floor is not considered penetrating it.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        Rect::new(left, bottom, right - left, top - bottom)
    }
}

/// Returns `true` when the closed-open intervals `a` and `b` share interior
/// points. Each interval is `(low, high)`; touching endpoints do not overlap.
#[must_use]
pub fn ranges_overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}
