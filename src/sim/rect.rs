//! Axis-aligned rectangles for buttons and hit-testing

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle given by its top-left corner and size (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Stretch position and size by per-axis factors
    pub fn scaled(&self, factor: Vec2) -> Self {
        Self::new(self.x * factor.x, self.y * factor.y, self.w * factor.x, self.h * factor.y)
    }

    /// Inclusive on every edge
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(300.0, 280.0, 200.0, 80.0);
        assert!(r.contains(Vec2::new(300.0, 280.0)));
        assert!(r.contains(Vec2::new(500.0, 360.0)));
        assert!(r.contains(r.center()));
        assert!(!r.contains(Vec2::new(299.9, 300.0)));
        assert!(!r.contains(Vec2::new(400.0, 360.1)));
        assert_eq!(r.max(), Vec2::new(500.0, 360.0));
    }

    #[test]
    fn test_scaled() {
        let r = Rect::new(300.0, 280.0, 200.0, 80.0).scaled(Vec2::new(2.0, 0.5));
        assert_eq!(r, Rect::new(600.0, 140.0, 400.0, 40.0));
    }
}
