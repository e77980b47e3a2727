//! Canvas contract and colors

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Rect;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(200, 200, 200);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 200, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(200, 150, 0);
    /// Backdrop when no background image is available. OpenCV-style hosts
    /// write it in BGR order as `(30, 30, 60)`.
    pub const NIGHT: Color = Color::rgb(60, 30, 30);
}

/// Opaque handle to an image the host has loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// Images the host managed to load. A missing image just skips its draw step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteSet {
    pub background: Option<SpriteId>,
    pub balloon: Option<SpriteId>,
    pub avatar: Option<SpriteId>,
}

/// Drawing primitives provided by the host (y grows downward)
pub trait Canvas {
    /// Start a new frame filled with `color`
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// `pos` is the left end of the text baseline
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
    /// Alpha-blended image with its top-left corner at `top_left`
    fn sprite(&mut self, sprite: SpriteId, top_left: Vec2, size: Vec2);
    /// Frame finished
    fn present(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_is_rgb_order() {
        assert_eq!(Color::NIGHT, Color { r: 60, g: 30, b: 30 });
    }
}
