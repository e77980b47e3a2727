//! Recording canvas

use glam::Vec2;

use super::canvas::{Canvas, Color, SpriteId};
use crate::sim::Rect;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, Color),
    StrokeRect(Rect, Color, f32),
    Circle { center: Vec2, radius: f32, color: Color },
    Text { text: String, pos: Vec2, size: f32, color: Color },
    Sprite { sprite: SpriteId, top_left: Vec2, size: Vec2 },
}

/// Canvas that keeps the commands of the current frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::StrokeRect(rect, color, thickness));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }

    fn sprite(&mut self, sprite: SpriteId, top_left: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            top_left,
            size,
        });
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut list = DrawList::new();
        list.text("old", Vec2::ZERO, 1.0, Color::WHITE);
        list.present();
        list.clear(Color::NIGHT);
        list.fill_circle(Vec2::ONE, 3.0, Color::YELLOW);
        list.text("Score: 1", Vec2::ZERO, 1.2, Color::WHITE);

        assert_eq!(list.frames(), 1);
        assert_eq!(list.commands()[0], DrawCommand::Clear(Color::NIGHT));
        assert!(!list.has_text("old"));
        assert!(list.has_text("Score"));
        assert_eq!(list.circles(), 1);
    }
}
