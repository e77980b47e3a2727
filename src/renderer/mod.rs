//! Rendering primitives
//!
//! The host supplies a [`Canvas`]; the UI only issues high-level draw calls
//! (rectangles, circles, text, sprites). [`DrawList`] records them for
//! headless runs and tests.

pub mod canvas;
pub mod draw_list;

pub use canvas::{Canvas, Color, SpriteId, SpriteSet};
pub use draw_list::{DrawCommand, DrawList};
