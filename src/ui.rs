//! Screen drawing
//!
//! Reads the state machine and issues draw calls; never mutates game state.
//! Positions are written for the 800x600 reference screen and stretched to
//! the configured world size.

use glam::Vec2;

use crate::renderer::{Canvas, Color, SpriteSet};
use crate::sim::layout;
use crate::sim::{ButtonId, GamePhase, GameStateMachine, Rect, Round, Screen};

const AVATAR_SIZE: f32 = 70.0;
const HOVER_THICKNESS: f32 = 3.0;
const PROGRESS_HEIGHT: f32 = 6.0;

/// Reference-to-world mapping for one frame
#[derive(Debug, Clone, Copy)]
struct Frame {
    scale: Vec2,
}

impl Frame {
    fn at(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) * self.scale
    }

    fn rect(&self, rect: Rect) -> Rect {
        rect.scaled(self.scale)
    }

    fn size(&self, size: f32) -> f32 {
        size * self.scale.min_element()
    }

    fn text(&self, canvas: &mut dyn Canvas, text: &str, x: f32, y: f32, size: f32, color: Color) {
        canvas.text(text, self.at(x, y), self.size(size), color);
    }
}

/// Draw one full frame for the current screen
pub fn draw(
    canvas: &mut dyn Canvas,
    machine: &GameStateMachine,
    sprites: &SpriteSet,
    pointer: Option<Vec2>,
    now: f64,
) {
    let world = machine.settings().world_size();
    let frame = Frame {
        scale: layout::scale(world),
    };
    canvas.clear(Color::NIGHT);
    if let Some(bg) = sprites.background {
        canvas.sprite(bg, Vec2::ZERO, world);
    }

    match machine.screen() {
        Screen::Menu => draw_menu(canvas, &frame),
        Screen::Playing(round) => draw_round(canvas, &frame, round, machine, sprites, pointer, now),
        Screen::GameOver { score } => draw_game_over(canvas, &frame, *score),
        Screen::Leaderboard { entries } => {
            frame.text(canvas, "LEADERBOARD", 200.0, 120.0, 1.8, Color::WHITE);
            let mut y = 200.0;
            for (i, entry) in entries.iter().enumerate() {
                let line = format!("{}. {} : {}", i + 1, entry.player_name, entry.score);
                frame.text(canvas, &line, 240.0, y, 1.0, Color::GREY);
                y += 40.0;
            }
            draw_button(canvas, &frame, ButtonId::Menu, layout::LEADERBOARD_MENU_BUTTON);
        }
    }

    for (center, radius) in machine.particles().markers() {
        canvas.fill_circle(center, radius, Color::YELLOW);
    }

    draw_hover(canvas, machine, now);
    canvas.present();
}

fn draw_menu(canvas: &mut dyn Canvas, frame: &Frame) {
    frame.text(canvas, "BALLOON POP", 200.0, 180.0, 2.0, Color::WHITE);
    draw_button(canvas, frame, ButtonId::Start, layout::START_BUTTON);
}

fn draw_round(
    canvas: &mut dyn Canvas,
    frame: &Frame,
    round: &Round,
    machine: &GameStateMachine,
    sprites: &SpriteSet,
    pointer: Option<Vec2>,
    now: f64,
) {
    // Balloons already live in world coordinates
    if let Some(balloon_sprite) = sprites.balloon {
        for balloon in round.balloons.iter().filter(|b| b.alive) {
            let size = Vec2::splat(balloon.radius * 2.0);
            canvas.sprite(balloon_sprite, balloon.pos - size / 2.0, size);
        }
    }

    if let (Some(avatar), Some(p)) = (sprites.avatar, pointer) {
        let size = Vec2::splat(frame.size(AVATAR_SIZE));
        canvas.sprite(avatar, p - size / 2.0, size);
    }

    let remaining = round.remaining_secs(now, machine.settings().round_duration);
    frame.text(canvas, &format!("Score: {}", round.score), 20.0, 50.0, 1.2, Color::WHITE);
    frame.text(canvas, &format!("Time: {remaining}"), 600.0, 50.0, 1.2, Color::WHITE);
}

fn draw_game_over(canvas: &mut dyn Canvas, frame: &Frame, score: u64) {
    frame.text(canvas, "GAME OVER", 220.0, 220.0, 2.0, Color::RED);
    frame.text(canvas, &format!("Score: {score}"), 300.0, 300.0, 1.4, Color::WHITE);
    draw_button(canvas, frame, ButtonId::Leaderboard, layout::LEADERBOARD_BUTTON);
    draw_button(canvas, frame, ButtonId::Menu, layout::GAME_OVER_MENU_BUTTON);
}

/// `rect` is in reference coordinates
fn draw_button(canvas: &mut dyn Canvas, frame: &Frame, id: ButtonId, rect: Rect) {
    let (fill, size) = match id {
        ButtonId::Start => (Color::GREEN, 1.2),
        ButtonId::Leaderboard => (Color::ORANGE, 0.8),
        ButtonId::Menu => (Color::GREEN, 1.0),
    };
    canvas.fill_rect(frame.rect(rect), fill);

    // Rough centering: ~20px per glyph at size 1
    let label = id.label();
    let width = label.len() as f32 * 20.0 * size;
    let center = rect.center();
    frame.text(canvas, label, center.x - width / 2.0, center.y + 10.0 * size, size, Color::WHITE);
}

/// Outline the hovered button and show how far its dwell has progressed
fn draw_hover(canvas: &mut dyn Canvas, machine: &GameStateMachine, now: f64) {
    let phase = machine.phase();
    if phase == GamePhase::Playing {
        return;
    }
    let Some((id, progress)) = machine.dwell().progress(now) else {
        return;
    };
    let buttons = layout::buttons(phase, machine.settings().world_size());
    let Some(&(_, rect)) = buttons.iter().find(|(b, _)| *b == id) else {
        return;
    };

    canvas.stroke_rect(rect, Color::YELLOW, HOVER_THICKNESS);
    let bar = Rect::new(
        rect.x,
        rect.y + rect.h - PROGRESS_HEIGHT,
        rect.w * progress,
        PROGRESS_HEIGHT,
    );
    canvas.fill_rect(bar, Color::YELLOW);
}
