//! Button placement per screen
//!
//! Rectangles are authored on an 800x600 reference screen and stretched to
//! the configured world size.

use glam::Vec2;

use super::dwell::ButtonId;
use super::rect::Rect;
use super::state::GamePhase;
use crate::consts::{GAME_HEIGHT, GAME_WIDTH};

/// Screen size the layout constants are written for
pub const REFERENCE_SIZE: Vec2 = Vec2::new(GAME_WIDTH, GAME_HEIGHT);

pub const START_BUTTON: Rect = Rect::new(300.0, 280.0, 200.0, 80.0);
pub const LEADERBOARD_BUTTON: Rect = Rect::new(300.0, 370.0, 200.0, 70.0);
pub const GAME_OVER_MENU_BUTTON: Rect = Rect::new(300.0, 460.0, 200.0, 80.0);
pub const LEADERBOARD_MENU_BUTTON: Rect = Rect::new(300.0, 480.0, 200.0, 80.0);

const MENU: &[(ButtonId, Rect)] = &[(ButtonId::Start, START_BUTTON)];
const GAME_OVER: &[(ButtonId, Rect)] = &[
    (ButtonId::Leaderboard, LEADERBOARD_BUTTON),
    (ButtonId::Menu, GAME_OVER_MENU_BUTTON),
];
const LEADERBOARD: &[(ButtonId, Rect)] = &[(ButtonId::Menu, LEADERBOARD_MENU_BUTTON)];

/// Factor from reference coordinates to a world of size `world`
#[inline]
pub fn scale(world: Vec2) -> Vec2 {
    world / REFERENCE_SIZE
}

/// Dwell targets shown on a screen, in world coordinates
pub fn buttons(phase: GamePhase, world: Vec2) -> Vec<(ButtonId, Rect)> {
    let reference = match phase {
        GamePhase::Menu => MENU,
        GamePhase::Playing => &[],
        GamePhase::GameOver => GAME_OVER,
        GamePhase::Leaderboard => LEADERBOARD,
    };
    let factor = scale(world);
    reference.iter().map(|&(id, rect)| (id, rect.scaled(factor))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_on_a_screen_do_not_overlap() {
        for phase in [GamePhase::Menu, GamePhase::GameOver, GamePhase::Leaderboard] {
            let list = buttons(phase, REFERENCE_SIZE);
            for (i, (_, a)) in list.iter().enumerate() {
                for (_, b) in &list[i + 1..] {
                    let overlap = a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h;
                    assert!(!overlap, "{phase:?}: {a:?} overlaps {b:?}");
                }
            }
        }
        assert!(buttons(GamePhase::Playing, REFERENCE_SIZE).is_empty());
    }

    #[test]
    fn test_buttons_follow_world_size() {
        assert_eq!(buttons(GamePhase::Menu, REFERENCE_SIZE), vec![(ButtonId::Start, START_BUTTON)]);

        let wide = buttons(GamePhase::Menu, Vec2::new(1600.0, 1200.0));
        assert_eq!(wide, vec![(ButtonId::Start, Rect::new(600.0, 560.0, 400.0, 160.0))]);
        // Same normalized position regardless of world size
        assert_eq!(wide[0].1.center() / Vec2::new(1600.0, 1200.0), START_BUTTON.center() / REFERENCE_SIZE);
    }
}
