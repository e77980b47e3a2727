//! Dwell-to-click detection
//!
//! The pointer has no press/release, so a button "clicks" when the pointer
//! rests inside it for longer than the dwell threshold.
//!
//! Firing is edge-triggered: a button fires once per continuous hover and
//! re-arms only after the pointer leaves it, the pointer disappears, or
//! [`DwellClickDetector::reset`] is called. Holding still on a button never
//! produces a second activation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Identifies a dwell target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    Start,
    Leaderboard,
    Menu,
}

impl ButtonId {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonId::Start => "START",
            ButtonId::Leaderboard => "LEADERBOARD",
            ButtonId::Menu => "MENU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hover {
    target: ButtonId,
    start: f64,
    fired: bool,
}

/// Tracks the single button currently being hovered
#[derive(Debug, Clone)]
pub struct DwellClickDetector {
    threshold: f64,
    hover: Option<Hover>,
}

impl DwellClickDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            hover: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed one tick for `target`. Returns true on the first tick where the
    /// pointer has stayed inside `rect` for longer than the threshold.
    pub fn check(&mut self, target: ButtonId, rect: Rect, pointer: Option<Vec2>, now: f64) -> bool {
        let Some(p) = pointer else {
            self.hover = None;
            return false;
        };

        if !rect.contains(p) {
            if self.hovered() == Some(target) {
                self.hover = None;
            }
            return false;
        }

        match &mut self.hover {
            Some(hover) if hover.target == target => {
                if !hover.fired && now - hover.start > self.threshold {
                    hover.fired = true;
                    true
                } else {
                    false
                }
            }
            // Entering this button (or switching from another one)
            _ => {
                self.hover = Some(Hover {
                    target,
                    start: now,
                    fired: false,
                });
                false
            }
        }
    }

    /// Check a whole screen of buttons. The first button containing the
    /// pointer is fed to [`check`](Self::check); if none contains it, the
    /// hover state is cleared.
    pub fn poll(&mut self, buttons: &[(ButtonId, Rect)], pointer: Option<Vec2>, now: f64) -> Option<ButtonId> {
        let hit = pointer.and_then(|p| buttons.iter().find(|(_, rect)| rect.contains(p)));
        match hit {
            Some(&(id, rect)) => self.check(id, rect, pointer, now).then_some(id),
            None => {
                self.reset();
                None
            }
        }
    }

    /// Button under the pointer, if any
    pub fn hovered(&self) -> Option<ButtonId> {
        self.hover.map(|h| h.target)
    }

    /// Dwell progress of the hovered button in [0, 1]
    pub fn progress(&self, now: f64) -> Option<(ButtonId, f32)> {
        self.hover.map(|h| {
            let t = if self.threshold > 0.0 {
                ((now - h.start) / self.threshold).clamp(0.0, 1.0)
            } else {
                1.0
            };
            (h.target, t as f32)
        })
    }

    pub fn reset(&mut self) {
        self.hover = None;
    }
}
