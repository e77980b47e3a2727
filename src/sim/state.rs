//! Game state and core simulation types
//!
//! Exactly one [`Screen`] is active at a time; its variant carries the data
//! scoped to that screen, so leaving a screen drops its data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dwell::ButtonId;
use crate::persistence::ScoreRecord;

/// Fieldless view of the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with the Start button
    Menu,
    /// Timed round
    Playing,
    /// Round finished, final score shown
    GameOver,
    /// Top scores from the log
    Leaderboard,
}

/// A rising balloon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick upward
    pub rise_speed: f32,
    pub alive: bool,
}

impl Balloon {
    pub fn new(pos: Vec2, radius: f32, rise_speed: f32) -> Self {
        Self {
            pos,
            radius,
            rise_speed,
            alive: true,
        }
    }

    /// Move up one tick (screen y grows downward)
    pub fn rise(&mut self) {
        self.pos.y -= self.rise_speed;
    }

    /// Strictly inside the hit radius
    pub fn is_hit_by(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }

    /// Entirely above the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y + self.radius < 0.0
    }
}

/// State scoped to one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub score: u64,
    /// Alive balloons (popped ones are pruned the tick they pop)
    pub balloons: Vec<Balloon>,
    /// Wall-clock seconds when the round began
    pub start_time: f64,
}

impl Round {
    pub fn new(start_time: f64) -> Self {
        Self {
            score: 0,
            balloons: Vec::new(),
            start_time,
        }
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.start_time
    }

    /// Whole seconds left, as shown on the HUD
    pub fn remaining_secs(&self, now: f64, duration: f64) -> u64 {
        (duration - self.elapsed(now).max(0.0).floor()).max(0.0) as u64
    }

    pub fn alive_count(&self) -> usize {
        self.balloons.iter().filter(|b| b.alive).count()
    }
}

/// The active screen and its data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    Playing(Round),
    GameOver { score: u64 },
    Leaderboard { entries: Vec<ScoreRecord> },
}

impl Screen {
    pub fn phase(&self) -> GamePhase {
        match self {
            Screen::Menu => GamePhase::Menu,
            Screen::Playing(_) => GamePhase::Playing,
            Screen::GameOver { .. } => GamePhase::GameOver,
            Screen::Leaderboard { .. } => GamePhase::Leaderboard,
        }
    }

    /// Score of the running or just-finished round
    pub fn score(&self) -> Option<u64> {
        match self {
            Screen::Playing(round) => Some(round.score),
            Screen::GameOver { score } => Some(*score),
            _ => None,
        }
    }
}

/// Things that happened during a tick, for audio and the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A button finished its dwell
    ButtonActivated(ButtonId),
    RoundStarted,
    /// A balloon was hit at this position
    BalloonPopped { pos: Vec2 },
    RoundEnded { score: u64 },
    /// The score could not be written or read
    ScoreLogFailed,
    PhaseChanged { from: GamePhase, to: GamePhase },
}
