//! Balloon Pop - a pointer-driven arcade game engine
//!
//! Core modules:
//! - `sim`: Simulation (state machine, balloons, particles, dwell-to-click)
//! - `audio`: Background cue queue and music loop
//! - `renderer`: Drawing primitives consumed by the UI
//! - `platform`: Pointer source and clock abstraction
//! - `persistence`: Append-only score log
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use engine::Engine;
pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World dimensions (pixels)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Round length in seconds
    pub const ROUND_DURATION: f64 = 30.0;
    /// Hover time before a button activates (seconds)
    pub const DWELL_THRESHOLD: f64 = 0.25;

    /// Chance per tick that a new balloon appears
    pub const SPAWN_CHANCE: f64 = 0.04;
    pub const BALLOON_RADIUS: f32 = 25.0;
    /// Horizontal spawn margin from either edge
    pub const BALLOON_MARGIN: f32 = 40.0;
    pub const BALLOON_MIN_SPEED: f32 = 2.0;
    pub const BALLOON_MAX_SPEED: f32 = 5.0;

    /// Particle burst defaults
    pub const PARTICLE_COUNT: usize = 20;
    pub const PARTICLE_LIFE: u32 = 20;
    pub const PARTICLE_MIN_SPEED: f32 = 2.0;
    pub const PARTICLE_MAX_SPEED: f32 = 6.0;
    pub const PARTICLE_RADIUS: f32 = 3.0;

    /// Leaderboard length
    pub const LEADERBOARD_SIZE: usize = 5;

    /// Host frame pacing (~60 Hz)
    pub const FRAME_MILLIS: u64 = 16;
}

/// Rescale a normalized [0,1] coordinate pair into world space
#[inline]
pub fn normalized_to_world(normalized: Vec2, world: Vec2) -> Vec2 {
    normalized * world
}

/// Point on a circle of `radius` around the origin at `angle`
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
