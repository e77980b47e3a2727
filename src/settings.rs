//! Game settings and tuning
//!
//! Stored as JSON next to the binary. Every field has a default, so a partial
//! file only overrides what it names.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub width: f32,
    pub height: f32,
    /// Round length in seconds
    pub round_duration: f64,

    // === Interaction ===
    /// Hover time before a button activates (seconds)
    pub dwell_threshold: f64,
    /// Exponential smoothing of the pointer (0 = off, 1 = no lag)
    pub pointer_smoothing: f32,

    // === Balloons ===
    /// Probability of spawning a balloon on a given tick
    pub spawn_chance: f64,
    pub balloon_radius: f32,
    pub balloon_margin: f32,
    pub balloon_min_speed: f32,
    pub balloon_max_speed: f32,
    /// Cap on simultaneously alive balloons (0 = unlimited)
    pub max_balloons: usize,

    // === Particles ===
    pub particle_count: usize,
    /// Particle lifetime in ticks
    pub particle_life: u32,
    pub particle_min_speed: f32,
    pub particle_max_speed: f32,
    pub particle_radius: f32,

    // === Scores ===
    pub score_log: PathBuf,
    pub leaderboard_size: usize,

    // === Audio ===
    /// Directory holding `<cue>.wav` files
    pub assets_dir: PathBuf,
    /// External player invoked per clip (receives volume and file path)
    pub audio_player: String,
    /// Master volume (0.0 - 2.0)
    pub master_volume: f32,
    /// Sound effects volume multiplier
    pub sfx_volume: f32,
    /// Music volume multiplier
    pub music_volume: f32,
    pub muted: bool,
    pub music_enabled: bool,
    /// Pause before re-triggering music after a failed play (seconds)
    pub music_retry_delay: f64,

    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
            round_duration: ROUND_DURATION,

            dwell_threshold: DWELL_THRESHOLD,
            pointer_smoothing: 0.0,

            spawn_chance: SPAWN_CHANCE,
            balloon_radius: BALLOON_RADIUS,
            balloon_margin: BALLOON_MARGIN,
            balloon_min_speed: BALLOON_MIN_SPEED,
            balloon_max_speed: BALLOON_MAX_SPEED,
            max_balloons: 0,

            particle_count: PARTICLE_COUNT,
            particle_life: PARTICLE_LIFE,
            particle_min_speed: PARTICLE_MIN_SPEED,
            particle_max_speed: PARTICLE_MAX_SPEED,
            particle_radius: PARTICLE_RADIUS,

            score_log: PathBuf::from("scores.txt"),
            leaderboard_size: LEADERBOARD_SIZE,

            assets_dir: PathBuf::from("assets"),
            audio_player: default_audio_player().to_string(),
            master_volume: 1.0,
            sfx_volume: 1.5,
            music_volume: 1.0,
            muted: false,
            music_enabled: true,
            music_retry_delay: 1.0,

            seed: None,
        }
    }
}

#[cfg(target_os = "macos")]
fn default_audio_player() -> &'static str {
    "afplay -v {volume} {file}"
}

#[cfg(not(target_os = "macos"))]
fn default_audio_player() -> &'static str {
    "paplay"
}

impl Settings {
    /// World size as a vector
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Effective volume for sound effects (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective volume for background music (0 when muted or disabled)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
            Err(SettingsError::Invalid { field, reason })
        }

        if !(self.width > 0.0 && self.height > 0.0) {
            return invalid("width/height", "must be positive");
        }
        if !(self.round_duration > 0.0) {
            return invalid("round_duration", "must be positive");
        }
        if !(self.dwell_threshold >= 0.0) {
            return invalid("dwell_threshold", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.pointer_smoothing) {
            return invalid("pointer_smoothing", "must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return invalid("spawn_chance", "must be within [0, 1]");
        }
        if !(self.balloon_radius > 0.0) {
            return invalid("balloon_radius", "must be positive");
        }
        if !(self.balloon_min_speed <= self.balloon_max_speed) {
            return invalid("balloon_min_speed", "exceeds balloon_max_speed");
        }
        if !(self.balloon_margin >= 0.0 && self.balloon_margin * 2.0 <= self.width) {
            return invalid("balloon_margin", "leaves no room to spawn");
        }
        if !(self.particle_min_speed <= self.particle_max_speed) {
            return invalid("particle_min_speed", "exceeds particle_max_speed");
        }
        if self.particle_life == 0 {
            return invalid("particle_life", "must be at least one tick");
        }
        if self.leaderboard_size == 0 {
            return invalid("leaderboard_size", "must be at least one");
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e}");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.world_size(), Vec2::new(800.0, 600.0));
        assert_eq!(settings.leaderboard_size, 5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "round_duration": 10.0 }"#).unwrap();
        assert_eq!(settings.round_duration, 10.0);
        assert_eq!(settings.dwell_threshold, DWELL_THRESHOLD);
        assert_eq!(settings.particle_count, PARTICLE_COUNT);
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let settings = Settings {
            balloon_min_speed: 6.0,
            balloon_max_speed: 2.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "balloon_min_speed",
                ..
            })
        ));

        let settings = Settings {
            spawn_chance: 1.5,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_muted_volume() {
        let mut settings = Settings::default();
        assert!(settings.effective_sfx_volume() > 0.0);
        settings.muted = true;
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            seed: Some(7),
            max_balloons: 5,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_or_default_on_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(Settings::load_or_default(&broken), Settings::default());
    }
}
