//! Per-tick state machine update
//!
//! Drives the Menu -> Playing -> GameOver -> (Leaderboard) -> Menu cycle.
//! Time comes in through [`TickInput::now`] (wall-clock seconds), so ticks
//! may arrive at any cadence.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::dwell::{ButtonId, DwellClickDetector};
use super::layout;
use super::particles::{ParticleConfig, ParticleSystem};
use super::state::{Balloon, GameEvent, GamePhase, Round, Screen};
use crate::Settings;
use crate::settings::SettingsError;
use crate::persistence::{ScoreLog, ScoreRecord, score_log::sanitize_player_name};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer in world coordinates, `None` when nothing was detected
    pub pointer: Option<Vec2>,
    /// Wall-clock seconds
    pub now: f64,
}

/// Owns every piece of simulation state
#[derive(Debug)]
pub struct GameStateMachine {
    settings: Settings,
    player_name: String,
    screen: Screen,
    dwell: DwellClickDetector,
    particles: ParticleSystem,
    score_log: ScoreLog,
    rng: Pcg32,
}

impl GameStateMachine {
    /// Start on the menu. Fails if `settings` does not pass
    /// [`Settings::validate`].
    pub fn new(settings: &Settings, player_name: &str, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: settings.clone(),
            player_name: sanitize_player_name(player_name),
            screen: Screen::Menu,
            dwell: DwellClickDetector::new(settings.dwell_threshold),
            particles: ParticleSystem::new(ParticleConfig::from(settings), seed ^ 0x9e37_79b9_7f4a_7c15),
            score_log: ScoreLog::new(settings.score_log.clone()),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn phase(&self) -> GamePhase {
        self.screen.phase()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn dwell(&self) -> &DwellClickDetector {
        &self.dwell
    }

    pub fn score_log(&self) -> &ScoreLog {
        &self.score_log
    }

    /// Advance one tick and report what happened
    pub fn update(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let now = input.now;
        let phase = self.screen.phase();
        let buttons = layout::buttons(phase, self.settings.world_size());

        let next = match &mut self.screen {
            Screen::Menu => match self.dwell.poll(&buttons, input.pointer, now) {
                Some(ButtonId::Start) => {
                    events.push(GameEvent::ButtonActivated(ButtonId::Start));
                    Some(Transition::StartRound)
                }
                _ => None,
            },

            Screen::Playing(round) => {
                if round.elapsed(now) > self.settings.round_duration {
                    Some(Transition::EndRound { score: round.score })
                } else {
                    update_round(
                        round,
                        &self.settings,
                        &mut self.rng,
                        &mut self.particles,
                        input.pointer,
                        &mut events,
                    );
                    None
                }
            }

            Screen::GameOver { .. } => {
                let hit = self.dwell.poll(&buttons, input.pointer, now);
                if let Some(id) = hit {
                    events.push(GameEvent::ButtonActivated(id));
                }
                match hit {
                    Some(ButtonId::Leaderboard) => Some(Transition::ShowLeaderboard),
                    Some(ButtonId::Menu) => Some(Transition::ToMenu),
                    _ => None,
                }
            }

            Screen::Leaderboard { .. } => match self.dwell.poll(&buttons, input.pointer, now) {
                Some(ButtonId::Menu) => {
                    events.push(GameEvent::ButtonActivated(ButtonId::Menu));
                    Some(Transition::ToMenu)
                }
                _ => None,
            },
        };

        if let Some(transition) = next {
            self.apply(transition, now, &mut events);
        }

        self.particles.advance();
        events
    }

    fn apply(&mut self, transition: Transition, now: f64, events: &mut Vec<GameEvent>) {
        let from = self.screen.phase();
        self.screen = match transition {
            Transition::StartRound => {
                self.particles.clear();
                events.push(GameEvent::RoundStarted);
                Screen::Playing(Round::new(now))
            }
            Transition::EndRound { score } => {
                let record = ScoreRecord::new(&self.player_name, score);
                if let Err(e) = self.score_log.append(&record) {
                    log::error!("{e}");
                    events.push(GameEvent::ScoreLogFailed);
                }
                events.push(GameEvent::RoundEnded { score });
                Screen::GameOver { score }
            }
            Transition::ShowLeaderboard => {
                let entries = match self.score_log.top(self.settings.leaderboard_size) {
                    Ok(entries) => entries,
                    Err(e) => {
                        log::error!("{e}");
                        events.push(GameEvent::ScoreLogFailed);
                        Vec::new()
                    }
                };
                Screen::Leaderboard { entries }
            }
            Transition::ToMenu => Screen::Menu,
        };
        self.dwell.reset();

        let to = self.screen.phase();
        log::info!("Phase {from:?} -> {to:?}");
        events.push(GameEvent::PhaseChanged { from, to });
    }
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    StartRound,
    EndRound { score: u64 },
    ShowLeaderboard,
    ToMenu,
}

/// Spawn, move, and hit-test balloons for one tick of a running round
fn update_round(
    round: &mut Round,
    settings: &Settings,
    rng: &mut Pcg32,
    particles: &mut ParticleSystem,
    pointer: Option<Vec2>,
    events: &mut Vec<GameEvent>,
) {
    let at_cap = settings.max_balloons > 0 && round.alive_count() >= settings.max_balloons;
    if !at_cap && rng.random_bool(settings.spawn_chance) {
        let x = rng.random_range(settings.balloon_margin..=settings.width - settings.balloon_margin);
        let speed = rng.random_range(settings.balloon_min_speed..=settings.balloon_max_speed);
        round.balloons.push(Balloon::new(
            Vec2::new(x, settings.height),
            settings.balloon_radius,
            speed,
        ));
    }

    for balloon in round.balloons.iter_mut().filter(|b| b.alive) {
        balloon.rise();

        if pointer.is_some_and(|p| balloon.is_hit_by(p)) {
            balloon.alive = false;
            round.score += 1;
            particles.spawn_explosion(balloon.pos);
            events.push(GameEvent::BalloonPopped { pos: balloon.pos });
        }
    }

    round.balloons.retain(|b| b.alive && !b.is_off_screen());
}
