//! Host loop glue
//!
//! One tick, strictly in order: read the clock, poll the pointer, map it to
//! world space, update the state machine, hand events to audio, draw.

use glam::Vec2;

use crate::Settings;
use crate::settings::SettingsError;
use crate::audio::{Cue, CueSender};
use crate::platform::{Clock, PointerMapper, PointerSource};
use crate::renderer::{Canvas, SpriteSet};
use crate::sim::{GameEvent, GameStateMachine, TickInput};
use crate::ui;

/// Outcome of a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Pointer used this tick, in world coordinates
    pub pointer: Option<Vec2>,
    pub events: Vec<GameEvent>,
}

/// Owns the simulation and everything it needs per tick
pub struct Engine {
    machine: GameStateMachine,
    mapper: PointerMapper,
    sprites: SpriteSet,
    cues: Option<CueSender>,
    ticks: u64,
}

impl Engine {
    /// Fails on settings that do not validate
    pub fn new(settings: &Settings, player_name: &str, seed: u64) -> Result<Self, SettingsError> {
        Ok(Self {
            machine: GameStateMachine::new(settings, player_name, seed)?,
            mapper: PointerMapper::new(settings.world_size(), settings.pointer_smoothing),
            sprites: SpriteSet::default(),
            cues: None,
            ticks: 0,
        })
    }

    /// Route sound cues to an audio queue
    pub fn with_audio(mut self, cues: CueSender) -> Self {
        self.cues = Some(cues);
        self
    }

    pub fn with_sprites(mut self, sprites: SpriteSet) -> Self {
        self.sprites = sprites;
        self
    }

    pub fn machine(&self) -> &GameStateMachine {
        &self.machine
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick at time `now`
    pub fn tick(&mut self, source: &mut dyn PointerSource, canvas: &mut dyn Canvas, now: f64) -> TickReport {
        let pointer = self.mapper.map(source.poll());
        let events = self.machine.update(&TickInput { pointer, now });

        if let Some(cues) = &self.cues {
            for cue in events.iter().filter_map(Cue::for_event) {
                cues.enqueue(cue);
            }
        }

        ui::draw(canvas, &self.machine, &self.sprites, pointer, now);
        self.ticks += 1;
        TickReport { pointer, events }
    }

    /// Tick until `should_quit` returns true. `pace` runs after every tick
    /// (frame limiting, window events).
    pub fn run(
        &mut self,
        clock: &dyn Clock,
        source: &mut dyn PointerSource,
        canvas: &mut dyn Canvas,
        mut should_quit: impl FnMut(&TickReport) -> bool,
        mut pace: impl FnMut(),
    ) {
        log::info!("Engine running as {}", self.machine.player_name());
        loop {
            let report = self.tick(source, canvas, clock.now());
            if should_quit(&report) {
                break;
            }
            pace();
        }
        log::info!("Engine stopped after {} ticks", self.ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioBackend, AudioCueQueue, AudioError};
    use crate::platform::{ManualClock, ScriptedPointer};
    use crate::renderer::DrawList;
    use crate::sim::GamePhase;
    use crate::sim::layout::START_BUTTON;
    use std::sync::{Arc, Mutex};

    fn settings(dir: &tempfile::TempDir) -> Settings {
        Settings {
            spawn_chance: 0.0,
            score_log: dir.path().join("scores.txt"),
            ..Settings::default()
        }
    }

    /// Normalized position of a world point
    fn normalized(p: Vec2) -> Vec2 {
        p / Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_tick_scales_pointer_and_draws() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::new(&settings(&dir), "eng", 1).unwrap();
        let mut source = ScriptedPointer::new([Some(Vec2::new(0.5, 0.5)), None]);
        let mut canvas = DrawList::new();

        let report = engine.tick(&mut source, &mut canvas, 0.0);
        assert_eq!(report.pointer, Some(Vec2::new(400.0, 300.0)));
        assert!(canvas.has_text("BALLOON POP"));

        let report = engine.tick(&mut source, &mut canvas, 0.1);
        assert_eq!(report.pointer, None);
        assert_eq!(engine.ticks(), 2);
        assert_eq!(canvas.frames(), 2);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            spawn_chance: 1.5,
            ..settings(&dir)
        };
        assert!(Engine::new(&settings, "eng", 1).is_err());
    }

    #[test]
    fn test_run_until_round_starts() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::new(&settings(&dir), "eng", 1).unwrap();
        let start = Some(normalized(START_BUTTON.center()));
        let mut source = ScriptedPointer::new(std::iter::repeat_n(start, 100));
        let mut canvas = DrawList::new();
        let clock = ManualClock::new(0.0);

        engine.run(
            &clock,
            &mut source,
            &mut canvas,
            |report| report.events.contains(&GameEvent::RoundStarted),
            || clock.advance(0.1),
        );
        assert_eq!(engine.machine().phase(), GamePhase::Playing);
        // Ticks at 0.0, 0.1, 0.2, 0.3: the first one past the dwell threshold activates
        assert_eq!(engine.ticks(), 4);
        assert!(canvas.has_text("Score: 0"));
    }

    struct Collect(Mutex<Vec<String>>);

    impl AudioBackend for Collect {
        fn play(&self, clip: &str, _volume: f32) -> Result<(), AudioError> {
            self.0.lock().unwrap().push(clip.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_events_become_cues() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(Collect(Mutex::new(Vec::new())));
        let queue = AudioCueQueue::spawn(backend.clone(), 1.0).unwrap();
        let mut engine = Engine::new(&settings(&dir), "eng", 1).unwrap().with_audio(queue.sender());

        let start = Some(normalized(START_BUTTON.center()));
        let mut source = ScriptedPointer::new([start, start]);
        let mut canvas = DrawList::new();
        engine.tick(&mut source, &mut canvas, 0.0);
        engine.tick(&mut source, &mut canvas, 0.3);

        // Wait for the worker to drain, then stop it
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while backend.0.lock().unwrap().len() < 2 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        queue.shutdown();
        assert_eq!(*backend.0.lock().unwrap(), vec!["click", "start"]);
    }
}
