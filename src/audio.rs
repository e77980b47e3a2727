//! Audio playback off the simulation thread
//!
//! The simulation only ever enqueues [`Cue`]s. A dedicated worker drains the
//! queue and plays each clip to completion through an [`AudioBackend`], and a
//! second thread keeps background music looping. Neither thread touches game
//! state, and playback failures stay on the audio side as log lines.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, select};
use thiserror::Error;

use crate::Settings;
use crate::sim::GameEvent;

/// Clip name of the background track
pub const MUSIC_CLIP: &str = "bg";

/// Shortest time between two music starts. A play call that returns sooner
/// (silent backend, player that exits at once) waits out the rest.
pub const MIN_MUSIC_RESTART: Duration = Duration::from_millis(500);

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Balloon popped
    Pop,
    /// Button activated by dwell
    Click,
    /// Round started
    RoundStart,
    /// Round over
    RoundOver,
}

impl Cue {
    /// Clip name; the asset is `<name>.wav`
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Pop => "pop",
            Cue::Click => "click",
            Cue::RoundStart => "start",
            Cue::RoundOver => "over",
        }
    }

    /// Cue to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::BalloonPopped { .. } => Some(Cue::Pop),
            GameEvent::ButtonActivated(_) => Some(Cue::Click),
            GameEvent::RoundStarted => Some(Cue::RoundStart),
            GameEvent::RoundEnded { .. } => Some(Cue::RoundOver),
            GameEvent::ScoreLogFailed | GameEvent::PhaseChanged { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio asset not found: {0}")]
    MissingAsset(PathBuf),
    #[error("audio player command is empty")]
    NoPlayer,
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Status { program: String, status: ExitStatus },
    #[error("failed to start audio thread: {0}")]
    Thread(#[source] std::io::Error),
}

/// Blocking clip playback. Implementations return once the clip has
/// finished (or failed).
pub trait AudioBackend: Send + Sync {
    fn play(&self, clip: &str, volume: f32) -> Result<(), AudioError>;
}

/// Plays `<assets_dir>/<clip>.wav` by running an external player.
///
/// The command template is split on whitespace; `{file}` and `{volume}` are
/// substituted, and the file is appended when `{file}` is absent
/// (e.g. `afplay -v {volume} {file}` or `paplay`).
#[derive(Debug, Clone)]
pub struct CommandBackend {
    template: Vec<String>,
    assets_dir: PathBuf,
}

impl CommandBackend {
    pub fn new(template: &str, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            template: template.split_whitespace().map(str::to_string).collect(),
            assets_dir: assets_dir.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.audio_player, settings.assets_dir.clone())
    }

    /// Program and arguments for one clip
    pub fn command_line(&self, file: &str, volume: f32) -> Option<(String, Vec<String>)> {
        let (program, rest) = self.template.split_first()?;
        let volume = format!("{volume:.2}");
        let mut has_file = false;
        let mut args: Vec<String> = rest
            .iter()
            .map(|arg| {
                has_file |= arg.contains("{file}");
                arg.replace("{file}", file).replace("{volume}", &volume)
            })
            .collect();
        if !has_file {
            args.push(file.to_string());
        }
        Some((program.clone(), args))
    }
}

impl AudioBackend for CommandBackend {
    fn play(&self, clip: &str, volume: f32) -> Result<(), AudioError> {
        let path = self.assets_dir.join(format!("{clip}.wav"));
        if !path.is_file() {
            return Err(AudioError::MissingAsset(path));
        }
        let (program, args) = self
            .command_line(&path.to_string_lossy(), volume)
            .ok_or(AudioError::NoPlayer)?;

        let status = Command::new(&program)
            .args(&args)
            .status()
            .map_err(|source| AudioError::Spawn {
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(AudioError::Status { program, status })
        }
    }
}

/// Backend that plays nothing (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&self, clip: &str, _volume: f32) -> Result<(), AudioError> {
        log::trace!("(silent) {clip}");
        Ok(())
    }
}

/// Cheap, cloneable producer handle for the cue queue
#[derive(Debug, Clone)]
pub struct CueSender {
    tx: Sender<Cue>,
}

impl CueSender {
    /// Queue a cue. Never blocks; after shutdown the cue is dropped.
    pub fn enqueue(&self, cue: Cue) {
        if self.tx.send(cue).is_err() {
            log::debug!("Audio worker stopped, dropping {cue:?}");
        }
    }
}

/// Unbounded FIFO of cues plus the worker that plays them
pub struct AudioCueQueue {
    sender: CueSender,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<usize>>,
}

impl AudioCueQueue {
    /// Start the worker thread
    pub fn spawn(backend: Arc<dyn AudioBackend>, volume: f32) -> Result<Self, AudioError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);

        let worker = thread::Builder::new()
            .name("audio-cues".into())
            .spawn(move || cue_worker(backend, volume, rx, shutdown_rx))
            .map_err(AudioError::Thread)?;

        Ok(Self {
            sender: CueSender { tx },
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
        })
    }

    pub fn sender(&self) -> CueSender {
        self.sender.clone()
    }

    pub fn enqueue(&self, cue: Cue) {
        self.sender.enqueue(cue);
    }

    /// Stop the worker after the clip it is playing, wait for it, and
    /// return how many queued cues were dropped.
    pub fn shutdown(mut self) -> usize {
        self.signal_stop();
        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(dropped)) => dropped,
            Some(Err(_)) => {
                log::error!("Audio cue worker panicked");
                0
            }
            None => 0,
        }
    }

    fn signal_stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            // Dropping the sender alone also wakes the worker
            let _ = tx.try_send(());
        }
    }
}

impl Drop for AudioCueQueue {
    fn drop(&mut self) {
        // Detach: the worker exits on its own once it sees the signal
        self.signal_stop();
    }
}

fn cue_worker(
    backend: Arc<dyn AudioBackend>,
    volume: f32,
    cues: Receiver<Cue>,
    shutdown: Receiver<()>,
) -> usize {
    log::info!("Audio cue worker started");
    let mut held = 0;
    loop {
        // A closed cue channel or a shutdown signal both end the loop
        let next = select! {
            recv(cues) -> msg => msg.ok(),
            recv(shutdown) -> _ => None,
        };
        let Some(cue) = next else { break };
        // Shutdown wins over cues that were already waiting
        if stop_requested(&shutdown) {
            held = 1;
            break;
        }
        if volume <= 0.0 {
            continue;
        }
        if let Err(e) = backend.play(cue.name(), volume) {
            log::warn!("Failed to play {:?}: {e}", cue);
        }
    }

    let dropped = held + cues.try_iter().count();
    if dropped > 0 {
        log::info!("Audio cue worker stopped, dropped {dropped} pending cue(s)");
    } else {
        log::info!("Audio cue worker stopped");
    }
    dropped
}

fn stop_requested(shutdown: &Receiver<()>) -> bool {
    !matches!(shutdown.try_recv(), Err(TryRecvError::Empty))
}

/// Background music that restarts whenever the clip ends
pub struct MusicLoop {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MusicLoop {
    pub fn spawn(
        backend: Arc<dyn AudioBackend>,
        clip: impl Into<String>,
        volume: f32,
        retry_delay: Duration,
    ) -> Result<Self, AudioError> {
        let clip = clip.into();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);

        let handle = thread::Builder::new()
            .name("audio-music".into())
            .spawn(move || music_loop(backend, &clip, volume, retry_delay, shutdown_rx))
            .map_err(AudioError::Thread)?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Ask the loop to stop. It exits before the next restart; a clip that is
    /// already playing runs to its end.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.try_send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for MusicLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn music_loop(
    backend: Arc<dyn AudioBackend>,
    clip: &str,
    volume: f32,
    retry_delay: Duration,
    shutdown: Receiver<()>,
) {
    log::info!("Music loop started ({clip})");
    let mut failures = 0u32;
    loop {
        if stop_requested(&shutdown) {
            break;
        }

        let started = Instant::now();
        match backend.play(clip, volume) {
            Ok(()) => {
                failures = 0;
                let rest = MIN_MUSIC_RESTART.saturating_sub(started.elapsed());
                if !rest.is_zero() {
                    match shutdown.recv_timeout(rest) {
                        Err(RecvTimeoutError::Timeout) => {}
                        _ => break,
                    }
                }
            }
            Err(e) => {
                failures += 1;
                if failures == 1 {
                    log::warn!("Music playback failed: {e}");
                } else {
                    log::debug!("Music playback failed again ({failures}): {e}");
                }
                // Wait before retrying, but wake immediately on shutdown
                match shutdown.recv_timeout(retry_delay) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => break,
                }
            }
        }
    }
    log::info!("Music loop stopped");
}

/// Cue queue and music loop, configured from settings
pub struct AudioSystem {
    queue: AudioCueQueue,
    music: Option<MusicLoop>,
}

impl AudioSystem {
    pub fn start(settings: &Settings, backend: Arc<dyn AudioBackend>) -> Result<Self, AudioError> {
        let queue = AudioCueQueue::spawn(Arc::clone(&backend), settings.effective_sfx_volume())?;

        let music_volume = settings.effective_music_volume();
        let music = if music_volume > 0.0 {
            Some(MusicLoop::spawn(
                backend,
                MUSIC_CLIP,
                music_volume,
                Duration::from_secs_f64(settings.music_retry_delay.max(0.0)),
            )?)
        } else {
            None
        };

        Ok(Self { queue, music })
    }

    pub fn sender(&self) -> CueSender {
        self.queue.sender()
    }

    /// Stop music (without waiting for the current clip) and the cue worker
    pub fn shutdown(mut self) -> usize {
        if let Some(mut music) = self.music.take() {
            music.stop();
        }
        self.queue.shutdown()
    }
}
