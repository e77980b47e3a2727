//! Balloon Pop demo host
//!
//! Runs the engine headless: a scripted tour stands in for the hand tracker
//! and frames are recorded into a draw list instead of a window.
//!
//! Run with `--help` for options.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use glam::Vec2;

use balloon_pop::audio::{AudioBackend, AudioSystem, CommandBackend, NullBackend};
use balloon_pop::consts::FRAME_MILLIS;
use balloon_pop::engine::TickReport;
use balloon_pop::persistence::score_log::DEFAULT_PLAYER_NAME;
use balloon_pop::platform::{ManualClock, SystemClock, TourLeg, TourPointer};
use balloon_pop::renderer::DrawList;
use balloon_pop::sim::layout;
use balloon_pop::{Engine, Settings};

const DEFAULT_CONFIG: &str = "balloon-pop.json";
const DEFAULT_TICKS: u64 = 2400;

/// Headless Balloon Pop run with a scripted pointer.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used when it is missing.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    config: PathBuf,
    /// Name recorded in the score log.
    #[arg(long, default_value = DEFAULT_PLAYER_NAME)]
    name: String,
    /// Number of frames to run before exiting.
    #[arg(
        long,
        value_name = "FRAMES",
        default_value_t = DEFAULT_TICKS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ticks: u64,
    /// Advance a simulated clock instead of sleeping between frames.
    #[arg(long)]
    fast: bool,
}

/// Scripted pointer path: start a round, sweep the sky, then visit the
/// leaderboard and return to the menu.
fn demo_tour(settings: &Settings) -> TourPointer {
    // Layout constants are reference coordinates, so normalize against that size
    let norm = |p: Vec2| p / layout::REFERENCE_SIZE;
    let frame_secs = FRAME_MILLIS as f64 / 1000.0;
    let dwell_ticks = (settings.dwell_threshold / frame_secs) as u32 + 10;
    let round_ticks = (settings.round_duration / frame_secs) as u32;

    let mut legs = vec![TourLeg::hold(norm(layout::START_BUTTON.center()), dwell_ticks)];
    let corners = [
        Vec2::new(0.1, 0.9),
        Vec2::new(0.9, 0.6),
        Vec2::new(0.2, 0.3),
        Vec2::new(0.8, 0.1),
    ];
    let sweep = 90;
    let mut covered = 0;
    let mut i = 0;
    while covered < round_ticks {
        let from = corners[i % corners.len()];
        let to = corners[(i + 1) % corners.len()];
        legs.push(TourLeg::line(from, to, sweep));
        covered += sweep;
        i += 1;
    }
    legs.push(TourLeg::hold(norm(layout::LEADERBOARD_BUTTON.center()), dwell_ticks));
    legs.push(TourLeg::hold(norm(layout::LEADERBOARD_MENU_BUTTON.center()), dwell_ticks));
    TourPointer::new(legs)
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Balloon Pop starting...");

    let settings = Settings::load_or_default(&args.config);
    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("Seed: {seed}");

    let backend: Arc<dyn AudioBackend> = if settings.assets_dir.is_dir() {
        Arc::new(CommandBackend::from_settings(&settings))
    } else {
        log::warn!("No assets at {}, running silent", settings.assets_dir.display());
        Arc::new(NullBackend)
    };
    let audio = match AudioSystem::start(&settings, backend) {
        Ok(audio) => Some(audio),
        Err(e) => {
            log::warn!("Audio disabled: {e}");
            None
        }
    };

    let mut engine = Engine::new(&settings, &args.name, seed)?;
    if let Some(audio) = &audio {
        engine = engine.with_audio(audio.sender());
    }

    let mut pointer = demo_tour(&settings);
    let mut canvas = DrawList::new();
    let frame = Duration::from_millis(FRAME_MILLIS);
    let limit = args.ticks;

    let mut ticks = 0;
    let mut done = |_: &TickReport| {
        ticks += 1;
        ticks >= limit
    };
    if args.fast {
        let clock = ManualClock::new(0.0);
        engine.run(&clock, &mut pointer, &mut canvas, &mut done, || {
            clock.advance(frame.as_secs_f64())
        });
    } else {
        let clock = SystemClock::new();
        engine.run(&clock, &mut pointer, &mut canvas, &mut done, || {
            std::thread::sleep(frame)
        });
    }

    log::info!(
        "Finished in {:?} after {} frames",
        engine.machine().phase(),
        canvas.frames()
    );
    match engine.machine().score_log().top(settings.leaderboard_size) {
        Ok(top) => {
            for (i, entry) in top.iter().enumerate() {
                println!("{}. {} : {}", i + 1, entry.player_name, entry.score);
            }
        }
        Err(e) => log::error!("Could not read scores: {e}"),
    }

    if let Some(audio) = audio {
        let dropped = audio.shutdown();
        if dropped > 0 {
            log::debug!("{dropped} cues dropped at shutdown");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_and_overrides() {
        let args = Args::try_parse_from(["balloon-pop"]).unwrap();
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG));
        assert_eq!(args.name, DEFAULT_PLAYER_NAME);
        assert_eq!(args.ticks, DEFAULT_TICKS);
        assert!(!args.fast);

        let args =
            Args::try_parse_from(["balloon-pop", "--name", "ada", "--ticks", "10", "--fast"]).unwrap();
        assert_eq!(args.name, "ada");
        assert_eq!(args.ticks, 10);
        assert!(args.fast);
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Args::try_parse_from(["balloon-pop", "--ticks", "0"]).is_err());
        assert!(Args::try_parse_from(["balloon-pop", "--ticks", "many"]).is_err());
        assert!(Args::try_parse_from(["balloon-pop", "--volume", "3"]).is_err());
    }
}
