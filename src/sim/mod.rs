//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of I/O other than
//! the score log, and of any rendering or audio dependency:
//! - Time is passed in, never read
//! - Seeded RNG only
//! - Events out, no side channels

pub mod dwell;
pub mod layout;
pub mod particles;
pub mod rect;
pub mod state;
pub mod tick;

pub use dwell::{ButtonId, DwellClickDetector};
pub use particles::{Particle, ParticleConfig, ParticleSystem};
pub use rect::Rect;
pub use state::{Balloon, GameEvent, GamePhase, Round, Screen};
pub use tick::{GameStateMachine, TickInput};
