//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (wall clock or manual)
//! - Pointer input (normalized coordinates from a tracker)

pub mod clock;
pub mod pointer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pointer::{PointerMapper, PointerSource, ScriptedPointer, TourLeg, TourPointer};
