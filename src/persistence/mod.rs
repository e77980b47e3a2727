//! Persistence for completed runs
//!
//! Features:
//! - Flat UTF-8 text log, one `<name> <score>` record per line
//! - Append-only writes (prior records are never rewritten)
//! - Defensive parsing (malformed lines are skipped)

pub mod score_log;

pub use score_log::{ScoreLog, ScoreLogError, ScoreRecord};
