//! Append-only score log
//!
//! One record per line: `<name> <score>`. Names never contain whitespace
//! (see [`sanitize_player_name`]), so a line splits cleanly into fields.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::HighScores;

/// Name used when the player did not provide one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Error)]
pub enum ScoreLogError {
    #[error("failed to append to score log {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read score log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u64,
}

impl ScoreRecord {
    pub fn new(player_name: &str, score: u64) -> Self {
        Self {
            player_name: sanitize_player_name(player_name),
            score,
        }
    }

    /// Serialized form, without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{} {}", self.player_name, self.score)
    }

    /// Parse one log line. Extra trailing fields are ignored; anything else
    /// that does not look like `<name> <integer>` yields `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let name = fields.next()?;
        let score = fields.next()?.parse().ok()?;
        Some(Self {
            player_name: name.to_string(),
            score,
        })
    }
}

/// Replace whitespace with `_` so the name stays a single field
pub fn sanitize_player_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        cleaned
    }
}

/// Handle to the on-disk log
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to disk before returning.
    ///
    /// The line is written with a single `write_all` on a file opened in
    /// append mode, so earlier records are never touched. A torn last line
    /// (no trailing newline) is closed off first so the new record stays
    /// on a line of its own.
    pub fn append(&self, record: &ScoreRecord) -> Result<(), ScoreLogError> {
        let wrap = |source| ScoreLogError::Append {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(wrap)?;
        let torn = ends_mid_line(&mut file).map_err(wrap)?;
        if torn {
            log::warn!("Score log {} ends mid-line, starting a new one", self.path.display());
        }
        let line = format!("{}{}\n", if torn { "\n" } else { "" }, record.to_line());
        file.write_all(line.as_bytes()).map_err(wrap)?;
        file.sync_data().map_err(wrap)?;

        log::info!(
            "Recorded score {} for {} in {}",
            record.score,
            record.player_name,
            self.path.display()
        );
        Ok(())
    }

    /// Every well-formed record in file order. A missing file is an empty log.
    pub fn read_all(&self) -> Result<Vec<ScoreRecord>, ScoreLogError> {
        let wrap = |source| ScoreLogError::Read {
            path: self.path.clone(),
            source,
        };

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(wrap(e)),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                // Invalid UTF-8 on one line should not hide the rest
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    log::debug!("Skipping undecodable score line {}", index + 1);
                    continue;
                }
                Err(e) => return Err(wrap(e)),
            };
            match ScoreRecord::parse_line(&line) {
                Some(record) => records.push(record),
                None => log::debug!("Skipping malformed score line {}: {:?}", index + 1, line),
            }
        }
        Ok(records)
    }

    /// Highest `n` scores, ties kept in file order
    pub fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, ScoreLogError> {
        Ok(HighScores::from_records(self.read_all()?).top(n).to_vec())
    }
}

/// True when the file is non-empty and its last byte is not a newline
fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> (tempfile::TempDir, ScoreLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = ScoreLog::new(dir.path().join("scores.txt"));
        (dir, log)
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let (_dir, log) = temp_log();
        log.append(&ScoreRecord::new("ann", 12)).unwrap();
        log.append(&ScoreRecord::new("bob", 3)).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "ann 12\nbob 3\n");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, log) = temp_log();
        assert!(log.read_all().unwrap().is_empty());
        assert!(log.top(5).unwrap().is_empty());
    }

    #[test]
    fn test_top_five_keeps_file_order_on_ties() {
        let (_dir, log) = temp_log();
        for (name, score) in [("A", 10), ("B", 30), ("C", 20), ("D", 30), ("E", 5), ("F", 40)] {
            log.append(&ScoreRecord::new(name, score)).unwrap();
        }

        let top: Vec<_> = log
            .top(5)
            .unwrap()
            .into_iter()
            .map(|r| (r.player_name, r.score))
            .collect();
        assert_eq!(
            top,
            vec![
                ("F".to_string(), 40),
                ("B".to_string(), 30),
                ("D".to_string(), 30),
                ("C".to_string(), 20),
                ("A".to_string(), 10),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (_dir, log) = temp_log();
        std::fs::write(
            log.path(),
            "ann 4\n\njustaname\nbob notanumber\ncid 7 extra\n  dee   9  \neve -1\n",
        )
        .unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(
            records,
            vec![
                ScoreRecord::new("ann", 4),
                ScoreRecord::new("cid", 7),
                ScoreRecord::new("dee", 9),
            ]
        );
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let (_dir, log) = temp_log();
        let mut bytes = b"ann 4\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b' ', b'1', b'\n']);
        bytes.extend_from_slice(b"bob 6\n");
        std::fs::write(log.path(), bytes).unwrap();

        let names: Vec<_> = log
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.player_name)
            .collect();
        assert_eq!(names, vec!["ann", "bob"]);
    }

    #[test]
    fn test_append_after_torn_tail_starts_new_line() {
        let (_dir, log) = temp_log();
        log.append(&ScoreRecord::new("ann", 1)).unwrap();
        // Simulate a crash mid-write: a partial line with no newline
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(b"bo").unwrap();
        drop(file);
        log.append(&ScoreRecord::new("cid", 2)).unwrap();

        // The fragment stays on its own (malformed, skipped) line
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), "ann 1\nbo\ncid 2\n");
        let records = log.read_all().unwrap();
        assert_eq!(records, vec![ScoreRecord::new("ann", 1), ScoreRecord::new("cid", 2)]);
    }

    #[test]
    fn test_sanitize_player_name() {
        assert_eq!(sanitize_player_name("  Ada Lovelace "), "Ada_Lovelace");
        assert_eq!(sanitize_player_name("tab\tname"), "tab_name");
        assert_eq!(sanitize_player_name("   "), DEFAULT_PLAYER_NAME);
        assert_eq!(ScoreRecord::new("a b", 3).to_line(), "a_b 3");
    }
}
