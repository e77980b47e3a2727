//! High score leaderboard
//!
//! A ranked view over the records in the score log. Ranking is a stable
//! descending sort by score, so equal scores keep the order they were logged.

use crate::persistence::ScoreRecord;

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    /// Sorted by score, highest first
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rank records in log order
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        // sort_by is stable
        records.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries: records }
    }

    /// First `n` entries (or fewer)
    pub fn top(&self, n: usize) -> &[ScoreRecord] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Check if a score would make the top `n`
    pub fn qualifies(&self, score: u64, n: usize) -> bool {
        if score == 0 || n == 0 {
            return false;
        }
        if self.entries.len() < n {
            return true;
        }
        score > self.entries[n - 1].score
    }

    /// Rank a new score would achieve if logged now (1-indexed, None if
    /// outside the top `n`). A new score ranks below existing equal scores.
    pub fn potential_rank(&self, score: u64, n: usize) -> Option<usize> {
        if !self.qualifies(score, n) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn records(raw: &[(&str, u64)]) -> Vec<ScoreRecord> {
        raw.iter().map(|(n, s)| ScoreRecord::new(n, *s)).collect()
    }

    #[test]
    fn test_ranking_is_stable() {
        let scores = HighScores::from_records(records(&[
            ("A", 10),
            ("B", 30),
            ("C", 20),
            ("D", 30),
            ("E", 5),
            ("F", 40),
        ]));
        let names: Vec<_> = scores.top(5).iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["F", "B", "D", "C", "A"]);
        assert_eq!(scores.top_score(), Some(40));
    }

    #[test]
    fn test_top_with_fewer_entries() {
        let scores = HighScores::from_records(records(&[("A", 1)]));
        assert_eq!(scores.top(5).len(), 1);
        assert!(HighScores::new().top(5).is_empty());
        assert!(HighScores::new().is_empty());
    }

    #[test]
    fn test_potential_rank() {
        let scores = HighScores::from_records(records(&[("A", 30), ("B", 20), ("C", 10)]));
        assert_eq!(scores.potential_rank(25, 5), Some(2));
        assert_eq!(scores.potential_rank(20, 5), Some(3));
        assert_eq!(scores.potential_rank(1, 5), Some(4));
        assert_eq!(scores.potential_rank(1, 3), None);
        assert_eq!(scores.potential_rank(0, 5), None);
        assert!(scores.qualifies(11, 3));
        assert!(!scores.qualifies(10, 3));
    }

    proptest! {
        #[test]
        fn prop_top_is_sorted_and_stable(raw in prop::collection::vec(0u64..20, 0..40), n in 0usize..10) {
            let recs: Vec<ScoreRecord> = raw
                .iter()
                .enumerate()
                .map(|(i, s)| ScoreRecord::new(&format!("p{i}"), *s))
                .collect();
            let scores = HighScores::from_records(recs.clone());
            let top = scores.top(n);
            prop_assert_eq!(top.len(), n.min(recs.len()));
            for pair in top.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    let idx = |r: &ScoreRecord| recs.iter().position(|x| x == r).unwrap();
                    prop_assert!(idx(&pair[0]) < idx(&pair[1]));
                }
            }
        }
    }
}
