use chrono::{DateTime, Utc};

use crate::model::app_settings::Theme;

/// Entries kept after every insertion.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Name recorded when the player leaves the prompt blank.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// One finished game on the high-score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    name: String,
    score: u64,
    recorded_at: DateTime<Utc>,
    theme: Theme,
}

impl LeaderboardEntry {
    /// Build an entry, trimming the name and defaulting blanks to
    /// [`ANONYMOUS_NAME`].
    #[must_use]
    pub fn new(name: &str, score: u64, recorded_at: DateTime<Utc>, theme: Theme) -> Self {
        Self {
            name: normalize_name(name),
            score,
            recorded_at,
            theme,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }
}

/// Ranked high scores, best first, at most [`LEADERBOARD_CAPACITY`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, re-applying ordering and the cap.
    #[must_use]
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.rank();
        board
    }

    /// Insert an entry, then re-rank and truncate.
    ///
    /// Returns the entry's position if it survived the cut.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        self.entries.push(entry.clone());
        self.sort();
        // Equal scores keep insertion order, so the newest equal entry is the last match.
        let position = self.entries.iter().rposition(|e| *e == entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        position.filter(|pos| *pos < LEADERBOARD_CAPACITY)
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&mut self) {
        self.sort();
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }

    fn sort(&mut self) {
        // `sort_by` is stable: ties stay in insertion order.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ANONYMOUS_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, fixed_now(), Theme::Dark)
    }

    #[test]
    fn blank_names_become_anonymous() {
        assert_eq!(entry("   ", 10).name(), ANONYMOUS_NAME);
        assert_eq!(entry("", 10).name(), ANONYMOUS_NAME);
        assert_eq!(entry("  Ada ", 10).name(), "Ada");
    }

    #[test]
    fn eleventh_entry_keeps_top_ten() {
        let mut board = Leaderboard::new();
        for score in 1..=10 {
            board.insert(entry(&format!("p{score}"), score * 100));
        }
        let position = board.insert(entry("late", 550));

        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(position, Some(5));
        let scores: Vec<u64> = board.entries().iter().map(LeaderboardEntry::score).collect();
        assert_eq!(
            scores,
            vec![1000, 900, 800, 700, 600, 550, 500, 400, 300, 200]
        );
    }

    #[test]
    fn low_score_falls_off_full_board() {
        let mut board = Leaderboard::new();
        for score in 1..=10 {
            board.insert(entry("p", score * 100));
        }
        assert_eq!(board.insert(entry("low", 1)), None);
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.insert(entry("first", 500));
        board.insert(entry("second", 500));
        board.insert(entry("top", 900));
        let names: Vec<&str> = board.entries().iter().map(LeaderboardEntry::name).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }
}
