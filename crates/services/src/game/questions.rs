use std::collections::VecDeque;

use quiz_core::model::{Question, QuestionSet, set_name};
use storage::repository::{QuestionSetSource, StorageError};

use crate::error::QuestionLoadError;

/// Number of set files in the reference configuration.
pub const DEFAULT_SET_COUNT: u32 = 7;

/// Where the active set sits among the loaded ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetInfo {
    /// 1-based position among loaded sets.
    pub current_set: usize,
    pub total_sets: usize,
    pub set_name: String,
}

/// Load one set by ordinal.
///
/// # Errors
///
/// Returns `QuestionLoadError` if the source cannot provide the set or the
/// set has no questions.
pub fn load_set(
    source: &dyn QuestionSetSource,
    ordinal: u32,
) -> Result<QuestionSet, QuestionLoadError> {
    let name = set_name(ordinal);
    let questions = source.load_set(&name)?;
    Ok(QuestionSet::new(name, ordinal, questions)?)
}

/// Load `set1` .. `set{set_count}` in canonical order.
///
/// Missing, empty or malformed sets are logged and skipped; the rest still load.
#[must_use]
pub fn load_all_sets(source: &dyn QuestionSetSource, set_count: u32) -> Vec<QuestionSet> {
    let mut sets = Vec::new();
    for ordinal in 1..=set_count {
        match load_set(source, ordinal) {
            Ok(set) => {
                tracing::info!(set = %set.name(), questions = set.len(), "question set loaded");
                sets.push(set);
            }
            Err(QuestionLoadError::Storage(StorageError::NotFound)) => {
                tracing::warn!(set = %set_name(ordinal), "question set not found, skipping");
            }
            Err(err) => {
                tracing::warn!(set = %set_name(ordinal), %err, "question set skipped");
            }
        }
    }
    tracing::info!(loaded = sets.len(), expected = set_count, "question sets ready");
    sets
}

/// Dispenses questions one at a time from the active set.
///
/// Sets and the questions inside them are never reordered. Each playthrough
/// consumes a working copy of the active set, front to back.
#[derive(Debug, Clone, Default)]
pub struct QuestionRepository {
    sets: Vec<QuestionSet>,
    active: usize,
    remaining: VecDeque<Question>,
}

impl QuestionRepository {
    #[must_use]
    pub fn new(sets: Vec<QuestionSet>) -> Self {
        let mut repo = Self {
            sets,
            active: 0,
            remaining: VecDeque::new(),
        };
        repo.reset_current_set();
        repo
    }

    /// Load every set from `source` (see [`load_all_sets`]).
    #[must_use]
    pub fn load(source: &dyn QuestionSetSource, set_count: u32) -> Self {
        Self::new(load_all_sets(source, set_count))
    }

    #[must_use]
    pub fn sets(&self) -> &[QuestionSet] {
        &self.sets
    }

    /// No set loaded: nothing can ever be dispensed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_set(&self) -> Option<&QuestionSet> {
        self.sets.get(self.active)
    }

    /// Removes and returns the next question, `None` once the set is exhausted.
    pub fn next_question(&mut self) -> Option<Question> {
        self.remaining.pop_front()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.remaining.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Move to the following set. Returns `false` on the last set.
    pub fn advance_set(&mut self) -> bool {
        if self.active + 1 >= self.sets.len() {
            return false;
        }
        self.active += 1;
        self.reset_current_set();
        tracing::info!(set = self.active + 1, name = ?self.active_set().map(QuestionSet::name), "advanced to next question set");
        true
    }

    /// Refill the working copy from the active set (retries).
    pub fn reset_current_set(&mut self) {
        self.remaining = self
            .sets
            .get(self.active)
            .map(|set| set.questions().iter().cloned().collect())
            .unwrap_or_default();
    }

    /// Back to the first set with a fresh working copy (new session).
    pub fn reset_to_first_set(&mut self) {
        self.active = 0;
        self.reset_current_set();
    }

    /// True on the final loaded set; also true when nothing loaded.
    #[must_use]
    pub fn is_last_set(&self) -> bool {
        self.active + 1 >= self.sets.len()
    }

    #[must_use]
    pub fn set_info(&self) -> Option<SetInfo> {
        self.active_set().map(|set| SetInfo {
            current_set: self.active + 1,
            total_sets: self.sets.len(),
            set_name: set.name().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn question(prompt: &str) -> Question {
        Question::new(
            prompt,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            0,
        )
        .unwrap()
    }

    fn source_with(sets: &[(u32, usize)]) -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        for (ordinal, count) in sets {
            let questions = (1..=*count)
                .map(|i| question(&format!("s{ordinal}q{i}")))
                .collect();
            repo.insert_set(&set_name(*ordinal), questions).unwrap();
        }
        repo
    }

    #[test]
    fn skips_missing_sets_and_keeps_order() {
        let source = source_with(&[(1, 2), (3, 2), (5, 2)]);
        let sets = load_all_sets(&source, DEFAULT_SET_COUNT);
        let names: Vec<&str> = sets.iter().map(QuestionSet::name).collect();
        assert_eq!(names, vec!["set1", "set3", "set5"]);
        assert_eq!(sets[1].ordinal(), 3);
    }

    #[test]
    fn skips_empty_sets() {
        let source = source_with(&[(1, 0), (2, 1)]);
        let sets = load_all_sets(&source, 2);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name(), "set2");
    }

    #[test]
    fn dispenses_in_order_until_exhausted() {
        let mut repo = QuestionRepository::load(&source_with(&[(1, 3)]), 1);
        assert!(repo.has_more());
        let prompts: Vec<String> = std::iter::from_fn(|| repo.next_question())
            .map(|q| q.prompt().to_owned())
            .collect();
        assert_eq!(prompts, vec!["s1q1", "s1q2", "s1q3"]);
        assert!(!repo.has_more());
        assert_eq!(repo.next_question(), None);
    }

    #[test]
    fn advance_moves_across_gaps() {
        let mut repo = QuestionRepository::load(&source_with(&[(1, 1), (3, 2), (5, 1)]), 7);
        assert_eq!(repo.active_set().unwrap().name(), "set1");
        assert!(repo.advance_set());
        assert_eq!(repo.active_set().unwrap().name(), "set3");
        assert_eq!(repo.remaining(), 2);
        assert!(repo.advance_set());
        assert!(repo.is_last_set());
        assert!(!repo.advance_set());
        assert_eq!(repo.active_set().unwrap().name(), "set5");
    }

    #[test]
    fn resets_restore_working_copy() {
        let mut repo = QuestionRepository::load(&source_with(&[(1, 2), (2, 2)]), 2);
        repo.next_question();
        repo.reset_current_set();
        assert_eq!(repo.remaining(), 2);

        repo.advance_set();
        repo.next_question();
        repo.reset_to_first_set();
        assert_eq!(repo.active_index(), 0);
        assert_eq!(repo.next_question().unwrap().prompt(), "s1q1");
    }

    #[test]
    fn empty_repository_never_dispenses() {
        let mut repo = QuestionRepository::new(Vec::new());
        assert!(repo.is_empty());
        assert!(!repo.has_more());
        assert_eq!(repo.next_question(), None);
        assert!(!repo.advance_set());
        assert_eq!(repo.set_info(), None);
    }

    #[test]
    fn set_info_is_one_based() {
        let mut repo = QuestionRepository::load(&source_with(&[(2, 1), (4, 1)]), 4);
        repo.advance_set();
        assert_eq!(
            repo.set_info(),
            Some(SetInfo {
                current_set: 2,
                total_sets: 2,
                set_name: "set4".into(),
            })
        );
    }
}
