use quiz_core::model::{
    COMPLETED_LEVEL, HintKind, HintPayload, LADDER_LEVELS, LadderRung, PrizeLadder, Question,
    UsedHints,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use super::hints;
use super::questions::{QuestionRepository, SetInfo};

/// Where the current playthrough stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingQuestion,
    QuestionPosed,
    SetWon,
    SetLost,
    NoContent,
}

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoseOutcome {
    Question(Question),
    /// Every question of the set has been answered.
    SetComplete,
    /// The playthrough was lost; start a new one first.
    GameOver,
    /// No question set loaded at all.
    NoContent,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct; pose the next question.
    Continue { prize: u64 },
    /// Correct on the final rung.
    SetWon { prize: u64 },
    SetLost { correct_answer: usize },
    /// No pending question, or it was already answered.
    Rejected,
}

/// Drives one playthrough at a time through the prize ladder and carries
/// banked winnings across sets.
///
/// Accounting: a loss banks `total_accumulated_winnings` plus the last safe
/// checkpoint of the current ladder; a completed ladder banks the top prize.
#[derive(Debug)]
pub struct ProgressionEngine<R = StdRng> {
    questions: QuestionRepository,
    rng: R,
    phase: GamePhase,
    current_level: u32,
    current_game_winnings: u64,
    total_accumulated_winnings: u64,
    used_hints: UsedHints,
    current_question: Option<Question>,
    set_banked: bool,
}

impl ProgressionEngine<StdRng> {
    /// Engine with an OS-seeded RNG.
    #[must_use]
    pub fn new(questions: QuestionRepository) -> Self {
        Self::with_rng(questions, StdRng::from_os_rng())
    }

    /// Engine whose hints replay identically for the same seed.
    #[must_use]
    pub fn with_seed(questions: QuestionRepository, seed: u64) -> Self {
        Self::with_rng(questions, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ProgressionEngine<R> {
    #[must_use]
    pub fn with_rng(questions: QuestionRepository, rng: R) -> Self {
        let phase = if questions.is_empty() {
            GamePhase::NoContent
        } else {
            GamePhase::AwaitingQuestion
        };
        Self {
            questions,
            rng,
            phase,
            current_level: 1,
            current_game_winnings: 0,
            total_accumulated_winnings: 0,
            used_hints: UsedHints::default(),
            current_question: None,
            set_banked: false,
        }
    }

    //
    // ─── PLAYTHROUGH ──────────────────────────────────────────────────────────
    //

    /// Reset per-playthrough state. A new session also drops banked winnings
    /// and rewinds to the first set; otherwise set progress carries over.
    ///
    /// The active set's working copy is always refilled, so a retry replays
    /// the set from its first question.
    pub fn start_playthrough(&mut self, is_new_session: bool) {
        self.current_level = 1;
        self.current_game_winnings = 0;
        self.used_hints.clear();
        self.current_question = None;
        self.set_banked = false;

        if is_new_session {
            self.total_accumulated_winnings = 0;
            self.questions.reset_to_first_set();
        } else {
            self.questions.reset_current_set();
        }

        self.phase = if self.questions.is_empty() {
            GamePhase::NoContent
        } else {
            GamePhase::AwaitingQuestion
        };
        tracing::debug!(
            is_new_session,
            set = self.questions.active_index() + 1,
            banked = self.total_accumulated_winnings,
            "playthrough started"
        );
    }

    /// Pose the next question.
    ///
    /// An unanswered question is posed again rather than skipped. Running out
    /// of questions completes the ladder.
    pub fn pose_question(&mut self) -> PoseOutcome {
        match self.phase {
            GamePhase::NoContent => return PoseOutcome::NoContent,
            GamePhase::SetLost => return PoseOutcome::GameOver,
            GamePhase::SetWon => return PoseOutcome::SetComplete,
            GamePhase::QuestionPosed => {
                if let Some(question) = &self.current_question {
                    return PoseOutcome::Question(question.clone());
                }
            }
            GamePhase::AwaitingQuestion => {}
        }

        if let Some(question) = self.questions.next_question() {
            self.current_question = Some(question.clone());
            self.phase = GamePhase::QuestionPosed;
            PoseOutcome::Question(question)
        } else {
            tracing::debug!(level = self.current_level, "question set exhausted");
            self.current_question = None;
            self.current_level = COMPLETED_LEVEL;
            self.phase = GamePhase::SetWon;
            PoseOutcome::SetComplete
        }
    }

    /// Evaluate an answer to the posed question. Only the first submission
    /// per posed question counts.
    pub fn submit_answer(&mut self, option_index: usize) -> AnswerOutcome {
        if self.phase != GamePhase::QuestionPosed {
            return AnswerOutcome::Rejected;
        }
        let Some(question) = &self.current_question else {
            return AnswerOutcome::Rejected;
        };

        if !question.is_correct(option_index) {
            let correct_answer = question.correct_answer();
            self.phase = GamePhase::SetLost;
            tracing::debug!(level = self.current_level, option_index, "wrong answer");
            return AnswerOutcome::SetLost { correct_answer };
        }

        let prize = PrizeLadder::prize(self.current_level);
        self.current_game_winnings += prize;
        self.current_level += 1;

        if self.current_level > LADDER_LEVELS {
            self.phase = GamePhase::SetWon;
            AnswerOutcome::SetWon { prize }
        } else {
            self.phase = GamePhase::AwaitingQuestion;
            AnswerOutcome::Continue { prize }
        }
    }

    /// Use a lifeline on the posed question. `None` if it was already used
    /// this playthrough or no question is awaiting an answer.
    pub fn use_hint(&mut self, kind: HintKind) -> Option<HintPayload> {
        if self.phase != GamePhase::QuestionPosed || self.used_hints.contains(kind) {
            return None;
        }
        let question = self.current_question.as_ref()?;
        self.used_hints.mark(kind);
        Some(hints::generate(kind, question, &mut self.rng))
    }

    //
    // ─── SET TRANSITIONS ──────────────────────────────────────────────────────
    //

    /// Bank the top prize of a completed ladder and move to the next set.
    ///
    /// Returns whether another set exists. Banking happens once per ladder,
    /// so repeated calls on the last set do not add to the total.
    pub fn handle_set_won(&mut self) -> bool {
        if !self.is_ladder_complete() {
            return false;
        }
        if !self.set_banked {
            self.total_accumulated_winnings += PrizeLadder::top_prize();
            self.set_banked = true;
        }

        if !self.questions.advance_set() {
            tracing::info!(total = self.total_accumulated_winnings, "all question sets completed");
            return false;
        }

        self.current_level = 1;
        self.current_game_winnings = 0;
        self.current_question = None;
        self.set_banked = false;
        self.phase = GamePhase::AwaitingQuestion;
        true
    }

    //
    // ─── PRIZES ───────────────────────────────────────────────────────────────
    //

    /// Safe-checkpoint prize banked on a loss at the current level.
    #[must_use]
    pub fn guaranteed_prize(&self) -> u64 {
        PrizeLadder::guaranteed_prize(self.current_level)
    }

    /// Total after a won ladder: banked sets plus this ladder's top prize,
    /// counted once even after [`Self::handle_set_won`] banked it.
    #[must_use]
    pub fn total_prize_for_win(&self) -> u64 {
        if self.is_ladder_complete() && !self.set_banked {
            self.total_accumulated_winnings + PrizeLadder::top_prize()
        } else {
            self.total_accumulated_winnings
        }
    }

    #[must_use]
    pub fn total_prize_for_loss(&self) -> u64 {
        self.total_accumulated_winnings + self.guaranteed_prize()
    }

    /// Prize for the current ladder alone.
    #[must_use]
    pub fn current_set_prize(&self) -> u64 {
        if self.is_ladder_complete() {
            PrizeLadder::top_prize()
        } else {
            self.current_game_winnings
        }
    }

    /// Last loaded set and its ladder is complete.
    #[must_use]
    pub fn is_final_win(&self) -> bool {
        !self.questions.is_empty() && self.questions.is_last_set() && self.is_ladder_complete()
    }

    #[must_use]
    pub fn is_ladder_complete(&self) -> bool {
        self.current_level > LADDER_LEVELS
    }

    //
    // ─── ACCESSORS ────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.questions.is_empty()
    }

    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    #[must_use]
    pub fn current_set_index(&self) -> usize {
        self.questions.active_index()
    }

    #[must_use]
    pub fn current_game_winnings(&self) -> u64 {
        self.current_game_winnings
    }

    #[must_use]
    pub fn total_accumulated_winnings(&self) -> u64 {
        self.total_accumulated_winnings
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn used_hints(&self) -> UsedHints {
        self.used_hints
    }

    #[must_use]
    pub fn is_hint_used(&self, kind: HintKind) -> bool {
        self.used_hints.contains(kind)
    }

    #[must_use]
    pub fn is_last_set(&self) -> bool {
        self.questions.is_last_set()
    }

    #[must_use]
    pub fn set_info(&self) -> Option<SetInfo> {
        self.questions.set_info()
    }

    #[must_use]
    pub fn ladder(&self) -> Vec<LadderRung> {
        PrizeLadder::rungs(self.current_level)
    }
}
