use std::time::Duration;

use quiz_core::model::{HintKind, HintPayload, LadderRung, PrizeLadder, Question};
use rand::Rng;
use rand::rngs::StdRng;
use tokio::time::Instant;

use super::engine::{AnswerOutcome, PoseOutcome, ProgressionEngine};
use super::questions::SetInfo;
use crate::config::TransitionDelays;
use crate::transitions::{TransitionScheduler, TransitionToken};

/// Everything needed to draw the question screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question: Question,
    pub level: u32,
    /// Prize for answering this question.
    pub prize: u64,
    pub winnings: u64,
    pub guaranteed_prize: u64,
    pub set_info: Option<SetInfo>,
    pub ladder: Vec<LadderRung>,
    pub remaining_hints: Vec<HintKind>,
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    QuestionPosed(QuestionView),
    /// Correct answer; the next screen follows after a pause.
    Continue {
        chosen: usize,
        prize: u64,
        winnings: u64,
    },
    /// Wrong answer; the loss screen follows after a pause.
    WrongAnswer { chosen: usize, correct_answer: usize },
    Hint(HintPayload),
    SetWon {
        set_prize: u64,
        total_prize: u64,
        has_next_set: bool,
    },
    /// Last set completed; `total_prize` is already banked.
    FinalWon { total_prize: u64 },
    SetLost {
        guaranteed_prize: u64,
        total_prize: u64,
    },
    NoContent,
}

impl GameEvent {
    /// Score to offer for the leaderboard if the player stops at this screen.
    ///
    /// Won sets, the final win and losses all carry the session total.
    #[must_use]
    pub fn banked_score(&self) -> Option<u64> {
        match self {
            GameEvent::SetWon { total_prize, .. }
            | GameEvent::FinalWon { total_prize }
            | GameEvent::SetLost { total_prize, .. } => Some(*total_prize),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    NextQuestion,
    FinishSet,
    ShowLoss,
}

/// Couples the engine with delayed transitions so answer feedback stays on
/// screen for a while before the game moves on.
#[derive(Debug)]
pub struct GameController<R = StdRng> {
    engine: ProgressionEngine<R>,
    scheduler: TransitionScheduler<Transition>,
    delays: TransitionDelays,
    pending: Option<TransitionToken>,
}

impl<R: Rng> GameController<R> {
    #[must_use]
    pub fn new(engine: ProgressionEngine<R>, delays: TransitionDelays) -> Self {
        Self {
            engine,
            scheduler: TransitionScheduler::new(),
            delays,
            pending: None,
        }
    }

    /// Start a playthrough and pose its first question. Pending transitions
    /// from the previous screen are dropped.
    pub fn start(&mut self, is_new_session: bool) -> GameEvent {
        self.pending = None;
        self.scheduler.invalidate_all();
        self.engine.start_playthrough(is_new_session);
        self.pose()
    }

    /// Move past a won set into the next one.
    ///
    /// Only meaningful after [`GameEvent::SetWon`] with `has_next_set`;
    /// otherwise the current state is reported again.
    pub fn continue_session(&mut self) -> GameEvent {
        self.pending = None;
        self.scheduler.invalidate_all();
        if !self.engine.is_ladder_complete() {
            return self.pose();
        }
        if !self.engine.handle_set_won() {
            return self.finish_set();
        }
        self.engine.start_playthrough(false);
        self.pose()
    }

    /// Submit an answer at `now`. `None` for duplicate or stray input.
    pub fn answer(&mut self, option_index: usize, now: Instant) -> Option<GameEvent> {
        match self.engine.submit_answer(option_index) {
            AnswerOutcome::Continue { prize } => {
                self.schedule(now, self.delays.after_correct, Transition::NextQuestion);
                Some(self.correct(option_index, prize))
            }
            AnswerOutcome::SetWon { prize } => {
                self.schedule(now, self.delays.after_correct, Transition::FinishSet);
                Some(self.correct(option_index, prize))
            }
            AnswerOutcome::SetLost { correct_answer } => {
                self.schedule(now, self.delays.after_wrong, Transition::ShowLoss);
                Some(GameEvent::WrongAnswer {
                    chosen: option_index,
                    correct_answer,
                })
            }
            AnswerOutcome::Rejected => None,
        }
    }

    pub fn hint(&mut self, kind: HintKind) -> Option<GameEvent> {
        self.engine.use_hint(kind).map(GameEvent::Hint)
    }

    /// Fire every transition due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<GameEvent> {
        let due = self.scheduler.take_due(now);
        if !due.is_empty() {
            self.pending = None;
        }
        due.into_iter()
            .map(|transition| match transition {
                Transition::NextQuestion => self.pose(),
                Transition::FinishSet => self.finish_set(),
                Transition::ShowLoss => self.loss(),
            })
            .collect()
    }

    /// Leaving the game screen: the pending follow-up screen is cancelled.
    /// Returns whether one was still waiting.
    pub fn leave(&mut self) -> bool {
        let cancelled = self
            .pending
            .take()
            .is_some_and(|token| self.scheduler.cancel(token));
        if cancelled {
            tracing::debug!("pending transition cancelled");
        }
        cancelled
    }

    fn schedule(&mut self, now: Instant, delay: Duration, transition: Transition) {
        self.pending = Some(self.scheduler.schedule(now, delay, transition));
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    #[must_use]
    pub fn engine(&self) -> &ProgressionEngine<R> {
        &self.engine
    }

    fn correct(&self, chosen: usize, prize: u64) -> GameEvent {
        GameEvent::Continue {
            chosen,
            prize,
            winnings: self.engine.current_game_winnings(),
        }
    }

    fn pose(&mut self) -> GameEvent {
        match self.engine.pose_question() {
            PoseOutcome::Question(question) => GameEvent::QuestionPosed(self.view(question)),
            PoseOutcome::SetComplete => self.finish_set(),
            PoseOutcome::GameOver => self.loss(),
            PoseOutcome::NoContent => GameEvent::NoContent,
        }
    }

    fn view(&self, question: Question) -> QuestionView {
        let level = self.engine.current_level();
        QuestionView {
            question,
            level,
            prize: PrizeLadder::prize(level),
            winnings: self.engine.current_game_winnings(),
            guaranteed_prize: self.engine.guaranteed_prize(),
            set_info: self.engine.set_info(),
            ladder: self.engine.ladder(),
            remaining_hints: self.engine.used_hints().remaining(),
        }
    }

    fn finish_set(&mut self) -> GameEvent {
        if !self.engine.has_content() {
            return GameEvent::NoContent;
        }
        if self.engine.is_final_win() {
            self.engine.handle_set_won();
            let total_prize = self.engine.total_accumulated_winnings();
            tracing::info!(total_prize, "final set won");
            return GameEvent::FinalWon { total_prize };
        }
        GameEvent::SetWon {
            set_prize: self.engine.current_set_prize(),
            total_prize: self.engine.total_prize_for_win(),
            has_next_set: !self.engine.is_last_set(),
        }
    }

    fn loss(&self) -> GameEvent {
        let event = GameEvent::SetLost {
            guaranteed_prize: self.engine.guaranteed_prize(),
            total_prize: self.engine.total_prize_for_loss(),
        };
        tracing::info!(level = self.engine.current_level(), ?event, "set lost");
        event
    }
}
