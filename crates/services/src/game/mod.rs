//! Question dispensing, the prize-ladder state machine and its timed
//! presentation flow.

mod controller;
mod engine;
pub mod hints;
mod questions;

pub use controller::{GameController, GameEvent, QuestionView};
pub use engine::{AnswerOutcome, GamePhase, PoseOutcome, ProgressionEngine};
pub use questions::{DEFAULT_SET_COUNT, QuestionRepository, SetInfo, load_all_sets, load_set};
