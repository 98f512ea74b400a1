use thiserror::Error;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("expected {OPTION_COUNT} options, got {0}")]
    WrongOptionCount(usize),

    #[error("correct answer index {0} is out of range")]
    CorrectAnswerOutOfRange(usize),

    #[error("question set name cannot be empty")]
    EmptySetName,

    #[error("question set {0} has no questions")]
    EmptySet(String),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question with four options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_answer: usize,
}

impl Question {
    /// Validate and build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, the option count is not
    /// four, or the correct index does not point at an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let count = options.len();
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::WrongOptionCount(count))?;
        if correct_answer >= OPTION_COUNT {
            return Err(QuestionError::CorrectAnswerOutOfRange(correct_answer));
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer
    }

    /// Indices of the three wrong options, in option order.
    #[must_use]
    pub fn incorrect_options(&self) -> Vec<usize> {
        (0..OPTION_COUNT)
            .filter(|idx| *idx != self.correct_answer)
            .collect()
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Ordered, immutable bundle of questions played as one ladder.
///
/// `ordinal` is the 1-based canonical position (`set3` has ordinal 3), which
/// stays stable even when earlier sets failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    name: String,
    ordinal: u32,
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySetName` for a blank name and
    /// `QuestionError::EmptySet` when no questions are given.
    pub fn new(
        name: impl Into<String>,
        ordinal: u32,
        questions: Vec<Question>,
    ) -> Result<Self, QuestionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QuestionError::EmptySetName);
        }
        if questions.is_empty() {
            return Err(QuestionError::EmptySet(name));
        }
        Ok(Self {
            name,
            ordinal,
            questions,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Canonical file stem for the set at a 1-based ordinal.
#[must_use]
pub fn set_name(ordinal: u32) -> String {
    format!("set{ordinal}")
}
