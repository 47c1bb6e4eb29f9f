//! Quiz error types.
//!
//! These errors cover every way the grading core can refuse an input: a
//! payload that is not a quiz, a submission with gaps, a drag operation
//! aimed at a slot that no longer exists, and question types the grader has
//! no rule for.

use thiserror::Error;

/// Errors raised by the parsing, grading and drag-and-drop layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The generator payload could not be turned into a structurally valid quiz.
    #[error("malformed quiz payload: {0}")]
    MalformedQuizPayload(String),

    /// Grading was requested before every question had an answer.
    #[error("incomplete submission: no answer for question(s) {missing:?}")]
    IncompleteSubmission { missing: Vec<usize> },

    /// A drag operation referenced a question, slot or item the store does not know.
    #[error("invalid drag operation on question {question_id} slot {slot_index}: {reason}")]
    InvalidDragOperation {
        question_id: usize,
        slot_index: usize,
        reason: String,
    },

    /// The question type has no grading rule.
    #[error("unsupported question type: {0}")]
    UnsupportedQuestionType(String),

    /// No quiz has been installed in the player yet.
    #[error("no quiz loaded")]
    NoQuizLoaded,

    /// A generator response arrived for a request that has since been superseded.
    #[error("stale quiz response for request {ticket}, current request is {current:?}")]
    StaleRequest { ticket: u64, current: Option<u64> },
}

impl QuizError {
    /// Returns `true` if the view layer can recover by prompting the user
    /// (retry generation or finish answering) rather than reporting a defect.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            QuizError::MalformedQuizPayload(_)
                | QuizError::IncompleteSubmission { .. }
                | QuizError::InvalidDragOperation { .. }
                | QuizError::NoQuizLoaded
                | QuizError::StaleRequest { .. }
        )
    }
}
