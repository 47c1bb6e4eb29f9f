//! quizplay-core — quiz model, answer grading and drag-and-drop state.
//!
//! This crate holds everything that decides whether an answer is right: the
//! typed quiz model, the payload parser, the grader and the slot store that
//! drag-and-drop questions are answered through.

pub mod dragdrop;
pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod session;
pub mod traits;

pub use dragdrop::{DragDropStore, Placement};
pub use error::QuizError;
pub use grader::{grade, GradingResult, QuestionResult};
pub use model::{AnswerValue, Question, QuestionType, Quiz};
pub use session::{QuizPlayer, QuizSession};
