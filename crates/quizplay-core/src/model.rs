//! Core data model types for quizplay.
//!
//! These are the types every other layer speaks: quizzes, questions, the
//! explicit question-type tag and the answer values that flow from the view
//! into the grader.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::QuizError;

/// Marker the generator uses for a blank in fill-in and coding templates.
pub const BLANK_MARKER: &str = "_____";

/// An ordered set of questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Questions with a prompt not seen earlier in the quiz, in order.
    pub fn unique_questions(&self) -> Vec<&Question> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .filter(|q| seen.insert(q.prompt.as_str()))
            .collect()
    }

    /// Drop questions whose prompt repeats an earlier one. Returns how many
    /// were removed. Question ids are left untouched.
    pub fn dedup(&mut self) -> usize {
        let before = self.questions.len();
        let mut seen = HashSet::new();
        self.questions.retain(|q| seen.insert(q.prompt.clone()));
        let removed = before - self.questions.len();
        if removed > 0 {
            tracing::debug!(removed, "dropped questions with duplicate prompts");
        }
        removed
    }

    pub fn question(&self, id: usize) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Ordinal position in the quiz.
    pub id: usize,
    /// Prompt text shown to the user.
    pub prompt: String,
    /// Resolved question type.
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Answer options. Display order is the view's business.
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: AnswerValue,
    /// Fixed labels of a matching question, one per slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<String>>,
    /// Code with blank markers for coding questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Question {
    /// Number of drop targets for drag-and-drop and coding questions, zero otherwise.
    pub fn slot_count(&self) -> usize {
        match self.kind {
            QuestionType::DragDropMatching => self
                .descriptions
                .as_ref()
                .map(Vec::len)
                .unwrap_or(self.options.len()),
            QuestionType::DragDropOrdering => self.options.len(),
            QuestionType::Coding => {
                let blanks = self
                    .code_template
                    .as_deref()
                    .map(|t| t.matches(BLANK_MARKER).count())
                    .unwrap_or(0);
                if blanks > 0 {
                    blanks
                } else {
                    self.correct_answer.as_list().map(<[_]>::len).unwrap_or(0)
                }
            }
            _ => 0,
        }
    }
}

/// A link offered alongside an explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: String,
}

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
    DragDropMatching,
    DragDropOrdering,
    Coding,
}

/// How an answer to a question type is captured and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    /// A single selected value.
    Scalar,
    /// A single value read as a boolean.
    Boolean,
    /// One value per drop slot, compared positionally.
    Slots,
}

impl QuestionType {
    /// Resolve a wire type name. The generator emits a bare `drag_drop` for
    /// both drag subtypes; the presence of descriptions picks matching.
    pub fn from_wire(name: &str, has_descriptions: bool) -> Result<Self, QuizError> {
        match name.trim().to_lowercase().as_str() {
            "drag_drop" if has_descriptions => Ok(QuestionType::DragDropMatching),
            "drag_drop" => Ok(QuestionType::DragDropOrdering),
            other => other
                .parse()
                .map_err(|_| QuizError::UnsupportedQuestionType(name.to_string())),
        }
    }

    /// The single dispatch point shared by normalization, comparison and
    /// answer gathering.
    pub fn answer_shape(self) -> AnswerShape {
        match self {
            QuestionType::MultipleChoice | QuestionType::FillBlank => AnswerShape::Scalar,
            QuestionType::TrueFalse => AnswerShape::Boolean,
            QuestionType::DragDropMatching
            | QuestionType::DragDropOrdering
            | QuestionType::Coding => AnswerShape::Slots,
        }
    }

    pub fn uses_slots(self) -> bool {
        self.answer_shape() == AnswerShape::Slots
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::TrueFalse => write!(f, "true_false"),
            QuestionType::FillBlank => write!(f, "fill_blank"),
            QuestionType::DragDropMatching => write!(f, "drag_drop_matching"),
            QuestionType::DragDropOrdering => write!(f, "drag_drop_ordering"),
            QuestionType::Coding => write!(f, "coding"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "fill_blank" => Ok(QuestionType::FillBlank),
            "drag_drop_matching" => Ok(QuestionType::DragDropMatching),
            "drag_drop_ordering" => Ok(QuestionType::DragDropOrdering),
            "coding" => Ok(QuestionType::Coding),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A captured or expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scalar(String),
    /// One entry per slot; `None` is an unfilled slot.
    OrderedList(Vec<Option<String>>),
}

impl AnswerValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        AnswerValue::Scalar(value.into())
    }

    /// A fully filled list.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::OrderedList(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// `true` for a blank scalar or a list with no filled slot.
    pub fn is_unset(&self) -> bool {
        match self {
            AnswerValue::Scalar(s) => s.trim().is_empty(),
            AnswerValue::OrderedList(items) => items.iter().all(Option::is_none),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AnswerValue::Scalar(s) => Some(s),
            AnswerValue::OrderedList(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Option<String>]> {
        match self {
            AnswerValue::Scalar(_) => None,
            AnswerValue::OrderedList(items) => Some(items),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Scalar(s) => write!(f, "{s}"),
            AnswerValue::OrderedList(items) => {
                let parts: Vec<&str> = items
                    .iter()
                    .map(|item| item.as_deref().unwrap_or("_"))
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}
