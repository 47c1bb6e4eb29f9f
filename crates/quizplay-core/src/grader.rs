//! Answer normalization, comparison and quiz grading.
//!
//! Everything here is pure and synchronous so it can be unit tested without a
//! view layer. The question type's [`AnswerShape`] decides how a raw capture
//! is normalized and which equality rule applies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{AnswerShape, AnswerValue, Question, QuestionType, Quiz, Reference};

/// Outcome of grading one quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// Percentage of correct answers, rounded to the nearest integer.
    pub score: u32,
    pub correct_count: usize,
    pub total: usize,
    pub details: Vec<QuestionResult>,
}

/// Verdict for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: usize,
    pub prompt: String,
    pub user_answer: AnswerValue,
    pub correct_answer: AnswerValue,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

/// Coerce a raw capture into the shape the question expects.
///
/// True/false answers map to the lexical forms `"true"` and `"false"`;
/// anything that is not a case-insensitive `true` becomes `"false"`. A blank
/// capture stays blank so it can never compare equal.
pub fn normalize(raw: &AnswerValue, question: &Question) -> AnswerValue {
    match question.kind.answer_shape() {
        AnswerShape::Boolean => match first_value(raw) {
            Some(value) if !value.trim().is_empty() => {
                AnswerValue::scalar(normalize_boolean(value))
            }
            _ => AnswerValue::scalar(""),
        },
        AnswerShape::Scalar => {
            AnswerValue::scalar(first_value(raw).unwrap_or_default().to_string())
        }
        AnswerShape::Slots => match raw {
            AnswerValue::OrderedList(items) => AnswerValue::OrderedList(items.clone()),
            AnswerValue::Scalar(s) if s.trim().is_empty() => AnswerValue::OrderedList(vec![]),
            AnswerValue::Scalar(s) => AnswerValue::OrderedList(vec![Some(s.clone())]),
        },
    }
}

/// Compare a normalized user answer with the expected one.
pub fn compare(user: &AnswerValue, correct: &AnswerValue, kind: QuestionType) -> bool {
    if user.is_unset() {
        return false;
    }

    if kind.answer_shape() == AnswerShape::Boolean {
        return match (first_value(user), first_value(correct)) {
            (Some(u), Some(c)) => normalize_boolean(u) == normalize_boolean(c),
            _ => false,
        };
    }

    match (user, correct) {
        (AnswerValue::OrderedList(u), AnswerValue::OrderedList(c)) => {
            u.len() == c.len()
                && u.iter().zip(c).all(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => eq_ignore_case(a, b),
                    _ => false,
                })
        }
        (AnswerValue::Scalar(u), AnswerValue::Scalar(c)) => eq_ignore_case(u, c),
        _ => false,
    }
}

/// Grade a quiz against raw answers keyed by question id.
///
/// Questions repeating an earlier prompt are skipped. Every remaining
/// question must have an entry in `raw_answers`.
pub fn grade(
    quiz: &Quiz,
    raw_answers: &HashMap<usize, AnswerValue>,
) -> Result<GradingResult, QuizError> {
    let questions = quiz.unique_questions();

    let missing: Vec<usize> = questions
        .iter()
        .filter(|q| !raw_answers.contains_key(&q.id))
        .map(|q| q.id)
        .collect();
    if !missing.is_empty() {
        return Err(QuizError::IncompleteSubmission { missing });
    }

    let mut details = Vec::with_capacity(questions.len());
    let mut correct_count = 0usize;

    for question in &questions {
        let Some(raw) = raw_answers.get(&question.id) else {
            continue;
        };
        let user_answer = normalize(raw, question);
        let is_correct = compare(&user_answer, &question.correct_answer, question.kind);
        if is_correct {
            correct_count += 1;
        }

        details.push(QuestionResult {
            question_id: question.id,
            prompt: question.prompt.clone(),
            user_answer,
            correct_answer: question.correct_answer.clone(),
            is_correct,
            explanation: question.explanation.clone(),
            references: question.references.clone(),
        });
    }

    let total = questions.len();
    Ok(GradingResult {
        score: score_percent(correct_count, total),
        correct_count,
        total,
        details,
    })
}

/// Percentage rounded half away from zero. An empty quiz scores zero.
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}

fn normalize_boolean(value: &str) -> &'static str {
    if value.trim().eq_ignore_ascii_case("true") {
        "true"
    } else {
        "false"
    }
}

fn first_value(answer: &AnswerValue) -> Option<&str> {
    match answer {
        AnswerValue::Scalar(s) => Some(s),
        AnswerValue::OrderedList(items) => items.iter().flatten().next().map(String::as_str),
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
