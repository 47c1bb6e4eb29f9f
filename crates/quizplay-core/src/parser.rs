//! Quiz payload parser.
//!
//! Turns the generator's textual output into a [`Quiz`]: strips Markdown
//! code fences, unwraps the envelope shapes the server uses, resolves each
//! wire question into a typed [`Question`] and drops repeated prompts.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::QuizError;
use crate::model::{AnswerShape, AnswerValue, Question, QuestionType, Quiz, Reference};

/// A question as emitted by the generator.
#[derive(Debug, Deserialize)]
struct WireQuestion {
    #[serde(rename = "type")]
    kind: String,
    #[serde(alias = "prompt")]
    question: String,
    #[serde(default)]
    options: Vec<Value>,
    #[serde(default)]
    descriptions: Option<Vec<Value>>,
    #[serde(default)]
    code_template: Option<String>,
    #[serde(default)]
    correct_answer: Value,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    references: Vec<WireReference>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireReference {
    Link(String),
    Full {
        #[serde(default)]
        title: String,
        #[serde(alias = "link")]
        url: String,
        #[serde(default)]
        source: String,
    },
}

/// Strip a surrounding Markdown code fence, optionally tagged `json`.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a generator payload into a deduplicated quiz.
pub fn parse_quiz_payload(text: &str) -> Result<Quiz, QuizError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| QuizError::MalformedQuizPayload(format!("invalid JSON: {e}")))?;
    parse_quiz_value(value)
}

/// Parse an already-decoded payload.
pub fn parse_quiz_value(value: Value) -> Result<Quiz, QuizError> {
    let questions = match value {
        Value::Object(mut map) => {
            if let Some(inner) = map.remove("quiz") {
                return match inner {
                    Value::String(text) => parse_quiz_payload(&text),
                    other => parse_quiz_value(other),
                };
            }
            match map.remove("questions") {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(malformed("`questions` must be a list")),
                None => return Err(malformed("quiz data must contain questions")),
            }
        }
        Value::Array(items) => items,
        _ => return Err(malformed("quiz data must be an object")),
    };

    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(questions.len());
    for (index, raw) in questions.into_iter().enumerate() {
        let wire: WireQuestion = serde_json::from_value(raw)
            .map_err(|e| malformed(&format!("question {index}: {e}")))?;
        if !seen.insert(wire.question.clone()) {
            tracing::debug!(index, prompt = %wire.question, "skipping duplicate question");
            continue;
        }
        let id = parsed.len();
        parsed.push(resolve_question(id, wire)?);
    }

    Ok(Quiz::new(parsed))
}

/// Read and parse a quiz payload file.
pub fn load_quiz_file(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    let quiz = parse_quiz_payload(&content)
        .with_context(|| format!("failed to parse quiz: {}", path.display()))?;
    Ok(quiz)
}

fn resolve_question(id: usize, wire: WireQuestion) -> Result<Question, QuizError> {
    let kind = QuestionType::from_wire(&wire.kind, wire.descriptions.is_some())?;
    let correct_answer = correct_answer(&wire.correct_answer, kind.answer_shape())
        .ok_or_else(|| {
            malformed(&format!(
                "question {id}: correct_answer does not fit a {kind} question"
            ))
        })?;
    let options = scalar_list(id, "options", &wire.options)?;
    let descriptions = wire
        .descriptions
        .as_deref()
        .map(|d| scalar_list(id, "descriptions", d))
        .transpose()?;

    let references = wire
        .references
        .into_iter()
        .filter_map(resolve_reference)
        .collect();

    Ok(Question {
        id,
        prompt: wire.question,
        kind,
        options,
        correct_answer,
        descriptions,
        code_template: wire.code_template,
        explanation: wire.explanation.filter(|e| !e.trim().is_empty()),
        references,
    })
}

fn correct_answer(value: &Value, shape: AnswerShape) -> Option<AnswerValue> {
    match (shape, value) {
        (AnswerShape::Slots, Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => Some(None),
                other => scalar_text(other).map(Some),
            })
            .collect::<Option<Vec<_>>>()
            .map(AnswerValue::OrderedList),
        (AnswerShape::Slots, _) => None,
        (_, value) => scalar_text(value).map(AnswerValue::Scalar),
    }
}

/// Options and descriptions may come back as bare booleans or numbers.
fn scalar_list(id: usize, field: &str, values: &[Value]) -> Result<Vec<String>, QuizError> {
    values
        .iter()
        .map(|v| {
            scalar_text(v).ok_or_else(|| {
                malformed(&format!(
                    "question {id}: {field} entry {v} is not a string, boolean or number"
                ))
            })
        })
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn resolve_reference(reference: WireReference) -> Option<Reference> {
    let (title, url, source) = match reference {
        WireReference::Link(url) => (String::new(), url, String::new()),
        WireReference::Full { title, url, source } => (title, url, source),
    };

    let parsed = match url::Url::parse(&url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(%url, error = %e, "dropping reference with invalid URL");
            return None;
        }
    };

    let source = if source.trim().is_empty() {
        parsed
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| "source".to_string())
    } else {
        source
    };
    let title = if title.trim().is_empty() {
        "Reference".to_string()
    } else {
        title
    };

    Some(Reference { title, url, source })
}

fn malformed(reason: &str) -> QuizError {
    QuizError::MalformedQuizPayload(reason.to_string())
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check a quiz for content problems that would make a question unanswerable.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |id: usize, message: String| {
        warnings.push(ValidationWarning {
            question_id: Some(id),
            message,
        })
    };

    for q in &quiz.questions {
        if q.prompt.trim().is_empty() {
            warn(q.id, "prompt is empty".into());
        }

        match (q.kind.answer_shape(), &q.correct_answer) {
            (AnswerShape::Boolean, AnswerValue::Scalar(answer)) => {
                let lowered = answer.trim().to_lowercase();
                if lowered != "true" && lowered != "false" {
                    warn(q.id, format!("true/false answer '{answer}' is not a boolean"));
                }
            }
            (AnswerShape::Scalar, AnswerValue::Scalar(answer)) => {
                if !q.options.is_empty() && !q.options.iter().any(|o| o == answer) {
                    warn(q.id, format!("correct answer '{answer}' is not among the options"));
                }
            }
            (AnswerShape::Slots, AnswerValue::OrderedList(items)) => {
                let slots = q.slot_count();
                if items.len() != slots {
                    warn(
                        q.id,
                        format!("correct answer has {} entries but {slots} slots", items.len()),
                    );
                }
                for item in items.iter().flatten() {
                    if !q.options.contains(item) {
                        warn(q.id, format!("'{item}' is not among the draggable options"));
                    }
                }
            }
            _ => warn(q.id, format!("correct answer shape does not fit a {} question", q.kind)),
        }
    }

    warnings
}
