//! Core trait definitions for quiz generators and answer capture.
//!
//! `QuizGenerator` is implemented by the `quizplay-providers` crate;
//! `UserResponseProvider` is implemented by whatever view layer hosts the quiz.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Question, BLANK_MARKER};

// ---------------------------------------------------------------------------
// Quiz generator trait
// ---------------------------------------------------------------------------

/// Trait for backends that produce quiz payloads from a topic.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Human-readable generator name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Produce the raw textual payload for a quiz request.
    async fn generate(&self, request: &QuizRequest) -> anyhow::Result<GeneratedPayload>;

    /// List models this generator can use.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Smallest and largest number of questions a request may ask for.
pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 20;

/// Wire names of the question types a generator can be asked for.
pub const WIRE_QUESTION_TYPES: [&str; 5] = [
    "multiple_choice",
    "drag_drop",
    "fill_blank",
    "true_false",
    "coding",
];

/// Request for a generated quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Subject of the quiz.
    pub topic: String,
    /// Number of questions, clamped to `MIN_QUESTIONS..=MAX_QUESTIONS`.
    pub num_questions: u32,
    /// Wire type names to draw from.
    #[serde(default)]
    pub question_types: Vec<String>,
    /// Model identifier; the generator's default when absent.
    #[serde(default)]
    pub model: Option<String>,
}

impl QuizRequest {
    pub fn new(topic: impl Into<String>, num_questions: u32, question_types: Vec<String>) -> Self {
        let question_types = if question_types.is_empty() {
            WIRE_QUESTION_TYPES.iter().map(|t| t.to_string()).collect()
        } else {
            question_types
        };
        Self {
            topic: topic.into(),
            num_questions: num_questions.clamp(MIN_QUESTIONS, MAX_QUESTIONS),
            question_types,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Raw generator output, before parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPayload {
    /// The textual payload, possibly wrapped in a code fence.
    pub text: String,
    /// Model that actually generated the payload.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Answer capture
// ---------------------------------------------------------------------------

/// Supplies the user's selection for questions answered through plain form
/// controls (radio buttons, selects). Slot-based questions are read from the
/// drag-and-drop store instead.
pub trait UserResponseProvider {
    /// The selected value, or `None` if the question has not been answered.
    fn selected(&self, question: &Question) -> Option<String>;
}

impl<F> UserResponseProvider for F
where
    F: Fn(&Question) -> Option<String>,
{
    fn selected(&self, question: &Question) -> Option<String> {
        self(question)
    }
}

// ---------------------------------------------------------------------------
// Generation prompt
// ---------------------------------------------------------------------------

/// Build the generation prompt for a quiz request.
pub fn build_prompt(request: &QuizRequest) -> String {
    let n = request.num_questions;
    let types = request.question_types.join(", ");
    let mut prompt = format!(
        "Generate a quiz about {topic} containing exactly {n} questions.\n\
         Use only the following question types: {types}. The number of questions must be exactly {n}.\n\n\
         For true/false questions, always use lowercase boolean values (true/false) for correct_answer.\n\n",
        topic = request.topic,
    );

    let wants = |t: &str| request.question_types.iter().any(|q| q == t);

    if wants("coding") {
        prompt.push_str(&format!(
            "Coding questions are drag-and-drop code completion tasks:\n\
             - Provide a code_template with each missing part marked by exactly {BLANK_MARKER}\n\
             - options holds the code fragments, descriptions names each blank\n\
             - correct_answer lists the fragments in blank order\n\
             Example: {{\"type\": \"coding\", \"question\": \"Complete the authentication function.\", \
             \"code_template\": \"def authenticate(user):\\n    if not {BLANK_MARKER}:\\n        return False\\n    return {BLANK_MARKER}\", \
             \"options\": [\"user\", \"check(user)\"], \"descriptions\": [\"Presence check\", \"Credential check\"], \
             \"correct_answer\": [\"user\", \"check(user)\"]}}\n\n"
        ));
    }

    if wants("drag_drop") {
        prompt.push_str(
            "Drag-and-drop questions are matching or ordering tasks:\n\
             - options holds the draggable items\n\
             - include descriptions for matching questions, one per slot, and give correct_answer in description order\n\
             - omit descriptions for ordering questions and give correct_answer in the required order\n\
             Example (matching): {\"type\": \"drag_drop\", \"question\": \"Match the protocols with their functions:\", \
             \"options\": [\"HTTPS\", \"DNS\"], \"descriptions\": [\"Secure web browsing\", \"Domain name resolution\"], \
             \"correct_answer\": [\"HTTPS\", \"DNS\"]}\n\
             Example (ordering): {\"type\": \"drag_drop\", \"question\": \"Arrange the TCP handshake steps in order:\", \
             \"options\": [\"ACK\", \"SYN\", \"SYN-ACK\"], \"correct_answer\": [\"SYN\", \"SYN-ACK\", \"ACK\"]}\n\n",
        );
    }

    if wants("fill_blank") {
        prompt.push_str(&format!(
            "Fill-in-the-blank questions mark the blank with exactly {BLANK_MARKER} and offer 4-5 plausible options.\n\
             Example: {{\"type\": \"fill_blank\", \"question\": \"The {BLANK_MARKER} protocol transfers files securely.\", \
             \"options\": [\"SFTP\", \"HTTP\", \"SMTP\", \"ICMP\"], \"correct_answer\": \"SFTP\"}}\n\n"
        ));
    }

    prompt.push_str(
        "Each question may include an explanation and references ({\"title\", \"url\", \"source\"}).\n\
         Return only a valid JSON object, no markdown and no code blocks, shaped as:\n\
         {\"questions\": [{\"type\": \"question_type\", \"question\": \"question_text\", \"options\": [\"option1\", \"option2\"], \
         \"correct_answer\": \"answer\"}]}\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerValue, QuestionType};

    #[test]
    fn request_clamps_question_count() {
        assert_eq!(QuizRequest::new("rust", 0, vec![]).num_questions, 1);
        assert_eq!(QuizRequest::new("rust", 50, vec![]).num_questions, 20);
        assert_eq!(QuizRequest::new("rust", 7, vec![]).num_questions, 7);
    }

    #[test]
    fn request_defaults_to_all_types() {
        let request = QuizRequest::new("networking", 5, vec![]);
        assert_eq!(request.question_types.len(), WIRE_QUESTION_TYPES.len());
    }

    #[test]
    fn prompt_mentions_count_and_selected_types() {
        let request = QuizRequest::new("networking", 3, vec!["fill_blank".into()]);
        let prompt = build_prompt(&request);
        assert!(prompt.contains("about networking containing exactly 3 questions"));
        assert!(prompt.contains("exactly _____"));
        assert!(!prompt.contains("Drag-and-drop questions"));
        assert!(!prompt.contains("Coding questions"));
    }

    #[test]
    fn closures_provide_responses() {
        let provider = |q: &Question| (q.id == 0).then(|| "443".to_string());
        let question = Question {
            id: 0,
            prompt: "port".into(),
            kind: QuestionType::MultipleChoice,
            options: vec![],
            correct_answer: AnswerValue::scalar("443"),
            descriptions: None,
            code_template: None,
            explanation: None,
            references: vec![],
        };
        assert_eq!(provider.selected(&question).as_deref(), Some("443"));
    }
}
