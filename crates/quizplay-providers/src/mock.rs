//! Mock generator for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizplay_core::traits::{GeneratedPayload, ModelInfo, QuizGenerator, QuizRequest};

/// Payload returned when no topic matches: one question of each shape.
pub const SAMPLE_PAYLOAD: &str = r#"{"questions": [
  {"type": "multiple_choice", "question": "Which port does HTTPS use by default?",
   "options": ["80", "443", "21", "25"], "correct_answer": "443",
   "explanation": "HTTPS runs over TLS on port 443."},
  {"type": "true_false", "question": "DNS primarily uses UDP port 53.", "correct_answer": true},
  {"type": "fill_blank", "question": "The _____ protocol securely transfers files.",
   "options": ["SFTP", "HTTP", "SMTP", "ICMP"], "correct_answer": "SFTP"},
  {"type": "drag_drop", "question": "Arrange the TCP three-way handshake in order:",
   "options": ["ACK", "SYN", "SYN-ACK"], "correct_answer": ["SYN", "SYN-ACK", "ACK"]},
  {"type": "drag_drop", "question": "Match the protocols with their functions:",
   "options": ["HTTPS", "DNS", "DHCP"],
   "descriptions": ["Secure web browsing", "Domain name resolution", "IP address assignment"],
   "correct_answer": ["HTTPS", "DNS", "DHCP"]}
]}"#;

/// A mock generator that answers without network access.
///
/// Returns configurable payloads based on topic matching.
pub struct MockGenerator {
    /// Map of topic substring → payload text.
    payloads: HashMap<String, String>,
    /// Payload if no topic matches.
    default_payload: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<QuizRequest>>,
}

impl MockGenerator {
    /// Create a mock with the given topic → payload mappings.
    pub fn new(payloads: HashMap<String, String>) -> Self {
        Self {
            payloads,
            default_payload: SAMPLE_PAYLOAD.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same payload.
    pub fn with_fixed_payload(payload: &str) -> Self {
        Self {
            payloads: HashMap::new(),
            default_payload: payload.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<QuizRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl QuizGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &QuizRequest) -> anyhow::Result<GeneratedPayload> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let topic = request.topic.to_lowercase();
        let text = self
            .payloads
            .iter()
            .find(|(key, _)| topic.contains(&key.to_lowercase()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_payload.clone());

        Ok(GeneratedPayload {
            text,
            model: request.model.clone().unwrap_or_else(|| "mock-model".into()),
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizplay_core::parser::parse_quiz_payload;
    use quizplay_core::QuizPlayer;

    #[tokio::test]
    async fn default_payload_parses() {
        let generator = MockGenerator::default();
        let request = QuizRequest::new("networking", 5, vec![]);
        let payload = generator.generate(&request).await.unwrap();
        let quiz = parse_quiz_payload(&payload.text).unwrap();
        assert_eq!(quiz.questions.len(), 5);
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.last_request().unwrap().topic, "networking");
    }

    #[tokio::test]
    async fn topic_matching() {
        let mut payloads = HashMap::new();
        payloads.insert(
            "rust".to_string(),
            r#"{"questions": [{"type": "true_false", "question": "Rust has a GC.", "correct_answer": false}]}"#
                .to_string(),
        );
        let generator = MockGenerator::new(payloads);

        let request = QuizRequest::new("Rust ownership", 1, vec![]);
        let payload = generator.generate(&request).await.unwrap();
        assert!(payload.text.contains("Rust has a GC."));

        let request = QuizRequest::new("networking", 1, vec![]);
        let payload = generator.generate(&request).await.unwrap();
        assert!(payload.text.contains("HTTPS"));
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn player_loads_from_mock() {
        let generator = MockGenerator::default();
        let mut player = QuizPlayer::new();
        let request = QuizRequest::new("networking", 5, vec![]);
        let session = player.load_from(&generator, &request).await.unwrap();
        assert_eq!(session.store().slot_count(3), Some(3));
    }
}
