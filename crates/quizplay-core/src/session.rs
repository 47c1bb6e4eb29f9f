//! Quiz sessions and the player that owns them.
//!
//! A [`QuizSession`] ties one displayed quiz to its drag-and-drop store. The
//! [`QuizPlayer`] holds at most one session and hands out request tickets so
//! that a generator response for a superseded request is never installed.

use std::collections::HashMap;

use uuid::Uuid;

use crate::dragdrop::{DragDropStore, Placement};
use crate::error::QuizError;
use crate::grader::{grade, GradingResult};
use crate::model::{AnswerShape, AnswerValue, Quiz};
use crate::parser::parse_quiz_payload;
use crate::traits::{QuizGenerator, QuizRequest, UserResponseProvider};

/// One displayed quiz and the slot state of its drag-and-drop questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    quiz: Quiz,
    store: DragDropStore,
}

impl QuizSession {
    /// Start a session, dropping repeated prompts before the store is built.
    pub fn start(mut quiz: Quiz) -> Self {
        quiz.dedup();
        let store = DragDropStore::for_quiz(&quiz);
        let id = Uuid::new_v4();
        tracing::info!(session = %id, questions = quiz.questions.len(), "quiz session started");
        Self { id, quiz, store }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn store(&self) -> &DragDropStore {
        &self.store
    }

    pub fn place_item(
        &mut self,
        question_id: usize,
        slot_index: usize,
        item: &str,
    ) -> Result<Placement, QuizError> {
        self.store.place_item(question_id, slot_index, item)
    }

    pub fn remove_from_slot(
        &mut self,
        question_id: usize,
        slot_index: usize,
    ) -> Result<Option<String>, QuizError> {
        self.store.remove_from_slot(question_id, slot_index)
    }

    /// Gather raw answers: slot questions from the store, everything else
    /// from the response provider. Unanswered scalar questions are left out.
    pub fn collect_answers(
        &self,
        responses: &dyn UserResponseProvider,
    ) -> HashMap<usize, AnswerValue> {
        let mut answers = HashMap::new();
        for question in &self.quiz.questions {
            let answer = match question.kind.answer_shape() {
                AnswerShape::Slots => self.store.snapshot(question.id),
                AnswerShape::Scalar | AnswerShape::Boolean => responses
                    .selected(question)
                    .filter(|s| !s.trim().is_empty())
                    .map(AnswerValue::Scalar),
            };
            if let Some(answer) = answer {
                answers.insert(question.id, answer);
            }
        }
        answers
    }

    /// Collect and grade in one step.
    pub fn submit(&self, responses: &dyn UserResponseProvider) -> Result<GradingResult, QuizError> {
        let answers = self.collect_answers(responses);
        let result = grade(&self.quiz, &answers)?;
        tracing::info!(
            session = %self.id,
            score = result.score,
            correct = result.correct_count,
            total = result.total,
            "quiz graded"
        );
        Ok(result)
    }
}

/// Handle for an in-flight quiz request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Owner of the active quiz session.
#[derive(Debug, Default)]
pub struct QuizPlayer {
    session: Option<QuizSession>,
    pending: Option<RequestTicket>,
    next_ticket: u64,
}

impl QuizPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new quiz request. The current session and any earlier
    /// pending request are discarded.
    pub fn begin_request(&mut self) -> RequestTicket {
        if let Some(old) = self.session.take() {
            tracing::info!(session = %old.id(), "discarding quiz session for new request");
        }
        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);
        self.pending = Some(ticket);
        ticket
    }

    /// Install the quiz parsed from `payload` if `ticket` is still current.
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        payload: &str,
    ) -> Result<&mut QuizSession, QuizError> {
        if self.pending != Some(ticket) {
            tracing::warn!(ticket = ticket.id(), "dropping response for superseded quiz request");
            return Err(QuizError::StaleRequest {
                ticket: ticket.id(),
                current: self.pending.map(RequestTicket::id),
            });
        }
        self.pending = None;
        let quiz = parse_quiz_payload(payload)?;
        Ok(self.session.insert(QuizSession::start(quiz)))
    }

    /// Abandon a request that failed or timed out.
    pub fn fail_request(&mut self, ticket: RequestTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    /// Request, fetch and install a quiz in one call.
    pub async fn load_from(
        &mut self,
        generator: &dyn QuizGenerator,
        request: &QuizRequest,
    ) -> anyhow::Result<&mut QuizSession> {
        let ticket = self.begin_request();
        let payload = match generator.generate(request).await {
            Ok(payload) => payload,
            Err(e) => {
                self.fail_request(ticket);
                return Err(e.context(format!("{} failed to generate a quiz", generator.name())));
            }
        };
        tracing::debug!(model = %payload.model, latency_ms = payload.latency_ms, "quiz payload received");
        Ok(self.complete_request(ticket, &payload.text)?)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn session(&self) -> Result<&QuizSession, QuizError> {
        self.session.as_ref().ok_or(QuizError::NoQuizLoaded)
    }

    pub fn session_mut(&mut self) -> Result<&mut QuizSession, QuizError> {
        self.session.as_mut().ok_or(QuizError::NoQuizLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::traits::{GeneratedPayload, ModelInfo};
    use async_trait::async_trait;

    const PAYLOAD: &str = r#"{"questions": [
        {"type": "true_false", "question": "TCP is connection-oriented.", "correct_answer": "true"},
        {"type": "drag_drop", "question": "Order the handshake:",
         "options": ["ACK", "SYN", "SYN-ACK"], "correct_answer": ["SYN", "SYN-ACK", "ACK"]},
        {"type": "drag_drop", "question": "Match:", "options": ["x", "y", "z"],
         "descriptions": ["1", "2", "3"], "correct_answer": ["x", "y", "z"]},
        {"type": "coding", "question": "Complete the snippet:",
         "code_template": "let v = _____::new();\nprintln!(\"{}\", v._____());",
         "options": ["Vec", "len", "String"], "correct_answer": ["Vec", "len"]},
        {"type": "true_false", "question": "TCP is connection-oriented.", "correct_answer": "false"}
    ]}"#;

    fn answers_true(_: &Question) -> Option<String> {
        Some("TRUE".to_string())
    }

    fn loaded_player() -> QuizPlayer {
        let mut player = QuizPlayer::new();
        let ticket = player.begin_request();
        player.complete_request(ticket, PAYLOAD).unwrap();
        player
    }

    #[test]
    fn full_attempt_is_graded() {
        let mut player = loaded_player();
        let session = player.session_mut().unwrap();
        assert_eq!(session.quiz().questions.len(), 4);

        session.place_item(1, 0, "SYN").unwrap();
        session.place_item(1, 1, "ACK").unwrap();
        session.place_item(1, 2, "SYN-ACK").unwrap();

        session.place_item(2, 0, "x").unwrap();
        session.place_item(2, 2, "y").unwrap();
        session.place_item(2, 1, "z").unwrap();
        session.place_item(2, 1, "y").unwrap();
        session.place_item(2, 2, "z").unwrap();

        session.place_item(3, 0, "Vec").unwrap();
        session.place_item(3, 1, "len").unwrap();

        let result = session.submit(&answers_true).unwrap();
        assert_eq!(result.total, 4);
        assert!(result.details[0].is_correct);
        assert!(!result.details[1].is_correct);
        assert!(result.details[2].is_correct);
        assert!(result.details[3].is_correct);
        assert_eq!(result.correct_count, 3);
        assert_eq!(result.score, 75);
    }

    #[test]
    fn coding_blanks_become_slots() {
        let mut player = loaded_player();
        let session = player.session_mut().unwrap();
        assert_eq!(session.store().slot_count(3), Some(2));
        assert_eq!(session.store().available(3).unwrap().len(), 3);

        session.place_item(3, 0, "String").unwrap();
        session.place_item(3, 1, "len").unwrap();
        assert_eq!(
            session.store().snapshot(3),
            Some(AnswerValue::list(["String", "len"]))
        );

        session.place_item(3, 0, "Vec").unwrap();
        assert_eq!(
            session.store().snapshot(3),
            Some(AnswerValue::list(["Vec", "len"]))
        );
        assert!(session.store().is_consistent(3));

        let result = session.submit(&answers_true).unwrap();
        assert!(result.details[3].is_correct);
        assert_eq!(result.details[3].correct_answer, AnswerValue::list(["Vec", "len"]));
    }

    #[test]
    fn unanswered_question_blocks_submission() {
        let player = loaded_player();
        let session = player.session().unwrap();
        let nothing = |_: &Question| -> Option<String> { None };
        assert_eq!(
            session.submit(&nothing).unwrap_err(),
            QuizError::IncompleteSubmission { missing: vec![0] }
        );
    }

    #[test]
    fn new_request_discards_session_and_stale_responses() {
        let mut player = loaded_player();
        let first = player.begin_request();
        assert!(matches!(player.session(), Err(QuizError::NoQuizLoaded)));

        let second = player.begin_request();
        let stale = player.complete_request(first, PAYLOAD).unwrap_err();
        assert_eq!(
            stale,
            QuizError::StaleRequest {
                ticket: first.id(),
                current: Some(second.id())
            }
        );
        assert!(player.is_pending());

        let session = player.complete_request(second, PAYLOAD).unwrap();
        assert_eq!(session.store().available(1).unwrap().len(), 3);
        assert!(!player.is_pending());
    }

    #[test]
    fn malformed_payload_installs_nothing() {
        let mut player = QuizPlayer::new();
        let ticket = player.begin_request();
        assert!(matches!(
            player.complete_request(ticket, "{}"),
            Err(QuizError::MalformedQuizPayload(_))
        ));
        assert!(player.session().is_err());
    }

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl QuizGenerator for FixedGenerator {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _: &QuizRequest) -> anyhow::Result<GeneratedPayload> {
            Ok(GeneratedPayload {
                text: self.0.to_string(),
                model: "fixed".into(),
                latency_ms: 0,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    #[tokio::test]
    async fn load_from_generator() {
        let mut player = QuizPlayer::new();
        let generator = FixedGenerator(PAYLOAD);
        let request = QuizRequest::new("networking", 4, vec![]);
        let session = player.load_from(&generator, &request).await.unwrap();
        assert_eq!(session.quiz().questions.len(), 4);
    }
}
