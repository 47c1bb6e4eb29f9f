//! Drag-and-drop slot state.
//!
//! The store is the single source of truth for which item sits in which drop
//! target. For every question it holds, the items in slots plus the items in
//! the available pool always equal the question's option set, with nothing
//! duplicated and nothing lost.

use std::collections::{HashMap, HashSet};

use crate::error::QuizError;
use crate::model::{AnswerValue, Question, Quiz};

/// What a successful [`DragDropStore::place_item`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Slot the item was moved out of, if it was already placed elsewhere.
    pub moved_from: Option<usize>,
    /// Previous occupant of the target slot, now back in the pool.
    pub displaced: Option<String>,
    /// The item already occupied the target slot; nothing changed.
    pub unchanged: bool,
}

#[derive(Debug, Clone)]
struct SlotBoard {
    options: Vec<String>,
    slots: Vec<Option<String>>,
    pool: Vec<String>,
}

impl SlotBoard {
    fn new(options: &[String], slot_count: usize) -> Self {
        let mut seen = HashSet::new();
        let options: Vec<String> = options
            .iter()
            .filter(|o| seen.insert(o.as_str()))
            .cloned()
            .collect();
        Self {
            pool: options.clone(),
            options,
            slots: vec![None; slot_count],
        }
    }

    fn position_of(&self, item: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_deref() == Some(item))
    }

    fn is_consistent(&self) -> bool {
        let placed = self.slots.iter().flatten();
        let mut all: Vec<&String> = placed.chain(self.pool.iter()).collect();
        if all.len() != self.options.len() {
            return false;
        }
        all.sort();
        let mut expected: Vec<&String> = self.options.iter().collect();
        expected.sort();
        all == expected
    }
}

/// Per-session slot assignments for every drag-and-drop and coding question.
#[derive(Debug, Clone, Default)]
pub struct DragDropStore {
    boards: HashMap<usize, SlotBoard>,
}

impl DragDropStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with one board per slot-based question of the quiz.
    pub fn for_quiz(quiz: &Quiz) -> Self {
        let mut store = Self::new();
        for question in quiz.questions.iter().filter(|q| q.kind.uses_slots()) {
            store.register(question);
        }
        store
    }

    /// Add (or reset) the board for a single question. Repeated option
    /// values are collapsed to one draggable item.
    pub fn register(&mut self, question: &Question) {
        let board = SlotBoard::new(&question.options, question.slot_count());
        if board.options.len() != question.options.len() {
            tracing::warn!(
                question_id = question.id,
                "question has repeated options, keeping one draggable item per value"
            );
        }
        self.boards.insert(question.id, board);
    }

    pub fn contains(&self, question_id: usize) -> bool {
        self.boards.contains_key(&question_id)
    }

    /// Put `item` into a slot, moving it out of any other slot it occupies
    /// and returning the slot's previous occupant to the pool.
    ///
    /// Invalid references leave the store untouched and are logged.
    pub fn place_item(
        &mut self,
        question_id: usize,
        slot_index: usize,
        item: &str,
    ) -> Result<Placement, QuizError> {
        let board = self.board_mut(question_id, slot_index)?;
        if !board.options.iter().any(|o| o == item) {
            return Err(invalid(
                question_id,
                slot_index,
                format!("'{item}' is not an option of this question"),
            ));
        }

        if board.slots[slot_index].as_deref() == Some(item) {
            return Ok(Placement {
                unchanged: true,
                ..Placement::default()
            });
        }

        let moved_from = board.position_of(item);
        if let Some(previous) = moved_from {
            board.slots[previous] = None;
        }

        let displaced = board.slots[slot_index].take();
        if let Some(prior) = &displaced {
            board.pool.push(prior.clone());
        }

        board.slots[slot_index] = Some(item.to_string());
        board.pool.retain(|p| p != item);

        debug_assert!(board.is_consistent());
        Ok(Placement {
            moved_from,
            displaced,
            unchanged: false,
        })
    }

    /// Clear a slot, appending its occupant to the end of the pool.
    pub fn remove_from_slot(
        &mut self,
        question_id: usize,
        slot_index: usize,
    ) -> Result<Option<String>, QuizError> {
        let board = self.board_mut(question_id, slot_index)?;
        let removed = board.slots[slot_index].take();
        if let Some(item) = &removed {
            board.pool.push(item.clone());
        }
        debug_assert!(board.is_consistent());
        Ok(removed)
    }

    /// Slot occupants in order, `None` for empty slots.
    pub fn snapshot(&self, question_id: usize) -> Option<AnswerValue> {
        self.boards
            .get(&question_id)
            .map(|board| AnswerValue::OrderedList(board.slots.clone()))
    }

    /// Items not currently placed, in display order.
    pub fn available(&self, question_id: usize) -> Option<&[String]> {
        self.boards.get(&question_id).map(|b| b.pool.as_slice())
    }

    pub fn occupant(&self, question_id: usize, slot_index: usize) -> Option<&str> {
        self.boards
            .get(&question_id)
            .and_then(|b| b.slots.get(slot_index))
            .and_then(|slot| slot.as_deref())
    }

    pub fn slot_count(&self, question_id: usize) -> Option<usize> {
        self.boards.get(&question_id).map(|b| b.slots.len())
    }

    /// Whether slots and pool together still hold exactly the option set.
    pub fn is_consistent(&self, question_id: usize) -> bool {
        self.boards
            .get(&question_id)
            .is_some_and(SlotBoard::is_consistent)
    }

    fn board_mut(
        &mut self,
        question_id: usize,
        slot_index: usize,
    ) -> Result<&mut SlotBoard, QuizError> {
        let Some(board) = self.boards.get_mut(&question_id) else {
            return Err(invalid(question_id, slot_index, "unknown question".into()));
        };
        if slot_index >= board.slots.len() {
            let reason = format!("slot out of range (question has {})", board.slots.len());
            return Err(invalid(question_id, slot_index, reason));
        }
        Ok(board)
    }
}

fn invalid(question_id: usize, slot_index: usize, reason: String) -> QuizError {
    tracing::warn!(question_id, slot_index, %reason, "ignoring invalid drag operation");
    QuizError::InvalidDragOperation {
        question_id,
        slot_index,
        reason,
    }
}
