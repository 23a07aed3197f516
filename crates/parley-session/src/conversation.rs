//! Append-only conversation history shared with the relay.

use parley_gemini::Turn;

/// Ordered sequence of turns for one session.
///
/// Grows by two entries (user, then model) per completed exchange and is
/// emptied only by [`ChatHistory::clear`]. Never persisted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChatHistory {
    turns: Vec<Turn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append a user turn with a single text part
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    /// Append a model turn with a single text part
    pub fn push_model(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::model(text));
    }

    /// Drop every turn. Idempotent.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
