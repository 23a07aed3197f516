//! Cosmetic word-by-word reveal of a reply, decoupled from timing.
//!
//! [`WordReveal`] is a pure, finite iterator of growing prefixes; pacing
//! and cancellation live in [`play`], so tests can drive the sequence
//! without real delays.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Finite iterator of growing prefixes of a text, one word per step.
///
/// Boundaries follow single spaces, so every prefix ends on a whole word
/// and the final prefix reproduces the input exactly. Restart by
/// constructing a new value (or cloning one taken before iteration).
#[derive(Debug, Clone)]
pub struct WordReveal {
    text: String,
    pos: usize,
}

impl WordReveal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }

    /// The full text being revealed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The prefix revealed so far
    pub fn revealed(&self) -> &str {
        &self.text[..self.pos]
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }
}

impl Iterator for WordReveal {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.is_done() {
            return None;
        }
        let rest = &self.text[self.pos..];
        // Word ends just before the next space; the space itself is
        // consumed so the following prefix starts on the next word.
        let (end, advance) = match rest.find(' ') {
            Some(i) => (self.pos + i, i + 1),
            None => (self.text.len(), rest.len()),
        };
        self.pos += advance;
        Some(self.text[..end].to_string())
    }
}

/// Drive a reveal at a fixed interval, stopping early when cancelled.
///
/// Calls `on_frame` with each successive prefix and returns the number of
/// frames emitted. Cancellation stops playback only; it never touches
/// conversation state.
pub async fn play<F>(
    reveal: WordReveal,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_frame: F,
) -> usize
where
    F: FnMut(&str),
{
    let mut ticker = tokio::time::interval(interval);
    let mut emitted = 0;
    for frame in reveal {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                on_frame(&frame);
                emitted += 1;
            }
        }
    }
    emitted
}
