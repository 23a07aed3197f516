//! The conversation controller: owns the history and drives one exchange
//! at a time.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parley_gemini::{Part, Role, Turn};

use crate::{
    attachment::Attachment,
    conversation::ChatHistory,
    error::{Error, Result},
    transport::Transport,
};

/// One chat session against a relay.
///
/// Owns its history, so independent sessions coexist without shared
/// state. Exchanges are single-slot: a submit while one is pending is
/// rejected with [`Error::Busy`] rather than raced.
pub struct Session {
    history: ChatHistory,
    transport: Arc<dyn Transport>,
    pending_attachment: Option<Attachment>,
    in_flight: Arc<AtomicBool>,
}

impl Session {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            history: ChatHistory::new(),
            transport,
            pending_attachment: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Whether an exchange is currently pending
    pub fn is_exchanging(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Stage a file for the next user turn, replacing any previous one
    pub fn attach(&mut self, attachment: Attachment) {
        self.pending_attachment = Some(attachment);
    }

    /// Discard the staged file, returning it if there was one
    pub fn detach(&mut self) -> Option<Attachment> {
        self.pending_attachment.take()
    }

    pub fn pending_attachment(&self) -> Option<&Attachment> {
        self.pending_attachment.as_ref()
    }

    /// Empty the history and drop any staged attachment. Idempotent.
    pub fn clear(&mut self) {
        self.history.clear();
        self.pending_attachment = None;
    }

    /// Submit one user message and wait for the reply.
    ///
    /// Empty or whitespace-only input is ignored (`Ok(None)`). The user
    /// turn is recorded before the exchange starts; the model turn is
    /// recorded only on success, so a failed exchange leaves the question
    /// in the history without an answer.
    pub async fn submit(&mut self, input: &str) -> Result<Option<String>> {
        let message = input.trim();
        if message.is_empty() {
            return Ok(None);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy);
        }

        let result = self.run_exchange(message).await;
        self.in_flight.store(false, Ordering::Release);
        result.map(Some)
    }

    async fn run_exchange(&mut self, message: &str) -> Result<String> {
        let mut parts = vec![Part::text(message)];
        if let Some(attachment) = self.pending_attachment.take() {
            parts.push(attachment.into_part());
        }
        self.history.push(Turn::with_parts(Role::User, parts));

        tracing::debug!(turns = self.history.len(), "starting exchange");
        let reply = self
            .transport
            .exchange(message, self.history.turns())
            .await?;

        self.history.push_model(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_gemini::Turn;
    use std::sync::Mutex;

    /// Records every exchange and answers from a canned script.
    struct MockTransport {
        replies: Mutex<Vec<Result<String>>>,
        seen: Mutex<Vec<(String, Vec<Turn>)>>,
    }

    impl MockTransport {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Vec<Turn>)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn exchange(&self, message: &str, history: &[Turn]) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((message.to_string(), history.to_vec()));
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok("done".to_string())
            } else {
                replies.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_round_trip_appends_user_then_model() {
        let transport = MockTransport::new(vec![Ok("Hi there!".into())]);
        let mut session = Session::new(transport.clone());

        let reply = session.submit("Hello").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Hi there!"));

        let turns = session.history().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("Hello"));
        assert_eq!(turns[1], Turn::model("Hi there!"));
    }

    #[tokio::test]
    async fn test_sent_history_includes_the_new_user_turn() {
        let transport = MockTransport::new(vec![Ok("first".into()), Ok("second".into())]);
        let mut session = Session::new(transport.clone());

        session.submit("one").await.unwrap();
        session.submit("two").await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        // First exchange: just the new user turn.
        assert_eq!(calls[0].1, vec![Turn::user("one")]);
        // Second exchange: the completed first exchange plus the new turn.
        assert_eq!(
            calls[1].1,
            vec![
                Turn::user("one"),
                Turn::model("first"),
                Turn::user("two")
            ]
        );
    }

    #[tokio::test]
    async fn test_whitespace_input_is_a_no_op() {
        let transport = MockTransport::new(vec![]);
        let mut session = Session::new(transport.clone());

        assert!(session.submit("").await.unwrap().is_none());
        assert!(session.submit("   \t\n").await.unwrap().is_none());
        assert!(session.history().is_empty());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_exchange_keeps_user_turn_only() {
        let transport = MockTransport::new(vec![Err(Error::NotJson)]);
        let mut session = Session::new(transport.clone());

        let err = session.submit("Hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Server did not return JSON");

        let turns = session.history().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0], Turn::user("Hello"));
    }

    #[tokio::test]
    async fn test_session_recovers_after_failure() {
        let transport =
            MockTransport::new(vec![Err(Error::NotJson), Ok("better now".into())]);
        let mut session = Session::new(transport.clone());

        session.submit("first").await.unwrap_err();
        assert!(!session.is_exchanging());

        let reply = session.submit("second").await.unwrap();
        assert_eq!(reply.as_deref(), Some("better now"));
        assert_eq!(session.history().len(), 3);
    }

    #[tokio::test]
    async fn test_busy_guard_rejects_overlapping_submit() {
        let transport = MockTransport::new(vec![]);
        let mut session = Session::new(transport.clone());
        session.in_flight.store(true, Ordering::Release);

        let err = session.submit("Hello").await.unwrap_err();
        assert!(matches!(err, Error::Busy));
        assert!(session.history().is_empty());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_rides_the_next_user_turn() {
        let transport = MockTransport::new(vec![Ok("nice picture".into())]);
        let mut session = Session::new(transport.clone());

        session.attach(Attachment::new("image/png", "aGk="));
        session.submit("what is this?").await.unwrap();

        let calls = transport.calls();
        let user_turn = &calls[0].1[0];
        assert_eq!(user_turn.parts.len(), 2);
        assert_eq!(user_turn.parts[0], Part::text("what is this?"));
        assert_eq!(
            user_turn.parts[1],
            Part::inline_data("image/png", "aGk=")
        );
        // Consumed: the next turn goes out without it.
        assert!(session.pending_attachment().is_none());
    }

    #[tokio::test]
    async fn test_detach_discards_staged_file() {
        let transport = MockTransport::new(vec![Ok("ok".into())]);
        let mut session = Session::new(transport.clone());

        session.attach(Attachment::new("application/pdf", "aGk="));
        assert!(session.detach().is_some());
        assert!(session.detach().is_none());

        session.submit("no file").await.unwrap();
        assert_eq!(transport.calls()[0].1[0].parts.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_history_and_attachment() {
        let transport = MockTransport::new(vec![Ok("Hi there!".into())]);
        let mut session = Session::new(transport.clone());

        session.submit("Hello").await.unwrap();
        session.attach(Attachment::new("image/png", "aGk="));
        session.clear();

        assert!(session.history().is_empty());
        assert!(session.pending_attachment().is_none());

        // Clearing an already-empty session stays a no-op.
        session.clear();
        assert!(session.history().is_empty());
    }
}
