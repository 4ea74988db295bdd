use mailqa::History;

/// Conversation state carried across question-answer rounds. The history
/// payload is opaque; only the QA service reads or extends it.
#[derive(Debug)]
pub struct Session {
    history: Option<History>,
    fresh: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: None,
            fresh: true,
        }
    }

    /// History to forward with the next question. `None` while the session
    /// is fresh, so the service starts a new conversation.
    pub fn outgoing_history(&self) -> Option<&History> {
        if self.fresh {
            None
        } else {
            self.history.as_ref()
        }
    }

    /// Record a successful round. Failed rounds never reach this, which is
    /// what keeps the session retryable after an error.
    pub fn record_round(&mut self, history: History) {
        self.history = Some(history);
        self.fresh = false;
    }

    /// Drop accumulated context; the next question starts from scratch.
    pub fn reset(&mut self) {
        self.history = None;
        self.fresh = true;
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn some_history() -> History {
        History::from(json!([{"q": "a"}]))
    }

    #[test]
    fn fresh_session_forwards_nothing() {
        let session = Session::new();
        assert!(session.is_fresh());
        assert!(session.outgoing_history().is_none());
    }

    #[test]
    fn recorded_round_continues_the_conversation() {
        let mut session = Session::new();
        session.record_round(some_history());
        assert!(!session.is_fresh());
        assert!(session.outgoing_history().is_some());
    }

    #[test]
    fn reset_forces_a_fresh_context() {
        let mut session = Session::new();
        session.record_round(some_history());
        session.reset();
        assert!(session.is_fresh());
        assert!(session.outgoing_history().is_none());
    }
}
