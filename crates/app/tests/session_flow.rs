use anyhow::Result;
use mailqa::{MockQaProvider, QaProvider};
use mailwalk::session::Session;

/// Drives a session against a provider the way the app's ask round does:
/// forward history only when continuing, record it only on success.
struct TestChat {
    session: Session,
    qa: MockQaProvider,
}

impl TestChat {
    fn new() -> Self {
        Self {
            session: Session::new(),
            qa: MockQaProvider::new(),
        }
    }

    async fn ask(&mut self, question: &str) -> Result<String> {
        let (history, answer) = self
            .qa
            .answer(question, self.session.outgoing_history())
            .await?;
        self.session.record_round(history);
        Ok(answer)
    }
}

#[tokio::test]
async fn history_is_forwarded_only_after_the_first_turn() {
    let mut chat = TestChat::new();

    chat.ask("anything from alice?").await.unwrap();
    chat.ask("what did she want?").await.unwrap();
    chat.ask("reply needed?").await.unwrap();

    assert_eq!(chat.qa.history_seen(), vec![false, true, true]);
}

#[tokio::test]
async fn reset_forces_the_next_question_to_omit_context() {
    let mut chat = TestChat::new();

    chat.ask("anything from alice?").await.unwrap();
    chat.ask("what did she want?").await.unwrap();

    chat.session.reset();
    assert!(chat.session.is_fresh());

    chat.ask("start over: newest unread?").await.unwrap();
    assert_eq!(chat.qa.history_seen(), vec![false, true, false]);
}

#[tokio::test]
async fn failed_round_leaves_the_session_unchanged() {
    let mut chat = TestChat::new();

    chat.ask("anything from alice?").await.unwrap();
    let before = chat.session.outgoing_history().cloned();

    chat.qa.fail_answers(true);
    assert!(chat.ask("and bob?").await.is_err());

    // Untouched state means the user can simply retry.
    assert_eq!(chat.session.outgoing_history().cloned(), before);

    chat.qa.fail_answers(false);
    chat.ask("and bob?").await.unwrap();
    assert_eq!(chat.qa.history_seen(), vec![false, true]);
}

#[tokio::test]
async fn failed_first_round_keeps_the_session_fresh() {
    let mut chat = TestChat::new();

    chat.qa.fail_answers(true);
    assert!(chat.ask("anything from alice?").await.is_err());
    assert!(chat.session.is_fresh());
    assert!(chat.session.outgoing_history().is_none());
}

#[tokio::test]
async fn failed_corpus_load_leaves_the_session_resettable() {
    let mut chat = TestChat::new();

    chat.qa.fail_corpus(true);
    assert!(chat.qa.load_corpus().await.is_err());

    // The session is unaffected and a reset-then-reload still works.
    chat.session.reset();
    chat.qa.fail_corpus(false);
    assert!(chat.qa.load_corpus().await.is_ok());
    assert_eq!(chat.qa.corpus_loads(), 1);

    chat.ask("newest unread?").await.unwrap();
    assert_eq!(chat.qa.history_seen(), vec![false]);
}
