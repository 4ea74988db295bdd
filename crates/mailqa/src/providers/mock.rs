use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traits::QaProvider;
use crate::types::{CorpusInfo, History};

/// Mock provider for testing. Answers echo the question, history grows by
/// one entry per round, and both endpoints can be made to fail on demand.
pub struct MockQaProvider {
    ready: bool,
    fail_answers: AtomicBool,
    fail_corpus: AtomicBool,
    corpus_loads: AtomicUsize,
    history_seen: Mutex<Vec<bool>>,
}

impl MockQaProvider {
    pub fn new() -> Self {
        Self {
            ready: false,
            fail_answers: AtomicBool::new(false),
            fail_corpus: AtomicBool::new(false),
            corpus_loads: AtomicUsize::new(0),
            history_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_answers(&self, fail: bool) {
        self.fail_answers.store(fail, Ordering::SeqCst);
    }

    pub fn fail_corpus(&self, fail: bool) {
        self.fail_corpus.store(fail, Ordering::SeqCst);
    }

    pub fn corpus_loads(&self) -> usize {
        self.corpus_loads.load(Ordering::SeqCst)
    }

    /// Whether history was forwarded, one entry per `answer` call that
    /// reached the service.
    pub fn history_seen(&self) -> Vec<bool> {
        self.history_seen.lock().unwrap().clone()
    }
}

impl Default for MockQaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QaProvider for MockQaProvider {
    async fn initialize(&mut self, _config: Value) -> Result<()> {
        self.ready = true;
        Ok(())
    }

    async fn load_corpus(&self) -> Result<CorpusInfo> {
        if self.fail_corpus.load(Ordering::SeqCst) {
            return Err(anyhow!("mock: mailbox unreachable"));
        }
        self.corpus_loads.fetch_add(1, Ordering::SeqCst);
        Ok(CorpusInfo {
            emails: 42,
            detail: None,
        })
    }

    async fn answer(
        &self,
        question: &str,
        history: Option<&History>,
    ) -> Result<(History, String)> {
        if self.fail_answers.load(Ordering::SeqCst) {
            return Err(anyhow!("mock: qa backend down"));
        }

        self.history_seen.lock().unwrap().push(history.is_some());

        let mut turns = history
            .map(|h| h.clone().into_inner())
            .unwrap_or_else(|| json!([]));
        turns
            .as_array_mut()
            .ok_or_else(|| anyhow!("mock history must be an array"))?
            .push(json!({ "q": question }));

        Ok((History::from(turns), format!("about '{}': nothing new", question)))
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn history_accumulates_per_round() {
        let qa = MockQaProvider::new();

        let (first, _) = qa.answer("latest from alice?", None).await.unwrap();
        let (second, _) = qa.answer("and from bob?", Some(&first)).await.unwrap();

        let turns = second.into_inner();
        assert_eq!(turns.as_array().unwrap().len(), 2);
        assert_eq!(qa.history_seen(), vec![false, true]);
    }

    #[tokio::test]
    async fn failure_injection_is_reversible() {
        let qa = MockQaProvider::new();
        qa.fail_answers(true);
        assert!(qa.answer("anything", None).await.is_err());

        qa.fail_answers(false);
        assert!(qa.answer("anything", None).await.is_ok());
    }
}
