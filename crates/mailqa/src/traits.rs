use anyhow::Result;
use async_trait::async_trait;

use crate::types::{CorpusInfo, History};

#[async_trait]
pub trait QaProvider: Send + Sync {
    /// Initialize the provider with necessary configuration
    async fn initialize(&mut self, config: serde_json::Value) -> Result<()>;

    /// (Re)load the email corpus on the QA service
    async fn load_corpus(&self) -> Result<CorpusInfo>;

    /// Answer a question about the corpus. `history` carries the prior
    /// conversation and is omitted on the first turn of a fresh session.
    async fn answer(&self, question: &str, history: Option<&History>)
        -> Result<(History, String)>;

    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Check if the provider is ready
    fn is_ready(&self) -> bool;
}
