use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::traits::QaProvider;
use crate::types::{CorpusInfo, History};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8787";

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    history: Value,
    answer: String,
}

/// Client for the QA service over HTTP. The service owns email loading,
/// retrieval, and generation; this client only speaks its two endpoints.
pub struct HttpQaProvider {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl HttpQaProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
            api_key: None,
        }
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| anyhow!("Provider not initialized"))?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), path))
    }

    fn request(&self, url: String) -> reqwest::RequestBuilder {
        let mut req = self.client.post(url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }
}

impl Default for HttpQaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QaProvider for HttpQaProvider {
    async fn initialize(&mut self, config: Value) -> Result<()> {
        let base_url = config
            .get("base_url")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_BASE_URL);
        self.base_url = Some(base_url.to_string());
        self.api_key = config
            .get("api_key")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Ok(())
    }

    async fn load_corpus(&self) -> Result<CorpusInfo> {
        let url = self.endpoint("corpus/load")?;
        let response = self
            .request(url)
            .send()
            .await
            .context("corpus load request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("corpus load failed ({}): {}", status, body));
        }

        response
            .json::<CorpusInfo>()
            .await
            .context("corpus load returned an unexpected body")
    }

    async fn answer(
        &self,
        question: &str,
        history: Option<&History>,
    ) -> Result<(History, String)> {
        let url = self.endpoint("answers")?;

        // Omit the history key entirely on a fresh turn; the service treats
        // absence as "start a new conversation".
        let mut body = json!({ "question": question });
        if let Some(history) = history {
            body.as_object_mut()
                .expect("body is an object")
                .insert("history".into(), serde_json::to_value(history)?);
        }

        let response = self
            .request(url)
            .json(&body)
            .send()
            .await
            .context("answer request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("qa backend error ({}): {}", status, body));
        }

        let parsed: AnswerResponse = response
            .json()
            .await
            .context("answer response was not the expected shape")?;

        Ok((History::from(parsed.history), parsed.answer))
    }

    fn name(&self) -> &str {
        "http"
    }

    fn is_ready(&self) -> bool {
        self.base_url.is_some()
    }
}
