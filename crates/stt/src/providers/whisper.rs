use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::traits::{TranscribeError, TranscriptionProvider, TranscriptionResult};

const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
const DEFAULT_MODEL: &str = "whisper-large-v3-turbo";

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcription over a Whisper-compatible HTTP endpoint (Groq by default).
pub struct WhisperHttpProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl WhisperHttpProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for WhisperHttpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperHttpProvider {
    async fn initialize(&mut self, config: serde_json::Value) -> Result<()> {
        let api_key = config
            .get("api_key")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing api_key in config"))?;
        self.api_key = Some(api_key.to_string());

        if let Some(endpoint) = config.get("endpoint").and_then(|v| v.as_str()) {
            self.endpoint = endpoint.to_string();
        }
        if let Some(model) = config.get("model").and_then(|v| v.as_str()) {
            self.model = model.to_string();
        }
        Ok(())
    }

    async fn transcribe(
        &self,
        audio_data: Vec<u8>,
    ) -> Result<TranscriptionResult, TranscribeError> {
        if audio_data.is_empty() {
            return Err(TranscribeError::NoSpeechDetected);
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Provider not initialized"))?;

        let form = build_form(&self.model, audio_data).map_err(TranscribeError::Other)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.is_server_error() || status.as_u16() == 429 {
                return Err(TranscribeError::ServiceUnavailable(format!(
                    "{}: {}",
                    status, body
                )));
            }
            return Err(anyhow!("transcription rejected ({}): {}", status, body).into());
        }

        let parsed: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Other(e.into()))?;

        result_from_text(parsed.text)
    }

    fn name(&self) -> &str {
        "whisper-http"
    }

    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }
}

fn build_form(model: &str, wav_data: Vec<u8>) -> Result<multipart::Form> {
    let form = multipart::Form::new()
        .text("model", model.to_string())
        .text("response_format", "json")
        .text("language", "en")
        .part(
            "file",
            multipart::Part::bytes(wav_data)
                .file_name("audio.wav")
                .mime_str("audio/wav")?,
        );
    Ok(form)
}

/// A blank transcript means the service heard nothing intelligible.
fn result_from_text(text: String) -> Result<TranscriptionResult, TranscribeError> {
    if text.trim().is_empty() {
        return Err(TranscribeError::NoSpeechDetected);
    }
    Ok(TranscriptionResult {
        text,
        confidence: None,
        language: Some("en".to_string()),
        duration_ms: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_transcripts_map_to_no_speech() {
        assert!(matches!(
            result_from_text("   \n".to_string()),
            Err(TranscribeError::NoSpeechDetected)
        ));
    }

    #[test]
    fn nonblank_transcripts_pass_through() {
        let result = result_from_text("did bob reply".to_string()).unwrap();
        assert_eq!(result.text, "did bob reply");
        assert_eq!(result.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn empty_audio_is_rejected_before_upload() {
        let provider = WhisperHttpProvider::new();
        let err = provider.transcribe(Vec::new()).await;
        assert!(matches!(err, Err(TranscribeError::NoSpeechDetected)));
    }
}
