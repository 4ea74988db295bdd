use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub confidence: Option<f32>,
    pub language: Option<String>,
    pub duration_ms: Option<u64>,
}

/// Failure taxonomy the UI distinguishes. Anything that is neither silence
/// nor a transport problem collapses into `Other`.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("no speech detected in the recording")]
    NoSpeechDetected,
    #[error("transcription service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Initialize the provider with necessary configuration
    async fn initialize(&mut self, config: serde_json::Value) -> anyhow::Result<()>;

    /// Transcribe audio data (WAV format) to text
    async fn transcribe(&self, audio_data: Vec<u8>) -> Result<TranscriptionResult, TranscribeError>;

    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Check if the provider is ready
    fn is_ready(&self) -> bool;
}
