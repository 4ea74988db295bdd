use std::io::Cursor;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde_json::json;

/// Marks audio a backend already played through the OS; playback skips it.
pub(crate) const PRESPOKEN_NOTE: &str = "spoken via system voice";

/// Audio data from TTS
#[derive(Debug, Clone)]
pub struct TtsAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub note: Option<String>,
}

impl TtsAudio {
    pub fn is_prespoken(&self) -> bool {
        self.note.as_deref() == Some(PRESPOKEN_NOTE)
    }
}

/// Trait for TTS backends
pub trait TtsBackend: Send + Sync {
    /// Synthesize speech. Blocking; callers run it on a dedicated thread.
    fn synthesize(&self, text: &str) -> Result<TtsAudio>;
    fn voice(&self) -> &str;
}

/// Speaks through the operating system's own voice.
pub struct LocalTtsBackend {
    voice_name: String,
}

impl LocalTtsBackend {
    pub fn new() -> Result<Self> {
        Ok(Self {
            voice_name: "System Voice".to_string(),
        })
    }
}

impl TtsBackend for LocalTtsBackend {
    fn synthesize(&self, text: &str) -> Result<TtsAudio> {
        if text.trim().is_empty() {
            return Err(anyhow!("TTS input text was empty"));
        }

        // The system speech command plays the audio itself and blocks until
        // it finishes; the returned bytes are a placeholder.
        #[cfg(target_os = "macos")]
        {
            use std::process::Command;

            let status = Command::new("/usr/bin/say")
                .arg("-r")
                .arg("200")
                .arg(text)
                .status()
                .context("Failed to run macOS say command")?;
            if !status.success() {
                return Err(anyhow!("macOS say exited with {}", status));
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            use std::process::Command;

            let status = Command::new("espeak")
                .arg(text)
                .status()
                .context("Failed to run espeak (is it installed?)")?;
            if !status.success() {
                return Err(anyhow!("espeak exited with {}", status));
            }
        }

        Ok(TtsAudio {
            bytes: placeholder_wav()?,
            content_type: "audio/wav".to_string(),
            note: Some(PRESPOKEN_NOTE.to_string()),
        })
    }

    fn voice(&self) -> &str {
        &self.voice_name
    }
}

/// Hosted synthesis against an OpenAI-compatible `/audio/speech` endpoint.
pub struct HostedTtsBackend {
    http: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl HostedTtsBackend {
    pub fn new(api_key: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(45))
            .build()
            .context("Failed to build HTTP client for hosted TTS")?;

        let base_url = std::env::var("GROQ_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.groq.com".to_string());
        let model = std::env::var("GROQ_TTS_MODEL").unwrap_or_else(|_| "playai-tts".to_string());
        let voice =
            std::env::var("GROQ_TTS_VOICE").unwrap_or_else(|_| "Fritz-PlayAI".to_string());

        Ok(Self {
            http,
            base_url,
            api_key,
            model,
            voice,
        })
    }
}

impl TtsBackend for HostedTtsBackend {
    fn synthesize(&self, text: &str) -> Result<TtsAudio> {
        if text.trim().is_empty() {
            return Err(anyhow!("TTS input text was empty"));
        }

        let body = json!({
            "model": self.model,
            "voice": self.voice,
            "input": text,
            "response_format": "wav"
        });

        let url = format!(
            "{}/openai/v1/audio/speech",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("hosted TTS request failed")?
            .error_for_status()
            .context("hosted TTS returned an error status")?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|raw| raw.to_str().ok())
            .map(|s| s.to_owned())
            .unwrap_or_default();

        let bytes = response.bytes().context("Failed to read TTS payload body")?;
        if bytes.is_empty() {
            return Err(anyhow!("hosted TTS response was empty"));
        }

        // Some backends report errors with a 200 and a JSON body.
        if content_type.contains("application/json") || bytes.starts_with(b"{") {
            let payload: serde_json::Value =
                serde_json::from_slice(&bytes).context("Failed to parse TTS error response")?;
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("Unknown TTS error");
            return Err(anyhow!("hosted TTS error: {}", message));
        }

        Ok(TtsAudio {
            bytes: bytes.to_vec(),
            content_type,
            note: Some(format!("hosted ({})", self.voice)),
        })
    }

    fn voice(&self) -> &str {
        &self.voice
    }
}

/// A minimal valid WAV (10ms of silence) for backends where the OS played
/// the real audio.
fn placeholder_wav() -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
        for _ in 0..160 {
            writer.write_sample(0i16).context("Failed to write sample")?;
        }
        writer.finalize().context("Failed to finalize WAV")?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_wav_is_decodable() {
        let wav = placeholder_wav().unwrap();
        let reader = hound::WavReader::new(Cursor::new(&wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.len(), 160);
    }

    #[test]
    fn prespoken_note_is_recognized() {
        let audio = TtsAudio {
            bytes: Vec::new(),
            content_type: "audio/wav".into(),
            note: Some(PRESPOKEN_NOTE.to_string()),
        };
        assert!(audio.is_prespoken());

        let hosted = TtsAudio {
            bytes: Vec::new(),
            content_type: "audio/wav".into(),
            note: Some("hosted (Fritz-PlayAI)".into()),
        };
        assert!(!hosted.is_prespoken());
    }
}
