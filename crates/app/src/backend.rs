use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::Mutex;

use mailqa::{CorpusInfo, History, HttpQaProvider, QaProvider};
use speech::{HostedTtsBackend, LocalTtsBackend, TtsBackend};
use stt::{AudioRecorder, TranscribeError, TranscriptionProvider, WhisperHttpProvider};

use crate::config::{Settings, VoiceSetting};

/// Captures quieter than this are treated as dead air and never uploaded.
const SILENCE_PEAK: f32 = 0.01;

// The cpal stream is !Send, so the recorder lives on one dedicated thread
// and callers talk to it over a command channel. A plain thread-local would
// break under the multi-threaded runtime, which is free to resume the loop
// task on a different worker than the one that initialized the recorder.
enum RecorderCommand {
    Start(std_mpsc::Sender<Result<()>>),
    StopAndEncode(std_mpsc::Sender<Result<Vec<u8>>>),
}

lazy_static::lazy_static! {
    static ref RECORDER_TX: std::sync::Mutex<Option<std_mpsc::Sender<RecorderCommand>>> =
        std::sync::Mutex::new(None);
    static ref TRANSCRIPTION_PROVIDER: Arc<Mutex<Option<Box<dyn TranscriptionProvider>>>> =
        Arc::new(Mutex::new(None));
    static ref QA_PROVIDER: Arc<Mutex<Option<Box<dyn QaProvider>>>> =
        Arc::new(Mutex::new(None));
    static ref TTS_BACKEND: std::sync::Mutex<Option<Box<dyn TtsBackend>>> =
        std::sync::Mutex::new(None);
}

fn spawn_recorder_thread() -> std_mpsc::Sender<RecorderCommand> {
    let (tx, rx) = std_mpsc::channel::<RecorderCommand>();
    std::thread::spawn(move || {
        let mut recorder = match AudioRecorder::new() {
            Ok(recorder) => recorder,
            Err(_) => return,
        };
        while let Ok(command) = rx.recv() {
            match command {
                RecorderCommand::Start(reply) => {
                    let _ = reply.send(recorder.start());
                }
                RecorderCommand::StopAndEncode(reply) => {
                    let result = recorder.stop().and_then(|samples| {
                        if samples.is_empty()
                            || stt::recorder::peak_amplitude(&samples) < SILENCE_PEAK
                        {
                            Ok(Vec::new())
                        } else {
                            recorder.encode_wav(&samples)
                        }
                    });
                    let _ = reply.send(result);
                }
            }
        }
    });
    tx
}

fn recorder_request<T>(
    command: impl FnOnce(std_mpsc::Sender<Result<T>>) -> RecorderCommand,
) -> Result<T> {
    let guard = RECORDER_TX
        .lock()
        .map_err(|_| anyhow!("recorder lock poisoned"))?;
    let tx = guard
        .as_ref()
        .ok_or_else(|| anyhow!("audio recorder not initialized"))?;
    let (reply_tx, reply_rx) = std_mpsc::channel();
    tx.send(command(reply_tx))
        .map_err(|_| anyhow!("audio recorder thread exited"))?;
    reply_rx
        .recv()
        .map_err(|_| anyhow!("audio recorder thread exited"))?
}

pub async fn initialize_backend(settings: &Settings) -> Result<()> {
    *RECORDER_TX
        .lock()
        .map_err(|_| anyhow!("recorder lock poisoned"))? = Some(spawn_recorder_thread());

    let mut transcriber = Box::new(WhisperHttpProvider::new());
    transcriber
        .initialize(serde_json::json!({ "api_key": settings.groq_api_key }))
        .await?;
    *TRANSCRIPTION_PROVIDER.lock().await = Some(transcriber);

    let mut qa = Box::new(HttpQaProvider::new());
    qa.initialize(serde_json::json!({ "base_url": settings.qa_base_url }))
        .await?;
    *QA_PROVIDER.lock().await = Some(qa);

    let tts: Option<Box<dyn TtsBackend>> = match settings.voice {
        VoiceSetting::Local => Some(Box::new(LocalTtsBackend::new()?)),
        VoiceSetting::Hosted => Some(Box::new(HostedTtsBackend::new(
            settings.groq_api_key.clone(),
        )?)),
        VoiceSetting::Off => None,
    };
    *TTS_BACKEND.lock().unwrap() = tts;

    Ok(())
}

pub fn record_voice(start: bool) -> Result<()> {
    if !start {
        return Ok(());
    }
    recorder_request(RecorderCommand::Start)
}

/// Stop capturing and encode what was heard. Returns empty bytes for an
/// empty or silent capture.
pub fn take_recorded_audio() -> Result<Vec<u8>> {
    recorder_request(RecorderCommand::StopAndEncode)
}

pub async fn voice_to_text(audio: Vec<u8>) -> Result<String, TranscribeError> {
    if audio.is_empty() {
        return Err(TranscribeError::NoSpeechDetected);
    }

    let guard = TRANSCRIPTION_PROVIDER.lock().await;
    let provider = guard
        .as_ref()
        .ok_or_else(|| anyhow!("transcription provider not initialized"))?;
    let result = provider.transcribe(audio).await?;
    Ok(result.text)
}

pub async fn load_corpus() -> Result<CorpusInfo> {
    let guard = QA_PROVIDER.lock().await;
    let provider = guard
        .as_ref()
        .ok_or_else(|| anyhow!("QA provider not initialized"))?;
    provider.load_corpus().await
}

pub async fn answer_question(
    question: &str,
    history: Option<History>,
) -> Result<(History, String)> {
    let guard = QA_PROVIDER.lock().await;
    let provider = guard
        .as_ref()
        .ok_or_else(|| anyhow!("QA provider not initialized"))?;
    provider.answer(question, history.as_ref()).await
}

pub fn speech_enabled() -> bool {
    TTS_BACKEND.lock().map(|g| g.is_some()).unwrap_or(false)
}

/// Synthesize and play. Blocking; call from a dedicated thread.
pub fn speak_text(text: &str) -> Result<()> {
    let guard = TTS_BACKEND
        .lock()
        .map_err(|_| anyhow!("TTS backend lock poisoned"))?;
    let backend = match guard.as_ref() {
        Some(backend) => backend,
        None => return Ok(()),
    };
    let audio = backend.synthesize(text)?;
    speech::play(&audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_calls_fail_loudly_when_uninitialized() {
        assert!(record_voice(true).is_err());
        assert!(take_recorded_audio().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn recorder_thread_replies_to_any_runtime_thread() {
        let tx = spawn_recorder_thread();
        let handle = tokio::spawn(async move {
            let (reply_tx, reply_rx) = std_mpsc::channel();
            tx.send(RecorderCommand::StopAndEncode(reply_tx)).unwrap();
            reply_rx.recv().unwrap()
        });
        let audio = handle.await.unwrap().unwrap();
        assert!(audio.is_empty());
    }
}
