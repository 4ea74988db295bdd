use stt::TranscribeError;

/// Results reported back from fire-and-forget background tasks. Sent over
/// an unbounded channel and drained by the main loop; the tasks themselves
/// never touch app state.
pub enum AppEvent {
    /// Voice capture finished transcribing.
    Transcript(String),
    /// Voice capture failed somewhere between WAV encode and transcription.
    TranscriptFailed(TranscribeError),
    /// The speech thread could not synthesize or play the answer.
    SpeechFailed(String),
}
