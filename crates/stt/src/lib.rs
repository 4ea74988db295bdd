pub mod providers;
pub mod recorder;
pub mod traits;

pub use recorder::AudioRecorder;
pub use traits::{TranscribeError, TranscriptionProvider, TranscriptionResult};

// Re-export providers
pub use providers::whisper::WhisperHttpProvider;
