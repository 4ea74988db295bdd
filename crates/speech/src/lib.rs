pub mod backend;
pub mod playback;

pub use backend::{HostedTtsBackend, LocalTtsBackend, TtsAudio, TtsBackend};
pub use playback::play;
