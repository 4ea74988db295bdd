use std::io::Cursor;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink};

use crate::backend::TtsAudio;

/// Play synthesized audio on the default output device. Blocks until the
/// sink drains, which is the point: speech runs on its own thread.
pub fn play(audio: &TtsAudio) -> Result<()> {
    if audio.is_prespoken() {
        return Ok(());
    }

    let (_stream, handle) =
        OutputStream::try_default().context("No audio output device available")?;
    let sink = Sink::try_new(&handle).context("Failed to open audio sink")?;

    let source = Decoder::new(Cursor::new(audio.bytes.clone()))
        .context("Could not decode synthesized audio")?;
    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::PRESPOKEN_NOTE;

    #[test]
    fn prespoken_audio_skips_the_output_device() {
        // Must succeed even on machines with no audio hardware.
        let audio = TtsAudio {
            bytes: Vec::new(),
            content_type: "audio/wav".into(),
            note: Some(PRESPOKEN_NOTE.to_string()),
        };
        assert!(play(&audio).is_ok());
    }
}
