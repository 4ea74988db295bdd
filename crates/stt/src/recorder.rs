use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

const TARGET_SAMPLE_RATE: u32 = 16000;

/// Captures microphone audio into a shared buffer. One capture at a time;
/// `stop` hands the samples back and drops the stream.
pub struct AudioRecorder {
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<cpal::Stream>,
    capture_rate: Option<u32>,
}

impl AudioRecorder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            capture_rate: None,
        })
    }

    pub fn start(&mut self) -> Result<()> {
        let device = default_input_device()?;
        let config = pick_input_config(&device)?;
        self.capture_rate = Some(config.sample_rate().0);

        self.buffer.lock().unwrap().clear();
        let stream = open_input_stream(&device, &config, Arc::clone(&self.buffer))?;
        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop capturing and take the recorded samples.
    pub fn stop(&mut self) -> Result<Vec<f32>> {
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
        let mut buffer = self.buffer.lock().unwrap();
        Ok(std::mem::take(&mut *buffer))
    }

    pub fn is_recording(&self) -> bool {
        self.stream.is_some()
    }

    /// Encode samples as 16 kHz mono 16-bit WAV, resampling if the device
    /// captured at another rate.
    pub fn encode_wav(&self, samples: &[f32]) -> Result<Vec<u8>> {
        encode_wav_16k(samples, self.capture_rate.unwrap_or(44100))
    }
}

/// Largest absolute sample value, used to recognize dead-air captures
/// before paying for a transcription call.
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
}

fn default_input_device() -> Result<cpal::Device> {
    let host = cpal::default_host();
    host.default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))
}

/// Prefer a 16 kHz config so the WAV needs no resampling.
fn pick_input_config(device: &cpal::Device) -> Result<cpal::SupportedStreamConfig> {
    if let Ok(supported) = device.supported_input_configs() {
        for range in supported {
            if range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
            {
                return Ok(range.with_sample_rate(cpal::SampleRate(TARGET_SAMPLE_RATE)));
            }
        }
    }
    Ok(device.default_input_config()?)
}

fn open_input_stream(
    device: &cpal::Device,
    config: &cpal::SupportedStreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream> {
    let stream_config = config.config();
    match config.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(device, &stream_config, buffer),
        cpal::SampleFormat::I16 => build_stream::<i16>(device, &stream_config, buffer),
        cpal::SampleFormat::U16 => build_stream::<u16>(device, &stream_config, buffer),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream>
where
    T: cpal::Sample,
{
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut buffer = buffer.lock().unwrap();
            buffer.extend(data.iter().map(|s| s.to_f32()));
        },
        |err| eprintln!("Stream error: {}", err),
    )?;
    Ok(stream)
}

fn encode_wav_16k(samples: &[f32], capture_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Vec::with_capacity(samples.len() * 2 + 44);
    {
        let mut writer = hound::WavWriter::new(std::io::Cursor::new(&mut buffer), spec)?;
        if capture_rate == TARGET_SAMPLE_RATE {
            for &sample in samples {
                writer.write_sample(to_i16(sample))?;
            }
        } else {
            for index in resample_positions(samples.len(), capture_rate) {
                writer.write_sample(to_i16(samples[index]))?;
            }
        }
        writer.finalize()?;
    }

    Ok(buffer)
}

/// Nearest-sample resample positions; good enough for speech. Each index is
/// a fresh f64 product rather than a running f32 sum, which stops adding
/// whole steps once the position passes 2^24 on long captures.
fn resample_positions(len: usize, capture_rate: u32) -> impl Iterator<Item = usize> {
    let step = capture_rate as f64 / TARGET_SAMPLE_RATE as f64;
    (0u64..)
        .map(move |n| (n as f64 * step) as usize)
        .take_while(move |&index| index < len)
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(wav: &[u8]) -> (hound::WavSpec, usize) {
        let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        let count = reader.into_samples::<i16>().count();
        (spec, count)
    }

    #[test]
    fn encodes_16k_capture_without_resampling() {
        let samples = vec![0.25f32; 1600];
        let wav = encode_wav_16k(&samples, 16000).unwrap();
        let (spec, count) = read_back(&wav);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.channels, 1);
        assert_eq!(count, 1600);
    }

    #[test]
    fn resamples_48k_capture_down() {
        let samples = vec![0.1f32; 4800];
        let wav = encode_wav_16k(&samples, 48000).unwrap();
        let (spec, count) = read_back(&wav);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(count, 1600);
    }

    #[test]
    fn resample_positions_stay_exact_on_long_captures() {
        // Roughly nineteen minutes at 44.1 kHz, far past f32 integer range.
        let len: usize = 50_000_000;
        let mut count: u64 = 0;
        let mut last = 0usize;
        for index in resample_positions(len, 44100) {
            count += 1;
            last = index;
        }
        let expected = (len as u64 * 16000 + 44099) / 44100;
        assert_eq!(count, expected);
        assert!(last < len);
    }

    #[test]
    fn clamps_out_of_range_samples() {
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
    }

    #[test]
    fn peak_amplitude_finds_loudest_sample() {
        assert_eq!(peak_amplitude(&[]), 0.0);
        assert_eq!(peak_amplitude(&[0.1, -0.7, 0.3]), 0.7);
    }
}
