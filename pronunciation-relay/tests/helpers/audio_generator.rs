//! Audio fixture generator
//!
//! Produces small WAV recordings in memory or on disk

use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 0.5,
            sample_rate: 44100,
            channels: 2,
        }
    }
}

impl AudioConfig {
    /// Already-normalized 16 kHz mono recording
    pub fn normalized() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            ..Self::default()
        }
    }
}

fn write_tone<W: std::io::Write + std::io::Seek>(
    writer: W,
    config: &AudioConfig,
) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::new(writer, spec)?;
    let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

    // 440Hz tone at 30% amplitude
    for i in 0..total_samples {
        let t = i as f32 / config.sample_rate as f32;
        let sample =
            (0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Generate WAV bytes in memory
pub fn generate_wav_bytes(config: &AudioConfig) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    write_tone(&mut cursor, config).expect("WAV generation should succeed");
    cursor.into_inner()
}

/// Generate a WAV file on disk
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_tone(file, config)?;
    Ok(path.to_path_buf())
}
