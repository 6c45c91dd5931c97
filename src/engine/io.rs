//! WAV File I/O
//!
//! Reads and writes WAV files for the CLI host harness. Files are decoded to
//! planar f32 in the [-1.0, 1.0] range and written back as 32-bit float.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::engine::buffer::AudioBlock;
use crate::error::{Result, TribandError};

/// Decoded audio file: samples plus the rate they were recorded at
#[derive(Debug, Clone)]
pub struct WavAudio {
    /// Planar samples, one channel per row
    pub block: AudioBlock,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl WavAudio {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.block.num_samples() as f64 / self.sample_rate as f64
    }
}

/// Read a WAV file into planar f32 samples
pub fn read_wav(path: &Path) -> Result<WavAudio> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    debug!(
        "Reading {}: {} ch, {} Hz, {}-bit {:?}",
        path.display(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    if interleaved.is_empty() {
        return Err(TribandError::InvalidAudio {
            reason: format!("{} contains no samples", path.display()),
        });
    }

    let block = AudioBlock::from_interleaved(&interleaved, spec.channels as usize)?;
    Ok(WavAudio {
        block,
        sample_rate: spec.sample_rate,
    })
}

/// Write planar samples to a 32-bit float WAV file
pub fn write_wav(path: &Path, block: &AudioBlock, sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: block.num_channels() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for sample in block.to_interleaved() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!(
        "Wrote {}: {} ch, {} samples",
        path.display(),
        block.num_channels(),
        block.num_samples()
    );
    Ok(())
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let samples = match sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = match bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8388608.0,
                32 => 2147483648.0,
                other => {
                    return Err(TribandError::InvalidAudio {
                        reason: format!("{}-bit integer audio is not supported", other),
                    })
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn test_wav_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let left: Vec<f32> = (0..480).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        let block = AudioBlock::from_channels(vec![left, right]).unwrap();

        write_wav(&path, &block, 48000).unwrap();
        let audio = read_wav(&path).unwrap();

        assert_eq!(audio.sample_rate, 48000);
        assert_eq!(audio.block.num_channels(), 2);
        assert_eq!(audio.block.num_samples(), 480);
        assert_abs_diff_eq!(audio.duration_secs(), 0.01, epsilon = 1e-9);
        for ch in 0..2 {
            for (a, b) in audio.block.channel(ch).iter().zip(block.channel(ch)) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_read_16_bit_int() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("int16.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(16384_i16).unwrap();
        writer.write_sample(-32768_i16).unwrap();
        writer.finalize().unwrap();

        let audio = read_wav(&path).unwrap();
        assert_abs_diff_eq!(audio.block.channel(0)[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(audio.block.channel(0)[1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_wav(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, TribandError::Wav(_) | TribandError::Io(_)));
    }

    #[test]
    fn test_read_empty_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        let block = AudioBlock::new(1, 0);
        write_wav(&path, &block, 48000).unwrap();

        let err = read_wav(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_AUDIO");
    }
}
