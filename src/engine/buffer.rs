//! Audio Block Management
//!
//! Planar sample storage shared by every stage of the processor. Storage is
//! sized once (at prepare time) and the active length is then moved within
//! that capacity, so no block operation allocates.

use crate::error::{Result, TribandError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns `f32::NEG_INFINITY` for zero or negative input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Bus layouts accepted by the configuration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            _ => None,
        }
    }
}

/// Reject channel counts other than mono or stereo
pub fn validate_layout(num_channels: usize) -> Result<ChannelLayout> {
    ChannelLayout::from_count(num_channels).ok_or(TribandError::UnsupportedLayout {
        channels: num_channels,
    })
}

// ============================================================================
// Audio Block
// ============================================================================

/// Planar audio buffer for one processing cycle
///
/// Each channel owns `capacity` samples; only the first `num_samples` are
/// active. Shrinking or growing the active length within the capacity never
/// reallocates.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
    capacity: usize,
}

impl AudioBlock {
    /// Create a silent block with `num_samples` active samples per channel
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
            num_samples,
            capacity: num_samples,
        }
    }

    /// Create an empty block (no channels, no samples)
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Build a block from per-channel sample vectors of equal length
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self> {
        let num_samples = channels.first().map_or(0, Vec::len);
        if let Some(bad) = channels.iter().position(|ch| ch.len() != num_samples) {
            return Err(TribandError::InvalidAudio {
                reason: format!(
                    "Channel {} has {} samples, expected {}",
                    bad,
                    channels[bad].len(),
                    num_samples
                ),
            });
        }
        Ok(Self {
            channels,
            num_samples,
            capacity: num_samples,
        })
    }

    /// Build a block from interleaved samples: [L0, R0, L1, R1, ...]
    pub fn from_interleaved(samples: &[f32], num_channels: usize) -> Result<Self> {
        if num_channels == 0 || samples.len() % num_channels != 0 {
            return Err(TribandError::InvalidAudio {
                reason: format!(
                    "Sample count {} is not divisible by channel count {}",
                    samples.len(),
                    num_channels
                ),
            });
        }
        let num_samples = samples.len() / num_channels;
        let mut block = Self::new(num_channels, num_samples);
        for (frame, chunk) in samples.chunks_exact(num_channels).enumerate() {
            for (ch, &sample) in chunk.iter().enumerate() {
                block.channels[ch][frame] = sample;
            }
        }
        Ok(block)
    }

    /// Interleave the active samples: [L0, R0, L1, R1, ...]
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.num_channels() * self.num_samples);
        for frame in 0..self.num_samples {
            for ch in &self.channels {
                out.push(ch[frame]);
            }
        }
        out
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of active samples per channel
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Samples per channel available without reallocating
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move the active length, clamped to the capacity
    ///
    /// Returns the length actually set.
    pub fn set_num_samples(&mut self, num_samples: usize) -> usize {
        self.num_samples = num_samples.min(self.capacity);
        self.num_samples
    }

    /// Active samples of one channel
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel][..self.num_samples]
    }

    /// Mutable active samples of one channel
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let n = self.num_samples;
        &mut self.channels[channel][..n]
    }

    /// Get a sample, `None` when out of range
    pub fn get_sample(&self, channel: usize, index: usize) -> Option<f32> {
        if index < self.num_samples {
            self.channels.get(channel).map(|ch| ch[index])
        } else {
            None
        }
    }

    /// Set a sample; out-of-range writes are ignored
    pub fn set_sample(&mut self, channel: usize, index: usize, value: f32) {
        if index < self.num_samples {
            if let Some(ch) = self.channels.get_mut(channel) {
                ch[index] = value;
            }
        }
    }

    /// Zero every active sample
    pub fn clear(&mut self) {
        let n = self.num_samples;
        for ch in &mut self.channels {
            ch[..n].fill(0.0);
        }
    }

    /// Copy `len` samples starting at `start` of `source` into this block
    ///
    /// The active length becomes `len` (clamped to capacity and to what the
    /// source holds). Only channels present in both blocks are copied.
    pub fn copy_from_range(&mut self, source: &AudioBlock, start: usize, len: usize) {
        let available = source.num_samples.saturating_sub(start);
        let n = self.set_num_samples(len.min(available));
        for (dst, src) in self.channels.iter_mut().zip(&source.channels) {
            dst[..n].copy_from_slice(&src[start..start + n]);
        }
    }

    /// Copy all active samples of `source` into this block
    pub fn copy_from(&mut self, source: &AudioBlock) {
        self.copy_from_range(source, 0, source.num_samples);
    }

    /// Write this block's active samples into `dest` starting at `start`
    pub fn write_to_range(&self, dest: &mut AudioBlock, start: usize) {
        let room = dest.num_samples.saturating_sub(start);
        let n = self.num_samples.min(room);
        for (src, dst) in self.channels.iter().zip(dest.channels.iter_mut()) {
            dst[start..start + n].copy_from_slice(&src[..n]);
        }
    }

    /// Sum `source` into this block, sample by sample
    pub fn add_from(&mut self, source: &AudioBlock) {
        let n = self.num_samples.min(source.num_samples);
        for (dst, src) in self.channels.iter_mut().zip(&source.channels) {
            for (d, s) in dst[..n].iter_mut().zip(&src[..n]) {
                *d += *s;
            }
        }
    }

    /// Multiply every active sample by a constant linear gain
    pub fn apply_gain(&mut self, gain: f32) {
        let n = self.num_samples;
        for ch in &mut self.channels {
            for s in &mut ch[..n] {
                *s *= gain;
            }
        }
    }

    /// RMS level of one channel in dB
    pub fn rms_db(&self, channel: usize) -> f32 {
        if channel >= self.num_channels() || self.num_samples == 0 {
            return f32::NEG_INFINITY;
        }
        let sum_sq: f64 = self
            .channel(channel)
            .iter()
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        linear_to_db((sum_sq / self.num_samples as f64).sqrt() as f32)
    }

    /// Peak level across all channels in dB
    pub fn peak_db(&self) -> f32 {
        let peak = (0..self.num_channels())
            .flat_map(|ch| self.channel(ch).iter())
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max);
        linear_to_db(peak)
    }

    /// Check that every active sample is finite
    pub fn is_valid(&self) -> bool {
        (0..self.num_channels()).all(|ch| self.channel(ch).iter().all(|s| s.is_finite()))
    }
}

/// Blocks are equal when their active samples match; spare capacity is ignored
impl PartialEq for AudioBlock {
    fn eq(&self, other: &Self) -> bool {
        self.num_channels() == other.num_channels()
            && self.num_samples == other.num_samples
            && (0..self.num_channels()).all(|ch| self.channel(ch) == other.channel(ch))
    }
}

impl Default for AudioBlock {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
