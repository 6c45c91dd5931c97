//! Band compressor
//!
//! Feed-forward dynamics for one band. Each channel runs its own peak
//! envelope follower with exponential attack/release ballistics; the gain
//! computer is a hard-knee downward curve:
//!
//! - envelope below threshold: unity gain
//! - envelope above threshold: `(env / threshold)^(1/ratio - 1)`, i.e. the
//!   level over threshold is cut by `over - over / ratio` dB

use std::f64::consts::PI;

use crate::engine::{db_to_linear, linear_to_db, AudioBlock};
use crate::params::Ratio;

/// Envelope values below this are flushed to zero
const ENVELOPE_FLOOR: f32 = 1.0e-30;

/// Ballistics coefficient for a time constant
///
/// `exp(-2 pi 1000 / (fs * t_ms))`; times under a microsecond are instant.
fn ballistics_coeff(time_ms: f32, sample_rate: f64) -> f32 {
    if time_ms < 1.0e-3 {
        0.0
    } else {
        (-2.0 * PI * 1000.0 / (sample_rate * time_ms as f64)).exp() as f32
    }
}

/// Envelope memory, one slot per channel
#[derive(Debug, Clone, Default)]
struct CompressorState {
    envelope: Vec<f32>,
    /// Gain applied to the last processed sample, for metering
    last_gain: Vec<f32>,
}

impl CompressorState {
    fn resize(&mut self, num_channels: usize) {
        self.envelope = vec![0.0; num_channels];
        self.last_gain = vec![1.0; num_channels];
    }

    fn clear(&mut self) {
        self.envelope.fill(0.0);
        self.last_gain.fill(1.0);
    }
}

/// Per-band downward compressor
#[derive(Debug, Clone)]
pub struct BandCompressor {
    sample_rate: f64,
    max_block_size: usize,
    attack_ms: f32,
    release_ms: f32,
    threshold_db: f32,
    ratio: Ratio,
    threshold: f32,
    threshold_inverse: f32,
    ratio_inverse: f32,
    attack_coeff: f32,
    release_coeff: f32,
    state: CompressorState,
}

impl BandCompressor {
    /// Create an unprepared compressor with the default band settings
    pub fn new() -> Self {
        let mut comp = Self {
            sample_rate: 44100.0,
            max_block_size: 0,
            attack_ms: 50.0,
            release_ms: 250.0,
            threshold_db: 0.0,
            ratio: Ratio::default(),
            threshold: 1.0,
            threshold_inverse: 1.0,
            ratio_inverse: 1.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            state: CompressorState::default(),
        };
        comp.update();
        comp
    }

    /// Size envelope memory for the stream and clear it
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize, num_channels: usize) {
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.state.resize(num_channels);
        self.update();
    }

    /// Clear envelope memory (stream restart)
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Set all four dynamics controls; takes effect on the next `process`
    pub fn configure(&mut self, attack_ms: f32, release_ms: f32, threshold_db: f32, ratio: Ratio) {
        self.attack_ms = attack_ms;
        self.release_ms = release_ms;
        self.threshold_db = threshold_db;
        self.ratio = ratio;
        self.update();
    }

    fn update(&mut self) {
        self.threshold = db_to_linear(self.threshold_db);
        self.threshold_inverse = 1.0 / self.threshold;
        self.ratio_inverse = 1.0 / self.ratio.value();
        self.attack_coeff = ballistics_coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = ballistics_coeff(self.release_ms, self.sample_rate);
    }

    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    pub fn ratio(&self) -> Ratio {
        self.ratio
    }

    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Deepest gain reduction applied to the last sample, in dB (<= 0)
    pub fn gain_reduction_db(&self) -> f32 {
        self.state
            .last_gain
            .iter()
            .copied()
            .reduce(f32::min)
            .map_or(0.0, linear_to_db)
    }

    /// Compress a block in place
    ///
    /// Channels beyond the prepared count are left untouched.
    pub fn process(&mut self, block: &mut AudioBlock) {
        debug_assert!(
            block.num_channels() <= self.state.envelope.len(),
            "block has {} channels, compressor prepared for {}",
            block.num_channels(),
            self.state.envelope.len()
        );
        let channels = block.num_channels().min(self.state.envelope.len());

        for ch in 0..channels {
            let mut env = self.state.envelope[ch];
            let mut gain = self.state.last_gain[ch];
            for sample in block.channel_mut(ch).iter_mut() {
                let level = sample.abs();
                let coeff = if level > env {
                    self.attack_coeff
                } else {
                    self.release_coeff
                };
                env = level + coeff * (env - level);
                // Keep silence from decaying into subnormals
                if env < ENVELOPE_FLOOR {
                    env = 0.0;
                }

                gain = if env < self.threshold {
                    1.0
                } else {
                    (env * self.threshold_inverse).powf(self.ratio_inverse - 1.0)
                };
                *sample *= gain;
            }
            self.state.envelope[ch] = env;
            self.state.last_gain[ch] = gain;
        }
    }
}

impl Default for BandCompressor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const SAMPLE_RATE: f64 = 48000.0;

    fn dc_block(level: f32, num_samples: usize) -> AudioBlock {
        AudioBlock::from_channels(vec![vec![level; num_samples]]).unwrap()
    }

    fn compressor(attack: f32, release: f32, threshold_db: f32, ratio: Ratio) -> BandCompressor {
        let mut comp = BandCompressor::new();
        comp.prepare(SAMPLE_RATE, 512, 1);
        comp.configure(attack, release, threshold_db, ratio);
        comp
    }

    /// Static curve: output for a steady level above threshold
    fn expected_output(level: f32, threshold_db: f32, ratio: f32) -> f32 {
        let over_db = linear_to_db(level) - threshold_db;
        db_to_linear(threshold_db + over_db / ratio)
    }

    #[test]
    fn test_ballistics_coeff() {
        assert_eq!(ballistics_coeff(0.0, SAMPLE_RATE), 0.0);
        let c = ballistics_coeff(10.0, SAMPLE_RATE);
        assert!(c > 0.98 && c < 1.0);
        assert!(ballistics_coeff(100.0, SAMPLE_RATE) > c);
    }

    #[test]
    fn test_below_threshold_passes_unchanged() {
        let mut comp = compressor(5.0, 50.0, -20.0, Ratio::Hundred);
        let mut block = dc_block(0.05, 4800);
        comp.process(&mut block);
        assert!(block.channel(0).iter().all(|&s| s == 0.05));
        assert_eq!(comp.gain_reduction_db(), 0.0);
    }

    #[test]
    fn test_ratio_one_is_transparent() {
        let mut comp = compressor(5.0, 50.0, -40.0, Ratio::OneToOne);
        let mut block = dc_block(0.9, 2048);
        comp.process(&mut block);
        for &s in block.channel(0) {
            assert_abs_diff_eq!(s, 0.9, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_converges_to_static_curve() {
        let mut comp = compressor(5.0, 100.0, -20.0, Ratio::Four);
        let mut block = dc_block(1.0, 4800);
        comp.process(&mut block);

        // 0 dB in, -20 dB threshold, 4:1 -> -15 dB out
        let target = expected_output(1.0, -20.0, 4.0);
        assert_relative_eq!(target, db_to_linear(-15.0), epsilon = 1e-5);
        // attack time constant is 5 ms / 2 pi ~= 38 samples
        for &s in &block.channel(0)[2000..] {
            assert_relative_eq!(s, target, epsilon = 1e-4);
        }
        assert_abs_diff_eq!(comp.gain_reduction_db(), -15.0, epsilon = 0.01);
    }

    #[test]
    fn test_release_settles_within_bound() {
        let release_ms = 100.0;
        let mut comp = compressor(5.0, release_ms, -20.0, Ratio::Four);
        let mut loud = dc_block(1.0, 4800);
        comp.process(&mut loud);

        let mut quieter = dc_block(0.5, 12000);
        comp.process(&mut quieter);

        // ten release time constants
        let tau_samples = (release_ms as f64 / 1000.0 / (2.0 * PI) * SAMPLE_RATE) as usize;
        let settled = 10 * tau_samples;
        let target = expected_output(0.5, -20.0, 4.0);
        // during release the output is still held down
        assert!(quieter.channel(0)[0] < target);
        for &s in &quieter.channel(0)[settled..] {
            assert_relative_eq!(s, target, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_envelope_persists_across_blocks() {
        let mut whole = compressor(10.0, 80.0, -12.0, Ratio::Six);
        let mut split = whole.clone();

        let signal: Vec<f32> = (0..1024).map(|i| ((i as f32) * 0.03).sin() * 0.9).collect();
        let mut a = AudioBlock::from_channels(vec![signal.clone()]).unwrap();
        whole.process(&mut a);

        let mut first = AudioBlock::from_channels(vec![signal[..512].to_vec()]).unwrap();
        let mut second = AudioBlock::from_channels(vec![signal[512..].to_vec()]).unwrap();
        split.process(&mut first);
        split.process(&mut second);

        assert_eq!(&a.channel(0)[..512], first.channel(0));
        assert_eq!(&a.channel(0)[512..], second.channel(0));
    }

    #[test]
    fn test_reset_clears_envelope() {
        let mut comp = compressor(5.0, 500.0, -30.0, Ratio::Ten);
        let mut loud = dc_block(1.0, 2048);
        comp.process(&mut loud);
        assert!(comp.gain_reduction_db() < -20.0);

        comp.reset();
        assert_eq!(comp.gain_reduction_db(), 0.0);
        let mut quiet = dc_block(0.01, 16);
        comp.process(&mut quiet);
        assert!(quiet.channel(0).iter().all(|&s| s == 0.01));
    }

    #[test]
    fn test_configure_is_idempotent() {
        let mut once = compressor(20.0, 200.0, -18.0, Ratio::Three);
        let mut repeated = once.clone();
        let signal: Vec<f32> = (0..2048).map(|i| ((i as f32) * 0.01).sin()).collect();

        let mut a = AudioBlock::from_channels(vec![signal.clone()]).unwrap();
        let mut b = a.clone();
        for chunk in 0..4 {
            let mut ca = AudioBlock::new(1, 512);
            let mut cb = AudioBlock::new(1, 512);
            ca.copy_from_range(&a, chunk * 512, 512);
            cb.copy_from_range(&b, chunk * 512, 512);
            repeated.configure(20.0, 200.0, -18.0, Ratio::Three);
            repeated.configure(20.0, 200.0, -18.0, Ratio::Three);
            once.process(&mut ca);
            repeated.process(&mut cb);
            ca.write_to_range(&mut a, chunk * 512);
            cb.write_to_range(&mut b, chunk * 512);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut comp = BandCompressor::new();
        comp.prepare(SAMPLE_RATE, 512, 2);
        comp.configure(5.0, 50.0, -20.0, Ratio::Twenty);

        let mut block = AudioBlock::from_channels(vec![vec![1.0; 2048], vec![0.01; 2048]]).unwrap();
        comp.process(&mut block);
        assert!(block.channel(0)[2047] < 0.2);
        assert!(block.channel(1).iter().all(|&s| s == 0.01));
    }

    #[test]
    fn test_envelope_reaches_zero_after_silence() {
        let mut comp = compressor(5.0, 5.0, -20.0, Ratio::Four);
        comp.process(&mut dc_block(1.0, 512));
        assert!(comp.state.envelope[0] > 0.5);

        for _ in 0..200 {
            let mut silence = dc_block(0.0, 512);
            comp.process(&mut silence);
            let env = comp.state.envelope[0];
            assert!(env == 0.0 || env.is_normal(), "subnormal envelope {:e}", env);
            assert!(silence.channel(0).iter().all(|&s| s == 0.0));
        }
        assert_eq!(comp.state.envelope[0], 0.0);
        assert_eq!(comp.gain_reduction_db(), 0.0);
    }

    #[test]
    fn test_accessors() {
        let comp = compressor(12.0, 120.0, -6.0, Ratio::Eight);
        assert_eq!(comp.attack_ms(), 12.0);
        assert_eq!(comp.release_ms(), 120.0);
        assert_eq!(comp.threshold_db(), -6.0);
        assert_eq!(comp.ratio(), Ratio::Eight);
        assert_eq!(comp.max_block_size(), 512);
    }
}
