//! Gain Stage
//!
//! Broadband trim with a linear 50 ms glide between targets, used for both
//! input and output gain. The ramp interpolates linear gain per sample; once
//! the ramp runs out the stage holds the exact target.

use crate::engine::{db_to_linear, AudioBlock};

/// Glide time for every gain change
pub const RAMP_DURATION_SECS: f64 = 0.05;

// ============================================================================
// Gain Ramp
// ============================================================================

/// Linear smoother from the current gain to a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    start: f32,
    current: f32,
    target: f32,
    step: f32,
    remaining: usize,
    ramp_samples: usize,
}

impl GainRamp {
    /// Ramp resting at `gain`, with no duration until `reset` is called
    pub fn new(gain: f32) -> Self {
        Self {
            start: gain,
            current: gain,
            target: gain,
            step: 0.0,
            remaining: 0,
            ramp_samples: 0,
        }
    }

    /// Set the ramp length and jump straight to the target
    pub fn reset(&mut self, sample_rate: f64, duration_secs: f64) {
        self.ramp_samples = (sample_rate * duration_secs).round().max(0.0) as usize;
        self.snap_to_target();
    }

    /// Drop any glide in progress and sit at the target
    pub fn snap_to_target(&mut self) {
        self.start = self.target;
        self.current = self.target;
        self.step = 0.0;
        self.remaining = 0;
    }

    /// Start gliding toward `target`; a repeated target changes nothing
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        if self.ramp_samples == 0 {
            self.snap_to_target();
            return;
        }
        self.start = self.current;
        self.remaining = self.ramp_samples;
        self.step = (self.target - self.start) / self.ramp_samples as f32;
    }

    /// Advance one sample and return the gain for it
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        if self.remaining == 0 {
            return self.target;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.current = self.target;
        } else {
            // Interpolate from the start so rounding never accumulates
            let elapsed = self.ramp_samples - self.remaining;
            self.current = self.start + self.step * elapsed as f32;
        }
        self.current
    }

    pub fn is_smoothing(&self) -> bool {
        self.remaining > 0
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Per-sample increment of the active ramp
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Ramp length in samples
    pub fn ramp_samples(&self) -> usize {
        self.ramp_samples
    }
}

// ============================================================================
// Gain Stage
// ============================================================================

/// Smoothed broadband gain
#[derive(Debug, Clone)]
pub struct GainStage {
    gain_db: f32,
    ramp: GainRamp,
}

impl GainStage {
    /// Create a stage resting at `gain_db`
    pub fn new(gain_db: f32) -> Self {
        Self {
            gain_db,
            ramp: GainRamp::new(db_to_linear(gain_db)),
        }
    }

    /// Derive the ramp length from the sample rate and snap to the target
    pub fn prepare(&mut self, sample_rate: f64) {
        self.ramp.reset(sample_rate, RAMP_DURATION_SECS);
    }

    /// Abandon any glide in progress
    pub fn reset(&mut self) {
        self.ramp.snap_to_target();
    }

    /// Record a new target gain in dB
    pub fn set_target_gain_db(&mut self, gain_db: f32) {
        self.gain_db = gain_db;
        self.ramp.set_target(db_to_linear(gain_db));
    }

    /// Most recently requested gain in dB
    pub fn target_gain_db(&self) -> f32 {
        self.gain_db
    }

    pub fn ramp(&self) -> &GainRamp {
        &self.ramp
    }

    /// Apply the gain in place, advancing the ramp by the block length
    ///
    /// Every channel sees the same per-sample gain curve.
    pub fn process(&mut self, block: &mut AudioBlock) {
        if !self.ramp.is_smoothing() {
            let gain = self.ramp.target();
            // Unity gain optimization
            if gain != 1.0 {
                block.apply_gain(gain);
            }
            return;
        }

        let start = self.ramp;
        let mut end = start;
        for ch in 0..block.num_channels() {
            let mut ramp = start;
            for sample in block.channel_mut(ch).iter_mut() {
                *sample *= ramp.next_gain();
            }
            end = ramp;
        }
        if block.num_channels() == 0 {
            for _ in 0..block.num_samples() {
                end.next_gain();
            }
        }
        self.ramp = end;
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
