//! Linkwitz-Riley filter section
//!
//! Topology-preserving (TPT) state-variable implementation. One section is
//! either a 4th-order lowpass/highpass (two cascaded Butterworth SVF stages,
//! 24 dB/oct) or the matching 2nd-order allpass. For the same cutoff,
//! lowpass + highpass == allpass, which is what makes the crossover sum flat.
//!
//! The TPT form keeps its integrator states meaningful when the cutoff moves,
//! so coefficients can be recomputed every block without clearing memory.

use std::f64::consts::{PI, SQRT_2};

use crate::engine::AudioBlock;

/// Lowest cutoff the coefficient math accepts
const MIN_CUTOFF_HZ: f64 = 1.0;

/// Highest cutoff as a fraction of the sample rate (just under Nyquist)
const MAX_CUTOFF_RATIO: f64 = 0.499;

/// Integrator states below this are flushed to zero
const DENORMAL_FLOOR: f64 = 1.0e-30;

/// Response of a filter section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// 24 dB/oct lowpass
    Lowpass,
    /// 24 dB/oct highpass
    Highpass,
    /// 2nd-order allpass matching the LP/HP pair's phase
    Allpass,
}

/// Integrator memory for one channel
#[derive(Debug, Clone, Copy, Default)]
struct SectionState {
    s1: f64,
    s2: f64,
    s3: f64,
    s4: f64,
}

impl SectionState {
    fn flush_denormals(&mut self) {
        for s in [&mut self.s1, &mut self.s2, &mut self.s3, &mut self.s4] {
            if s.abs() < DENORMAL_FLOOR {
                *s = 0.0;
            }
        }
    }
}

/// One crossover stage: coefficients plus per-channel delay memory
#[derive(Debug, Clone)]
pub struct FilterSection {
    filter_type: FilterType,
    cutoff_hz: f32,
    sample_rate: f64,
    /// Prewarped integrator gain, tan(pi * fc / fs)
    g: f64,
    /// 1 / (1 + sqrt(2) g + g^2)
    h: f64,
    states: Vec<SectionState>,
}

impl FilterSection {
    /// Create an unprepared section with a 2 kHz cutoff
    pub fn new(filter_type: FilterType) -> Self {
        let mut section = Self {
            filter_type,
            cutoff_hz: 2000.0,
            sample_rate: 44100.0,
            g: 0.0,
            h: 1.0,
            states: Vec::new(),
        };
        section.update_coefficients();
        section
    }

    /// Size channel memory and recompute coefficients for a new sample rate
    ///
    /// Clears all filter memory.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        self.sample_rate = sample_rate;
        self.states = vec![SectionState::default(); num_channels];
        self.update_coefficients();
    }

    /// Clear filter memory, keeping coefficients
    pub fn reset(&mut self) {
        self.states.fill(SectionState::default());
    }

    /// Move the cutoff; filter memory is left untouched
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.update_coefficients();
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn num_channels(&self) -> usize {
        self.states.len()
    }

    fn update_coefficients(&mut self) {
        let max_cutoff = self.sample_rate * MAX_CUTOFF_RATIO;
        let cutoff = self.cutoff_hz as f64;
        let fc = if cutoff.is_finite() {
            cutoff.clamp(MIN_CUTOFF_HZ, max_cutoff)
        } else {
            max_cutoff
        };
        self.g = (PI * fc / self.sample_rate).tan();
        self.h = 1.0 / (1.0 + SQRT_2 * self.g + self.g * self.g);
    }

    /// Filter one sample of one channel
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: f32) -> f32 {
        let (g, h) = (self.g, self.h);
        let st = &mut self.states[channel];
        let x = input as f64;

        let y_h = (x - (SQRT_2 + g) * st.s1 - st.s2) * h;
        let y_b = g * y_h + st.s1;
        st.s1 = g * y_h + y_b;
        let y_l = g * y_b + st.s2;
        st.s2 = g * y_b + y_l;

        if self.filter_type == FilterType::Allpass {
            return (y_l - SQRT_2 * y_b + y_h) as f32;
        }

        let stage2_in = match self.filter_type {
            FilterType::Lowpass => y_l,
            _ => y_h,
        };
        let y_h2 = (stage2_in - (SQRT_2 + g) * st.s3 - st.s4) * h;
        let y_b2 = g * y_h2 + st.s3;
        st.s3 = g * y_h2 + y_b2;
        let y_l2 = g * y_b2 + st.s4;
        st.s4 = g * y_b2 + y_l2;

        match self.filter_type {
            FilterType::Lowpass => y_l2 as f32,
            _ => y_h2 as f32,
        }
    }

    /// Filter a block in place
    ///
    /// Channels beyond the prepared count are left untouched.
    pub fn process(&mut self, block: &mut AudioBlock) {
        let channels = block.num_channels().min(self.states.len());
        for ch in 0..channels {
            for sample in block.channel_mut(ch).iter_mut() {
                *sample = self.process_sample(ch, *sample);
            }
            self.states[ch].flush_denormals();
        }
    }
}
