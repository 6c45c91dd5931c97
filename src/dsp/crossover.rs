//! Three-band crossover network
//!
//! Topology (Linkwitz-Riley, 24 dB/oct):
//!
//! ```text
//! input ─┬─ LP(low_mid) ── AP(mid_high) ─────────────── low
//!        └─ HP(low_mid) ─┬─ LP(mid_high) ────────────── mid
//!                        └─ HP(mid_high) ────────────── high
//! ```
//!
//! The allpass on the low path applies the same phase rotation the mid/high
//! split gives the upper bands, so the three bands sum to
//! AP(mid_high) * AP(low_mid) * input: flat magnitude, no comb filtering.

use crate::dsp::filter::{FilterSection, FilterType};
use crate::engine::AudioBlock;
use crate::params::Band;

/// Splits one signal into low, mid and high bands
#[derive(Debug, Clone)]
pub struct CrossoverNetwork {
    lp1: FilterSection,
    hp1: FilterSection,
    ap2: FilterSection,
    lp2: FilterSection,
    hp2: FilterSection,
}

impl CrossoverNetwork {
    pub fn new() -> Self {
        Self {
            lp1: FilterSection::new(FilterType::Lowpass),
            hp1: FilterSection::new(FilterType::Highpass),
            ap2: FilterSection::new(FilterType::Allpass),
            lp2: FilterSection::new(FilterType::Lowpass),
            hp2: FilterSection::new(FilterType::Highpass),
        }
    }

    /// Size every section for the stream and clear its memory
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        for section in self.sections_mut() {
            section.prepare(sample_rate, num_channels);
        }
    }

    /// Clear filter memory in every section
    pub fn reset(&mut self) {
        for section in self.sections_mut() {
            section.reset();
        }
    }

    /// Recompute coefficients for both split points
    ///
    /// Called every block; memory is kept so automation glides.
    pub fn set_cutoffs(&mut self, low_mid_hz: f32, mid_high_hz: f32) {
        self.lp1.set_cutoff(low_mid_hz);
        self.hp1.set_cutoff(low_mid_hz);
        self.ap2.set_cutoff(mid_high_hz);
        self.lp2.set_cutoff(mid_high_hz);
        self.hp2.set_cutoff(mid_high_hz);
    }

    /// Current (low/mid, mid/high) cutoffs
    pub fn cutoffs(&self) -> (f32, f32) {
        (self.lp1.cutoff(), self.lp2.cutoff())
    }

    /// Split `input` into the three band buffers
    ///
    /// Each band buffer takes the shape of `input` (within its capacity).
    /// `low_mid_hz < mid_high_hz` is assumed, not checked.
    pub fn split(
        &mut self,
        input: &AudioBlock,
        low_mid_hz: f32,
        mid_high_hz: f32,
        bands: &mut [AudioBlock; 3],
    ) {
        debug_assert!(
            low_mid_hz < mid_high_hz,
            "crossover order violated: {} >= {}",
            low_mid_hz,
            mid_high_hz
        );
        self.set_cutoffs(low_mid_hz, mid_high_hz);

        let [low, mid, high] = bands;

        low.copy_from(input);
        self.lp1.process(low);
        self.ap2.process(low);

        mid.copy_from(input);
        self.hp1.process(mid);
        high.copy_from(mid);
        self.lp2.process(mid);
        self.hp2.process(high);
    }

    /// Convenience wrapper returning freshly allocated bands
    ///
    /// Allocates; use [`split`](Self::split) on the audio thread.
    pub fn split_owned(
        &mut self,
        input: &AudioBlock,
        low_mid_hz: f32,
        mid_high_hz: f32,
    ) -> [AudioBlock; 3] {
        let mut bands = Band::ALL.map(|_| AudioBlock::new(input.num_channels(), input.num_samples()));
        self.split(input, low_mid_hz, mid_high_hz, &mut bands);
        bands
    }

    fn sections_mut(&mut self) -> [&mut FilterSection; 5] {
        [
            &mut self.lp1,
            &mut self.hp1,
            &mut self.ap2,
            &mut self.lp2,
            &mut self.hp2,
        ]
    }
}

impl Default for CrossoverNetwork {
    fn default() -> Self {
        Self::new()
    }
}
