//! Band mixer
//!
//! Recombines the processed bands. Solo wins over mute: once any band is
//! soloed only soloed bands are heard, whatever their mute state.

use crate::engine::AudioBlock;
use crate::params::BandState;

/// Which bands reach the output for a given set of band states
pub fn included_bands(states: &[BandState; 3]) -> [bool; 3] {
    let any_soloed = states.iter().any(|s| s.soloed);
    states.map(|s| if any_soloed { s.soloed } else { !s.muted })
}

/// Sums the included bands into the output buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct BandMixer;

impl BandMixer {
    pub fn new() -> Self {
        Self
    }

    /// Clear `output`, then add every included band into it
    ///
    /// With nothing included the output is silence.
    pub fn mix(&self, output: &mut AudioBlock, bands: &[AudioBlock; 3], states: &[BandState; 3]) {
        output.clear();
        for (band, included) in bands.iter().zip(included_bands(states)) {
            if included {
                output.add_from(band);
            }
        }
    }
}
