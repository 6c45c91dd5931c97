//! DSP Core
//!
//! Real-time building blocks of the three-band compressor. Every stage
//! follows the same lifecycle: `prepare` sizes state for a stream, `reset`
//! clears it, and `process` works on an [`AudioBlock`](crate::engine::AudioBlock)
//! in place without allocating.

mod compressor;
mod crossover;
mod filter;
mod gain;
mod mixer;
mod processor;

pub use compressor::BandCompressor;
pub use crossover::CrossoverNetwork;
pub use filter::{FilterSection, FilterType};
pub use gain::{GainRamp, GainStage, RAMP_DURATION_SECS};
pub use mixer::{included_bands, BandMixer};
pub use processor::MultibandProcessor;
