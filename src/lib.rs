//! Triband - Three-Band Multiband Compressor
//!
//! Splits audio into low, mid and high bands with a Linkwitz-Riley
//! crossover, compresses each band independently and sums them back with
//! solo/mute/bypass controls and smoothed input/output trim.
//!
//! # Architecture
//!
//! - `dsp`: the real-time core ([`MultibandProcessor`](dsp::MultibandProcessor)
//!   and its stages)
//! - `params`: host parameter table and the per-block [`ControlSnapshot`](params::ControlSnapshot)
//! - `engine`: audio blocks and WAV file I/O
//! - `cli`: command-line host for offline rendering

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod params;

pub use error::{Result, TribandError};
