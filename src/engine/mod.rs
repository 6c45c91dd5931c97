//! Audio Engine Module
//!
//! Buffer storage shared by the DSP stages and WAV file I/O for the CLI.

pub mod buffer;
pub mod io;

pub use buffer::{db_to_linear, linear_to_db, validate_layout, AudioBlock, ChannelLayout};
pub use io::{read_wav, write_wav, WavAudio};
