//! Multiband processor
//!
//! Owns every stage and runs the per-block pipeline in place:
//!
//! ```text
//! input gain -> crossover -> per-band compressor -> band mixer -> output gain
//! ```
//!
//! All buffers and filter memory are sized in [`prepare`](MultibandProcessor::prepare).
//! [`process`](MultibandProcessor::process) never allocates, logs or fails.
//! Contract violations trip a `debug_assert!` in debug builds; release builds
//! degrade as follows:
//!
//! - called before `prepare`: the buffer is left untouched
//! - more channels than prepared: the extra channels pass through untouched
//!
//! A block longer than `max_block_size` is not a violation; it is processed
//! in consecutive chunks.

use log::{debug, info};

use crate::dsp::compressor::BandCompressor;
use crate::dsp::crossover::CrossoverNetwork;
use crate::dsp::gain::GainStage;
use crate::dsp::mixer::BandMixer;
use crate::engine::AudioBlock;
use crate::error::{Result, TribandError};
use crate::params::{Band, BandState, ControlSnapshot};

/// Stream configuration fixed between `prepare` calls
#[derive(Debug, Clone, Copy, PartialEq)]
struct StreamConfig {
    sample_rate: f64,
    max_block_size: usize,
    num_channels: usize,
}

/// Three-band compressor with input/output trim
#[derive(Debug, Clone)]
pub struct MultibandProcessor {
    config: Option<StreamConfig>,
    crossover: CrossoverNetwork,
    compressors: [BandCompressor; 3],
    input_gain: GainStage,
    output_gain: GainStage,
    mixer: BandMixer,
    /// Working copy of one chunk of the host buffer
    scratch: AudioBlock,
    bands: [AudioBlock; 3],
    band_states: [BandState; 3],
}

impl MultibandProcessor {
    /// Create an unprepared processor; `process` is a no-op until `prepare`
    pub fn new() -> Self {
        Self {
            config: None,
            crossover: CrossoverNetwork::new(),
            compressors: Band::ALL.map(|_| BandCompressor::new()),
            input_gain: GainStage::default(),
            output_gain: GainStage::default(),
            mixer: BandMixer::new(),
            scratch: AudioBlock::empty(),
            bands: Band::ALL.map(|_| AudioBlock::empty()),
            band_states: [BandState::default(); 3],
        }
    }

    /// Size all buffers and state for a stream and clear filter/envelope memory
    ///
    /// Gain stages snap to their current targets, so the first block after
    /// `prepare` is not faded in. Call again whenever any argument changes.
    pub fn prepare(
        &mut self,
        sample_rate: f64,
        max_block_size: usize,
        num_channels: usize,
    ) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(TribandError::InvalidParameter {
                param: "sample_rate".to_string(),
                value: sample_rate.to_string(),
                expected: "a positive sample rate".to_string(),
            });
        }
        if max_block_size == 0 {
            return Err(TribandError::InvalidParameter {
                param: "max_block_size".to_string(),
                value: "0".to_string(),
                expected: "at least one sample".to_string(),
            });
        }
        if num_channels == 0 {
            return Err(TribandError::InvalidParameter {
                param: "num_channels".to_string(),
                value: "0".to_string(),
                expected: "at least one channel".to_string(),
            });
        }

        info!(
            "Preparing processor: {} Hz, {} samples max, {} channel(s)",
            sample_rate, max_block_size, num_channels
        );

        self.crossover.prepare(sample_rate, num_channels);
        for comp in &mut self.compressors {
            comp.prepare(sample_rate, max_block_size, num_channels);
        }
        self.input_gain.prepare(sample_rate);
        self.output_gain.prepare(sample_rate);

        self.scratch = AudioBlock::new(num_channels, max_block_size);
        self.bands = Band::ALL.map(|_| AudioBlock::new(num_channels, max_block_size));

        debug!(
            "Gain ramp length: {} samples",
            self.input_gain.ramp().ramp_samples()
        );

        self.config = Some(StreamConfig {
            sample_rate,
            max_block_size,
            num_channels,
        });
        Ok(())
    }

    /// Clear filter and envelope memory and stop any gain glide
    pub fn reset(&mut self) {
        self.crossover.reset();
        for comp in &mut self.compressors {
            comp.reset();
        }
        self.input_gain.reset();
        self.output_gain.reset();
    }

    pub fn is_prepared(&self) -> bool {
        self.config.is_some()
    }

    /// Error unless `prepare` has succeeded
    pub fn ensure_prepared(&self) -> Result<()> {
        if self.is_prepared() {
            Ok(())
        } else {
            Err(TribandError::NotPrepared)
        }
    }

    pub fn sample_rate(&self) -> Option<f64> {
        self.config.map(|c| c.sample_rate)
    }

    pub fn max_block_size(&self) -> Option<usize> {
        self.config.map(|c| c.max_block_size)
    }

    pub fn num_channels(&self) -> Option<usize> {
        self.config.map(|c| c.num_channels)
    }

    /// The processor adds no latency and rings out immediately
    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// Most recent gain reduction of one band's compressor, in dB (<= 0)
    pub fn gain_reduction_db(&self, band: Band) -> f32 {
        self.compressors[band.index()].gain_reduction_db()
    }

    /// Run the full pipeline over `buffer` in place
    ///
    /// `controls` is read once and holds for the whole call.
    pub fn process(&mut self, buffer: &mut AudioBlock, controls: &ControlSnapshot) {
        debug_assert!(self.config.is_some(), "process() called before prepare()");
        let Some(config) = self.config else {
            return;
        };
        debug_assert!(
            buffer.num_channels() <= config.num_channels,
            "buffer has {} channels, prepared for {}",
            buffer.num_channels(),
            config.num_channels
        );

        self.apply_controls(controls);

        let total = buffer.num_samples();
        let mut start = 0;
        while start < total {
            let len = (total - start).min(config.max_block_size);
            self.process_chunk(buffer, start, len, controls);
            start += len;
        }
    }

    /// Push the block's control values into every stage
    fn apply_controls(&mut self, controls: &ControlSnapshot) {
        for (comp, state) in self.compressors.iter_mut().zip(&controls.bands) {
            comp.configure(
                state.attack_ms,
                state.release_ms,
                state.threshold_db,
                state.ratio,
            );
        }
        self.input_gain.set_target_gain_db(controls.input_gain_db);
        self.output_gain.set_target_gain_db(controls.output_gain_db);
        self.band_states = controls.bands;
    }

    fn process_chunk(
        &mut self,
        buffer: &mut AudioBlock,
        start: usize,
        len: usize,
        controls: &ControlSnapshot,
    ) {
        // Channels the host did not supply must not carry stale audio
        if buffer.num_channels() < self.scratch.num_channels() {
            self.scratch.set_num_samples(len);
            self.scratch.clear();
        }
        self.scratch.copy_from_range(buffer, start, len);

        self.input_gain.process(&mut self.scratch);

        self.crossover.split(
            &self.scratch,
            controls.low_mid_crossover_hz,
            controls.mid_high_crossover_hz,
            &mut self.bands,
        );

        for ((comp, band), state) in self
            .compressors
            .iter_mut()
            .zip(self.bands.iter_mut())
            .zip(&self.band_states)
        {
            if !state.bypassed {
                comp.process(band);
            }
        }

        self.mixer
            .mix(&mut self.scratch, &self.bands, &self.band_states);

        self.output_gain.process(&mut self.scratch);

        self.scratch.write_to_range(buffer, start);
    }
}

impl Default for MultibandProcessor {
    fn default() -> Self {
        Self::new()
    }
}
