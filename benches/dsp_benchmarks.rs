//! DSP Benchmarks
//!
//! Per-block cost of the multiband pipeline and its stages.
//! At 48 kHz a 512-sample block must finish within 10.67 ms.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use triband::dsp::{BandCompressor, CrossoverNetwork, MultibandProcessor};
use triband::engine::AudioBlock;
use triband::params::{Band, ControlSnapshot, Ratio};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn stereo_sine(num_samples: usize) -> AudioBlock {
    let left: Vec<f32> = (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin() * 0.7)
        .collect();
    AudioBlock::from_channels(vec![left.clone(), left]).unwrap()
}

fn benchmark_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("processor");
    let mut controls = ControlSnapshot::default();
    for band in &mut controls.bands {
        band.threshold_db = -24.0;
    }

    for &block_size in BLOCK_SIZES {
        let mut processor = MultibandProcessor::new();
        processor.prepare(SAMPLE_RATE, block_size, 2).unwrap();
        let input = stereo_sine(block_size);
        let mut block = input.clone();

        group.bench_with_input(BenchmarkId::from_parameter(block_size), &block_size, |b, _| {
            b.iter(|| {
                block.copy_from(&input);
                processor.process(black_box(&mut block), black_box(&controls));
            })
        });
    }
    group.finish();
}

fn benchmark_crossover(c: &mut Criterion) {
    let mut crossover = CrossoverNetwork::new();
    crossover.prepare(SAMPLE_RATE, 2);
    let input = stereo_sine(512);
    let mut bands = Band::ALL.map(|_| AudioBlock::new(2, 512));

    c.bench_function("crossover_split_512", |b| {
        b.iter(|| crossover.split(black_box(&input), 400.0, 2000.0, &mut bands))
    });
}

fn benchmark_compressor(c: &mut Criterion) {
    let mut comp = BandCompressor::new();
    comp.prepare(SAMPLE_RATE, 512, 2);
    comp.configure(10.0, 100.0, -24.0, Ratio::Four);
    let input = stereo_sine(512);
    let mut block = input.clone();

    c.bench_function("compressor_512", |b| {
        b.iter(|| {
            block.copy_from(&input);
            comp.process(black_box(&mut block));
        })
    });
}

criterion_group!(benches, benchmark_processor, benchmark_crossover, benchmark_compressor);
criterion_main!(benches);
