//! Benchmark suite for the integer codecs.

use core::ops::Range;
use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use intcodec::{
    BinaryPacking, Codec, FastPFOR, Integer, IntegratedBinaryPacking, IntegratedComposition,
    IntegratedVariableByte, NewPFDS16, OptPFDS16, Simple16, VariableByte, BLOCK_SIZE_128,
    BLOCK_SIZE_256, DEFAULT_PAGE_SIZE,
};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

const SIZES: &[usize; 2] = &[1024, 4096];
const SEED: u64 = 456;

type DataGeneratorFn = fn(usize) -> Vec<u32>;
type CodecFactoryFn = fn() -> Codec;

/// Generate uniformly distributed random data
fn generate_uniform_data_from_range(size: usize, value_range: Range<u32>) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size)
        .map(|_| rng.random_range(value_range.clone()))
        .collect()
}

fn generate_uniform_data_small_value_distribution(size: usize) -> Vec<u32> {
    generate_uniform_data_from_range(size, 0..1000)
}

fn generate_uniform_data_large_value_distribution(size: usize) -> Vec<u32> {
    generate_uniform_data_from_range(size, 0..u32::MAX)
}

/// Generate clustered data - values tend to cluster around changing base values
fn generate_clustered_data(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut data = Vec::with_capacity(size);
    let mut base = 0u32;

    for _ in 0..size {
        // 10% chance to jump to a new cluster
        if rng.random_bool(0.1) {
            base = rng.random_range(0..1000);
        }
        data.push(base + rng.random_range(0..10));
    }
    data
}

/// Sorted data with small random gaps
fn generate_sorted_data(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut acc = 0u32;
    (0..size)
        .map(|_| {
            acc += rng.random_range(1..16);
            acc
        })
        .collect()
}

/// Generate sparse data - mostly zeros with occasional random values
fn generate_sparse_data(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size)
        .map(|_| {
            if rng.random_bool(0.9) {
                0
            } else {
                rng.random()
            }
        })
        .collect()
}

/// Generate constant data - best case for compression
fn generate_constant_data(size: usize) -> Vec<u32> {
    vec![SEED as u32; size]
}

/// Generate data with powers of two
fn generate_geometric_data(size: usize) -> Vec<u32> {
    (0..size).map(|i| 1u32 << (i % 30)).collect()
}

const PATTERNS: &[(&str, DataGeneratorFn)] = &[
    (
        "uniform_small_value_distribution",
        generate_uniform_data_small_value_distribution,
    ),
    (
        "uniform_large_value_distribution",
        generate_uniform_data_large_value_distribution,
    ),
    ("clustered", generate_clustered_data),
    ("sorted", generate_sorted_data),
    ("sparse", generate_sparse_data),
];

const CODECS: &[(&str, CodecFactoryFn)] = &[
    ("VariableByte", || VariableByte::new().into()),
    ("Simple16", || Simple16::new().into()),
    ("BinaryPacking", || {
        Codec::compose(BinaryPacking::new(), VariableByte::new())
    }),
    ("NewPFDS16", || {
        Codec::compose(NewPFDS16::new(), VariableByte::new())
    }),
    ("OptPFDS16", || {
        Codec::compose(OptPFDS16::new(), VariableByte::new())
    }),
    ("FastPFOR", || {
        Codec::compose(FastPFOR::default(), VariableByte::new())
    }),
    ("IntegratedBinaryPacking", || {
        IntegratedComposition::new(IntegratedBinaryPacking::new(), IntegratedVariableByte::new())
            .into()
    }),
];

/// Simple16 only takes values below 2^28.
fn accepts(codec_name: &str, data: &[u32]) -> bool {
    codec_name != "Simple16" || data.iter().all(|&v| v < 1 << 28)
}

/// Helper function to compress data and return the compressed size
fn compress_data<C: Integer<u32>>(codec: &mut C, data: &[u32], compressed: &mut [u32]) -> usize {
    let mut input_offset = Cursor::new(0);
    let mut output_offset = Cursor::new(0);

    codec
        .compress(
            data,
            data.len() as u32,
            &mut input_offset,
            compressed,
            &mut output_offset,
        )
        .unwrap();

    output_offset.position() as usize
}

/// Helper function to compress data and return compressed buffer
fn prepare_compressed_data<C: Integer<u32>>(codec: &mut C, data: &[u32]) -> Vec<u32> {
    let mut compressed = vec![0u32; data.len() * 2 + 1024];
    let compressed_size = compress_data(codec, data, &mut compressed);
    compressed.truncate(compressed_size);
    compressed
}

/// Helper function to decompress data
fn decompress_data<C: Integer<u32>>(
    codec: &mut C,
    compressed: &[u32],
    decompressed: &mut [u32],
) -> usize {
    let mut input_offset = Cursor::new(0);
    let mut output_offset = Cursor::new(0);

    codec
        .uncompress(
            compressed,
            compressed.len() as u32,
            &mut input_offset,
            decompressed,
            &mut output_offset,
        )
        .unwrap();

    output_offset.position() as usize
}

fn benchmark_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    for &size in SIZES {
        for (name, generator) in PATTERNS {
            let data = generator(size);
            let mut compressed = vec![0u32; size * 2 + 1024];
            group.throughput(Throughput::Elements(size as u64));
            for (codec_name, factory) in CODECS {
                if !accepts(codec_name, &data) {
                    continue;
                }
                let mut codec = factory();
                group.bench_with_input(
                    BenchmarkId::new(format!("{codec_name}/{name}"), size),
                    &data,
                    |b, data| {
                        b.iter(|| {
                            black_box(compress_data(&mut codec, black_box(data), &mut compressed))
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

fn benchmark_decompression(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression");

    for &size in SIZES {
        for (name, generator) in PATTERNS {
            let data = generator(size);
            let mut decompressed = vec![0u32; size];
            group.throughput(Throughput::Elements(size as u64));
            for (codec_name, factory) in CODECS {
                if !accepts(codec_name, &data) {
                    continue;
                }
                let mut codec = factory();
                let compressed = prepare_compressed_data(&mut codec, &data);
                group.bench_with_input(
                    BenchmarkId::new(format!("{codec_name}/{name}"), size),
                    &compressed,
                    |b, compressed| {
                        b.iter(|| {
                            black_box(decompress_data(
                                &mut codec,
                                black_box(compressed),
                                &mut decompressed,
                            ))
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

fn benchmark_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_sizes");

    let size = *SIZES.last().unwrap();
    let data = generate_uniform_data_small_value_distribution(size);
    let mut compressed = vec![0u32; size * 2 + 1024];
    let mut decompressed = vec![0u32; size];

    let block_sizes = [BLOCK_SIZE_128, BLOCK_SIZE_256];

    for block_size in block_sizes {
        let mut codec = FastPFOR::new(DEFAULT_PAGE_SIZE, block_size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("compress_{block_size}"), |b| {
            b.iter(|| black_box(compress_data(&mut codec, black_box(&data), &mut compressed)));
        });
    }

    for block_size in block_sizes {
        let mut codec = FastPFOR::new(DEFAULT_PAGE_SIZE, block_size);
        let packed = prepare_compressed_data(&mut codec, &data);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("decompress_{block_size}"), |b| {
            b.iter(|| {
                black_box(decompress_data(
                    &mut codec,
                    black_box(&packed),
                    &mut decompressed,
                ))
            });
        });
    }
    group.finish();
}

fn benchmark_compression_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_ratio");
    group.sample_size(20);

    let size = *SIZES.last().unwrap();
    let patterns: &[(&str, DataGeneratorFn)] = &[
        ("uniform_small_distribution", generate_uniform_data_small_value_distribution),
        ("clustered", generate_clustered_data),
        ("sorted", generate_sorted_data),
        ("sparse", generate_sparse_data),
        ("constant", generate_constant_data),
        ("geometric", generate_geometric_data),
    ];

    for (name, data_fn) in patterns {
        let data = data_fn(size);
        let mut compressed = vec![0u32; size * 2 + 1024];
        for (codec_name, factory) in CODECS {
            if !accepts(codec_name, &data) {
                continue;
            }
            let mut codec = factory();
            group.bench_function(format!("{codec_name}/{name}"), |b| {
                b.iter(|| {
                    let compressed_size =
                        compress_data(&mut codec, black_box(&data), &mut compressed);
                    #[expect(
                        clippy::cast_precision_loss,
                        reason = "Loss of precision is acceptable for compression ratio calculation"
                    )]
                    let ratio = data.len() as f64 / compressed_size as f64;
                    black_box(ratio)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_compression,
    benchmark_decompression,
    benchmark_block_sizes,
    benchmark_compression_ratio
);
criterion_main!(benches);
