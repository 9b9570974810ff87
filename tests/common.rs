#![allow(dead_code)]

use std::io::Cursor;

use intcodec::{
    BinaryPacking, Codec, DeltaZigzagBinaryPacking, DeltaZigzagVariableByte, FastPFOR, Integer,
    IntegratedBinaryPacking, IntegratedComposition, IntegratedVariableByte, JustCopy, NewPFDS16,
    NewPFDS9, OptPFDS16, OptPFDS9, Simple16, Simple9, Skippable, SkippableComposition,
    VariableByte, XorBinaryPacking,
};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// Every codec that accepts any `u32` sequence of any length.
pub fn get_codecs() -> Vec<Codec> {
    vec![
        JustCopy::new().into(),
        VariableByte::new().into(),
        IntegratedVariableByte::new().into(),
        DeltaZigzagVariableByte::new().into(),
        Codec::compose(BinaryPacking::new(), VariableByte::new()),
        Codec::compose(IntegratedBinaryPacking::new(), VariableByte::new()),
        Codec::compose(DeltaZigzagBinaryPacking::new(), VariableByte::new()),
        Codec::compose(XorBinaryPacking::new(), VariableByte::new()),
        Codec::compose(NewPFDS9::new(), VariableByte::new()),
        Codec::compose(NewPFDS16::new(), VariableByte::new()),
        Codec::compose(OptPFDS9::new(), VariableByte::new()),
        Codec::compose(OptPFDS16::new(), VariableByte::new()),
        Codec::compose(FastPFOR::default(), VariableByte::new()),
        Codec::compose(FastPFOR::fastpfor128(), VariableByte::new()),
        IntegratedComposition::new(IntegratedBinaryPacking::new(), IntegratedVariableByte::new())
            .into(),
    ]
}

/// Codecs limited to values below `2^28`.
pub fn get_small_value_codecs() -> Vec<Codec> {
    vec![Simple9::new().into(), Simple16::new().into()]
}

/// Every headless codec, named.
pub fn get_skippable_codecs() -> Vec<(String, Box<dyn Skippable>)> {
    fn named<C: Skippable + std::fmt::Display + 'static>(c: C) -> (String, Box<dyn Skippable>) {
        (c.to_string(), Box::new(c))
    }
    vec![
        named(JustCopy::new()),
        named(VariableByte::new()),
        named(SkippableComposition::new(BinaryPacking::new(), VariableByte::new())),
        named(SkippableComposition::new(NewPFDS9::new(), VariableByte::new())),
        named(SkippableComposition::new(NewPFDS16::new(), VariableByte::new())),
        named(SkippableComposition::new(OptPFDS9::new(), VariableByte::new())),
        named(SkippableComposition::new(OptPFDS16::new(), VariableByte::new())),
        named(SkippableComposition::new(FastPFOR::fastpfor128(), VariableByte::new())),
        named(SkippableComposition::new(FastPFOR::default(), VariableByte::new())),
        named(Simple9::new()),
        named(Simple16::new()),
    ]
}

pub fn test_input_sizes() -> Vec<usize> {
    (1..=8).map(|exp| (1usize << exp) * 128).collect()
}

pub fn get_test_cases(n: usize) -> Vec<Vec<u32>> {
    let mut rng = StdRng::seed_from_u64(14);

    vec![
        // Zeroes
        vec![0u32; n],
        // Same non-zero
        vec![14u32; n],
        // Ascending values
        (0..n).map(|i| i as u32).collect::<Vec<u32>>(),
        // Descending values
        (0..n).rev().map(|i| i as u32).collect::<Vec<u32>>(),
        // Bit-flipping pattern
        (0..n)
            .map(|i| ((i as u32) * 32) ^ ((i as u32) >> 1))
            .collect::<Vec<u32>>(),
        // Alternating large and small values
        (0..n)
            .map(|i| {
                let ui = i as u32;
                if ui % 2 == 0 {
                    1 << 30
                } else {
                    3
                }
            })
            .collect::<Vec<u32>>(),
        // Random u32 values
        (0..n)
            .map(|_| rng.random_range(0..(1 << 31)))
            .collect::<Vec<u32>>(),
        // Spike in the middle
        (0..n)
            .map(|i| if i == n / 2 { u32::MAX } else { 1 })
            .collect::<Vec<u32>>(),
        // An empty vector
        Vec::new(),
    ]
}

/// `n` distinct sorted integers below `max`, drawn uniformly.
pub fn uniform(rng: &mut StdRng, n: usize, max: u32) -> Vec<u32> {
    let mut v: Vec<u32> = rand::seq::index::sample(rng, max as usize, n)
        .into_iter()
        .map(|i| i as u32)
        .collect();
    v.sort_unstable();
    v
}

/// `n` distinct sorted integers below `max` following the clustered model of
/// Anh and Moffat: dense runs separated by wide gaps.
pub fn clustered(rng: &mut StdRng, n: usize, max: u32) -> Vec<u32> {
    let mut out = vec![0u32; n];
    fill_clustered(rng, &mut out, 0, max);
    out
}

fn fill_uniform(rng: &mut StdRng, out: &mut [u32], min: u32, max: u32) {
    let n = out.len();
    for (slot, v) in out.iter_mut().zip(uniform(rng, n, max - min)) {
        *slot = min + v;
    }
}

fn fill_clustered(rng: &mut StdRng, out: &mut [u32], min: u32, max: u32) {
    let range = max - min;
    let len = out.len() as u32;
    if range == len || len <= 10 {
        fill_uniform(rng, out, min, max);
        return;
    }
    let slack = range.saturating_sub(len + 1);
    let cut = len / 2 + if slack > 0 { rng.random_range(0..slack) } else { 0 };
    let (low, high) = out.split_at_mut(out.len() / 2);
    let p: f64 = rng.random();
    if p < 0.25 {
        fill_uniform(rng, low, min, min + cut);
        fill_clustered(rng, high, min + cut, max);
    } else if p < 0.5 {
        fill_clustered(rng, low, min, min + cut);
        fill_uniform(rng, high, min + cut, max);
    } else {
        fill_clustered(rng, low, min, min + cut);
        fill_clustered(rng, high, min + cut, max);
    }
}

/// A cursor positioned at `pos`.
pub fn cursor_at(pos: u64) -> Cursor<u32> {
    let mut cursor = Cursor::new(0);
    cursor.set_position(pos);
    cursor
}

/// Compresses `data` at `input_offset` into a fresh buffer and returns the words written.
pub fn compress_all<C: Integer<u32>>(codec: &mut C, data: &[u32]) -> Vec<u32> {
    let mut out = vec![0u32; data.len() * 4 + 1024];
    let mut outpos = Cursor::new(0);
    codec
        .compress(
            data,
            data.len() as u32,
            &mut Cursor::new(0),
            &mut out,
            &mut outpos,
        )
        .expect("compression failed");
    out.truncate(outpos.position() as usize);
    out
}

/// Inverse of [`compress_all`]; checks that the whole stream is consumed.
pub fn uncompress_all<C: Integer<u32>>(codec: &mut C, compressed: &[u32], n: usize) -> Vec<u32> {
    let mut out = vec![0u32; n + 1024];
    let mut inpos = Cursor::new(0);
    let mut outpos = Cursor::new(0);
    codec
        .uncompress(
            compressed,
            compressed.len() as u32,
            &mut inpos,
            &mut out,
            &mut outpos,
        )
        .expect("decompression failed");
    assert_eq!(inpos.position() as usize, compressed.len(), "stream not consumed");
    out.truncate(outpos.position() as usize);
    out
}
