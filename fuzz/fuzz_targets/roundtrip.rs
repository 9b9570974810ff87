#![no_main]

use intcodec::{Codec, CodecToSlice};
use libfuzzer_sys::fuzz_target;

mod common;
use common::{FuzzCodec, FuzzInput};

fuzz_target!(|data: FuzzInput<FuzzCodec>| {
    // Limit input size to avoid timeouts
    let mut input: Vec<u32> = data.data.into_iter().take(10_000).collect();
    if data.codec.small_values_only() {
        for v in &mut input {
            *v &= (1 << 28) - 1;
        }
    }

    let mut codec = Codec::from(data.codec);

    let mut compressed = vec![0u32; input.len() * 2 + 1024];
    let compressed = codec
        .compress_to_slice(&input, &mut compressed)
        .expect("Buffers are valid, so we can compress");

    let mut decompressed = vec![0u32; input.len()];
    let decompressed = codec
        .decompress_to_slice(compressed, &mut decompressed)
        .expect("If we can compress it, we can decompress it");

    assert_eq!(
        decompressed.len(),
        input.len(),
        "Decompressed length mismatch for {codec}"
    );
    for (i, (&original, &decoded)) in input.iter().zip(decompressed.iter()).enumerate() {
        assert_eq!(
            original, decoded,
            "{codec}: mismatch at position {i}: expected {original}, got {decoded}"
        );
    }
});
