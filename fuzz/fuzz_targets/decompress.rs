#![no_main]

//! Arbitrary words fed to every decoder must produce an error, never a panic.

use intcodec::{Codec, CodecToSlice};
use libfuzzer_sys::fuzz_target;

mod common;
use common::{FuzzCodec, FuzzInput};

fuzz_target!(|data: FuzzInput<FuzzCodec>| {
    let input: Vec<u32> = data.data.into_iter().take(10_000).collect();
    let mut codec = Codec::from(data.codec);
    let mut decompressed = vec![0u32; 4096];
    let _ = codec.decompress_to_slice(&input, &mut decompressed);
});
