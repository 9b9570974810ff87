#![no_main]

//! Several lists written back to back with a headless codec, then read back.

use std::io::Cursor;

use intcodec::{FastPFOR, Skippable, SkippableComposition, VariableByte};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|lists: Vec<Vec<u32>>| {
    let lists: Vec<Vec<u32>> = lists
        .into_iter()
        .take(16)
        .map(|l| l.into_iter().take(2_000).collect())
        .collect();
    let total: usize = lists.iter().map(Vec::len).sum();

    let mut codec = SkippableComposition::new(FastPFOR::fastpfor128(), VariableByte::new());
    let mut compressed = vec![0u32; total * 2 + 1024 * lists.len() + 1];
    let mut out_pos = Cursor::new(0);
    for list in &lists {
        codec
            .headless_compress(
                list,
                list.len() as u32,
                &mut Cursor::new(0),
                &mut compressed,
                &mut out_pos,
            )
            .expect("Buffers are valid, so we can compress");
    }
    let written = out_pos.position() as u32;

    let mut in_pos = Cursor::new(0);
    for list in &lists {
        let mut decoded = vec![0u32; list.len()];
        let remaining = written - in_pos.position() as u32;
        codec
            .headless_uncompress(
                &compressed,
                remaining,
                &mut in_pos,
                &mut decoded,
                &mut Cursor::new(0),
                list.len() as u32,
            )
            .expect("If we can compress it, we can decompress it");
        assert_eq!(&decoded, list);
    }
    assert_eq!(in_pos.position() as u32, written);
});
