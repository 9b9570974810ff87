//! Codecs and transforms that carry a running context: delta coding,
//! zigzag coding, XOR coding and the integrated codecs built on them.

use std::io::Cursor;

use crate::{CodecResult, Integer};

pub mod integrated_binary_packing;
pub mod integrated_composition;
pub mod integrated_variable_byte;
pub mod xor_binary_packing;
pub mod zigzag;

/// Word-output codec with delta coding fused into the packing step.
///
/// Input is expected to be sorted (or nearly so); each value is coded as
/// its wrapping difference to the previous one.
pub trait Integrated: Integer<u32> {}

/// Byte-output counterpart of [`Integrated`].
pub trait IntegratedByte: Integer<i8> {}

/// Headless integrated codec threading the delta context explicitly.
///
/// `init_value` holds the last raw value of the previous segment (0 for the
/// first) and is updated to the last raw value this call consumed or
/// produced, so consecutive segments chain without a seam.
pub trait SkippableIntegrated {
    /// Compresses integers without writing a length header.
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        init_value: &mut u32,
    ) -> CodecResult<()>;

    /// Decompresses `num` integers without reading a length header.
    #[allow(clippy::too_many_arguments)]
    fn headless_uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
        init_value: &mut u32,
    ) -> CodecResult<()>;
}

/// Delta encoding/decoding utility for integer compression.
///
/// All arithmetic wraps, so any sequence round-trips; only sorted input
/// yields small deltas.
pub struct Delta;

impl Delta {
    /// Creates a new instance
    pub fn new() -> Delta {
        Delta
    }

    /// Replaces every value but the first with its difference to its predecessor.
    pub fn delta(data: &mut [u32]) {
        if let Some((&mut first, rest)) = data.split_first_mut() {
            Self::delta_with_init(rest, first);
        }
    }

    /// Replaces every value with its difference to its predecessor, the first
    /// one relative to `init`. Returns the last raw value.
    pub fn delta_with_init(data: &mut [u32], init: u32) -> u32 {
        let mut prev = init;
        for v in data.iter_mut() {
            let raw = *v;
            *v = raw.wrapping_sub(prev);
            prev = raw;
        }
        prev
    }

    /// Inverse of [`Delta::delta`].
    pub fn inverse_delta(data: &mut [u32]) {
        for i in 1..data.len() {
            data[i] = data[i].wrapping_add(data[i - 1]);
        }
    }

    /// Inverse of [`Delta::delta_with_init`]. Returns the last raw value.
    pub fn inverse_delta_with_init(data: &mut [u32], init: u32) -> u32 {
        let mut prev = init;
        for v in data.iter_mut() {
            prev = prev.wrapping_add(*v);
            *v = prev;
        }
        prev
    }

    /// Prefix sum unrolled by four, same result as [`Delta::inverse_delta`].
    pub fn fast_inverse_delta(data: &mut [u32]) {
        if data.is_empty() {
            return;
        }

        let sz0 = (data.len() / 4) * 4;
        let mut i = 1;

        if sz0 >= 4 {
            let mut a = data[0];
            while i + 4 <= sz0 {
                data[i] = data[i].wrapping_add(a);
                data[i + 1] = data[i + 1].wrapping_add(data[i]);
                data[i + 2] = data[i + 2].wrapping_add(data[i + 1]);
                data[i + 3] = data[i + 3].wrapping_add(data[i + 2]);
                a = data[i + 3];
                i += 4;
            }
        }

        while i < data.len() {
            data[i] = data[i].wrapping_add(data[i - 1]);
            i += 1;
        }
    }
}

impl Default for Delta {
    fn default() -> Self {
        Delta::new()
    }
}
