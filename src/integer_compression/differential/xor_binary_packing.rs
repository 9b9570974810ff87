use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::binary_packing::{group_header, group_widths};
use crate::integer_compression::bitpacking::{fast_pack_without_mask, fast_unpack};
use crate::integer_compression::differential::Integrated;
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer};

const NAME: &str = "XorBinaryPacking";

/// Integers per block
pub const BLOCK_LENGTH: u32 = 128;

fn xor_max_bits(input: &[u32], offset: usize, context: u32) -> u32 {
    let window = &input[offset..offset + 32];
    let mut mask = window[0] ^ context;
    for pair in window.windows(2) {
        mask |= pair[1] ^ pair[0];
    }
    helpers::bits(mask) as u32
}

fn xor_pack(input: &[u32], offset: usize, output: &mut [u32], outpos: usize, bits: u32, context: u32) {
    let mut work = [0u32; 32];
    let mut prev = context;
    for (w, &v) in work.iter_mut().zip(&input[offset..offset + 32]) {
        *w = v ^ prev;
        prev = v;
    }
    fast_pack_without_mask(&work, 0, output, outpos, bits as u8);
}

fn xor_unpack(input: &[u32], inpos: usize, output: &mut [u32], offset: usize, bits: u8, context: u32) {
    let mut work = [0u32; 32];
    fast_unpack(input, inpos, &mut work, 0, bits);
    let mut prev = context;
    for (out, &w) in output[offset..offset + 32].iter_mut().zip(&work) {
        prev ^= w;
        *out = prev;
    }
}

/// Binary packing of the XOR between neighbouring values.
///
/// Blocks of 128 integers are split into four windows of 32 that share one
/// header word of widths. Each value is XORed with its predecessor, the
/// first of a call with zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct XorBinaryPacking;

impl XorBinaryPacking {
    /// Creates a new instance
    pub fn new() -> XorBinaryPacking {
        XorBinaryPacking
    }
}

impl fmt::Display for XorBinaryPacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Integrated for XorBinaryPacking {}

impl Integer<u32> for XorBinaryPacking {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let inlength = helpers::greatest_multiple(input_length, BLOCK_LENGTH);
        if inlength == 0 {
            return Ok(());
        }
        let mut ip = input_offset.index();
        let end = ip + inlength as usize;
        ensure_input(NAME, input, end)?;
        let mut op = output_offset.index();
        ensure_output(NAME, output, op, 1)?;
        output[op] = inlength;
        op += 1;

        let mut context = 0;
        while ip < end {
            let contexts = [context, input[ip + 31], input[ip + 63], input[ip + 95]];
            let widths: [u32; 4] =
                std::array::from_fn(|i| xor_max_bits(input, ip + i * 32, contexts[i]));
            ensure_output(NAME, output, op, 1 + widths.iter().sum::<u32>() as usize)?;
            output[op] = group_header(widths);
            op += 1;
            for i in 0..4 {
                xor_pack(input, ip + i * 32, output, op, widths[i], contexts[i]);
                op += widths[i] as usize;
            }
            context = input[ip + 127];
            ip += BLOCK_LENGTH as usize;
        }
        input_offset.add(inlength);
        output_offset.set_position(op as u64);
        Ok(())
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        if input_length == 0 {
            return Ok(());
        }
        let mut ip = input_offset.index();
        ensure_input(NAME, input, ip + 1)?;
        let outlength = input[ip];
        if outlength % BLOCK_LENGTH != 0 {
            return Err(CodecError::CorruptStream {
                codec: NAME,
                position: ip,
            });
        }
        ip += 1;
        let mut op = output_offset.index();
        let end = op + outlength as usize;
        ensure_output(NAME, output, op, outlength as usize)?;

        let mut context = 0;
        while op < end {
            ensure_input(NAME, input, ip + 1)?;
            let widths = group_widths(NAME, input[ip], ip)?;
            ip += 1;
            let words: usize = widths.iter().map(|&b| usize::from(b)).sum();
            ensure_input(NAME, input, ip + words)?;
            for (i, &bits) in widths.iter().enumerate() {
                xor_unpack(input, ip, output, op + i * 32, bits, context);
                ip += usize::from(bits);
                context = output[op + i * 32 + 31];
            }
            op += BLOCK_LENGTH as usize;
        }
        output_offset.add(outlength);
        input_offset.set_position(ip as u64);
        Ok(())
    }
}
