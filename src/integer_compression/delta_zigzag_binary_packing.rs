use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::binary_packing::{group_header, group_widths};
use crate::integer_compression::bitpacking::{fast_pack_without_mask, fast_unpack};
use crate::integer_compression::differential::zigzag::{DeltaZigzagDecoder, DeltaZigzagEncoder};
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer};

const NAME: &str = "DeltaZigzagBinaryPacking";

/// Integers per block
pub const BLOCK_LENGTH: u32 = 128;

/// Binary packing of zigzag-coded differences.
///
/// Suits sequences that wander up and down by small steps. Each block of
/// 128 is split into four 32-value windows whose widths share one header
/// word. The difference context restarts at zero on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeltaZigzagBinaryPacking;

impl DeltaZigzagBinaryPacking {
    /// Creates a new instance
    pub fn new() -> DeltaZigzagBinaryPacking {
        DeltaZigzagBinaryPacking
    }
}

impl fmt::Display for DeltaZigzagBinaryPacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Integer<u32> for DeltaZigzagBinaryPacking {
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

        let mut ctx = DeltaZigzagEncoder::new(0);
        let mut work = [0u32; BLOCK_LENGTH as usize];
        while ip < end {
            ctx.encode_array(&input[ip..ip + BLOCK_LENGTH as usize], &mut work);
            let widths: [u32; 4] = std::array::from_fn(|i| helpers::max_bits(&work, i * 32, 32));
            ensure_output(NAME, output, op, 1 + widths.iter().sum::<u32>() as usize)?;
            output[op] = group_header(widths);
            op += 1;
            for (i, &bits) in widths.iter().enumerate() {
                fast_pack_without_mask(&work, i * 32, output, op, bits as u8);
                op += bits as usize;
            }
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

        let mut ctx = DeltaZigzagDecoder::new(0);
        let mut work = [0u32; BLOCK_LENGTH as usize];
        while op < end {
            ensure_input(NAME, input, ip + 1)?;
            let widths = group_widths(NAME, input[ip], ip)?;
            ip += 1;
            let words: usize = widths.iter().map(|&b| usize::from(b)).sum();
            ensure_input(NAME, input, ip + words)?;
            for (i, &bits) in widths.iter().enumerate() {
                fast_unpack(input, ip, &mut work, i * 32, bits);
                ip += usize::from(bits);
            }
            ctx.decode_array(&work, &mut output[op..op + BLOCK_LENGTH as usize]);
            op += BLOCK_LENGTH as usize;
        }
        output_offset.add(outlength);
        input_offset.set_position(ip as u64);
        Ok(())
    }
}
