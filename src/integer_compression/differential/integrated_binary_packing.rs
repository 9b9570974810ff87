use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::binary_packing::{check_width, group_header, group_widths};
use crate::integer_compression::bitpacking::{integrated_pack, integrated_unpack};
use crate::integer_compression::differential::{Integrated, SkippableIntegrated};
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::{CodecResult, Integer};

const NAME: &str = "IntegratedBinaryPacking";

/// Integers per block
pub const BLOCK_SIZE: u32 = 32;

/// [`BinaryPacking`](crate::BinaryPacking) over the differences of sorted input.
///
/// The layout matches `BinaryPacking`: four blocks of 32 share a header word
/// of widths, trailing blocks get one word each. Each block stores the
/// wrapping differences to its predecessor, so the width reflects the gaps
/// rather than the magnitudes.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegratedBinaryPacking;

impl IntegratedBinaryPacking {
    /// Creates a new instance
    pub fn new() -> IntegratedBinaryPacking {
        IntegratedBinaryPacking
    }
}

impl fmt::Display for IntegratedBinaryPacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl SkippableIntegrated for IntegratedBinaryPacking {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        init_value: &mut u32,
    ) -> CodecResult<()> {
        let inlength = helpers::greatest_multiple(input_length, BLOCK_SIZE) as usize;
        let block = BLOCK_SIZE as usize;
        let start = input_offset.index();
        let end = start + inlength;
        ensure_input(NAME, input, end)?;
        let mut initoffset = *init_value;
        let mut tmp_outpos = output_offset.index();
        let mut s = start;
        while s + block * 4 <= end {
            let mut widths = [0u32; 4];
            let mut context = initoffset;
            for (i, w) in widths.iter_mut().enumerate() {
                *w = helpers::max_diff_bits(context, input, s + i * block, block);
                context = input[s + i * block + block - 1];
            }
            ensure_output(NAME, output, tmp_outpos, 1 + widths.iter().sum::<u32>() as usize)?;
            output[tmp_outpos] = group_header(widths);
            tmp_outpos += 1;
            for (i, &bits) in widths.iter().enumerate() {
                integrated_pack(initoffset, input, s + i * block, output, tmp_outpos, bits as u8);
                tmp_outpos += bits as usize;
                initoffset = input[s + i * block + block - 1];
            }
            s += block * 4;
        }
        while s < end {
            let bits = helpers::max_diff_bits(initoffset, input, s, block);
            ensure_output(NAME, output, tmp_outpos, 1 + bits as usize)?;
            output[tmp_outpos] = bits;
            tmp_outpos += 1;
            integrated_pack(initoffset, input, s, output, tmp_outpos, bits as u8);
            tmp_outpos += bits as usize;
            initoffset = input[s + block - 1];
            s += block;
        }
        *init_value = initoffset;
        input_offset.add(inlength as u32);
        output_offset.set_position(tmp_outpos as u64);
        Ok(())
    }

    fn headless_uncompress(
        &mut self,
        input: &[u32],
        _input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
        init_value: &mut u32,
    ) -> CodecResult<()> {
        let outlength = helpers::greatest_multiple(num, BLOCK_SIZE) as usize;
        let block = BLOCK_SIZE as usize;
        let start = output_offset.index();
        let end = start + outlength;
        ensure_output(NAME, output, start, outlength)?;
        let mut initoffset = *init_value;
        let mut tmp_inpos = input_offset.index();
        let mut s = start;
        while s + block * 4 <= end {
            ensure_input(NAME, input, tmp_inpos + 1)?;
            let widths = group_widths(NAME, input[tmp_inpos], tmp_inpos)?;
            tmp_inpos += 1;
            let words: usize = widths.iter().map(|&b| usize::from(b)).sum();
            ensure_input(NAME, input, tmp_inpos + words)?;
            for (i, &bits) in widths.iter().enumerate() {
                integrated_unpack(initoffset, input, tmp_inpos, output, s + i * block, bits);
                tmp_inpos += usize::from(bits);
                initoffset = output[s + i * block + block - 1];
            }
            s += block * 4;
        }
        while s < end {
            ensure_input(NAME, input, tmp_inpos + 1)?;
            let bits = check_width(NAME, input[tmp_inpos], tmp_inpos)?;
            tmp_inpos += 1;
            ensure_input(NAME, input, tmp_inpos + usize::from(bits))?;
            integrated_unpack(initoffset, input, tmp_inpos, output, s, bits);
            tmp_inpos += usize::from(bits);
            initoffset = output[s + block - 1];
            s += block;
        }
        *init_value = initoffset;
        output_offset.add(outlength as u32);
        input_offset.set_position(tmp_inpos as u64);
        Ok(())
    }
}

impl Integrated for IntegratedBinaryPacking {}

impl Integer<u32> for IntegratedBinaryPacking {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let inlength = helpers::greatest_multiple(input_length, BLOCK_SIZE);
        if inlength == 0 {
            // Return early if there is no data to compress
            return Ok(());
        }
        ensure_output(NAME, output, output_offset.index(), 1)?;
        output[output_offset.index()] = inlength;
        output_offset.increment();
        SkippableIntegrated::headless_compress(
            self,
            input,
            inlength,
            input_offset,
            output,
            output_offset,
            &mut 0,
        )
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
            // Return early if there is no data to uncompress
            return Ok(());
        }
        ensure_input(NAME, input, input_offset.index() + 1)?;
        let outlength = input[input_offset.index()];
        input_offset.increment();
        SkippableIntegrated::headless_uncompress(
            self,
            input,
            input_length - 1,
            input_offset,
            output,
            output_offset,
            outlength,
            &mut 0,
        )
    }
}
