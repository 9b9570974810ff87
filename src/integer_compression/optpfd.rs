use std::fmt;
use std::io::Cursor;
use std::marker::PhantomData;

use crate::cursor::IncrementCursor;
use crate::integer_compression::exception_coder::ExceptionCoder;
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::integer_compression::newpfd::{
    collect_exceptions, count_exceptions, decode_blocks, encode_blocks, min_width_index,
    WidthChooser, BITS, BLOCK_SIZE, FULL_WIDTH,
};
use crate::integer_compression::simple16::S16;
use crate::integer_compression::simple9::S9;
use crate::{CodecResult, Integer, Skippable};

const NAME: &str = "OptPFD";

/// Tries every width and keeps the one with the smallest total size, counting
/// the exact size of the compressed exception list.
struct LowestCost;

impl WidthChooser for LowestCost {
    fn choose<E: ExceptionCoder>(block: &[u32], buffer: &mut [u32]) -> CodecResult<(usize, usize)> {
        let block_len = block.len();
        let mut best = (FULL_WIDTH, 0);
        let mut best_cost = BITS[FULL_WIDTH] as usize * 4;
        for i in min_width_index(block)..FULL_WIDTH {
            let count = count_exceptions(block, BITS[i]);
            if count == block_len {
                continue;
            }
            collect_exceptions(block, BITS[i], count, buffer);
            let cost = BITS[i] as usize * 4 + E::estimate_compress(&buffer[..2 * count])?;
            if cost <= best_cost {
                best_cost = cost;
                best = (i, count);
            }
        }
        Ok(best)
    }
}

/// Patched frame-of-reference coding with an exhaustive width search, after
/// Yan, Ding and Suel.
///
/// Same stream layout as [`NewPFD`](crate::NewPFD); only the choice of the
/// base width differs, trading compression speed for size.
#[derive(Debug)]
pub struct OptPFD<E: ExceptionCoder = S16> {
    exception_buffer: Vec<u32>,
    coder: PhantomData<E>,
}

/// [`OptPFD`] with [`S9`] exceptions
pub type OptPFDS9 = OptPFD<S9>;

/// [`OptPFD`] with [`S16`] exceptions
pub type OptPFDS16 = OptPFD<S16>;

impl<E: ExceptionCoder> OptPFD<E> {
    /// Creates a new instance
    pub fn new() -> Self {
        Self {
            exception_buffer: vec![0; 2 * BLOCK_SIZE as usize],
            coder: PhantomData,
        }
    }
}

impl<E: ExceptionCoder> Default for OptPFD<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExceptionCoder> fmt::Display for OptPFD<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NAME}{}", E::NAME)
    }
}

impl<E: ExceptionCoder> Skippable for OptPFD<E> {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        encode_blocks::<E, LowestCost>(
            NAME,
            input,
            input_length,
            input_offset,
            output,
            output_offset,
            &mut self.exception_buffer,
        )
    }

    fn headless_uncompress(
        &mut self,
        input: &[u32],
        _input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
    ) -> CodecResult<()> {
        decode_blocks::<E>(
            NAME,
            input,
            input_offset,
            output,
            output_offset,
            num,
            &mut self.exception_buffer,
        )
    }
}

impl<E: ExceptionCoder> Integer<u32> for OptPFD<E> {
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
            return Ok(());
        }
        ensure_output(NAME, output, output_offset.index(), 1)?;
        output[output_offset.index()] = inlength;
        output_offset.increment();
        self.headless_compress(input, inlength, input_offset, output, output_offset)
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
        ensure_input(NAME, input, input_offset.index() + 1)?;
        let outlength = input[input_offset.index()];
        input_offset.increment();
        self.headless_uncompress(
            input,
            input_length - 1,
            input_offset,
            output,
            output_offset,
            outlength,
        )
    }
}
