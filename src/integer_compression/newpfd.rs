use std::fmt;
use std::io::Cursor;
use std::marker::PhantomData;

use log::trace;

use crate::cursor::IncrementCursor;
use crate::integer_compression::bitpacking::{fast_pack, fast_unpack};
use crate::integer_compression::exception_coder::ExceptionCoder;
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::integer_compression::simple16::S16;
use crate::integer_compression::simple9::S9;
use crate::{CodecError, CodecResult, Integer, Skippable};

const NAME: &str = "NewPFD";

/// Integers per block
pub const BLOCK_SIZE: u32 = 128;

/// Candidate base widths; a block header stores an index into this table.
pub(crate) const BITS: [u32; 17] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 16, 20, 32];

/// Smallest index into [`BITS`] whose width covers a given bit count.
const INV_BITS: [usize; 33] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 14, 14, 15, 15, 15, 15, 16, 16, 16, 16, 16,
    16, 16, 16, 16, 16, 16, 16,
];

/// Index of the widest entry of [`BITS`]; such blocks never have exceptions.
pub(crate) const FULL_WIDTH: usize = BITS.len() - 1;

/// First index worth trying: exception high parts must stay within the
/// 28 bits the secondary coders accept.
pub(crate) fn min_width_index(block: &[u32]) -> usize {
    let mb = helpers::max_bits(block, 0, block.len()) as usize;
    BITS[INV_BITS[mb]].saturating_sub(28) as usize
}

pub(crate) fn count_exceptions(block: &[u32], bits: u32) -> usize {
    block.iter().filter(|&&v| v >> bits != 0).count()
}

/// Writes the high parts of the `count` exceptions to `buffer[..count]` and
/// their positions to `buffer[count..2 * count]`.
pub(crate) fn collect_exceptions(block: &[u32], bits: u32, count: usize, buffer: &mut [u32]) {
    let mut c = 0;
    for (i, &v) in block.iter().enumerate() {
        if v >> bits != 0 {
            buffer[c] = v >> bits;
            buffer[c + count] = i as u32;
            c += 1;
        }
    }
}

/// Chooses the base width index and exception count of one block.
pub(crate) trait WidthChooser {
    fn choose<E: ExceptionCoder>(block: &[u32], buffer: &mut [u32]) -> CodecResult<(usize, usize)>;
}

/// Picks the narrowest width leaving at most 10% of the block as exceptions.
pub(crate) struct TenPercent;

impl WidthChooser for TenPercent {
    fn choose<E: ExceptionCoder>(block: &[u32], _buffer: &mut [u32]) -> CodecResult<(usize, usize)> {
        let block_len = block.len();
        Ok((min_width_index(block)..FULL_WIDTH)
            .find_map(|i| {
                let count = count_exceptions(block, BITS[i]);
                (count * 10 <= block_len).then_some((i, count))
            })
            .unwrap_or((FULL_WIDTH, 0)))
    }
}

/// Shared block writer of the NewPFD family. Every block of 128 becomes
/// `[index | count << 8 | exception words << 16][exceptions][4 windows]`.
pub(crate) fn encode_blocks<E: ExceptionCoder, W: WidthChooser>(
    codec: &'static str,
    input: &[u32],
    input_length: u32,
    input_offset: &mut Cursor<u32>,
    output: &mut [u32],
    output_offset: &mut Cursor<u32>,
    buffer: &mut [u32],
) -> CodecResult<()> {
    let inlength = helpers::greatest_multiple(input_length, BLOCK_SIZE) as usize;
    let block_size = BLOCK_SIZE as usize;
    let mut tmp_inpos = input_offset.index();
    let final_inpos = tmp_inpos + inlength;
    ensure_input(codec, input, final_inpos)?;
    let mut tmp_outpos = output_offset.index();
    while tmp_inpos < final_inpos {
        let block = &input[tmp_inpos..tmp_inpos + block_size];
        let (index, count) = W::choose::<E>(block, buffer)?;
        let bits = BITS[index];
        ensure_output(codec, output, tmp_outpos, 1)?;
        let remember = tmp_outpos;
        tmp_outpos += 1;
        let mut except_size = 0;
        if count > 0 {
            collect_exceptions(block, bits, count, buffer);
            except_size = E::compress(&buffer[..2 * count], &mut output[tmp_outpos..])?;
            tmp_outpos += except_size;
        }
        trace!("{codec}: block at {tmp_inpos} packs {bits} bits with {count} exceptions");
        output[remember] = index as u32 | (count as u32) << 8 | (except_size as u32) << 16;
        ensure_output(codec, output, tmp_outpos, bits as usize * 4)?;
        for k in (0..block_size).step_by(32) {
            fast_pack(input, tmp_inpos + k, output, tmp_outpos, bits as u8);
            tmp_outpos += bits as usize;
        }
        tmp_inpos += block_size;
    }
    input_offset.set_position(tmp_inpos as u64);
    output_offset.set_position(tmp_outpos as u64);
    Ok(())
}

/// Shared block reader of the NewPFD family.
pub(crate) fn decode_blocks<E: ExceptionCoder>(
    codec: &'static str,
    input: &[u32],
    input_offset: &mut Cursor<u32>,
    output: &mut [u32],
    output_offset: &mut Cursor<u32>,
    num: u32,
    buffer: &mut [u32],
) -> CodecResult<()> {
    let outlength = helpers::greatest_multiple(num, BLOCK_SIZE) as usize;
    let block_size = BLOCK_SIZE as usize;
    let mut tmp_outpos = output_offset.index();
    ensure_output(codec, output, tmp_outpos, outlength)?;
    let mut tmp_inpos = input_offset.index();
    for _ in 0..outlength / block_size {
        ensure_input(codec, input, tmp_inpos + 1)?;
        let header = input[tmp_inpos];
        let index = (header & 0xFF) as usize;
        let count = ((header >> 8) & 0xFF) as usize;
        let except_size = (header >> 16) as usize;
        if index >= BITS.len() {
            return Err(CodecError::InvalidBitWidth {
                codec,
                position: tmp_inpos,
                bits: index as u32,
            });
        }
        if count > block_size {
            return Err(CodecError::CorruptStream {
                codec,
                position: tmp_inpos,
            });
        }
        let bits = BITS[index];
        tmp_inpos += 1;
        ensure_input(codec, input, tmp_inpos + except_size + bits as usize * 4)?;
        if count > 0 {
            let read = E::uncompress(
                &input[tmp_inpos..tmp_inpos + except_size],
                &mut buffer[..2 * count],
                2 * count,
            )?;
            if read != except_size {
                return Err(CodecError::LengthMismatch {
                    codec,
                    expected: except_size,
                    actual: read,
                });
            }
        }
        tmp_inpos += except_size;
        for k in (0..block_size).step_by(32) {
            fast_unpack(input, tmp_inpos, output, tmp_outpos + k, bits as u8);
            tmp_inpos += bits as usize;
        }
        for k in 0..count {
            let pos = buffer[k + count] as usize;
            let high = buffer[k].checked_shl(bits);
            match high {
                Some(high) if pos < block_size => output[tmp_outpos + pos] |= high,
                _ => {
                    return Err(CodecError::CorruptStream {
                        codec,
                        position: tmp_inpos,
                    })
                }
            }
        }
        tmp_outpos += block_size;
    }
    output_offset.set_position(tmp_outpos as u64);
    input_offset.set_position(tmp_inpos as u64);
    Ok(())
}

/// Patched frame-of-reference coding after Zhang, Long and Suel.
///
/// Each block of 128 integers is packed at the narrowest candidate width
/// that leaves at most 10% of its values as exceptions. The high bits and
/// positions of the exceptions are compressed with the secondary coder `E`
/// and stored right after the block header.
///
/// Each instance owns a scratch buffer; use one instance per thread.
#[derive(Debug)]
pub struct NewPFD<E: ExceptionCoder = S16> {
    exception_buffer: Vec<u32>,
    coder: PhantomData<E>,
}

/// [`NewPFD`] with [`S9`] exceptions
pub type NewPFDS9 = NewPFD<S9>;

/// [`NewPFD`] with [`S16`] exceptions
pub type NewPFDS16 = NewPFD<S16>;

impl<E: ExceptionCoder> NewPFD<E> {
    /// Creates a new instance
    pub fn new() -> Self {
        Self {
            exception_buffer: vec![0; 2 * BLOCK_SIZE as usize],
            coder: PhantomData,
        }
    }
}

impl<E: ExceptionCoder> Default for NewPFD<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExceptionCoder> fmt::Display for NewPFD<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NAME}{}", E::NAME)
    }
}

impl<E: ExceptionCoder> Skippable for NewPFD<E> {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        encode_blocks::<E, TenPercent>(
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

impl<E: ExceptionCoder> Integer<u32> for NewPFD<E> {
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
            // Return early if there is no data to uncompress
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
