use std::fmt;
use std::io::Cursor;
use std::num::NonZeroU32;

use bytes::{Buf as _, BufMut as _, BytesMut};
use log::{debug, trace};

use crate::cursor::IncrementCursor;
use crate::integer_compression::bitpacking;
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer, Skippable};

const NAME: &str = "FastPFOR";

/// Block size constant for 256 integers per block
pub const BLOCK_SIZE_256: NonZeroU32 = NonZeroU32::new(256).unwrap();

/// Block size constant for 128 integers per block
pub const BLOCK_SIZE_128: NonZeroU32 = NonZeroU32::new(128).unwrap();

/// Overhead cost (in bits) for storing each exception's position in the block
const OVERHEAD_OF_EACH_EXCEPT: u32 = 8;

/// Default page size in number of integers
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(65536).unwrap();

/// Fast Patched Frame-of-Reference ([`FastPFOR`](https://github.com/lemire/FastPFor)) integer compression codec.
///
/// It is useful for compressing sequences of unsigned 32-bit integers.
///
/// The algorithm works by
/// - dividing data into blocks,
/// - determining the optimal number of bits needed for most values, and
/// - handling exceptions (values requiring more bits) separately
///
/// Blocks are grouped into pages. Per-block metadata of a page goes into one
/// byte stream and the high bits of its exceptions into one packed stream per
/// residual width, both written after the packed blocks.
///
/// The exception buffers are reused between calls; use one instance per thread.
#[derive(Debug)]
pub struct FastPFOR {
    /// Exception high bits, indexed by `max_bits - optimal_bits`
    data_to_be_packed: [Vec<u32>; 33],
    /// Metadata buffer for encoding/decoding
    bytes_container: BytesMut,
    /// Maximum integers per page
    page_size: u32,
    /// Read positions into `data_to_be_packed` while decoding
    data_pointers: [usize; 33],
    /// Frequency count for each bit width:
    /// `freqs[i]` = count of values needing exactly i bits
    freqs: [u32; 33],
    /// Optimal number of bits chosen for the current block
    optimal_bits: u32,
    /// Number of exceptions that don't fit in the optimal bit width
    exception_count: u32,
    /// Maximum bit width required for any value in the block
    max_bits: u32,
    /// Integers per block (128 or 256)
    block_size: u32,
}

impl Skippable for FastPFOR {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let inlength = helpers::greatest_multiple(input_length, self.block_size);
        let final_inpos = input_offset.index() + inlength as usize;
        ensure_input(NAME, input, final_inpos)?;
        while input_offset.index() < final_inpos {
            let this_size = (self.page_size as usize).min(final_inpos - input_offset.index());
            self.encode_page(input, this_size as u32, input_offset, output, output_offset)?;
        }
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
    ) -> CodecResult<()> {
        let mynvalue = helpers::greatest_multiple(num, self.block_size);
        let final_out = output_offset.index() + mynvalue as usize;
        ensure_output(NAME, output, output_offset.index(), mynvalue as usize)?;
        while output_offset.index() < final_out {
            let this_size = (self.page_size as usize).min(final_out - output_offset.index());
            self.decode_page(input, input_offset, output, output_offset, this_size as u32)?;
        }
        Ok(())
    }
}

impl Integer<u32> for FastPFOR {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let inlength = helpers::greatest_multiple(input_length, self.block_size);
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

impl Default for FastPFOR {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_256) // Use default values here
    }
}

impl fmt::Display for FastPFOR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.block_size == BLOCK_SIZE_128.get() {
            write!(f, "{NAME}128")
        } else {
            f.write_str(NAME)
        }
    }
}

impl FastPFOR {
    /// Creates codec with specified page and block sizes.
    ///
    /// `block_size` must be a multiple of 32 no larger than 256, since
    /// exception positions are stored as single bytes; other values fall
    /// back to [`BLOCK_SIZE_256`]. The page size is rounded down to whole
    /// blocks, with at least one block per page.
    pub fn new(page_size: NonZeroU32, block_size: NonZeroU32) -> FastPFOR {
        let mut block_size = block_size.get();
        if block_size % 32 != 0 || block_size > BLOCK_SIZE_256.get() {
            block_size = BLOCK_SIZE_256.get();
        }
        let page_size = helpers::greatest_multiple(page_size.get(), block_size).max(block_size);
        FastPFOR {
            page_size,
            block_size,
            bytes_container: BytesMut::with_capacity(
                (3 * page_size / block_size + page_size) as usize,
            ),
            data_to_be_packed: std::array::from_fn(|_| Vec::new()),
            data_pointers: [0; 33],
            freqs: [0; 33],
            optimal_bits: 0,
            exception_count: 0,
            max_bits: 0,
        }
    }

    /// FastPFOR with 128-integer blocks and the default page size.
    pub fn fastpfor128() -> FastPFOR {
        Self::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_128)
    }

    /// Integers per block
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Maximum integers per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Encodes a page using optimal bit width per block.
    ///
    /// For each block:
    /// - Determines best bit width, bitpacks regular values,
    /// - Stores exceptions with positions.
    /// - Writes header, packed data, metadata bytes, and exception values.
    ///
    /// # Arguments
    /// * `thissize` - Must be multiple of `block_size`
    /// * `input_offset` - Advanced by `thissize`
    /// * `output_offset` - Advanced by compressed size
    fn encode_page(
        &mut self,
        input: &[u32],
        thissize: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let header_pos = output_offset.index();
        ensure_output(NAME, output, header_pos, 1)?;
        let mut tmp_output_offset = header_pos + 1;

        for exceptions in &mut self.data_to_be_packed {
            exceptions.clear();
        }
        self.bytes_container.clear();

        let block_size = self.block_size as usize;
        let mut tmp_input_offset = input_offset.index();
        let final_input_offset = tmp_input_offset + thissize as usize;
        while tmp_input_offset < final_input_offset {
            self.best_b_from_data(&input[tmp_input_offset..tmp_input_offset + block_size]);
            let tmp_best_b = self.optimal_bits;
            trace!(
                "{NAME}: block at {tmp_input_offset} packs {tmp_best_b} bits with {} exceptions",
                self.exception_count
            );
            self.bytes_container.put_u8(self.optimal_bits as u8);
            self.bytes_container.put_u8(self.exception_count as u8);
            if self.exception_count > 0 {
                self.bytes_container.put_u8(self.max_bits as u8);
                let index = (self.max_bits - self.optimal_bits) as usize;
                for k in 0..block_size {
                    let value = input[k + tmp_input_offset];
                    if (value >> tmp_best_b) != 0 {
                        self.bytes_container.put_u8(k as u8);
                        self.data_to_be_packed[index].push(value >> tmp_best_b);
                    }
                }
            }
            ensure_output(NAME, output, tmp_output_offset, block_size / 32 * tmp_best_b as usize)?;
            for k in (0..block_size).step_by(32) {
                bitpacking::fast_pack(
                    input,
                    tmp_input_offset + k,
                    output,
                    tmp_output_offset,
                    tmp_best_b as u8,
                );
                tmp_output_offset += tmp_best_b as usize;
            }
            tmp_input_offset += block_size;
        }
        input_offset.set_position(tmp_input_offset as u64);
        output[header_pos] = (tmp_output_offset - header_pos) as u32;

        let byte_size = self.bytes_container.len();
        while (self.bytes_container.len() & 3) != 0 {
            self.bytes_container.put_u8(0);
        }
        let how_many_ints = self.bytes_container.len() / 4;
        ensure_output(NAME, output, tmp_output_offset, how_many_ints + 2)?;
        output[tmp_output_offset] = byte_size as u32;
        tmp_output_offset += 1;
        for it in output
            .iter_mut()
            .skip(tmp_output_offset)
            .take(how_many_ints)
        {
            *it = self.bytes_container.get_u32_le();
        }
        tmp_output_offset += how_many_ints;

        let mut bitmap = 0;
        for k in 2..=32 {
            if !self.data_to_be_packed[k].is_empty() {
                bitmap |= 1 << (k - 1);
            }
        }
        output[tmp_output_offset] = bitmap;
        tmp_output_offset += 1;

        for k in 2..=32 {
            let exceptions = &self.data_to_be_packed[k];
            if !exceptions.is_empty() {
                let size = exceptions.len();
                let words = helpers::packed_size(size as u32, k as u32) as usize;
                ensure_output(NAME, output, tmp_output_offset, words + 1)?;
                output[tmp_output_offset] = size as u32;
                tmp_output_offset += 1;
                tmp_output_offset +=
                    bitpacking::pack(exceptions, 0, output, tmp_output_offset, size, k as u8);
            }
        }
        debug!(
            "{NAME}: encoded page of {thissize} integers into {} words",
            tmp_output_offset - header_pos
        );
        output_offset.set_position(tmp_output_offset as u64);
        Ok(())
    }

    /// Computes optimal bit width minimizing total storage cost.
    ///
    /// Analyzes frequency distribution to balance regular value bits against exception overhead.
    ///
    /// Results stored in `optimal_bits`, `exception_count` and `max_bits`
    fn best_b_from_data(&mut self, block: &[u32]) {
        self.freqs.fill(0);
        for &value in block {
            self.freqs[helpers::bits(value)] += 1;
        }

        self.optimal_bits = 32;
        while self.optimal_bits > 0 && self.freqs[self.optimal_bits as usize] == 0 {
            self.optimal_bits -= 1;
        }
        self.max_bits = self.optimal_bits;

        let mut bestcost = self.optimal_bits * self.block_size;
        let mut cexcept: u32 = 0;
        self.exception_count = cexcept;

        for b in (0..self.optimal_bits).rev() {
            cexcept += self.freqs[b as usize + 1];
            if cexcept == self.block_size {
                break;
            }
            let mut thiscost = cexcept * OVERHEAD_OF_EACH_EXCEPT
                + cexcept * (self.max_bits - b)
                + b * self.block_size
                + 8;
            if self.max_bits - b == 1 {
                thiscost -= cexcept;
            }
            if thiscost < bestcost {
                bestcost = thiscost;
                self.optimal_bits = b;
                self.exception_count = cexcept;
            }
        }
    }

    /// Decodes a compressed page.
    ///
    /// Reads header to locate exception data, loads exceptions by bit width,
    /// unpacks regular values per block, patches in exceptions by position.
    ///
    /// # Arguments
    /// * `thissize` - Expected decompressed integer count
    /// * `input_offset` - Advanced past the whole page
    /// * `output_offset` - Advanced by `thissize`
    fn decode_page(
        &mut self,
        input: &[u32],
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        thissize: u32,
    ) -> CodecResult<()> {
        let init_pos = input_offset.index();
        ensure_input(NAME, input, init_pos + 1)?;
        let where_meta = input[init_pos] as usize;
        let mut inexcept = init_pos + where_meta;
        ensure_input(NAME, input, inexcept + 1)?;
        let bytesize = input[inexcept] as usize;
        inexcept += 1;
        self.bytes_container.clear();
        let length = bytesize.div_ceil(4);
        ensure_input(NAME, input, inexcept + length + 1)?;
        for &word in &input[inexcept..inexcept + length] {
            self.bytes_container.put_u32_le(word);
        }
        self.bytes_container.truncate(bytesize);
        inexcept += length;

        let bitmap = input[inexcept];
        inexcept += 1;

        for k in 2..=32u32 {
            let exceptions = &mut self.data_to_be_packed[k as usize];
            exceptions.clear();
            if (bitmap & (1 << (k - 1))) != 0 {
                ensure_input(NAME, input, inexcept + 1)?;
                let size = input[inexcept];
                inexcept += 1;
                let words = helpers::packed_size(size, k) as usize;
                ensure_input(NAME, input, inexcept + words)?;
                exceptions.resize(size as usize, 0);
                inexcept +=
                    bitpacking::unpack(input, inexcept, exceptions, 0, size as usize, k as u8);
            }
        }

        self.data_pointers.fill(0);
        let block_size = self.block_size as usize;
        let mut tmp_output_offset = output_offset.index();
        let mut tmp_input_offset = init_pos + 1;

        for _ in 0..thissize / self.block_size {
            let (b, cexcept) = self.next_meta_pair(tmp_input_offset)?;
            ensure_input(NAME, input, tmp_input_offset + block_size / 32 * b as usize)?;
            for k in (0..block_size).step_by(32) {
                bitpacking::fast_unpack(
                    input,
                    tmp_input_offset,
                    output,
                    tmp_output_offset + k,
                    b as u8,
                );
                tmp_input_offset += b as usize;
            }
            if cexcept > 0 {
                let maxbits = u32::from(self.next_meta_byte(tmp_input_offset)?);
                if maxbits > 32 || maxbits <= b {
                    return Err(CodecError::InvalidBitWidth {
                        codec: NAME,
                        position: tmp_input_offset,
                        bits: maxbits,
                    });
                }
                let index = (maxbits - b) as usize;
                for _ in 0..cexcept {
                    let pos = usize::from(self.next_meta_byte(tmp_input_offset)?);
                    if pos >= block_size {
                        return Err(CodecError::CorruptStream {
                            codec: NAME,
                            position: tmp_input_offset,
                        });
                    }
                    let except_value = if index == 1 {
                        1
                    } else {
                        let value = self.data_to_be_packed[index]
                            .get(self.data_pointers[index])
                            .copied()
                            .ok_or(CodecError::CorruptStream {
                                codec: NAME,
                                position: inexcept,
                            })?;
                        self.data_pointers[index] += 1;
                        value
                    };
                    output[pos + tmp_output_offset] |= except_value << b;
                }
            }
            tmp_output_offset += block_size;
        }
        if tmp_input_offset != init_pos + where_meta {
            return Err(CodecError::LengthMismatch {
                codec: NAME,
                expected: where_meta,
                actual: tmp_input_offset - init_pos,
            });
        }
        debug!("{NAME}: decoded page of {thissize} integers from {} words", inexcept - init_pos);
        output_offset.set_position(tmp_output_offset as u64);
        input_offset.set_position(inexcept as u64);
        Ok(())
    }

    /// Reads a block's base width and exception count from the metadata bytes.
    fn next_meta_pair(&mut self, position: usize) -> CodecResult<(u32, u8)> {
        let b = u32::from(self.next_meta_byte(position)?);
        if b > 32 {
            return Err(CodecError::InvalidBitWidth {
                codec: NAME,
                position,
                bits: b,
            });
        }
        let cexcept = self.next_meta_byte(position)?;
        Ok((b, cexcept))
    }

    fn next_meta_byte(&mut self, position: usize) -> CodecResult<u8> {
        if !self.bytes_container.has_remaining() {
            return Err(CodecError::NotEnoughData {
                codec: NAME,
                position,
            });
        }
        Ok(self.bytes_container.get_u8())
    }
}
