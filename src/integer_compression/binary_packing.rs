use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::bitpacking::{fast_pack_without_mask, fast_unpack};
use crate::integer_compression::helpers::{self, ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer, Skippable};

const NAME: &str = "BinaryPacking";

/// Integers per block
pub const BLOCK_SIZE: u32 = 32;

/// Packs four block widths into one header word, first block in the top byte.
pub(crate) fn group_header(widths: [u32; 4]) -> u32 {
    widths[0] << 24 | widths[1] << 16 | widths[2] << 8 | widths[3]
}

/// Splits a group header written by [`group_header`], rejecting widths above 32.
pub(crate) fn group_widths(codec: &'static str, header: u32, position: usize) -> CodecResult<[u8; 4]> {
    let widths = header.to_be_bytes();
    for &bits in &widths {
        check_width(codec, u32::from(bits), position)?;
    }
    Ok(widths)
}

pub(crate) fn check_width(codec: &'static str, bits: u32, position: usize) -> CodecResult<u8> {
    if bits > 32 {
        return Err(CodecError::InvalidBitWidth {
            codec,
            position,
            bits,
        });
    }
    Ok(bits as u8)
}

/// Plain frame-of-reference bit packing without exceptions.
///
/// Blocks of 32 integers are packed at the width of their largest value.
/// Four consecutive blocks share one header word holding their widths; the
/// last one to three blocks get a header word each. Input is truncated to
/// a multiple of 32, leaving the remainder to a second codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryPacking;

impl BinaryPacking {
    /// Creates a new instance
    pub fn new() -> BinaryPacking {
        BinaryPacking
    }
}

impl fmt::Display for BinaryPacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Skippable for BinaryPacking {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let inlength = helpers::greatest_multiple(input_length, BLOCK_SIZE) as usize;
        let block = BLOCK_SIZE as usize;
        let start = input_offset.index();
        let end = start + inlength;
        ensure_input(NAME, input, end)?;
        let mut tmp_outpos = output_offset.index();
        let mut s = start;
        while s + block * 4 <= end {
            let widths: [u32; 4] =
                std::array::from_fn(|i| helpers::max_bits(input, s + i * block, block));
            ensure_output(NAME, output, tmp_outpos, 1 + widths.iter().sum::<u32>() as usize)?;
            output[tmp_outpos] = group_header(widths);
            tmp_outpos += 1;
            for (i, &bits) in widths.iter().enumerate() {
                fast_pack_without_mask(input, s + i * block, output, tmp_outpos, bits as u8);
                tmp_outpos += bits as usize;
            }
            s += block * 4;
        }
        while s < end {
            let bits = helpers::max_bits(input, s, block);
            ensure_output(NAME, output, tmp_outpos, 1 + bits as usize)?;
            output[tmp_outpos] = bits;
            tmp_outpos += 1;
            fast_pack_without_mask(input, s, output, tmp_outpos, bits as u8);
            tmp_outpos += bits as usize;
            s += block;
        }
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
    ) -> CodecResult<()> {
        let outlength = helpers::greatest_multiple(num, BLOCK_SIZE) as usize;
        let block = BLOCK_SIZE as usize;
        let start = output_offset.index();
        let end = start + outlength;
        ensure_output(NAME, output, start, outlength)?;
        let mut tmp_inpos = input_offset.index();
        let mut s = start;
        while s + block * 4 <= end {
            ensure_input(NAME, input, tmp_inpos + 1)?;
            let widths = group_widths(NAME, input[tmp_inpos], tmp_inpos)?;
            tmp_inpos += 1;
            let words: usize = widths.iter().map(|&b| usize::from(b)).sum();
            ensure_input(NAME, input, tmp_inpos + words)?;
            for (i, &bits) in widths.iter().enumerate() {
                fast_unpack(input, tmp_inpos, output, s + i * block, bits);
                tmp_inpos += usize::from(bits);
            }
            s += block * 4;
        }
        while s < end {
            ensure_input(NAME, input, tmp_inpos + 1)?;
            let bits = check_width(NAME, input[tmp_inpos], tmp_inpos)?;
            tmp_inpos += 1;
            ensure_input(NAME, input, tmp_inpos + usize::from(bits))?;
            fast_unpack(input, tmp_inpos, output, s, bits);
            tmp_inpos += usize::from(bits);
            s += block;
        }
        output_offset.add(outlength as u32);
        input_offset.set_position(tmp_inpos as u64);
        Ok(())
    }
}

impl Integer<u32> for BinaryPacking {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u32]) -> Vec<u32> {
        let mut codec = BinaryPacking::new();
        let mut compressed = vec![0u32; data.len() * 2 + 8];
        let mut inpos = Cursor::new(0);
        let mut outpos = Cursor::new(0);
        codec
            .compress(data, data.len() as u32, &mut inpos, &mut compressed, &mut outpos)
            .unwrap();
        let len = outpos.position() as u32;
        let mut back = vec![0u32; data.len()];
        let mut inpos = Cursor::new(0);
        let mut outpos = Cursor::new(0);
        codec
            .uncompress(&compressed, len, &mut inpos, &mut back, &mut outpos)
            .unwrap();
        assert_eq!(inpos.position(), u64::from(len));
        back.truncate(outpos.index());
        back
    }

    #[test]
    fn header_layout() {
        assert_eq!(group_header([1, 2, 3, 32]), 0x0102_0320);
        assert_eq!(group_widths(NAME, 0x0102_0320, 0).unwrap(), [1, 2, 3, 32]);
        assert!(group_widths(NAME, 0x2100_0000, 0).is_err());
    }

    #[test]
    fn groups_and_single_blocks() {
        // five blocks: one group of four plus a single block
        let data: Vec<u32> = (0..160).map(|i| i * 3).collect();
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn truncates_to_block_multiple() {
        let data: Vec<u32> = (0..70).collect();
        assert_eq!(round_trip(&data), &data[..64]);
    }

    #[test]
    fn layout_of_single_block() {
        let data = vec![1u32; 32];
        let mut compressed = vec![0u32; 4];
        let mut outpos = Cursor::new(0);
        BinaryPacking::new()
            .compress(&data, 32, &mut Cursor::new(0), &mut compressed, &mut outpos)
            .unwrap();
        assert_eq!(outpos.position(), 3);
        assert_eq!(&compressed[..3], &[32, 1, u32::MAX]);
    }

    #[test]
    fn small_output_buffer_is_an_error() {
        let data = vec![u32::MAX; 128];
        let mut compressed = vec![0u32; 16];
        let err = BinaryPacking::new()
            .compress(&data, 128, &mut Cursor::new(0), &mut compressed, &mut Cursor::new(0))
            .unwrap_err();
        assert!(matches!(err, CodecError::OutputBufferTooSmall { .. }));
    }
}
