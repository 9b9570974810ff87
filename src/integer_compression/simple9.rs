use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::exception_coder::ExceptionCoder;
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer, Skippable};

const NAME: &str = "Simple9";

/// Width of each value for selectors 0..=8.
const BIT_LENGTH: [u32; 9] = [1, 2, 3, 4, 5, 7, 9, 14, 28];

/// Values held by one word for selectors 0..=8.
const CODE_NUM: [usize; 9] = [28, 14, 9, 7, 5, 4, 3, 2, 1];

/// Picks the first layout whose width fits every value it would take
/// from the front of `input`. Returns the selector and the value count.
fn select(input: &[u32]) -> Option<(usize, usize)> {
    (0..CODE_NUM.len()).find_map(|selector| {
        let count = CODE_NUM[selector].min(input.len());
        let limit = 1u32 << BIT_LENGTH[selector];
        input[..count]
            .iter()
            .all(|&v| v < limit)
            .then_some((selector, count))
    })
}

fn encode_word(input: &[u32], selector: usize, count: usize) -> u32 {
    let b = BIT_LENGTH[selector];
    let mut word = input[..count].iter().fold(0u32, |acc, &v| (acc << b) + v);
    if count != CODE_NUM[selector] {
        word <<= (CODE_NUM[selector] - count) as u32 * b;
    }
    word | (selector as u32) << 28
}

/// Decodes at most `output.len()` values from `word`, first value in the highest bits.
fn decode_word(word: u32, output: &mut [u32]) -> Option<usize> {
    let selector = (word >> 28) as usize;
    if selector >= CODE_NUM.len() {
        return None;
    }
    let num = CODE_NUM[selector] as u32;
    let b = BIT_LENGTH[selector];
    let howmany = CODE_NUM[selector].min(output.len());
    for (k, out) in output[..howmany].iter_mut().enumerate() {
        *out = (word << (32 - num * b + k as u32 * b)) >> (32 - b);
    }
    Some(howmany)
}

fn encode_run(
    input: &[u32],
    inpos: usize,
    inlength: usize,
    output: &mut [u32],
    outpos: usize,
    codec: &'static str,
) -> CodecResult<usize> {
    ensure_input(codec, input, inpos + inlength)?;
    let end = inpos + inlength;
    let mut current = inpos;
    let mut out = outpos;
    while current < end {
        let run = &input[current..end];
        let (selector, count) = select(run).ok_or(CodecError::ValueTooLarge {
            codec,
            position: current,
            value: run[0],
            max_bits: 28,
        })?;
        ensure_output(codec, output, out, 1)?;
        output[out] = encode_word(run, selector, count);
        out += 1;
        current += count;
    }
    Ok(out - outpos)
}

fn estimate_run(input: &[u32], codec: &'static str) -> CodecResult<usize> {
    let mut current = 0;
    let mut words = 0;
    while current < input.len() {
        let (_, count) = select(&input[current..]).ok_or(CodecError::ValueTooLarge {
            codec,
            position: current,
            value: input[current],
            max_bits: 28,
        })?;
        current += count;
        words += 1;
    }
    Ok(words)
}

fn decode_run(
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    num: usize,
    codec: &'static str,
) -> CodecResult<usize> {
    ensure_output(codec, output, outpos, num)?;
    let mut current = outpos;
    let end = outpos + num;
    let mut inp = inpos;
    while current < end {
        ensure_input(codec, input, inp + 1)?;
        let word = input[inp];
        let howmany =
            decode_word(word, &mut output[current..end]).ok_or(CodecError::InvalidSelector {
                codec,
                position: inp,
                selector: word >> 28,
            })?;
        inp += 1;
        current += howmany;
    }
    Ok(inp - inpos)
}

/// Simple9: packs as many values as fit into each 32-bit word using one of
/// nine layouts, from 28 one-bit values down to a single 28-bit value.
///
/// Values of 2^28 or more cannot be represented and fail with
/// [`CodecError::ValueTooLarge`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Simple9;

impl Simple9 {
    /// Creates a new instance
    pub fn new() -> Simple9 {
        Simple9
    }
}

impl fmt::Display for Simple9 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Skippable for Simple9 {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let written = encode_run(
            input,
            input_offset.index(),
            input_length as usize,
            output,
            output_offset.index(),
            NAME,
        )?;
        input_offset.add(input_length);
        output_offset.add(written as u32);
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
        let read = decode_run(
            input,
            input_offset.index(),
            output,
            output_offset.index(),
            num as usize,
            NAME,
        )?;
        input_offset.add(read as u32);
        output_offset.add(num);
        Ok(())
    }
}

impl Integer<u32> for Simple9 {
    fn compress(
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
        ensure_output(NAME, output, output_offset.index(), 1)?;
        output[output_offset.index()] = input_length;
        output_offset.increment();
        self.headless_compress(input, input_length, input_offset, output, output_offset)
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

/// Simple9 as the exception coder of the patched codecs.
#[derive(Debug, Default, Clone, Copy)]
pub struct S9;

impl ExceptionCoder for S9 {
    const NAME: &'static str = "S9";

    fn compress(input: &[u32], output: &mut [u32]) -> CodecResult<usize> {
        encode_run(input, 0, input.len(), output, 0, Self::NAME)
    }

    fn estimate_compress(input: &[u32]) -> CodecResult<usize> {
        estimate_run(input, Self::NAME)
    }

    fn uncompress(input: &[u32], output: &mut [u32], count: usize) -> CodecResult<usize> {
        decode_run(input, 0, output, 0, count, Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bit_values_share_a_word() {
        let data = vec![1u32; 28];
        let mut out = vec![0u32; 4];
        assert_eq!(S9::compress(&data, &mut out).unwrap(), 1);
        assert_eq!(out[0], 0x0FFF_FFFF);
    }

    #[test]
    fn first_value_sits_in_high_bits() {
        // 14 two-bit values: 3 followed by zeros
        let mut data = vec![0u32; 14];
        data[0] = 3;
        data[1] = 2;
        let mut out = vec![0u32; 2];
        S9::compress(&data, &mut out).unwrap();
        assert_eq!(out[0] >> 28, 1);
        assert_eq!((out[0] >> 26) & 3, 3);
        assert_eq!((out[0] >> 24) & 3, 2);
    }

    #[test]
    fn short_tail_is_left_aligned() {
        let data = [5u32, 6, 7];
        let mut out = vec![0u32; 2];
        assert_eq!(S9::compress(&data, &mut out).unwrap(), 1);
        let mut back = vec![0u32; 3];
        assert_eq!(S9::uncompress(&out, &mut back, 3).unwrap(), 1);
        assert_eq!(back, data);
    }

    #[test]
    fn estimate_matches_output() {
        let data: Vec<u32> = (0..1000).map(|i| (i * 7919) % 5000).collect();
        let mut out = vec![0u32; 1000];
        let written = S9::compress(&data, &mut out).unwrap();
        assert_eq!(S9::estimate_compress(&data).unwrap(), written);
        let mut back = vec![0u32; data.len()];
        assert_eq!(S9::uncompress(&out, &mut back, data.len()).unwrap(), written);
        assert_eq!(back, data);
    }

    #[test]
    fn rejects_wide_values() {
        let data = [1u32, 2, 1 << 28];
        let mut out = vec![0u32; 4];
        let err = S9::compress(&data, &mut out).unwrap_err();
        assert_eq!(
            err,
            CodecError::ValueTooLarge {
                codec: "S9",
                position: 2,
                value: 1 << 28,
                max_bits: 28
            }
        );
    }

    #[test]
    fn rejects_unknown_selector() {
        let mut back = vec![0u32; 4];
        assert!(matches!(
            S9::uncompress(&[0xF000_0000], &mut back, 1),
            Err(CodecError::InvalidSelector { selector: 15, .. })
        ));
    }

    #[test]
    fn codec_round_trip_with_header() {
        let data: Vec<u32> = (0..300).map(|i| i % 97).collect();
        let mut codec = Simple9::new();
        let mut compressed = vec![0u32; 400];
        let mut inpos = Cursor::new(0);
        let mut outpos = Cursor::new(0);
        codec
            .compress(&data, 300, &mut inpos, &mut compressed, &mut outpos)
            .unwrap();
        assert_eq!(inpos.position(), 300);
        assert_eq!(compressed[0], 300);
        let len = outpos.position() as u32;
        let mut back = vec![0u32; 300];
        let mut inpos = Cursor::new(0);
        let mut outpos = Cursor::new(0);
        codec
            .uncompress(&compressed, len, &mut inpos, &mut back, &mut outpos)
            .unwrap();
        assert_eq!(inpos.position(), u64::from(len));
        assert_eq!(back, data);
    }
}
