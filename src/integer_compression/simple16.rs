use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::exception_coder::ExceptionCoder;
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer, Skippable};

const NAME: &str = "Simple16";

/// Values held by one word for each of the 16 selectors.
const S16_NUM: [usize; 16] = [28, 21, 21, 21, 14, 9, 8, 7, 6, 6, 5, 5, 4, 3, 2, 1];

/// Per-slot widths for each selector, first value in the lowest bits.
const S16_BITS: [&[u32]; 16] = [
    &[1; 28],
    &[2, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1],
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2],
    &[2; 14],
    &[4, 3, 3, 3, 3, 3, 3, 3, 3],
    &[3, 4, 4, 4, 4, 3, 3, 3],
    &[4; 7],
    &[5, 5, 5, 5, 4, 4],
    &[4, 4, 5, 5, 5, 5],
    &[6, 6, 6, 5, 5],
    &[5, 5, 6, 6, 6],
    &[7; 4],
    &[10, 9, 9],
    &[14, 14],
    &[28],
];

fn select(input: &[u32]) -> Option<(usize, usize)> {
    (0..S16_NUM.len()).find_map(|selector| {
        let count = S16_NUM[selector].min(input.len());
        input[..count]
            .iter()
            .zip(S16_BITS[selector])
            .all(|(&v, &b)| v < 1 << b)
            .then_some((selector, count))
    })
}

fn encode_word(input: &[u32], selector: usize, count: usize) -> u32 {
    let mut word = (selector as u32) << 28;
    let mut shift = 0;
    for (&v, &b) in input[..count].iter().zip(S16_BITS[selector]) {
        word |= v << shift;
        shift += b;
    }
    word
}

fn decode_word(word: u32, output: &mut [u32]) -> usize {
    let selector = (word >> 28) as usize;
    let howmany = S16_NUM[selector].min(output.len());
    let mut shift = 0;
    for (out, &b) in output[..howmany].iter_mut().zip(S16_BITS[selector]) {
        *out = (word >> shift) & (u32::MAX >> (32 - b));
        shift += b;
    }
    howmany
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

fn decode_run(
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    num: usize,
    codec: &'static str,
) -> CodecResult<usize> {
    ensure_output(codec, output, outpos, num)?;
    let end = outpos + num;
    let mut current = outpos;
    let mut inp = inpos;
    while current < end {
        ensure_input(codec, input, inp + 1)?;
        current += decode_word(input[inp], &mut output[current..end]);
        inp += 1;
    }
    Ok(inp - inpos)
}

/// Simple16: like Simple9 but with sixteen layouts, several of which mix
/// two widths in one word so that less space goes unused.
#[derive(Debug, Default, Clone, Copy)]
pub struct Simple16;

impl Simple16 {
    /// Creates a new instance
    pub fn new() -> Simple16 {
        Simple16
    }
}

impl fmt::Display for Simple16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Skippable for Simple16 {
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

impl Integer<u32> for Simple16 {
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

/// Simple16 as the exception coder of the patched codecs.
#[derive(Debug, Default, Clone, Copy)]
pub struct S16;

impl ExceptionCoder for S16 {
    const NAME: &'static str = "S16";

    fn compress(input: &[u32], output: &mut [u32]) -> CodecResult<usize> {
        encode_run(input, 0, input.len(), output, 0, Self::NAME)
    }

    fn estimate_compress(input: &[u32]) -> CodecResult<usize> {
        let mut current = 0;
        let mut words = 0;
        while current < input.len() {
            let (_, count) = select(&input[current..]).ok_or(CodecError::ValueTooLarge {
                codec: Self::NAME,
                position: current,
                value: input[current],
                max_bits: 28,
            })?;
            current += count;
            words += 1;
        }
        Ok(words)
    }

    fn uncompress(input: &[u32], output: &mut [u32], count: usize) -> CodecResult<usize> {
        decode_run(input, 0, output, 0, count, Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_fill_28_bits() {
        for (selector, widths) in S16_BITS.iter().enumerate() {
            assert_eq!(widths.len(), S16_NUM[selector]);
            assert_eq!(widths.iter().sum::<u32>(), 28, "selector {selector}");
        }
    }

    #[test]
    fn first_value_sits_in_low_bits() {
        let data = [1u32, 0, 1];
        let mut out = [0u32; 1];
        assert_eq!(S16::compress(&data, &mut out).unwrap(), 1);
        assert_eq!(out[0], 0b101);
    }

    #[test]
    fn mixed_layout_is_chosen() {
        // seven 2-bit values then ones: selector 1
        let mut data = vec![3u32; 7];
        data.extend([1u32; 14]);
        let mut out = [0u32; 2];
        assert_eq!(S16::compress(&data, &mut out).unwrap(), 1);
        assert_eq!(out[0] >> 28, 1);
        let mut back = vec![0u32; data.len()];
        S16::uncompress(&out, &mut back, data.len()).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn estimate_matches_output() {
        let data: Vec<u32> = (0..777).map(|i| (i * i) % 3001).collect();
        let mut out = vec![0u32; 800];
        let written = S16::compress(&data, &mut out).unwrap();
        assert_eq!(S16::estimate_compress(&data).unwrap(), written);
        let mut back = vec![0u32; data.len()];
        assert_eq!(S16::uncompress(&out, &mut back, data.len()).unwrap(), written);
        assert_eq!(back, data);
    }

    #[test]
    fn rejects_wide_values() {
        let mut codec = Simple16::new();
        let data = [u32::MAX];
        let mut out = vec![0u32; 4];
        let err = codec
            .compress(&data, 1, &mut Cursor::new(0), &mut out, &mut Cursor::new(0))
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::ValueTooLarge {
                codec: "Simple16",
                position: 0,
                ..
            }
        ));
    }

    #[test]
    fn truncated_stream_is_reported() {
        let mut codec = Simple16::new();
        let mut out = vec![0u32; 100];
        // header promises 100 values but no payload follows
        let err = codec
            .uncompress(&[100], 1, &mut Cursor::new(0), &mut out, &mut Cursor::new(0))
            .unwrap_err();
        assert!(matches!(err, CodecError::NotEnoughData { .. }));
    }
}
