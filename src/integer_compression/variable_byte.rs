use std::fmt;
use std::io::Cursor;

use bytes::{Buf as _, BufMut as _, BytesMut};

use crate::cursor::IncrementCursor;
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecError, CodecResult, Integer, Skippable};

const NAME: &str = "VariableByte";

/// Number of bytes `val` takes once encoded.
pub(crate) fn encoded_len(val: u32) -> usize {
    match val {
        0..0x80 => 1,
        0x80..0x4000 => 2,
        0x4000..0x20_0000 => 3,
        0x20_0000..0x1000_0000 => 4,
        _ => 5,
    }
}

/// Appends `val` as 7-bit groups, least significant first. The last byte
/// of every value carries the `0x80` flag.
pub(crate) fn put_value(buf: &mut BytesMut, val: u32) {
    let mut v = val;
    while v >= 0x80 {
        buf.put_u8((v & 0x7F) as u8);
        v >>= 7;
    }
    buf.put_u8(v as u8 | 0x80);
}

/// Moves `buf` into `output` as little-endian words, zero padding the last one.
pub(crate) fn flush_words(
    codec: &'static str,
    buf: &mut BytesMut,
    output: &mut [u32],
    output_offset: &mut Cursor<u32>,
) -> CodecResult<()> {
    while buf.len() % 4 != 0 {
        buf.put_u8(0);
    }
    let words = buf.len() / 4;
    ensure_output(codec, output, output_offset.index(), words)?;
    for it in output.iter_mut().skip(output_offset.index()).take(words) {
        *it = buf.get_u32_le();
    }
    output_offset.add(words as u32);
    Ok(())
}

/// Incremental decoder shared by the word-oriented variable byte codecs.
#[derive(Default)]
pub(crate) struct ByteDecoder {
    value: u32,
    shift: u32,
}

impl ByteDecoder {
    /// Feeds one byte; returns the value once its terminating byte arrives.
    pub(crate) fn push(&mut self, c: u8) -> Option<u32> {
        self.value = self
            .value
            .wrapping_add(u32::from(c & 0x7F).checked_shl(self.shift).unwrap_or(0));
        if c & 0x80 != 0 {
            let v = self.value;
            *self = ByteDecoder::default();
            Some(v)
        } else {
            self.shift += 7;
            None
        }
    }

    /// True when a value has started but its terminating byte has not arrived.
    pub(crate) fn is_pending(&self) -> bool {
        self.shift != 0
    }
}

/// Variable-byte encoding codec for integer compression.
///
/// Each value takes one to five bytes of seven payload bits. This codec
/// handles the full `u32` range and is the usual second stage of a
/// [`Composition`](crate::Composition) mopping up what a block codec leaves.
#[derive(Debug, Default, Clone, Copy)]
pub struct VariableByte;

impl VariableByte {
    /// Creates a new instance
    pub fn new() -> VariableByte {
        VariableByte
    }
}

impl fmt::Display for VariableByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Skippable for VariableByte {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        if input_length == 0 {
            // Return early if there is no data to compress
            return Ok(());
        }
        let start = input_offset.index();
        ensure_input(NAME, input, start + input_length as usize)?;
        let mut buf = BytesMut::with_capacity(input_length as usize * 5 + 3);
        for &val in &input[start..start + input_length as usize] {
            put_value(&mut buf, val);
        }
        flush_words(NAME, &mut buf, output, output_offset)?;
        input_offset.add(input_length);
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
        let mut tmp_outpos = output_offset.index();
        let final_out = tmp_outpos + num as usize;
        ensure_output(NAME, output, tmp_outpos, num as usize)?;
        let mut p = input_offset.index();
        let mut s = 0;
        let mut decoder = ByteDecoder::default();
        while tmp_outpos < final_out {
            ensure_input(NAME, input, p + 1)?;
            let c = (input[p] >> s) as u8;
            s += 8;
            if s == 32 {
                s = 0;
                p += 1;
            }
            if let Some(v) = decoder.push(c) {
                output[tmp_outpos] = v;
                tmp_outpos += 1;
            }
        }
        output_offset.set_position(tmp_outpos as u64);
        // a partly read word belongs to this segment
        input_offset.set_position((p + usize::from(s != 0)) as u64);
        Ok(())
    }
}

impl Integer<u32> for VariableByte {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
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
        let start = input_offset.index();
        ensure_input(NAME, input, start + input_length as usize)?;
        let mut tmp_outpos = output_offset.index();
        let mut decoder = ByteDecoder::default();
        for &word in &input[start..start + input_length as usize] {
            for c in word.to_le_bytes() {
                if let Some(v) = decoder.push(c) {
                    ensure_output(NAME, output, tmp_outpos, 1)?;
                    output[tmp_outpos] = v;
                    tmp_outpos += 1;
                }
            }
        }
        output_offset.set_position(tmp_outpos as u64);
        input_offset.add(input_length);
        Ok(())
    }
}

impl Integer<i8> for VariableByte {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [i8],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        if input_length == 0 {
            // Return early if there is no data to compress
            return Ok(());
        }
        let start = input_offset.index();
        ensure_input(NAME, input, start + input_length as usize)?;
        let values = &input[start..start + input_length as usize];
        let needed = values.iter().map(|&v| encoded_len(v)).sum();
        ensure_output(NAME, output, output_offset.index(), needed)?;
        let mut buf = BytesMut::with_capacity(needed);
        for &val in values {
            put_value(&mut buf, val);
        }
        let out_start = output_offset.index();
        for (out, &b) in output[out_start..out_start + needed].iter_mut().zip(buf.iter()) {
            *out = b as i8;
        }
        output_offset.add(needed as u32);
        input_offset.add(input_length);
        Ok(())
    }

    fn uncompress(
        &mut self,
        input: &[i8],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let mut p = input_offset.index();
        let final_p = p + input_length as usize;
        ensure_input(NAME, input, final_p)?;
        let mut tmp_outpos = output_offset.index();

        while p < final_p {
            let mut v = 0u32;
            let mut shift = 0;
            loop {
                if p >= final_p || shift > 28 {
                    return Err(CodecError::NotEnoughData {
                        codec: NAME,
                        position: p,
                    });
                }
                let c = input[p] as u8;
                p += 1;
                v |= u32::from(c & 0x7F) << shift;
                if c & 0x80 != 0 {
                    break;
                }
                shift += 7;
            }
            ensure_output(NAME, output, tmp_outpos, 1)?;
            output[tmp_outpos] = v;
            tmp_outpos += 1;
        }
        output_offset.set_position(tmp_outpos as u64);
        input_offset.set_position(p as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng as _, SeedableRng};

    use super::*;

    fn verify_u32_roundtrip(input: &[u32]) {
        let mut vb = VariableByte::new();
        let mut encoded: Vec<u32> = vec![0; input.len() * 2 + 1];
        let mut input_offset = Cursor::new(0);
        let mut output_offset = Cursor::new(0);

        Integer::<u32>::compress(
            &mut vb,
            input,
            input.len() as u32,
            &mut input_offset,
            &mut encoded,
            &mut output_offset,
        )
        .expect("Failed to compress");

        let encoded_len = output_offset.position() as u32;
        let mut decoded: Vec<u32> = vec![0; input.len()];
        let mut input_offset = Cursor::new(0);
        let mut output_offset = Cursor::new(0);

        Integer::<u32>::uncompress(
            &mut vb,
            &encoded,
            encoded_len,
            &mut input_offset,
            &mut decoded,
            &mut output_offset,
        )
        .expect("Failed to uncompress");

        assert_eq!(input_offset.position(), u64::from(encoded_len));
        assert_eq!(
            input.len(),
            output_offset.position() as usize,
            "Decoded length mismatch"
        );
        assert_eq!(input, &decoded[..input.len()], "Decoded data mismatch");

        let mut decoded: Vec<u32> = vec![0; input.len()];
        let mut input_offset = Cursor::new(0);
        let mut output_offset = Cursor::new(0);
        vb.headless_uncompress(
            &encoded,
            encoded_len,
            &mut input_offset,
            &mut decoded,
            &mut output_offset,
            input.len() as u32,
        )
        .expect("Failed to uncompress headless");
        assert_eq!(input_offset.position(), u64::from(encoded_len));
        assert_eq!(input, &decoded[..]);
    }

    fn verify_i8_roundtrip(input: &[u32]) {
        let mut vb = VariableByte::new();
        let mut encoded: Vec<i8> = vec![0; input.len() * 5];
        let mut input_offset = Cursor::new(0);
        let mut output_offset = Cursor::new(0);

        Integer::<i8>::compress(
            &mut vb,
            input,
            input.len() as u32,
            &mut input_offset,
            &mut encoded,
            &mut output_offset,
        )
        .expect("Failed to compress");

        let encoded_len = output_offset.position() as u32;
        let mut decoded: Vec<u32> = vec![0; input.len()];
        let mut input_offset = Cursor::new(0);
        let mut output_offset = Cursor::new(0);

        Integer::<i8>::uncompress(
            &mut vb,
            &encoded,
            encoded_len,
            &mut input_offset,
            &mut decoded,
            &mut output_offset,
        )
        .expect("Failed to uncompress");

        assert_eq!(input_offset.position(), u64::from(encoded_len));
        assert_eq!(
            input.len(),
            output_offset.position() as usize,
            "Decoded length mismatch"
        );
        assert_eq!(input, &decoded[..input.len()], "Decoded data mismatch");
    }

    #[test]
    fn test_empty_int_array() {
        verify_u32_roundtrip(&[]);
    }

    #[test]
    fn test_empty_byte_array() {
        verify_i8_roundtrip(&[]);
    }

    #[test]
    fn test_byte_layout() {
        let mut buf = BytesMut::new();
        put_value(&mut buf, 5);
        put_value(&mut buf, 300);
        assert_eq!(&buf[..], &[0x85, 0x2C, 0x82]);
        assert_eq!(encoded_len(5), 1);
        assert_eq!(encoded_len(300), 2);
        assert_eq!(encoded_len(u32::MAX), 5);
    }

    #[test]
    fn test_word_padding() {
        let mut vb = VariableByte::new();
        let mut out = vec![u32::MAX; 2];
        let mut outpos = Cursor::new(0);
        Integer::<u32>::compress(&mut vb, &[5], 1, &mut Cursor::new(0), &mut out, &mut outpos)
            .unwrap();
        assert_eq!(outpos.position(), 1);
        assert_eq!(out[0], 0x85);
    }

    #[test]
    fn test_single_small_value() {
        verify_u32_roundtrip(&[5]);
        verify_i8_roundtrip(&[5]);
    }

    #[test]
    fn test_single_large_value() {
        verify_u32_roundtrip(&[10_878_508]);
        verify_i8_roundtrip(&[10_878_508]);
    }

    #[test]
    fn test_boundary_values() {
        for pair in [
            [0, 127],
            [128, 16383],
            [16384, 2_097_151],
            [2_097_152, 268_435_455],
            [268_435_456, u32::MAX],
        ] {
            verify_u32_roundtrip(&pair);
            verify_i8_roundtrip(&pair);
        }
    }

    #[test]
    fn test_increasing_sequence() {
        let input: Vec<u32> = (0..1000).collect();
        verify_u32_roundtrip(&input);
        verify_i8_roundtrip(&input);
    }

    #[test]
    fn test_powers_of_two() {
        let input: Vec<u32> = (0..32).map(|i| 1u32 << i).collect();
        verify_u32_roundtrip(&input);
        verify_i8_roundtrip(&input);
    }

    #[test]
    fn test_alternating_small_large() {
        let input: Vec<u32> = (0..50)
            .map(|i| if i % 2 == 0 { 1 } else { u32::MAX })
            .collect();
        verify_u32_roundtrip(&input);
        verify_i8_roundtrip(&input);
    }

    #[test]
    fn test_random_numbers() {
        let mut rng = StdRng::seed_from_u64(42);
        let input: Vec<u32> = (0..1000).map(|_| rng.random()).collect();
        verify_u32_roundtrip(&input);
        verify_i8_roundtrip(&input);
    }

    #[test]
    fn test_headless_segments_back_to_back() {
        let mut vb = VariableByte::new();
        let first = [1u32, 200, 70_000];
        let second = [9u32, 8];
        let mut out = vec![0u32; 16];
        let mut outpos = Cursor::new(0);
        vb.headless_compress(&first, 3, &mut Cursor::new(0), &mut out, &mut outpos)
            .unwrap();
        let boundary = outpos.position();
        vb.headless_compress(&second, 2, &mut Cursor::new(0), &mut out, &mut outpos)
            .unwrap();

        let mut back = vec![0u32; 5];
        let mut inpos = Cursor::new(0);
        let mut backpos = Cursor::new(0);
        vb.headless_uncompress(&out, 0, &mut inpos, &mut back, &mut backpos, 3)
            .unwrap();
        assert_eq!(inpos.position(), boundary);
        vb.headless_uncompress(&out, 0, &mut inpos, &mut back, &mut backpos, 2)
            .unwrap();
        assert_eq!(back, [1, 200, 70_000, 9, 8]);
    }

    #[test]
    fn test_truncated_bytes() {
        let mut vb = VariableByte::new();
        let mut out = vec![0u32; 4];
        // 0x05 announces a continuation that never comes
        let err = Integer::<i8>::uncompress(
            &mut vb,
            &[0x05],
            1,
            &mut Cursor::new(0),
            &mut out,
            &mut Cursor::new(0),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::NotEnoughData { .. }));
    }

    #[test]
    fn test_fuzz_case_regression() {
        // Regression test from fuzzing: input [0x00a6002c]
        let input = vec![0x00a6002c];
        verify_u32_roundtrip(&input);
        verify_i8_roundtrip(&input);
    }
}
