use std::fmt;
use std::io::Cursor;

use bytes::BytesMut;

use crate::cursor::IncrementCursor;
use crate::integer_compression::differential::{Integrated, IntegratedByte, SkippableIntegrated};
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::integer_compression::variable_byte::{flush_words, put_value, ByteDecoder};
use crate::{CodecError, CodecResult, Integer};

const NAME: &str = "IntegratedVariableByte";

/// [`VariableByte`](crate::VariableByte) over the differences of sorted input.
///
/// Same byte layout as `VariableByte`; each value is replaced by its
/// wrapping difference to the previous one before encoding. Also the usual
/// second stage of an
/// [`IntegratedComposition`](crate::IntegratedComposition).
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegratedVariableByte;

impl IntegratedVariableByte {
    /// Creates a new instance
    pub fn new() -> IntegratedVariableByte {
        IntegratedVariableByte
    }
}

impl fmt::Display for IntegratedVariableByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl SkippableIntegrated for IntegratedVariableByte {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        init_value: &mut u32,
    ) -> CodecResult<()> {
        if input_length == 0 {
            // Return early if there is no data to compress
            return Ok(());
        }
        let start = input_offset.index();
        ensure_input(NAME, input, start + input_length as usize)?;
        let mut buf = BytesMut::with_capacity(input_length as usize * 5 + 3);
        let mut prev = *init_value;
        for &val in &input[start..start + input_length as usize] {
            put_value(&mut buf, val.wrapping_sub(prev));
            prev = val;
        }
        flush_words(NAME, &mut buf, output, output_offset)?;
        *init_value = prev;
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
        init_value: &mut u32,
    ) -> CodecResult<()> {
        let mut tmp_outpos = output_offset.index();
        let final_out = tmp_outpos + num as usize;
        ensure_output(NAME, output, tmp_outpos, num as usize)?;
        let mut p = input_offset.index();
        let mut s = 0;
        let mut prev = *init_value;
        let mut decoder = ByteDecoder::default();
        while tmp_outpos < final_out {
            ensure_input(NAME, input, p + 1)?;
            let c = (input[p] >> s) as u8;
            s += 8;
            if s == 32 {
                s = 0;
                p += 1;
            }
            if let Some(delta) = decoder.push(c) {
                prev = prev.wrapping_add(delta);
                output[tmp_outpos] = prev;
                tmp_outpos += 1;
            }
        }
        *init_value = prev;
        output_offset.set_position(tmp_outpos as u64);
        input_offset.set_position((p + usize::from(s != 0)) as u64);
        Ok(())
    }
}

impl Integrated for IntegratedVariableByte {}

impl Integer<u32> for IntegratedVariableByte {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        SkippableIntegrated::headless_compress(
            self,
            input,
            input_length,
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
            return Ok(());
        }
        let start = input_offset.index();
        ensure_input(NAME, input, start + input_length as usize)?;
        let mut tmp_outpos = output_offset.index();
        let mut prev = 0u32;
        let mut decoder = ByteDecoder::default();
        for &word in &input[start..start + input_length as usize] {
            for c in word.to_le_bytes() {
                if let Some(delta) = decoder.push(c) {
                    ensure_output(NAME, output, tmp_outpos, 1)?;
                    prev = prev.wrapping_add(delta);
                    output[tmp_outpos] = prev;
                    tmp_outpos += 1;
                }
            }
        }
        output_offset.set_position(tmp_outpos as u64);
        input_offset.add(input_length);
        Ok(())
    }
}

impl IntegratedByte for IntegratedVariableByte {}

impl Integer<i8> for IntegratedVariableByte {
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
        let mut buf = BytesMut::with_capacity(values.len() * 5);
        let mut prev = 0u32;
        for &val in values {
            put_value(&mut buf, val.wrapping_sub(prev));
            prev = val;
        }
        let needed = buf.len();
        let out_start = output_offset.index();
        ensure_output(NAME, output, out_start, needed)?;
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
        let mut prev = 0u32;
        let mut decoder = ByteDecoder::default();
        while p < final_p {
            let c = input[p] as u8;
            p += 1;
            if let Some(delta) = decoder.push(c) {
                ensure_output(NAME, output, tmp_outpos, 1)?;
                prev = prev.wrapping_add(delta);
                output[tmp_outpos] = prev;
                tmp_outpos += 1;
            }
        }
        if decoder.is_pending() {
            return Err(CodecError::NotEnoughData {
                codec: NAME,
                position: p,
            });
        }
        output_offset.set_position(tmp_outpos as u64);
        input_offset.set_position(p as u64);
        Ok(())
    }
}
