use std::fmt;
use std::io::Cursor;

use bytes::{Buf as _, BufMut as _, BytesMut};

use crate::cursor::IncrementCursor;
use crate::integer_compression::differential::zigzag::{DeltaZigzagDecoder, DeltaZigzagEncoder};
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecResult, Integer};

const NAME: &str = "DeltaZigzagVariableByte";

/// Variable byte coding of zigzag-coded differences.
///
/// Unlike [`VariableByte`](crate::VariableByte) the groups are written most
/// significant first, every byte but the last of a value carries `0x80`,
/// and bytes fill words in big-endian order. Padding bytes are `0x80`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeltaZigzagVariableByte;

impl DeltaZigzagVariableByte {
    /// Creates a new instance
    pub fn new() -> DeltaZigzagVariableByte {
        DeltaZigzagVariableByte
    }
}

impl fmt::Display for DeltaZigzagVariableByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Integer<u32> for DeltaZigzagVariableByte {
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
        let start = input_offset.index();
        ensure_input(NAME, input, start + input_length as usize)?;
        let mut buf = BytesMut::with_capacity(input_length as usize * 5 + 3);
        let mut ctx = DeltaZigzagEncoder::new(0);
        for &v in &input[start..start + input_length as usize] {
            let n = ctx.encode_int(v);
            let zeros = n.leading_zeros();
            for (limit, shift) in [(4, 28), (11, 21), (18, 14), (25, 7)] {
                if zeros < limit {
                    buf.put_u8(((n >> shift) & 0x7F) as u8 | 0x80);
                }
            }
            buf.put_u8((n & 0x7F) as u8);
        }
        while buf.len() % 4 != 0 {
            buf.put_u8(0x80);
        }
        let words = buf.len() / 4;
        ensure_output(NAME, output, output_offset.index(), words)?;
        for it in output.iter_mut().skip(output_offset.index()).take(words) {
            *it = buf.get_u32();
        }
        input_offset.add(input_length);
        output_offset.add(words as u32);
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
        let start = input_offset.index();
        let end = start + input_length as usize;
        ensure_input(NAME, input, end)?;
        let mut ctx = DeltaZigzagDecoder::new(0);
        let mut op = output_offset.index();
        let mut acc = 0u32;
        for &word in &input[start..end] {
            for n in word.to_be_bytes() {
                acc = (acc << 7) + u32::from(n & 0x7F);
                if n & 0x80 == 0 {
                    ensure_output(NAME, output, op, 1)?;
                    output[op] = ctx.decode_int(acc);
                    op += 1;
                    acc = 0;
                }
            }
        }
        output_offset.set_position(op as u64);
        input_offset.set_position(end as u64);
        Ok(())
    }
}
