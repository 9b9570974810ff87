use std::fmt;
use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecResult, Integer, Skippable};

const NAME: &str = "JustCopy";

/// Pass-through codec: the "compressed" form is the input itself.
///
/// Handy as a baseline and as a stand-in wherever a codec is required.
#[derive(Debug, Default, Clone, Copy)]
pub struct JustCopy;

impl JustCopy {
    /// Creates a new instance
    pub fn new() -> JustCopy {
        JustCopy
    }

    fn copy(
        input: &[u32],
        length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let (from, to, n) = (
            input_offset.index(),
            output_offset.index(),
            length as usize,
        );
        ensure_input(NAME, input, from + n)?;
        ensure_output(NAME, output, to, n)?;
        output[to..to + n].copy_from_slice(&input[from..from + n]);
        input_offset.add(length);
        output_offset.add(length);
        Ok(())
    }
}

impl fmt::Display for JustCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAME)
    }
}

impl Integer<u32> for JustCopy {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        Self::copy(input, input_length, input_offset, output, output_offset)
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        Self::copy(input, input_length, input_offset, output, output_offset)
    }
}

impl Skippable for JustCopy {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        Self::copy(input, input_length, input_offset, output, output_offset)
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
        Self::copy(input, num, input_offset, output, output_offset)
    }
}
