use std::fmt;
use std::io::Cursor;

use log::debug;

use crate::cursor::IncrementCursor;
use crate::integer_compression::codec::Codec;
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecResult, Integer, Skippable};

/// Chains two codecs: `F1` takes the block-aligned bulk and `F2` the rest.
///
/// When `F1` writes nothing (input shorter than one of its blocks) a single
/// zero word takes its place, which `F1` later reads back as an empty stream.
/// `F1` must therefore decode a leading zero word as "no values".
///
/// ```
/// use std::io::Cursor;
/// use intcodec::{BinaryPacking, Composition, Integer, VariableByte};
///
/// let mut codec = Composition::new(BinaryPacking::new(), VariableByte::new());
/// let input = [1u32, 2, 3, 4, 5, 6, 7];
/// let mut compressed = [0u32; 16];
/// let mut outpos = Cursor::new(0);
/// codec.compress(&input, 7, &mut Cursor::new(0), &mut compressed, &mut outpos).unwrap();
///
/// let mut decoded = [0u32; 7];
/// let len = outpos.position() as u32;
/// codec.uncompress(&compressed, len, &mut Cursor::new(0), &mut decoded, &mut Cursor::new(0)).unwrap();
/// assert_eq!(decoded, input);
/// ```
#[derive(Debug)]
pub struct Composition<F1 = Codec, F2 = Codec> {
    first: F1,
    second: F2,
}

impl<F1, F2> Composition<F1, F2> {
    /// Creates a composition running `first`, then `second` on what is left.
    pub fn new(first: F1, second: F2) -> Self {
        Composition { first, second }
    }
}

impl<F1: fmt::Display, F2: fmt::Display> fmt::Display for Composition<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.first, self.second)
    }
}

impl<F1, F2> Integer<u32> for Composition<F1, F2>
where
    F1: Integer<u32> + fmt::Display,
    F2: Integer<u32> + fmt::Display,
{
    fn compress(
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
        let inpos_init = input_offset.position();
        let outpos_init = output_offset.position();
        self.first
            .compress(input, input_length, input_offset, output, output_offset)?;
        if output_offset.position() == outpos_init {
            ensure_output("Composition", output, output_offset.index(), 1)?;
            output[output_offset.index()] = 0;
            output_offset.increment();
            debug!("{}: wrote empty marker for {}", self, self.first);
        }
        let consumed = (input_offset.position() - inpos_init) as u32;
        debug!(
            "{}: {} took {consumed} integers, {} left",
            self,
            self.first,
            input_length - consumed
        );
        self.second.compress(
            input,
            input_length - consumed,
            input_offset,
            output,
            output_offset,
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
            // Return early if there is no data to uncompress
            return Ok(());
        }
        let init = input_offset.position();
        self.first
            .uncompress(input, input_length, input_offset, output, output_offset)?;
        let consumed = (input_offset.position() - init) as u32;
        self.second.uncompress(
            input,
            input_length.saturating_sub(consumed),
            input_offset,
            output,
            output_offset,
        )
    }
}

/// Headless counterpart of [`Composition`].
///
/// No marker word is written: the caller supplies the value count when
/// decoding, so `F1` decodes its block-aligned share of it and `F2` the rest.
#[derive(Debug)]
pub struct SkippableComposition<F1, F2> {
    first: F1,
    second: F2,
}

impl<F1, F2> SkippableComposition<F1, F2> {
    /// Creates a composition running `first`, then `second` on what is left.
    pub fn new(first: F1, second: F2) -> Self {
        SkippableComposition { first, second }
    }
}

impl<F1: fmt::Display, F2: fmt::Display> fmt::Display for SkippableComposition<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.first, self.second)
    }
}

impl<F1, F2> Skippable for SkippableComposition<F1, F2>
where
    F1: Skippable + fmt::Display,
    F2: Skippable + fmt::Display,
{
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        let init = input_offset.position();
        self.first
            .headless_compress(input, input_length, input_offset, output, output_offset)?;
        let consumed = (input_offset.position() - init) as u32;
        debug!("{}: {} took {consumed} integers", self, self.first);
        self.second.headless_compress(
            input,
            input_length - consumed,
            input_offset,
            output,
            output_offset,
        )
    }

    fn headless_uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
    ) -> CodecResult<()> {
        let init = input_offset.position();
        let outpos_init = output_offset.position();
        self.first.headless_uncompress(
            input,
            input_length,
            input_offset,
            output,
            output_offset,
            num,
        )?;
        let consumed = (input_offset.position() - init) as u32;
        let produced = (output_offset.position() - outpos_init) as u32;
        self.second.headless_uncompress(
            input,
            input_length.saturating_sub(consumed),
            input_offset,
            output,
            output_offset,
            num.saturating_sub(produced),
        )
    }
}

/// Headed form of a [`SkippableComposition`]: the value count goes in front.
impl<F1, F2> Integer<u32> for SkippableComposition<F1, F2>
where
    F1: Skippable + fmt::Display,
    F2: Skippable + fmt::Display,
{
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
        ensure_output("SkippableComposition", output, output_offset.index(), 1)?;
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
        ensure_input("SkippableComposition", input, input_offset.index() + 1)?;
        let num = input[input_offset.index()];
        input_offset.increment();
        self.headless_uncompress(
            input,
            input_length - 1,
            input_offset,
            output,
            output_offset,
            num,
        )
    }
}
