use std::fmt;
use std::io::Cursor;

use log::debug;

use crate::cursor::IncrementCursor;
use crate::integer_compression::differential::{Integrated, SkippableIntegrated};
use crate::integer_compression::helpers::{ensure_input, ensure_output};
use crate::{CodecResult, Composition, Integer};

/// [`Composition`](crate::Composition) of two integrated codecs.
///
/// Same protocol, including the zero word standing in for an empty first
/// stage. Each stage codes its share with its own delta context starting
/// at zero.
#[derive(Debug)]
pub struct IntegratedComposition<F1, F2>(Composition<F1, F2>);

impl<F1, F2> IntegratedComposition<F1, F2> {
    /// Creates a composition running `first`, then `second` on what is left.
    pub fn new(first: F1, second: F2) -> Self {
        IntegratedComposition(Composition::new(first, second))
    }
}

impl<F1: fmt::Display, F2: fmt::Display> fmt::Display for IntegratedComposition<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<F1, F2> Integrated for IntegratedComposition<F1, F2>
where
    F1: Integrated + fmt::Display,
    F2: Integrated + fmt::Display,
{
}

impl<F1, F2> Integer<u32> for IntegratedComposition<F1, F2>
where
    F1: Integrated + fmt::Display,
    F2: Integrated + fmt::Display,
{
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        self.0
            .compress(input, input_length, input_offset, output, output_offset)
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        self.0
            .uncompress(input, input_length, input_offset, output, output_offset)
    }
}

/// Headless composition of two integrated codecs sharing one delta context.
///
/// The context flows from `F1` into `F2` and out to the caller through
/// `init_value`, so the remainder is coded relative to the bulk's last value.
#[derive(Debug)]
pub struct SkippableIntegratedComposition<F1, F2> {
    first: F1,
    second: F2,
}

impl<F1, F2> SkippableIntegratedComposition<F1, F2> {
    /// Creates a composition running `first`, then `second` on what is left.
    pub fn new(first: F1, second: F2) -> Self {
        SkippableIntegratedComposition { first, second }
    }
}

impl<F1: fmt::Display, F2: fmt::Display> fmt::Display for SkippableIntegratedComposition<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.first, self.second)
    }
}

impl<F1, F2> SkippableIntegrated for SkippableIntegratedComposition<F1, F2>
where
    F1: SkippableIntegrated + fmt::Display,
    F2: SkippableIntegrated + fmt::Display,
{
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
            return Ok(());
        }
        let init = input_offset.position();
        self.first.headless_compress(
            input,
            input_length,
            input_offset,
            output,
            output_offset,
            init_value,
        )?;
        let consumed = (input_offset.position() - init) as u32;
        debug!("{}: {} took {consumed} integers", self, self.first);
        self.second.headless_compress(
            input,
            input_length - consumed,
            input_offset,
            output,
            output_offset,
            init_value,
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
        init_value: &mut u32,
    ) -> CodecResult<()> {
        if num == 0 {
            return Ok(());
        }
        let init = input_offset.position();
        let outpos_init = output_offset.position();
        self.first.headless_uncompress(
            input,
            input_length,
            input_offset,
            output,
            output_offset,
            num,
            init_value,
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
            init_value,
        )
    }
}

impl<F1, F2> Integrated for SkippableIntegratedComposition<F1, F2>
where
    F1: SkippableIntegrated + fmt::Display,
    F2: SkippableIntegrated + fmt::Display,
{
}

/// Headed form: the value count goes in front and the context starts at zero.
impl<F1, F2> Integer<u32> for SkippableIntegratedComposition<F1, F2>
where
    F1: SkippableIntegrated + fmt::Display,
    F2: SkippableIntegrated + fmt::Display,
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
        ensure_output(
            "SkippableIntegratedComposition",
            output,
            output_offset.index(),
            1,
        )?;
        output[output_offset.index()] = input_length;
        output_offset.increment();
        self.headless_compress(
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
        ensure_input(
            "SkippableIntegratedComposition",
            input,
            input_offset.index() + 1,
        )?;
        let num = input[input_offset.index()];
        input_offset.increment();
        self.headless_uncompress(
            input,
            input_length - 1,
            input_offset,
            output,
            output_offset,
            num,
            &mut 0,
        )
    }
}
