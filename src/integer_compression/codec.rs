use std::fmt;
use std::io::Cursor;

use crate::{
    BinaryPacking, CodecError, CodecResult, CodecToSlice, Composition, DeltaZigzagBinaryPacking,
    DeltaZigzagVariableByte, FastPFOR, Integer, IntegratedBinaryPacking, IntegratedComposition,
    IntegratedVariableByte, JustCopy, NewPFDS16, NewPFDS9, OptPFDS16, OptPFDS9, Simple16, Simple9,
    VariableByte, XorBinaryPacking,
};

/// Type-erased wrapper for compression codecs.
///
/// Allows different codec types to be used interchangeably through a unified interface.
#[derive(Debug)]
pub enum Codec {
    /// Pass-through codec (no compression)
    JustCopy(JustCopy),
    /// [`VariableByte`] compression codec
    VariableByte(VariableByte),
    /// [`IntegratedVariableByte`] compression codec
    IntegratedVariableByte(IntegratedVariableByte),
    /// [`DeltaZigzagVariableByte`] compression codec
    DeltaZigzagVariableByte(DeltaZigzagVariableByte),
    /// [`Simple9`] compression codec
    Simple9(Simple9),
    /// [`Simple16`] compression codec
    Simple16(Simple16),
    /// [`BinaryPacking`] compression codec
    BinaryPacking(BinaryPacking),
    /// [`IntegratedBinaryPacking`] compression codec
    IntegratedBinaryPacking(IntegratedBinaryPacking),
    /// [`DeltaZigzagBinaryPacking`] compression codec
    DeltaZigzagBinaryPacking(DeltaZigzagBinaryPacking),
    /// [`XorBinaryPacking`] compression codec
    XorBinaryPacking(XorBinaryPacking),
    /// [`NewPFDS9`] compression codec
    NewPFDS9(Box<NewPFDS9>),
    /// [`NewPFDS16`] compression codec
    NewPFDS16(Box<NewPFDS16>),
    /// [`OptPFDS9`] compression codec
    OptPFDS9(Box<OptPFDS9>),
    /// [`OptPFDS16`] compression codec
    OptPFDS16(Box<OptPFDS16>),
    /// [`FastPFOR`] compression codec, either block size
    FastPFor(Box<FastPFOR>),
    /// Two codecs chained by a [`Composition`]
    Composition(Box<Composition<Codec, Codec>>),
    /// The delta-fused pair chained by an [`IntegratedComposition`]
    IntegratedComposition(Box<IntegratedComposition<IntegratedBinaryPacking, IntegratedVariableByte>>),
}

/// Expands `$body` once per variant with `$c` bound to the inner codec.
macro_rules! each_codec {
    ($codec:expr, $c:ident => $body:expr) => {
        match $codec {
            Codec::JustCopy($c) => $body,
            Codec::VariableByte($c) => $body,
            Codec::IntegratedVariableByte($c) => $body,
            Codec::DeltaZigzagVariableByte($c) => $body,
            Codec::Simple9($c) => $body,
            Codec::Simple16($c) => $body,
            Codec::BinaryPacking($c) => $body,
            Codec::IntegratedBinaryPacking($c) => $body,
            Codec::DeltaZigzagBinaryPacking($c) => $body,
            Codec::XorBinaryPacking($c) => $body,
            Codec::NewPFDS9($c) => $body,
            Codec::NewPFDS16($c) => $body,
            Codec::OptPFDS9($c) => $body,
            Codec::OptPFDS16($c) => $body,
            Codec::FastPFor($c) => $body,
            Codec::Composition($c) => $body,
            Codec::IntegratedComposition($c) => $body,
        }
    };
}

impl Codec {
    /// Wraps two codecs in a [`Composition`].
    pub fn compose(first: impl Into<Codec>, second: impl Into<Codec>) -> Codec {
        Codec::Composition(Box::new(Composition::new(first.into(), second.into())))
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_codec!(self, c => fmt::Display::fmt(c, f))
    }
}

impl Integer<u32> for Codec {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        each_codec!(self, c => c.compress(input, input_length, input_offset, output, output_offset))
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()> {
        each_codec!(self, c => c.uncompress(input, input_length, input_offset, output, output_offset))
    }
}

impl CodecToSlice<u32> for Codec {
    type Error = CodecError;

    fn compress_to_slice<'out>(
        &mut self,
        input: &[u32],
        output: &'out mut [u32],
    ) -> Result<&'out [u32], Self::Error> {
        let mut output_offset = Cursor::new(0);
        let input_length = input
            .len()
            .try_into()
            .map_err(|_| Self::Error::InvalidInputLength(input.len()))?;

        self.compress(
            input,
            input_length,
            &mut Cursor::new(0),
            output,
            &mut output_offset,
        )?;

        let written = output_offset.position() as usize;
        Ok(&output[..written])
    }

    fn decompress_to_slice<'out>(
        &mut self,
        input: &[u32],
        output: &'out mut [u32],
    ) -> Result<&'out [u32], Self::Error> {
        let mut output_offset = Cursor::new(0);
        let input_length: u32 = input
            .len()
            .try_into()
            .map_err(|_| Self::Error::InvalidInputLength(input.len()))?;

        self.uncompress(
            input,
            input_length,
            &mut Cursor::new(0),
            output,
            &mut output_offset,
        )?;

        let written = output_offset.position() as usize;
        Ok(&output[..written])
    }
}

macro_rules! codec_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Codec {
            fn from(codec: $ty) -> Self {
                Codec::$variant(codec)
            }
        }
    )*};
}

macro_rules! boxed_codec_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Codec {
            fn from(codec: $ty) -> Self {
                Codec::$variant(Box::new(codec))
            }
        }
    )*};
}

codec_from! {
    JustCopy => JustCopy,
    VariableByte => VariableByte,
    IntegratedVariableByte => IntegratedVariableByte,
    DeltaZigzagVariableByte => DeltaZigzagVariableByte,
    Simple9 => Simple9,
    Simple16 => Simple16,
    BinaryPacking => BinaryPacking,
    IntegratedBinaryPacking => IntegratedBinaryPacking,
    DeltaZigzagBinaryPacking => DeltaZigzagBinaryPacking,
    XorBinaryPacking => XorBinaryPacking,
}

boxed_codec_from! {
    NewPFDS9 => NewPFDS9,
    NewPFDS16 => NewPFDS16,
    OptPFDS9 => OptPFDS9,
    OptPFDS16 => OptPFDS16,
    FastPFOR => FastPFor,
    Composition<Codec, Codec> => Composition,
    IntegratedComposition<IntegratedBinaryPacking, IntegratedVariableByte> => IntegratedComposition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supports_compress_to_slice() {
        let data = vec![1, 2, 3, 4, 5];
        let mut rust_codec = Codec::from(VariableByte::new());
        let mut compressed = vec![0u32; data.len() * 4];

        let compressed_len = {
            let result = rust_codec
                .compress_to_slice(&data, &mut compressed)
                .unwrap();
            result.len()
        };

        let mut decompressed = vec![0u32; data.len()];
        let result = rust_codec
            .decompress_to_slice(&compressed[..compressed_len], &mut decompressed)
            .unwrap();
        assert_eq!(result, &data[..]);
    }

    #[test]
    fn nested_composition() {
        let inner = Codec::compose(FastPFOR::fastpfor128(), VariableByte::new());
        let mut codec = Codec::compose(inner, JustCopy::new());
        assert_eq!(codec.to_string(), "FastPFOR128 + VariableByte + JustCopy");

        let data: Vec<u32> = (0..300u32).map(|i| i * 11 % 1000).collect();
        let mut compressed = vec![0u32; 1024];
        let len = codec.compress_to_slice(&data, &mut compressed).unwrap().len();
        let mut decompressed = vec![0u32; 300];
        let result = codec
            .decompress_to_slice(&compressed[..len], &mut decompressed)
            .unwrap();
        assert_eq!(result, &data[..]);
    }
}
