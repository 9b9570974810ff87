#![doc = include_str!("../README.md")]

mod cursor;
mod error;
mod integer_compression;

pub use cursor::IncrementCursor;
pub use error::{CodecError, CodecResult};
pub use integer_compression::binary_packing::BinaryPacking;
pub use integer_compression::bitpacking::{
    fast_pack, fast_pack_without_mask, fast_unpack, integrated_pack, integrated_unpack, pack,
    unpack,
};
pub use integer_compression::codec::Codec;
pub use integer_compression::composition::{Composition, SkippableComposition};
pub use integer_compression::delta_zigzag_binary_packing::DeltaZigzagBinaryPacking;
pub use integer_compression::delta_zigzag_variable_byte::DeltaZigzagVariableByte;
pub use integer_compression::differential::integrated_binary_packing::IntegratedBinaryPacking;
pub use integer_compression::differential::integrated_composition::{
    IntegratedComposition, SkippableIntegratedComposition,
};
pub use integer_compression::differential::integrated_variable_byte::IntegratedVariableByte;
pub use integer_compression::differential::xor_binary_packing::XorBinaryPacking;
pub use integer_compression::differential::zigzag::{
    zigzag_decode, zigzag_encode, DeltaZigzagDecoder, DeltaZigzagEncoder,
};
pub use integer_compression::differential::{
    Delta, Integrated, IntegratedByte, SkippableIntegrated,
};
pub use integer_compression::exception_coder::ExceptionCoder;
pub use integer_compression::fastpfor::{
    FastPFOR, BLOCK_SIZE_128, BLOCK_SIZE_256, DEFAULT_PAGE_SIZE,
};
pub use integer_compression::helpers::{
    bits, greatest_multiple, max_bits, max_diff_bits, packed_size,
};
pub use integer_compression::integer_codec::Integer;
pub use integer_compression::just_copy::JustCopy;
pub use integer_compression::newpfd::{NewPFD, NewPFDS16, NewPFDS9};
pub use integer_compression::optpfd::{OptPFD, OptPFDS16, OptPFDS9};
pub use integer_compression::simple16::{Simple16, S16};
pub use integer_compression::simple9::{Simple9, S9};
pub use integer_compression::skippable_codec::Skippable;
pub use integer_compression::variable_byte::VariableByte;

/// Low-level compression interface using caller-provided buffers.
///
/// Codecs write into pre-allocated slices and return a sub-slice showing exactly
/// what was written, which allows buffer reuse across calls.
///
/// # Type Parameters
///
/// - `In`: Input data type (`u32` for the integer codecs)
/// - `Out`: Compressed output type (defaults to `In`)
///
/// # Buffer Sizing
///
/// Caller must ensure output buffers are large enough. For compression, estimate
/// `input.len() * 2 + 1024`. For decompression, size depends on the codec.
pub trait CodecToSlice<In, Out = In> {
    /// Error type returned by compression/decompression operations.
    type Error;

    /// Compresses input into output buffer, returning slice of data written.
    fn compress_to_slice<'out>(
        &mut self,
        input: &[In],
        output: &'out mut [Out],
    ) -> Result<&'out [Out], Self::Error>;

    /// Decompresses input into output buffer, returning slice of data written.
    fn decompress_to_slice<'out>(
        &mut self,
        input: &[Out],
        output: &'out mut [In],
    ) -> Result<&'out [In], Self::Error>;
}
