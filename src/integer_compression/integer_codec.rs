use std::io::Cursor;

use crate::CodecResult;

/// Integer compression/decompression interface.
///
/// `T` is the compressed unit: `u32` words for most codecs, `i8` for the
/// byte-oriented ones. Block codecs write their output length as a header
/// before the compressed data, making the stream self-describing.
pub trait Integer<T> {
    /// Compresses `input_length` integers starting at `input_offset`.
    ///
    /// # Arguments
    /// * `input_length` - Number of integers to compress
    /// * `input_offset` - Read position cursor, advanced by the integers consumed
    /// * `output_offset` - Write position cursor, advanced by the units written
    ///
    /// Block codecs consume only the largest whole number of blocks.
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [T],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()>;

    /// Decompresses a stream written by [`Integer::compress`].
    ///
    /// # Arguments
    /// * `input_length` - Number of compressed units available
    /// * `input_offset` - Read position cursor, advanced by the units read
    /// * `output_offset` - Write position cursor, advanced by integers written
    fn uncompress(
        &mut self,
        input: &[T],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()>;
}
