use std::io::Cursor;

use crate::CodecResult;

/// Headerless compression/decompression for concatenated streams.
///
/// Methods operate without length headers, requiring external length tracking.
/// Several headless segments can be written back to back and decoded one at
/// a time as long as the caller remembers how many integers each holds.
pub trait Skippable {
    /// Compresses integers without writing a length header.
    ///
    /// # Arguments
    /// * `input_length` - Number of integers to compress
    /// * `input_offset` - Read position cursor, advanced by the integers consumed
    /// * `output_offset` - Write position cursor, advanced by words written
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> CodecResult<()>;

    /// Decompresses integers without reading a length header.
    ///
    /// # Arguments
    /// * `input_length` - Compressed data length
    /// * `input_offset` - Read position cursor, advanced by words read
    /// * `output_offset` - Write position cursor, advanced by the integers decoded
    /// * `num` - Number of integers the matching compress call consumed
    fn headless_uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
    ) -> CodecResult<()>;
}
