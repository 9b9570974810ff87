use crate::CodecResult;

/// Secondary coder for the exception lists of the patched codecs.
///
/// Works on plain slices: the caller owns framing and only needs the number
/// of words produced or the number of values to restore.
pub trait ExceptionCoder {
    /// Name shown by the patched codec that embeds this coder.
    const NAME: &'static str;

    /// Compresses all of `input` into `output`, returning the words written.
    fn compress(input: &[u32], output: &mut [u32]) -> CodecResult<usize>;

    /// Number of words [`ExceptionCoder::compress`] would write for `input`.
    fn estimate_compress(input: &[u32]) -> CodecResult<usize>;

    /// Decodes `count` values from `input` into `output`, returning the words read.
    fn uncompress(input: &[u32], output: &mut [u32], count: usize) -> CodecResult<usize>;
}
