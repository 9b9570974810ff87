use thiserror::Error;

/// Alias for the result type of codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur when using the codecs.
///
/// Every variant that originates inside a codec carries the codec's name
/// and the offending position so a failing stream can be diagnosed.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A value does not fit in the widest layout the codec supports
    #[error("{codec}: value {value} at position {position} needs more than {max_bits} bits")]
    ValueTooLarge {
        codec: &'static str,
        position: usize,
        value: u32,
        max_bits: u32,
    },

    /// The compressed stream ended before the codec finished decoding
    #[error("{codec}: not enough data in the input buffer at position {position}")]
    NotEnoughData { codec: &'static str, position: usize },

    /// The caller-provided output buffer cannot hold the result
    #[error("{codec}: output buffer too small, need {needed} but only {available} available")]
    OutputBufferTooSmall {
        codec: &'static str,
        needed: usize,
        available: usize,
    },

    /// A block header names a bit width outside 0..=32
    #[error("{codec}: invalid bit width {bits} at position {position}")]
    InvalidBitWidth {
        codec: &'static str,
        position: usize,
        bits: u32,
    },

    /// A selector-coded word carries an unknown selector
    #[error("{codec}: invalid selector {selector} at position {position}")]
    InvalidSelector {
        codec: &'static str,
        position: usize,
        selector: u32,
    },

    /// The stream decodes to something no encoder produces
    #[error("{codec}: corrupt stream at position {position}")]
    CorruptStream { codec: &'static str, position: usize },

    /// The number of decoded values differs from the recorded length
    #[error("{codec}: expected {expected} values, decoded {actual}")]
    LengthMismatch {
        codec: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid input length
    #[error("Invalid input length {0}")]
    InvalidInputLength(usize),
}
