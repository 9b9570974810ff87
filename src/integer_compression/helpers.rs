use crate::{CodecError, CodecResult};

/// Finds the greatest multiple of `factor` that is less than or equal to `value`.
pub fn greatest_multiple(value: u32, factor: u32) -> u32 {
    value - value % factor
}

/// Returns the number of bits needed to represent `i`.
/// Returns 0 for input 0.
pub fn bits(i: u32) -> usize {
    32 - i.leading_zeros() as usize
}

/// Bit width of the largest of `input[pos..pos + len]`.
pub fn max_bits(input: &[u32], pos: usize, len: usize) -> u32 {
    let mask = input[pos..pos + len].iter().fold(0, |acc, &v| acc | v);
    bits(mask) as u32
}

/// Bit width of the largest successive difference in `input[pos..pos + len]`,
/// the first value being taken relative to `init`.
pub fn max_diff_bits(init: u32, input: &[u32], pos: usize, len: usize) -> u32 {
    let mut mask = 0;
    let mut prev = init;
    for &v in &input[pos..pos + len] {
        mask |= v.wrapping_sub(prev);
        prev = v;
    }
    bits(mask) as u32
}

/// Number of words needed to hold `count` values of `bit` bits each.
pub fn packed_size(count: u32, bit: u32) -> u32 {
    ((u64::from(count) * u64::from(bit)).div_ceil(32)) as u32
}

/// Fails with [`CodecError::NotEnoughData`] unless `input` holds `end` elements.
pub fn ensure_input<T>(codec: &'static str, input: &[T], end: usize) -> CodecResult<()> {
    if end > input.len() {
        return Err(CodecError::NotEnoughData {
            codec,
            position: input.len(),
        });
    }
    Ok(())
}

/// Fails with [`CodecError::OutputBufferTooSmall`] unless `output` can take
/// `count` more elements starting at `start`.
pub fn ensure_output<T>(
    codec: &'static str,
    output: &[T],
    start: usize,
    count: usize,
) -> CodecResult<()> {
    if start + count > output.len() {
        return Err(CodecError::OutputBufferTooSmall {
            codec,
            needed: start + count,
            available: output.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(bits(0), 0);
        assert_eq!(bits(1), 1);
        assert_eq!(bits(255), 8);
        assert_eq!(bits(u32::MAX), 32);
        assert_eq!(max_bits(&[1, 2, 1024, 3], 0, 4), 11);
        assert_eq!(max_bits(&[1, 2, 1024, 3], 0, 2), 2);
        assert_eq!(max_diff_bits(10, &[11, 13, 13, 20], 0, 4), 3);
        // a decrease wraps around to a full-width difference
        assert_eq!(max_diff_bits(10, &[9], 0, 1), 32);
    }

    #[test]
    fn multiples_and_sizes() {
        assert_eq!(greatest_multiple(0, 32), 0);
        assert_eq!(greatest_multiple(31, 32), 0);
        assert_eq!(greatest_multiple(257, 128), 256);
        assert_eq!(packed_size(32, 5), 5);
        assert_eq!(packed_size(3, 11), 2);
        assert_eq!(packed_size(7, 0), 0);
    }

    #[test]
    fn bounds() {
        assert!(ensure_input("x", &[0u32; 4], 4).is_ok());
        assert_eq!(
            ensure_input("x", &[0u32; 4], 5),
            Err(CodecError::NotEnoughData {
                codec: "x",
                position: 4
            })
        );
        assert!(ensure_output("x", &[0u32; 4], 2, 2).is_ok());
        assert!(ensure_output("x", &[0u32; 4], 3, 2).is_err());
    }
}
