//! Fixed-width bit packing.
//!
//! A window of 32 values packed at `bit` bits occupies exactly `bit` words.
//! Values are concatenated starting from the least significant bit of the
//! first word, so a run of windows forms one continuous little-endian bit
//! stream. [`pack`] and [`unpack`] extend the same layout to any value count.

use crate::integer_compression::helpers::packed_size;

macro_rules! dispatch_width {
    (@arms $bit:expr, $func:ident $args:tt, $($b:literal)*) => {
        match $bit {
            $( $b => $func::<$b> $args, )*
            other => panic!("bit width {other} is out of range 0..=32"),
        }
    };
    ($bit:expr, $func:ident $args:tt) => {
        dispatch_width!(@arms $bit, $func $args,
            1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
            17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32)
    };
}

const fn low_mask(bit: u32) -> u32 {
    if bit >= 32 {
        u32::MAX
    } else {
        (1 << bit) - 1
    }
}

#[inline]
fn pack_window<const BIT: u32>(input: &[u32], output: &mut [u32], masked: bool) {
    let input = &input[..32];
    let output = &mut output[..BIT as usize];
    output.fill(0);
    for (i, &raw) in input.iter().enumerate() {
        let v = if masked { raw & low_mask(BIT) } else { raw };
        let pos = i as u32 * BIT;
        let word = (pos / 32) as usize;
        let shift = pos % 32;
        output[word] |= v << shift;
        if shift + BIT > 32 {
            output[word + 1] |= v >> (32 - shift);
        }
    }
}

#[inline]
fn pack_window_masked<const BIT: u32>(input: &[u32], output: &mut [u32]) {
    pack_window::<BIT>(input, output, true);
}

#[inline]
fn pack_window_unmasked<const BIT: u32>(input: &[u32], output: &mut [u32]) {
    pack_window::<BIT>(input, output, false);
}

#[inline]
fn unpack_window<const BIT: u32>(input: &[u32], output: &mut [u32]) {
    let input = &input[..BIT as usize];
    let output = &mut output[..32];
    for (i, out) in output.iter_mut().enumerate() {
        let pos = i as u32 * BIT;
        let word = (pos / 32) as usize;
        let shift = pos % 32;
        let mut v = input[word] >> shift;
        if shift + BIT > 32 {
            v |= input[word + 1] << (32 - shift);
        }
        *out = v & low_mask(BIT);
    }
}

/// Packs 32 values from `input[inpos..]` into `bit` words at `output[outpos..]`.
///
/// Bits above `bit` are masked off. A width of 0 writes nothing.
///
/// # Panics
/// Panics if `bit > 32` or a slice is too short for the window.
pub fn fast_pack(input: &[u32], inpos: usize, output: &mut [u32], outpos: usize, bit: u8) {
    if bit == 0 {
        return;
    }
    dispatch_width!(
        u32::from(bit),
        pack_window_masked(&input[inpos..], &mut output[outpos..])
    );
}

/// Like [`fast_pack`] but trusts the caller that every value fits in `bit` bits.
/// Wider values corrupt their neighbours.
pub fn fast_pack_without_mask(
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    bit: u8,
) {
    if bit == 0 {
        return;
    }
    dispatch_width!(
        u32::from(bit),
        pack_window_unmasked(&input[inpos..], &mut output[outpos..])
    );
}

/// Unpacks 32 values of `bit` bits from `input[inpos..]` into `output[outpos..]`.
///
/// A width of 0 yields 32 zeros and reads nothing.
pub fn fast_unpack(input: &[u32], inpos: usize, output: &mut [u32], outpos: usize, bit: u8) {
    if bit == 0 {
        output[outpos..outpos + 32].fill(0);
        return;
    }
    dispatch_width!(
        u32::from(bit),
        unpack_window(&input[inpos..], &mut output[outpos..])
    );
}

/// Packs `count` values, which need not be a multiple of 32, and returns the
/// number of words written (`ceil(count * bit / 32)`).
pub fn pack(
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    count: usize,
    bit: u8,
) -> usize {
    let width = usize::from(bit);
    let full = count / 32 * 32;
    let mut out = outpos;
    for k in (0..full).step_by(32) {
        fast_pack(input, inpos + k, output, out, bit);
        out += width;
    }
    let rest = count - full;
    if rest > 0 && bit > 0 {
        let words = packed_size(rest as u32, u32::from(bit)) as usize;
        let tail = &mut output[out..out + words];
        tail.fill(0);
        let mask = low_mask(u32::from(bit));
        for (i, &raw) in input[inpos + full..inpos + count].iter().enumerate() {
            let v = raw & mask;
            let pos = i * width;
            let (word, shift) = (pos / 32, (pos % 32) as u32);
            tail[word] |= v << shift;
            if shift + u32::from(bit) > 32 {
                tail[word + 1] |= v >> (32 - shift);
            }
        }
        out += words;
    }
    out - outpos
}

/// Inverse of [`pack`]; returns the number of words consumed.
pub fn unpack(
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    count: usize,
    bit: u8,
) -> usize {
    let width = usize::from(bit);
    let full = count / 32 * 32;
    let mut inp = inpos;
    for k in (0..full).step_by(32) {
        fast_unpack(input, inp, output, outpos + k, bit);
        inp += width;
    }
    let rest = count - full;
    if rest > 0 {
        let tail_out = &mut output[outpos + full..outpos + count];
        if bit == 0 {
            tail_out.fill(0);
            return inp - inpos;
        }
        let words = packed_size(rest as u32, u32::from(bit)) as usize;
        let tail = &input[inp..inp + words];
        let mask = low_mask(u32::from(bit));
        for (i, out) in tail_out.iter_mut().enumerate() {
            let pos = i * width;
            let (word, shift) = (pos / 32, (pos % 32) as u32);
            let mut v = tail[word] >> shift;
            if shift + u32::from(bit) > 32 {
                v |= tail[word + 1] << (32 - shift);
            }
            *out = v & mask;
        }
        inp += words;
    }
    inp - inpos
}

/// Packs the successive differences of 32 values, the first taken against `init`.
pub fn integrated_pack(
    init: u32,
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    bit: u8,
) {
    let mut deltas = [0u32; 32];
    let mut prev = init;
    for (d, &v) in deltas.iter_mut().zip(&input[inpos..inpos + 32]) {
        *d = v.wrapping_sub(prev);
        prev = v;
    }
    fast_pack(&deltas, 0, output, outpos, bit);
}

/// Unpacks 32 differences and accumulates them starting from `init`.
pub fn integrated_unpack(
    init: u32,
    input: &[u32],
    inpos: usize,
    output: &mut [u32],
    outpos: usize,
    bit: u8,
) {
    fast_unpack(input, inpos, output, outpos, bit);
    let mut prev = init;
    for v in &mut output[outpos..outpos + 32] {
        prev = prev.wrapping_add(*v);
        *v = prev;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng as _, SeedableRng};

    use super::*;

    fn random_window(rng: &mut StdRng, bit: u8) -> Vec<u32> {
        (0..32)
            .map(|_| rng.random::<u32>() & low_mask(u32::from(bit)))
            .collect()
    }

    #[test]
    fn every_width_round_trips() {
        let mut rng = StdRng::seed_from_u64(7);
        for bit in 0..=32u8 {
            let data = random_window(&mut rng, bit);
            let mut packed = vec![0u32; 33];
            fast_pack(&data, 0, &mut packed, 1, bit);
            let mut unpacked = vec![u32::MAX; 40];
            fast_unpack(&packed, 1, &mut unpacked, 4, bit);
            assert_eq!(&unpacked[4..36], &data[..], "width {bit}");
        }
    }

    #[test]
    fn mask_drops_high_bits() {
        let data = vec![0xFFFF_FFFFu32; 32];
        let mut packed = vec![0u32; 3];
        fast_pack(&data, 0, &mut packed, 0, 3);
        assert_eq!(packed, vec![u32::MAX; 3]);
        let mut unpacked = vec![0u32; 32];
        fast_unpack(&packed, 0, &mut unpacked, 0, 3);
        assert!(unpacked.iter().all(|&v| v == 7));
    }

    #[test]
    fn unmasked_matches_masked_for_fitting_values() {
        let mut rng = StdRng::seed_from_u64(11);
        for bit in 1..=32u8 {
            let data = random_window(&mut rng, bit);
            let mut a = vec![0u32; 32];
            let mut b = vec![1u32; 32];
            fast_pack(&data, 0, &mut a, 0, bit);
            fast_pack_without_mask(&data, 0, &mut b, 0, bit);
            assert_eq!(&a[..usize::from(bit)], &b[..usize::from(bit)]);
        }
    }

    #[test]
    fn bit_order_is_little_endian() {
        let mut data = vec![0u32; 32];
        data[0] = 1;
        data[1] = 2;
        let mut packed = vec![0u32; 2];
        fast_pack(&data, 0, &mut packed, 0, 2);
        assert_eq!(packed[0], 0b1001);
        assert_eq!(packed[1], 0);
    }

    #[test]
    fn arbitrary_counts_match_window_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        for bit in [0u8, 1, 5, 13, 31, 32] {
            for count in [0usize, 1, 7, 31, 32, 33, 100] {
                let data: Vec<u32> = (0..count)
                    .map(|_| rng.random::<u32>() & low_mask(u32::from(bit)))
                    .collect();
                let mut packed = vec![0u32; 200];
                let written = pack(&data, 0, &mut packed, 2, count, bit);
                assert_eq!(
                    written,
                    packed_size(count as u32, u32::from(bit)) as usize
                );
                let mut unpacked = vec![0u32; count];
                let read = unpack(&packed, 2, &mut unpacked, 0, count, bit);
                assert_eq!(read, written);
                assert_eq!(unpacked, data, "width {bit} count {count}");
            }
        }
    }

    #[test]
    fn partial_tail_is_prefix_of_full_window() {
        let data: Vec<u32> = (0..32).collect();
        let mut window = vec![0u32; 5];
        fast_pack(&data, 0, &mut window, 0, 5);
        let mut partial = vec![0u32; 5];
        let written = pack(&data, 0, &mut partial, 0, 20, 5);
        assert_eq!(written, 4);
        // 20 values span 100 bits, the first three words are shared
        assert_eq!(&partial[..3], &window[..3]);
    }

    #[test]
    fn integrated_windows_round_trip() {
        let data: Vec<u32> = (0..32).map(|i| 1000 + i * i).collect();
        let mut packed = vec![0u32; 32];
        integrated_pack(1000, &data, 0, &mut packed, 0, 7);
        let mut unpacked = vec![0u32; 32];
        integrated_unpack(1000, &packed, 0, &mut unpacked, 0, 7);
        assert_eq!(unpacked, data);
    }
}
