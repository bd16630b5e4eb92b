//! Elias gamma coding for the positive integers that appear throughout the
//! wire format: the BWT length, the distinct-symbol count, every Huffman
//! codeword length, and every RLE run length.
//!
//! The encoding is a chain of length-prefixes: write the value in plain
//! binary, then repeatedly prepend the bit-length of the previous segment
//! (with its leading bit flipped to `0` to mark "more to come"), until the
//! prepended segment is the single bit `1` would otherwise need flipping
//! from nothing, i.e. a segment of length `1`. See `SPEC_FULL.md` §4.3.

use bit_vec::BitVec;

use crate::bits::{BitReader, BitWriter};
use crate::Error;

fn bit_length(x: u64) -> usize {
    if x == 0 {
        1
    } else {
        (64 - x.leading_zeros()) as usize
    }
}

fn to_bits(x: u64, width: usize) -> BitVec {
    let mut bits = BitVec::new();
    for i in (0..width).rev() {
        bits.push((x >> i) & 1 == 1);
    }
    bits
}

/// Build the Elias gamma code for `k` as a standalone bit string.
///
/// # Panics
/// Panics if `k == 0`; the codec never encodes a zero-valued length.
pub fn encode(k: u64) -> BitVec {
    assert!(k >= 1, "elias gamma is only defined for positive integers");
    let mut code = to_bits(k, bit_length(k));
    let mut length = code.len();
    while length != 1 {
        length -= 1; // length is now l' = l - 1
        let seg_len = bit_length(length as u64);
        let mut seg = to_bits(length as u64, seg_len);
        seg.set(0, false);
        seg.extend(code);
        code = seg;
        length = seg_len;
    }
    code
}

/// Encode `k` and append it directly to `out`.
pub fn encode_into(k: u64, out: &mut BitWriter) {
    out.push_bitvec(&encode(k));
}

/// Decode one Elias gamma value from `reader`, advancing its cursor past
/// the encoded bits.
pub fn decode(reader: &mut BitReader) -> Result<u64, Error> {
    let mut length: usize = 1;
    loop {
        if length > 64 {
            return Err(Error::MalformedHeader("elias gamma length prefix exceeds 64 bits"));
        }
        let buf = reader.read_bits(length)?;
        let first_bit_is_one = (buf >> (length - 1)) & 1 == 1;
        if first_bit_is_one {
            return Ok(buf);
        }
        // flip the leading zero to a one and reinterpret as the next length
        let flipped = buf | (1 << (length - 1));
        length = flipped as usize + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(k: u64) {
        let bits = encode(k);
        let bytes = bits.to_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(decode(&mut r).unwrap(), k, "roundtrip failed for {k}");
        assert_eq!(r.pos(), bits.len(), "decode should consume exactly the encoded bits for {k}");
    }

    #[test]
    fn known_codes() {
        // k=1 is the base case: single bit `1`.
        assert_eq!(encode(1).to_bytes(), BitVec::from_elem(1, true).to_bytes());
        roundtrip(1);
    }

    #[test]
    fn round_trip_small_values() {
        for k in 1..=300u64 {
            roundtrip(k);
        }
    }

    #[test]
    fn round_trip_large_values() {
        for k in [1_000u64, 65_535, 1_000_000, u32::MAX as u64, 1 << 40] {
            roundtrip(k);
        }
    }

    #[test]
    fn length_is_logarithmic_with_bounded_overhead() {
        // Each length-prefix round at least doubles how large a value the
        // next prefix can describe, so the chain has O(log log k) rounds;
        // the spec states the total length as `1 + 2*floor(log2 k) +
        // O(log log k)` bits, not an exact closed form, so this bounds it
        // generously rather than pinning a formula.
        for k in [1u64, 2, 4, 8, 255, 1 << 20] {
            let l = bit_length(k);
            let bound = 2 * l + 4 * bit_length(l as u64) + 4;
            let len = encode(k).len();
            assert!(len >= l, "k={k} len={len} shorter than its own value");
            assert!(len <= bound, "k={k} len={len} exceeds bound {bound}");
        }
    }
}
