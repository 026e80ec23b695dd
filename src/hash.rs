//! Byte-average key hashing.
//!
//! Every byte of the key is compared with the key's average byte value. Bytes at or above
//! the average contribute a `1` bit, the rest a `0` bit, in key order. The bit pattern,
//! zero-padded to whole bytes and read as a little-endian number `raw`, is combined as
//! `raw * average + sum` and reduced modulo the bucket count.
//!
//! `raw` has one bit per key byte, so it outgrows every machine integer for keys longer
//! than 128 bytes. The reduction is therefore folded into the conversion: the result is
//! the one an arbitrary-precision computation would give, for every key length.

use std::num::NonZeroUsize;

use crate::error::{Result, TableError};

/// Intermediate values of the hash for a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDigest {
    /// Number of bytes in the key
    pub len: usize,
    /// Sum of all byte values
    pub sum: u64,
    /// `sum / len`, truncated
    pub average: u64,
    /// Bit pattern packed little-endian: bit `i` of the key is bit `i % 8` of byte `i / 8`.
    /// Padding bits are zero.
    pub pattern: Vec<u8>,
}

impl KeyDigest {
    /// Computes the digest of `key`.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyKey`] when `key` has no bytes.
    pub fn of(key: &str) -> Result<Self> {
        let bytes = key.as_bytes();
        let len = bytes.len();
        let sum = bytes.iter().fold(0_u64, |acc, &byte| acc.wrapping_add(u64::from(byte)));
        let average = sum.checked_div(len as u64).ok_or(TableError::EmptyKey)?;

        let mut pattern = vec![0_u8; len.div_ceil(8)];
        for (position, &byte) in bytes.iter().enumerate() {
            if u64::from(byte) >= average {
                if let Some(packed) = pattern.get_mut(position / 8) {
                    *packed |= 1 << (position % 8);
                }
            }
        }

        Ok(Self { len, sum, average, pattern })
    }

    /// Width of the padded bit pattern, always a multiple of 8
    #[must_use]
    pub fn padded_bits(&self) -> usize {
        self.pattern.len().saturating_mul(8)
    }

    /// Reduces `raw * average + sum` modulo `bucket_count`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(&self, bucket_count: NonZeroUsize) -> usize {
        let modulus = bucket_count.get() as u128;

        // Horner over the packed bytes, most significant first.
        let raw = self
            .pattern
            .iter()
            .rev()
            .fold(0_u128, |acc, &byte| reduce(acc.wrapping_mul(256).wrapping_add(u128::from(byte)), modulus));

        let product = reduce(raw.wrapping_mul(reduce(u128::from(self.average), modulus)), modulus);
        let combined = reduce(product.wrapping_add(u128::from(self.sum)), modulus);

        // below `bucket_count`, so it fits
        combined as usize
    }
}

/// `value % modulus` for a modulus known to be non-zero
fn reduce(value: u128, modulus: u128) -> u128 {
    value.checked_rem(modulus).unwrap_or(value)
}

/// Maps `key` to its tentative bucket index in a table of `bucket_count` buckets.
///
/// # Errors
///
/// [`TableError::EmptyKey`] when `key` has no bytes.
pub fn tentative_index(key: &str, bucket_count: NonZeroUsize) -> Result<usize> {
    Ok(KeyDigest::of(key)?.index(bucket_count))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buckets(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(KeyDigest::of(""), Err(TableError::EmptyKey));
        assert_eq!(tentative_index("", buckets(16)), Err(TableError::EmptyKey));
    }

    #[test]
    fn test_single_character() {
        let digest = KeyDigest::of("a").unwrap();
        assert_eq!(digest.len, 1);
        assert_eq!(digest.sum, 97);
        assert_eq!(digest.average, 97);
        assert_eq!(digest.pattern, vec![0b0000_0001]);
        assert_eq!(digest.padded_bits(), 8);

        // 1 * 97 + 97
        assert_eq!(tentative_index("a", buckets(1000)), Ok(194));
        assert_eq!(tentative_index("a", buckets(16)), Ok(2));
        assert_eq!(tentative_index("b", buckets(16)), Ok(4));
        assert_eq!(tentative_index("c", buckets(16)), Ok(6));
    }

    #[test]
    fn test_bits_follow_average() {
        // average of "abc" is 98: 'a' is below, 'b' and 'c' are not
        let digest = KeyDigest::of("abc").unwrap();
        assert_eq!(digest.average, 98);
        assert_eq!(digest.pattern, vec![0b0000_0110]);
        assert_eq!(tentative_index("abc", buckets(10_000)), Ok(6 * 98 + 294));

        let digest = KeyDigest::of("bac").unwrap();
        assert_eq!(digest.pattern, vec![0b0000_0101]);
        assert_eq!(tentative_index("bac", buckets(10_000)), Ok(5 * 98 + 294));
    }

    #[test]
    fn test_same_pattern_collides() {
        assert_eq!(tentative_index("ab", buckets(16)), tentative_index("ba", buckets(16)));
        assert_eq!(tentative_index("fg", buckets(8)), Ok(7));
        assert_eq!(tentative_index("gf", buckets(8)), Ok(7));
    }

    #[test]
    fn test_padding_spans_bytes() {
        // nine equal bytes: every bit set, pattern padded to 16 bits
        let digest = KeyDigest::of("zzzzzzzzz").unwrap();
        assert_eq!(digest.pattern, vec![0xff, 0x01]);
        assert_eq!(digest.padded_bits(), 16);

        let expected = (0x01ff * 122 + 9 * 122) % 4099;
        assert_eq!(tentative_index("zzzzzzzzz", buckets(4099)), Ok(expected));
    }

    #[test]
    fn test_long_keys_use_every_bit() {
        // 200 bytes: the pattern is far wider than any machine integer
        let mut long = "b".repeat(199);
        long.push('A');
        let mut flipped = "b".repeat(199);
        flipped.insert(0, 'A');

        let digest = KeyDigest::of(&long).unwrap();
        assert_eq!(digest.average, 97);
        assert_eq!(digest.pattern.len(), 25);
        assert_eq!(digest.pattern.first(), Some(&0xff));
        assert_eq!(digest.pattern.last(), Some(&0x7f));

        let digest = KeyDigest::of(&flipped).unwrap();
        assert_eq!(digest.pattern.first(), Some(&0xfe));
        assert_eq!(digest.pattern.last(), Some(&0xff));

        // 256 = 1 (mod 255), so raw reduces to the sum of its bytes
        // long:    (24 * 255 + 127) * 97 + 19567 = 11 (mod 255)
        // flipped: (254 + 24 * 255) * 97 + 19567 = 90 (mod 255)
        assert_eq!(tentative_index(&long, buckets(255)), Ok(11));
        assert_eq!(tentative_index(&flipped, buckets(255)), Ok(90));
    }

    #[test]
    fn test_single_bucket() {
        assert_eq!(tentative_index("anything", buckets(1)), Ok(0));
    }

    proptest! {
        #[test]
        fn test_deterministic(key in "\\PC{1,300}", count in 1_usize..5_000_000) {
            let first = tentative_index(&key, buckets(count)).unwrap();
            let second = tentative_index(&key, buckets(count)).unwrap();
            prop_assert_eq!(first, second);
            prop_assert!(first < count);
        }

        #[test]
        fn test_matches_narrow_arithmetic(key in "[ -~]{1,60}", count in 1_u64..1_000_000) {
            // up to 60 bits the plain u128 formula cannot overflow
            let digest = KeyDigest::of(&key).unwrap();
            let raw = digest
                .pattern
                .iter()
                .rev()
                .fold(0_u128, |acc, &byte| acc * 256 + u128::from(byte));
            let expected = (raw * u128::from(digest.average) + u128::from(digest.sum)) % u128::from(count);
            let index = tentative_index(&key, buckets(usize::try_from(count).unwrap())).unwrap();
            prop_assert_eq!(index as u128, expected);
        }
    }
}
