//! Hash-index derivation by double hashing
//!
//! Hashing a value `k` times with `k` different seeds through one weak hash
//! gives correlated positions and a false-positive rate above the
//! theoretical one. Instead the value is hashed twice, `h1 = hash(0, value)`
//! and `h2 = hash(1, value)`, and the positions are
//!
//! ```text
//! position_i = (h1 + i * h2) mod m,   i in 0..k
//! ```
//!
//! All arithmetic is on `u64`. Both hashes are reduced modulo `m` first and
//! each step adds the reduced stride without overflowing, so the sequence is
//! exactly the one above evaluated over the integers.

use crate::hash::HashStrategy;

pub(crate) const H1_SEED: u64 = 0;
pub(crate) const H2_SEED: u64 = 1;

/// The `k` bit positions of one value, in derivation order
#[derive(Debug, Clone)]
pub struct Indices {
    next: u64,
    stride: u64,
    modulus: u64,
    remaining: usize,
}

impl Indices {
    /// Derive positions in `[0, capacity_bits)` for already encoded bytes
    ///
    /// `capacity_bits` and `hash_count` are validated by the filter; a zero
    /// `capacity_bits` is treated as one to keep the reduction total.
    pub fn derive<S>(strategy: &S, bytes: &[u8], hash_count: usize, capacity_bits: usize) -> Self
    where
        S: HashStrategy + ?Sized,
    {
        let h1 = strategy.hash(H1_SEED, bytes);
        let h2 = strategy.hash(H2_SEED, bytes);
        Self::from_hashes(h1, h2, hash_count, capacity_bits)
    }

    /// Build the sequence from two precomputed hashes
    pub fn from_hashes(h1: u64, h2: u64, hash_count: usize, capacity_bits: usize) -> Self {
        let modulus = (capacity_bits as u64).max(1);
        let mut stride = h2 % modulus;

        // A zero stride would collapse every position onto h1
        if stride == 0 && modulus > 1 {
            stride = 1;
        }

        Indices {
            next: h1 % modulus,
            stride,
            modulus,
            remaining: hash_count,
        }
    }
}

impl Iterator for Indices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next;
        // next = (current + stride) mod modulus, both operands < modulus
        let headroom = self.modulus - self.stride;
        self.next = if current >= headroom {
            current - headroom
        } else {
            current + self.stride
        };

        Some(current as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::SipStrategy;

    /// Returns fixed hashes so positions can be checked by hand
    struct FixedHashes(u64, u64);

    impl HashStrategy for FixedHashes {
        fn hash(&self, seed: u64, _bytes: &[u8]) -> u64 {
            if seed == H1_SEED {
                self.0
            } else {
                self.1
            }
        }

        fn name(&self) -> String {
            "fixed".to_string()
        }
    }

    fn naive(h1: u64, h2: u64, k: usize, m: usize) -> Vec<usize> {
        (0..k as u128)
            .map(|i| ((h1 as u128 + i * h2 as u128) % m as u128) as usize)
            .collect()
    }

    #[test]
    fn test_matches_double_hashing_formula() {
        let indices: Vec<usize> = Indices::derive(&FixedHashes(17, 5), b"x", 4, 100).collect();
        assert_eq!(indices, vec![17, 22, 27, 32]);

        let wrapped: Vec<usize> = Indices::from_hashes(95, 10, 3, 100).collect();
        assert_eq!(wrapped, vec![95, 5, 15]);
    }

    #[test]
    fn test_large_hashes_stay_unsigned() {
        // Values that would be negative as i64 must still reduce into [0, m)
        let h1 = u64::MAX;
        let h2 = u64::MAX - 12345;
        for m in [1000usize, 1023, 1 << 20, usize::MAX] {
            let indices: Vec<usize> = Indices::from_hashes(h1, h2, 8, m).collect();
            assert_eq!(indices, naive(h1, h2, 8, m));
            assert!(indices.iter().all(|&p| p < m));
        }
    }

    #[test]
    fn test_zero_stride_is_replaced() {
        let indices: Vec<usize> = Indices::from_hashes(7, 300, 4, 100).collect();
        assert_eq!(indices, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_single_bit_filter() {
        let indices: Vec<usize> = Indices::from_hashes(12, 34, 3, 1).collect();
        assert_eq!(indices, vec![0, 0, 0]);
    }

    #[test]
    fn test_exact_count() {
        let indices = Indices::derive(&SipStrategy::default(), b"value", 7, 10_000);
        assert_eq!(indices.len(), 7);

        let positions: Vec<usize> = indices.collect();
        assert_eq!(positions.len(), 7);
        assert!(positions.iter().all(|&p| p < 10_000));

        let unique: std::collections::HashSet<_> = positions.iter().collect();
        assert!(unique.len() >= 3, "positions should be spread out");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let strategy = SipStrategy::default();
        let first: Vec<usize> = Indices::derive(&strategy, b"Hello, world", 4, 1000).collect();
        let second: Vec<usize> = Indices::derive(&strategy, b"Hello, world", 4, 1000).collect();
        assert_eq!(first, second);
    }
}
