//! Filter configuration and validation
//!
//! A [`FilterConfig`] is the validated `(m, k)` pair a filter is built from.
//! The default is a sizing recommendation for one million elements at a 1%
//! false-positive rate, about 1.2 MB of bits, rather than the largest bit
//! vector the platform could address.

use crate::params::recommended_parameters;
use crate::{BloomError, Result};

/// Hash count used when only the bit count is given
pub const DEFAULT_HASH_COUNT: usize = 4;

/// Element count the default configuration is sized for
pub const DEFAULT_EXPECTED_ELEMENTS: usize = 1_000_000;

/// False-positive rate the default configuration is sized for
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Bloom filter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// Number of addressable bits (m)
    pub capacity_bits: usize,
    /// Number of positions derived per value (k)
    pub hash_count: usize,
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(capacity_bits: usize, hash_count: usize) -> Result<Self> {
        let config = FilterConfig {
            capacity_bits,
            hash_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// `capacity_bits` bits with [`DEFAULT_HASH_COUNT`] positions per value
    pub fn with_capacity_bits(capacity_bits: usize) -> Result<Self> {
        Self::new(capacity_bits, DEFAULT_HASH_COUNT)
    }

    /// Size for `expected_elements` values at `target_fpr`
    pub fn for_expected(expected_elements: usize, target_fpr: f64) -> Result<Self> {
        let params = recommended_parameters(expected_elements, target_fpr)?;
        Self::new(params.capacity_bits, params.hash_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity_bits == 0 {
            return Err(BloomError::InvalidParameter(
                "Bit count must be > 0".to_string(),
            ));
        }
        if self.hash_count == 0 {
            return Err(BloomError::InvalidParameter(
                "Number of hashes must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of the bit vector in bytes
    pub fn memory_bytes(&self) -> usize {
        self.capacity_bits / 8 + usize::from(self.capacity_bits % 8 != 0)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        // 1M elements at 1%: m = 9_585_059, k = 7
        FilterConfig {
            capacity_bits: 9_585_059,
            hash_count: 7,
        }
    }
}
