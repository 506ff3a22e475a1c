//! Standard Bloom filter implementation
//!
//! A space-efficient probabilistic data structure for membership testing.
//! Bits are only ever set, never cleared, so once `contains(v)` is true it
//! stays true for the lifetime of the filter.

use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::builder::BloomBuilder;
use crate::config::FilterConfig;
use crate::hash::{HashKey, HashStrategy, SipStrategy};
use crate::index::Indices;
use crate::params::false_positive_rate;
use crate::storage::{AtomicBits, BitStore, PackedBits};
use crate::{BloomError, Result};

/// A Bloom filter over values of type `T`
///
/// `S` is the hash strategy and `B` the bit storage backend. The defaults are
/// keyed SipHash and a packed bit vector.
///
/// Not safe for unsynchronized concurrent mutation with the default backend;
/// wrap it in a lock, or use [`AtomicBloomFilter`] for lock-free inserts.
pub struct BloomFilter<T: ?Sized, S = SipStrategy, B = PackedBits> {
    /// Bit array storing the filter data
    bits: B,
    /// Positions derived per value (k)
    hash_count: usize,
    strategy: S,
    _marker: PhantomData<fn(&T)>,
}

/// Bloom filter whose bits can be set concurrently through `&self`
pub type AtomicBloomFilter<T, S = SipStrategy> = BloomFilter<T, S, AtomicBits>;

impl<T: HashKey + ?Sized> BloomFilter<T> {
    /// Create a Bloom filter with `capacity_bits` bits and `hash_count`
    /// positions per value
    pub fn new(capacity_bits: usize, hash_count: usize) -> Result<Self> {
        Self::with_strategy(capacity_bits, hash_count, SipStrategy::default())
    }

    pub fn with_config(config: &FilterConfig) -> Result<Self> {
        Self::with_config_and_strategy(config, SipStrategy::default())
    }

    /// Create a Bloom filter from [`FilterConfig::default`]
    pub fn with_default_config() -> Result<Self> {
        Self::with_config(&FilterConfig::default())
    }

    /// Create a Bloom filter sized for `expected_elements` at `target_fpr`
    pub fn for_expected(expected_elements: usize, target_fpr: f64) -> Result<Self> {
        let config = FilterConfig::for_expected(expected_elements, target_fpr)?;
        Self::with_config(&config)
    }

    /// Start a fluent builder over the default configuration
    pub fn builder() -> Result<BloomBuilder<T>> {
        BloomBuilder::new()
    }
}

impl<T: HashKey + ?Sized, S: HashStrategy, B: BitStore> BloomFilter<T, S, B> {
    /// Create a Bloom filter with an explicit hash strategy
    pub fn with_strategy(capacity_bits: usize, hash_count: usize, strategy: S) -> Result<Self> {
        let config = FilterConfig::new(capacity_bits, hash_count)?;
        Self::from_parts(&config, strategy)
    }

    pub fn with_config_and_strategy(config: &FilterConfig, strategy: S) -> Result<Self> {
        config.validate()?;
        Self::from_parts(config, strategy)
    }

    /// Callers validate `config`
    fn from_parts(config: &FilterConfig, strategy: S) -> Result<Self> {
        let bits = B::zeroed(config.capacity_bits)?;
        debug!(
            capacity_bits = config.capacity_bits,
            hash_count = config.hash_count,
            strategy = %strategy.name(),
            backend = bits.backend(),
            "created bloom filter"
        );

        Ok(BloomFilter {
            bits,
            hash_count: config.hash_count,
            strategy,
            _marker: PhantomData,
        })
    }

    /// Derive the `k` bit positions of `value`
    pub fn indices(&self, value: &T) -> Result<Indices> {
        let key = value.key_bytes();
        if key.is_empty() {
            return Err(BloomError::InvalidInput(
                "Value must not be missing or empty".to_string(),
            ));
        }
        Ok(Indices::derive(
            &self.strategy,
            &key,
            self.hash_count,
            self.bits.len(),
        ))
    }

    /// Insert a value into the filter
    ///
    /// Inserting the same value again leaves the bits unchanged.
    pub fn insert(&mut self, value: &T) -> Result<()> {
        let indices = self.indices(value)?;
        trace!(positions = ?indices.clone().collect::<Vec<_>>(), "insert");

        for pos in indices {
            self.bits.set(pos);
        }
        Ok(())
    }

    /// Check if a value might be in the filter
    ///
    /// `false` means the value was never inserted. `true` means it probably
    /// was; see [`BloomFilter::estimated_fpr`].
    pub fn contains(&self, value: &T) -> Result<bool> {
        let mut indices = self.indices(value)?;
        Ok(indices.all(|pos| self.bits.get(pos)))
    }

    /// Get the capacity (number of bits)
    pub fn capacity_bits(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of positions derived per value
    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Number of bits currently set
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the current load factor (fraction of bits set)
    pub fn load_factor(&self) -> f64 {
        self.bits_set() as f64 / self.bits.len() as f64
    }

    /// Get the estimated false positive rate from the current fill
    pub fn estimated_fpr(&self) -> f64 {
        self.load_factor().powf(self.hash_count as f64)
    }

    /// Estimate how many distinct values were inserted
    ///
    /// Uses `n = -(m/k) * ln(1 - X/m)` with `X` bits set. Saturated filters
    /// report `usize::MAX`.
    pub fn estimated_len(&self) -> usize {
        let m = self.bits.len() as f64;
        let set = self.bits_set() as f64;
        if set >= m {
            return usize::MAX;
        }
        let estimate = -(m / self.hash_count as f64) * (1.0 - set / m).ln();
        estimate.round() as usize
    }

    /// Check if no bit has been set yet
    pub fn is_empty(&self) -> bool {
        self.bits_set() == 0
    }

    /// Bits packed LSB-first into 64-bit words
    pub fn to_words(&self) -> Vec<u64> {
        self.bits.to_words()
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        let estimated_len = self.estimated_len();
        BloomStats {
            capacity_bits: self.bits.len(),
            hash_count: self.hash_count,
            bits_set: self.bits_set(),
            load_factor: self.load_factor(),
            estimated_len,
            estimated_fpr: self.estimated_fpr(),
            theoretical_fpr: false_positive_rate(self.bits.len(), estimated_len, self.hash_count),
        }
    }
}

impl<T: HashKey + ?Sized, S: HashStrategy> BloomFilter<T, S, AtomicBits> {
    /// Insert a value through a shared reference
    ///
    /// Bits only go from 0 to 1 and each is set with one atomic `fetch_or`,
    /// so any number of threads may insert and query at the same time.
    pub fn insert_shared(&self, value: &T) -> Result<()> {
        let indices = self.indices(value)?;
        trace!(positions = ?indices.clone().collect::<Vec<_>>(), "insert");

        for pos in indices {
            self.bits.set_shared(pos);
        }
        Ok(())
    }
}

impl<T: ?Sized, S: HashStrategy, B: BitStore> fmt::Debug for BloomFilter<T, S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("capacity_bits", &self.bits.len())
            .field("hash_count", &self.hash_count)
            .field("strategy", &self.strategy.name())
            .field("backend", &self.bits.backend())
            .finish()
    }
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone, PartialEq)]
pub struct BloomStats {
    pub capacity_bits: usize,
    pub hash_count: usize,
    pub bits_set: usize,
    pub load_factor: f64,
    pub estimated_len: usize,
    /// `load_factor ^ k`
    pub estimated_fpr: f64,
    /// `(1 - e^(-k*n/m))^k` at the estimated element count
    pub theoretical_fpr: f64,
}

impl fmt::Display for BloomStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Capacity: {} bits\n\
             - Hash functions: {}\n\
             - Bits set: {}\n\
             - Load factor: {:.3}\n\
             - Estimated elements: {}\n\
             - Estimated FPR: {:.6}\n\
             - Theoretical FPR: {:.6}",
            self.capacity_bits,
            self.hash_count,
            self.bits_set,
            self.load_factor,
            self.estimated_len,
            self.estimated_fpr,
            self.theoretical_fpr
        )
    }
}
