//! Fluent construction of read-only filters
//!
//! ```
//! use tazz_bloom::BloomFilter;
//!
//! let filter = BloomFilter::<str>::builder()?
//!     .insert("Hello, world")?
//!     .insert("Hello, again")?
//!     .build();
//!
//! assert!(filter.contains("Hello, again")?);
//! # Ok::<(), tazz_bloom::BloomError>(())
//! ```

use std::fmt;

use crate::bloom::{BloomFilter, BloomStats};
use crate::config::FilterConfig;
use crate::hash::{HashKey, HashStrategy, SipStrategy};
use crate::Result;

/// Accumulates values, then freezes into a [`FrozenBloomFilter`]
pub struct BloomBuilder<T: ?Sized, S = SipStrategy> {
    filter: BloomFilter<T, S>,
}

impl<T: HashKey + ?Sized> BloomBuilder<T> {
    /// Builder over [`FilterConfig::default`]
    pub fn new() -> Result<Self> {
        Ok(BloomBuilder {
            filter: BloomFilter::with_default_config()?,
        })
    }

    pub fn with_config(config: &FilterConfig) -> Result<Self> {
        Ok(BloomBuilder {
            filter: BloomFilter::with_config(config)?,
        })
    }
}

impl<T: HashKey + ?Sized, S: HashStrategy> BloomBuilder<T, S> {
    /// Continue filling an existing filter
    pub fn from_filter(filter: BloomFilter<T, S>) -> Self {
        BloomBuilder { filter }
    }

    pub fn insert(mut self, value: &T) -> Result<Self> {
        self.filter.insert(value)?;
        Ok(self)
    }

    /// Insert every value, stopping at the first rejected one
    pub fn insert_all<'a, I>(mut self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for value in values {
            self.filter.insert(value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> FrozenBloomFilter<T, S> {
        FrozenBloomFilter { inner: self.filter }
    }
}

/// A filter that can only be queried
pub struct FrozenBloomFilter<T: ?Sized, S = SipStrategy> {
    inner: BloomFilter<T, S>,
}

impl<T: HashKey + ?Sized, S: HashStrategy> FrozenBloomFilter<T, S> {
    pub fn contains(&self, value: &T) -> Result<bool> {
        self.inner.contains(value)
    }

    pub fn capacity_bits(&self) -> usize {
        self.inner.capacity_bits()
    }

    pub fn hash_count(&self) -> usize {
        self.inner.hash_count()
    }

    pub fn stats(&self) -> BloomStats {
        self.inner.stats()
    }

    /// Unfreeze, allowing further inserts
    pub fn into_inner(self) -> BloomFilter<T, S> {
        self.inner
    }
}

impl<T: ?Sized, S: HashStrategy> fmt::Debug for FrozenBloomFilter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FrozenBloomFilter").field(&self.inner).finish()
    }
}
