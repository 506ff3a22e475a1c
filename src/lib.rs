//! # Tazz Bloom
//!
//! A Bloom filter: a compact, insert-only set representation answering
//! "possibly present" or "definitely absent", with no false negatives and a
//! tunable false-positive rate.
//!
//! Each value is hashed exactly twice through a pluggable [`HashStrategy`] and
//! its `k` bit positions are derived by double hashing,
//! `position_i = (h1 + i * h2) mod m`. For `n` inserted values in `m` bits the
//! expected false-positive rate is `(1 - e^(-k*n/m))^k`; use
//! [`recommended_parameters`] to size a filter for a target rate.
//!
//! ```
//! use tazz_bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::<str>::new(1000, 4)?;
//! filter.insert("Hello, world")?;
//!
//! assert!(filter.contains("Hello, world")?);
//! # Ok::<(), tazz_bloom::BloomError>(())
//! ```
//!
//! The default backend is a packed bit vector and requires `&mut self` to
//! insert. [`AtomicBloomFilter`] stores its bits in `AtomicU64` words and
//! accepts concurrent inserts through [`BloomFilter::insert_shared`].

pub mod bloom;
pub mod builder;
pub mod config;
pub mod hash;
pub mod index;
pub mod params;
pub mod storage;

pub use bloom::{AtomicBloomFilter, BloomFilter, BloomStats};
pub use builder::{BloomBuilder, FrozenBloomFilter};
pub use config::FilterConfig;
pub use hash::{FnvStrategy, HashKey, HashStrategy, Murmur3Strategy, SipStrategy};
pub use index::Indices;
pub use params::{recommended_parameters, FilterParams};
pub use storage::{AtomicBits, BitStore, PackedBits};

// Python bindings
#[cfg(feature = "python")]
pub mod python_module;

/// Errors reported by filter construction and queries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BloomError {
    /// A sizing parameter (bit count, hash count, expected elements or
    /// target rate) is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A value with an empty key encoding was passed to insert or contains
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, BloomError>;
