//! Bit storage backends
//!
//! Bits only ever go from 0 to 1. [`PackedBits`] is a plain packed bit vector
//! mutated through `&mut self`. [`AtomicBits`] keeps the same layout in
//! `AtomicU64` words so that bits can also be set through a shared reference.

use std::sync::atomic::{AtomicU64, Ordering};

use bit_vec::BitVec;

use crate::{BloomError, Result};

const WORD_BITS: usize = 64;

/// Fixed-length, insert-only bit storage
pub trait BitStore {
    /// All-zero storage holding `len` bits
    ///
    /// Fails with `InvalidParameter` when the allocator cannot provide the
    /// storage.
    fn zeroed(len: usize) -> Result<Self>
    where
        Self: Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a bit; out-of-range reads are `false`
    fn get(&self, index: usize) -> bool;

    /// Set a bit to 1
    fn set(&mut self, index: usize);

    /// Number of bits set to 1
    fn count_ones(&self) -> usize;

    /// Bits packed LSB-first into 64-bit words
    fn to_words(&self) -> Vec<u64>;

    /// Name of the backend, for logs
    fn backend(&self) -> &'static str;
}

/// Packed bit vector backed by `bit_vec::BitVec`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    bits: BitVec,
}

impl BitStore for PackedBits {
    fn zeroed(len: usize) -> Result<Self> {
        // BitVec allocates infallibly, so check the block buffer fits first
        let blocks = len / 32 + usize::from(len % 32 != 0);
        drop(reserve::<u32>(blocks, len)?);

        Ok(PackedBits {
            bits: BitVec::from_elem(len, false),
        })
    }

    fn len(&self) -> usize {
        self.bits.len()
    }

    fn get(&self, index: usize) -> bool {
        self.bits.get(index).unwrap_or(false)
    }

    fn set(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&bit| bit).count()
    }

    fn to_words(&self) -> Vec<u64> {
        let mut words = vec![0u64; word_count(self.bits.len())];
        for (i, bit) in self.bits.iter().enumerate() {
            if bit {
                words[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
            }
        }
        words
    }

    fn backend(&self) -> &'static str {
        "packed"
    }
}

/// Bit vector of `AtomicU64` words
///
/// Setting a bit is a single `fetch_or`, so concurrent writers never lose
/// each other's bits and readers never see a torn word. Writes use `Release`
/// and reads use `Acquire`.
#[derive(Debug)]
pub struct AtomicBits {
    words: Box<[AtomicU64]>,
    len: usize,
}

impl AtomicBits {
    /// Set a bit through a shared reference
    pub fn set_shared(&self, index: usize) {
        if index >= self.len {
            return;
        }
        let (word, mask) = locate(index);
        self.words[word].fetch_or(mask, Ordering::Release);
    }
}

impl BitStore for AtomicBits {
    fn zeroed(len: usize) -> Result<Self> {
        let count = word_count(len);
        let mut words = reserve::<AtomicU64>(count, len)?;
        words.extend((0..count).map(|_| AtomicU64::new(0)));

        Ok(AtomicBits {
            words: words.into_boxed_slice(),
            len,
        })
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, mask) = locate(index);
        self.words[word].load(Ordering::Acquire) & mask != 0
    }

    fn set(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        let (word, mask) = locate(index);
        *self.words[word].get_mut() |= mask;
    }

    fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    fn to_words(&self) -> Vec<u64> {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire))
            .collect()
    }

    fn backend(&self) -> &'static str {
        "atomic"
    }
}

/// Empty buffer with room for exactly `count` items backing `len` bits
fn reserve<W>(count: usize, len: usize) -> Result<Vec<W>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(count).map_err(|err| {
        BloomError::InvalidParameter(format!("Cannot allocate {} bits: {}", len, err))
    })?;
    Ok(buf)
}

fn word_count(len: usize) -> usize {
    len / WORD_BITS + usize::from(len % WORD_BITS != 0)
}

fn locate(index: usize) -> (usize, u64) {
    (index / WORD_BITS, 1u64 << (index % WORD_BITS))
}
