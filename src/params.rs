//! Bloom filter sizing
//!
//! For `n` elements in `m` bits with `k` hash positions per element:
//!
//! - false-positive rate: `p = (1 - e^(-k*n/m))^k`
//! - optimal bits for a target `p`: `m = -n * ln(p) / (ln 2)^2`
//! - optimal hash count: `k = (m/n) * ln 2`

use std::f64::consts::LN_2;

use crate::{BloomError, Result};

/// Filter sizing derived from an expected element count and target rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub capacity_bits: usize,
    pub hash_count: usize,
    /// False-positive rate at the expected element count
    pub expected_fpr: f64,
}

impl std::fmt::Display for FilterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "m={} bits, k={}, expected FPR={:.6}",
            self.capacity_bits, self.hash_count, self.expected_fpr
        )
    }
}

/// Expected false-positive rate after inserting `n` elements
pub fn false_positive_rate(capacity_bits: usize, elements: usize, hash_count: usize) -> f64 {
    if elements == 0 || hash_count == 0 {
        return 0.0;
    }
    if capacity_bits == 0 {
        return 1.0;
    }
    let exponent = -(hash_count as f64) * (elements as f64) / (capacity_bits as f64);
    (1.0 - exponent.exp()).powf(hash_count as f64)
}

/// Hash count minimizing the false-positive rate for `m` bits and `n` elements
pub fn optimal_hash_count(capacity_bits: usize, elements: usize) -> usize {
    if elements == 0 {
        return 1;
    }
    let k = ((capacity_bits as f64 / elements as f64) * LN_2).round() as usize;
    k.max(1)
}

/// Recommend `(m, k)` for `expected_elements` values at `target_fpr`
pub fn recommended_parameters(expected_elements: usize, target_fpr: f64) -> Result<FilterParams> {
    if expected_elements == 0 {
        return Err(BloomError::InvalidParameter(
            "Expected elements must be > 0".to_string(),
        ));
    }
    if !(target_fpr > 0.0 && target_fpr < 1.0) {
        return Err(BloomError::InvalidParameter(format!(
            "Target false positive rate must be in (0, 1), got {}",
            target_fpr
        )));
    }

    let n = expected_elements as f64;
    let ln2_squared = LN_2 * LN_2;
    let bits = (-n * target_fpr.ln() / ln2_squared).ceil();
    if !bits.is_finite() || bits >= usize::MAX as f64 {
        return Err(BloomError::InvalidParameter(format!(
            "{} elements at rate {} need more than usize::MAX bits",
            expected_elements, target_fpr
        )));
    }
    let capacity_bits = (bits as usize).max(1);
    let hash_count = optimal_hash_count(capacity_bits, expected_elements);

    Ok(FilterParams {
        capacity_bits,
        hash_count,
        expected_fpr: false_positive_rate(capacity_bits, expected_elements, hash_count),
    })
}
