//! Python bindings for tazz-bloom using PyO3

use crate::{BloomError, BloomFilter};
use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn value_error(err: BloomError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python wrapper for a string-keyed BloomFilter
#[pyclass(name = "BloomFilter")]
struct PyBloomFilter {
    inner: BloomFilter<str>,
}

#[pymethods]
impl PyBloomFilter {
    #[new]
    fn new(capacity_bits: usize, hash_count: usize) -> PyResult<Self> {
        let inner = BloomFilter::new(capacity_bits, hash_count).map_err(value_error)?;
        Ok(PyBloomFilter { inner })
    }

    /// Filter sized for `expected` elements at false positive rate `fpr`
    #[staticmethod]
    fn recommended(expected: usize, fpr: f64) -> PyResult<Self> {
        let inner = BloomFilter::for_expected(expected, fpr).map_err(value_error)?;
        Ok(PyBloomFilter { inner })
    }

    fn insert(&mut self, value: &str) -> PyResult<()> {
        self.inner.insert(value).map_err(value_error)
    }

    fn contains(&self, value: &str) -> PyResult<bool> {
        self.inner.contains(value).map_err(value_error)
    }

    fn __contains__(&self, value: &str) -> PyResult<bool> {
        self.contains(value)
    }

    fn words<'py>(&self, py: Python<'py>) -> &'py PyArray1<u64> {
        self.inner.to_words().into_pyarray(py)
    }

    fn capacity_bits(&self) -> usize {
        self.inner.capacity_bits()
    }

    fn hash_count(&self) -> usize {
        self.inner.hash_count()
    }

    fn estimated_fpr(&self) -> f64 {
        self.inner.estimated_fpr()
    }

    fn stats(&self) -> String {
        self.inner.stats().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "BloomFilter(capacity_bits={}, hash_count={})",
            self.inner.capacity_bits(),
            self.inner.hash_count()
        )
    }
}

/// Python module definition
#[pymodule]
fn tazz_bloom(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBloomFilter>()?;

    m.add("DEFAULT_HASH_COUNT", crate::config::DEFAULT_HASH_COUNT)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
