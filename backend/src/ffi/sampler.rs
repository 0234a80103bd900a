//! PyO3 wrapper for RangeSampler

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::checkpoint::{CheckpointError, SamplerSnapshot};
use crate::rng::{seed_hash_str, RangeSampler as RustRangeSampler, SampleError, SamplerConfig};

fn sample_err_to_py(err: SampleError) -> PyErr {
    match err {
        SampleError::SamplingExhausted { .. } => PyRuntimeError::new_err(err.to_string()),
        SampleError::InvalidRange { .. } | SampleError::InvalidConfig(_) => {
            PyValueError::new_err(err.to_string())
        }
    }
}

fn checkpoint_err_to_py(err: CheckpointError) -> PyErr {
    PyValueError::new_err(format!("Failed to restore sampler: {}", err))
}

/// Python wrapper for Rust RangeSampler
///
/// # Example (from Python)
///
/// ```python
/// from seedrand_core import RangeSampler
///
/// math = RangeSampler("pasword")
/// rolls = [math.rand(1, 100) for _ in range(9000)]
///
/// saved = math.snapshot_json()
/// resumed = RangeSampler.restore_json(saved)
/// assert resumed.rand(1, 6) == math.rand(1, 6)
/// ```
#[pyclass(name = "RangeSampler")]
pub struct PyRangeSampler {
    inner: RustRangeSampler,
}

#[pymethods]
impl PyRangeSampler {
    /// Seed from a string, like `Math.seedRandomString`
    #[new]
    fn new(seed: &str) -> Self {
        PyRangeSampler {
            inner: RustRangeSampler::from_seed_string(seed, SamplerConfig::default()),
        }
    }

    /// Seed from a raw 64-bit value
    #[staticmethod]
    fn from_seed(seed: u64) -> Self {
        PyRangeSampler {
            inner: RustRangeSampler::new(seed, SamplerConfig::default()),
        }
    }

    /// Restore a sampler from `snapshot_json()` output
    ///
    /// # Errors
    ///
    /// Raises ValueError if the JSON is malformed, has the wrong shape,
    /// or fails its fingerprint check.
    #[staticmethod]
    fn restore_json(json: &str) -> PyResult<Self> {
        let snapshot = SamplerSnapshot::from_json(json).map_err(checkpoint_err_to_py)?;
        let inner = RustRangeSampler::restore(snapshot).map_err(checkpoint_err_to_py)?;
        Ok(PyRangeSampler { inner })
    }

    /// Uniform integer in `[low, high]`, like `Math.rand`
    fn rand(&mut self, low: u32, high: u32) -> PyResult<u32> {
        self.inner.rand(low, high).map_err(sample_err_to_py)
    }

    /// Next raw tempered 64-bit word
    fn next_word(&mut self) -> u64 {
        self.inner.next_word()
    }

    /// Skip `count` raw words
    fn discard(&mut self, count: u64) {
        self.inner.discard(count);
    }

    /// Current cursor into the state table
    fn index(&self) -> usize {
        self.inner.state().index()
    }

    /// Serialize generator and config to JSON
    fn snapshot_json(&self) -> PyResult<String> {
        self.inner
            .snapshot()
            .to_json()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}

/// Seed hash used by `Math.seedRandomString`
#[pyfunction]
#[pyo3(name = "seed_hash")]
pub fn py_seed_hash(seed: &str) -> u64 {
    seed_hash_str(seed)
}
