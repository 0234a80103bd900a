//! seedrand core - bit-exact replay of a scripting engine's seeded RNG
//!
//! Reproduces the integer stream of the engine's `Math.seedRandomString` /
//! `Math.rand` pair so tooling can predict or verify script randomness
//! (save-state analysis, loot prediction, replay checks).
//!
//! # Architecture
//!
//! - **rng**: seed hash, twister state machine, range sampler
//! - **checkpoint**: snapshot/restore of generator state with SHA-256 fingerprints
//! - **ffi**: Python bindings (behind the `pyo3` feature)
//!
//! # Critical Invariants
//!
//! 1. Same seed and call sequence → same output, on every platform
//! 2. Generator state is an owned value; there is no global RNG
//! 3. Not cryptographically secure
//!
//! # Example
//! ```
//! use seedrand_core::{RangeSampler, SamplerConfig};
//!
//! let mut math = RangeSampler::from_seed_string("pasword", SamplerConfig::default());
//! let rolls: Vec<u32> = (0..5).map(|_| math.rand(1, 100).unwrap()).collect();
//! assert_eq!(rolls, vec![1, 67, 66, 33, 64]);
//! ```

// Module declarations
pub mod checkpoint;
pub mod rng;

// Re-exports for convenience
pub use checkpoint::{CheckpointError, GeneratorSnapshot, SamplerSnapshot};
pub use rng::{
    draw, seed_hash, seed_hash_str, GeneratorState, RangeSampler, SampleError, SamplerConfig,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn seedrand_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::sampler::PyRangeSampler>()?;
    m.add_function(wrap_pyfunction!(ffi::sampler::py_seed_hash, m)?)?;
    Ok(())
}
