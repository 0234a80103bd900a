//! Python bindings
//!
//! Thin wrappers so Python tooling can replay engine randomness without
//! reimplementing the generator.

pub mod sampler;
