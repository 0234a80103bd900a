//! Deterministic replay of the engine's random number generator
//!
//! Three layers, consumed bottom-up:
//! - [`seed`]: string → 64-bit seed hash (`Math.seedRandomString`)
//! - [`twister`]: the 624-word Mersenne Twister variant
//! - [`sampler`]: bias-free bounded draws (`Math.rand`)
//!
//! CRITICAL: every shift, mask and boundary here matches the engine bit for
//! bit. This generator is not cryptographically secure.

pub mod sampler;
pub mod seed;
pub mod twister;

pub use sampler::{draw, Draws, RangeSampler, SampleError, SamplerConfig, DEFAULT_RETRY_LIMIT};
pub use seed::{seed_hash, seed_hash_str};
pub use twister::{GeneratorState, HALF_REFILL_INDEX, OUT_OF_RANGE_WORD, STATE_WORDS};
