//! Bounded integer draws (`Math.rand(low, high)`)
//!
//! Draws are built by rejection sampling over an accumulator of generator
//! words, so results are free of modulo bias for any range size.
//!
//! # Algorithm
//!
//! 1. Shift `value` and `domain` left by `bits_per_draw`, OR in the next
//!    raw word not above `max_raw_value` (and `max_raw_value` itself),
//!    until `domain` covers `range - 1`
//! 2. Accept when `value / range < domain / range`
//! 3. Also accept when `domain % range == range - 1` and `domain` fits in
//!    32 bits (the engine's own edge case)
//! 4. Otherwise start over with empty accumulators
//!
//! With the reference configuration (64 bits, max `u64::MAX`) step 1 always
//! takes exactly one word per attempt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::seed::seed_hash_str;
use super::twister::GeneratorState;

/// Default cap on rejected words plus restarts inside a single draw.
///
/// With the reference configuration a retry has probability below 2^-32,
/// so the cap never changes the reference output.
pub const DEFAULT_RETRY_LIMIT: u32 = 1_000_000;

/// Errors that can occur while drawing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("Invalid range: high {high} is below low {low}")]
    InvalidRange { low: u32, high: u32 },

    #[error("Sampling exhausted after {attempts} retries")]
    SamplingExhausted { attempts: u32 },

    #[error("Invalid sampler config: {0}")]
    InvalidConfig(String),
}

/// How raw generator words are fed into the sampler.
///
/// Absent fields deserialize to the reference values.
///
/// # Example
/// ```
/// use seedrand_core::SamplerConfig;
///
/// let config: SamplerConfig = serde_json::from_str(r#"{"retry_limit": null}"#).unwrap();
/// assert_eq!(config.bits_per_draw, 64);
/// assert_eq!(config.max_raw_value, u64::MAX);
/// assert_eq!(config.retry_limit, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Accumulator shift per accumulation step (0..=64)
    pub bits_per_draw: u32,

    /// Largest accepted raw value; larger words are redrawn
    pub max_raw_value: u64,

    /// Give up with [`SampleError::SamplingExhausted`] after this many
    /// retries. `None` loops until a draw is accepted, like the engine.
    pub retry_limit: Option<u32>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            bits_per_draw: 64,
            max_raw_value: u64::MAX,
            retry_limit: Some(DEFAULT_RETRY_LIMIT),
        }
    }
}

impl SamplerConfig {
    /// Reference configuration with no retry cap.
    pub fn unbounded() -> Self {
        Self {
            retry_limit: None,
            ..Self::default()
        }
    }

    /// Reject configs the engine cannot run at all.
    ///
    /// Configs that merely reject most words (a small `max_raw_value`) are
    /// valid; they end in [`SampleError::SamplingExhausted`] under a
    /// retry limit.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.bits_per_draw > 64 {
            return Err(SampleError::InvalidConfig(format!(
                "bits_per_draw must be at most 64, got {}",
                self.bits_per_draw
            )));
        }
        if self.max_raw_value == 0 {
            return Err(SampleError::InvalidConfig(
                "max_raw_value must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Draw a uniform integer in `[low, high]` from `state`.
///
/// `range` is computed with 32-bit wraparound exactly like the engine, so
/// `draw(.., 0, u32::MAX)` sees a range of 0 and returns `0` without
/// consuming a word. The same short-circuit applies when `low == high`.
///
/// # Errors
/// - [`SampleError::InvalidRange`] if `high < low`
/// - [`SampleError::InvalidConfig`] if `config` fails validation
/// - [`SampleError::SamplingExhausted`] if the retry limit is hit; words
///   consumed up to that point stay consumed
pub fn draw(
    state: &mut GeneratorState,
    config: &SamplerConfig,
    low: u32,
    high: u32,
) -> Result<u32, SampleError> {
    if high < low {
        return Err(SampleError::InvalidRange { low, high });
    }
    config.validate()?;

    let range = high.wrapping_sub(low).wrapping_add(1);
    if range <= 1 {
        return Ok(low);
    }

    let range_wide = u128::from(range);
    let target = u128::from(range - 1);
    let mut retries: u32 = 0;

    loop {
        // 96 bits is the most these can reach: 32 bits of target plus one step
        let mut value: u128 = 0;
        let mut domain: u128 = 0;

        while domain < target {
            let previous = domain;
            value <<= config.bits_per_draw;
            domain <<= config.bits_per_draw;

            let raw = loop {
                let raw = state.next_word();
                if raw <= config.max_raw_value {
                    break raw;
                }
                tracing::debug!(raw, max = config.max_raw_value, "raw word rejected");
                bump_retries(&mut retries, config)?;
            };

            value |= u128::from(raw);
            domain |= u128::from(config.max_raw_value);

            // a domain that stops growing never reaches the target
            if domain <= previous {
                bump_retries(&mut retries, config)?;
            }
        }

        if value / range_wide < domain / range_wide {
            return Ok(finish(value, range_wide, low));
        }

        if domain % range_wide == target && domain >> 32 == 0 {
            return Ok(finish(value, range_wide, low));
        }

        tracing::debug!(range, "biased draw, restarting");
        bump_retries(&mut retries, config)?;
    }
}

fn bump_retries(retries: &mut u32, config: &SamplerConfig) -> Result<(), SampleError> {
    *retries = retries.saturating_add(1);
    match config.retry_limit {
        Some(limit) if *retries > limit => Err(SampleError::SamplingExhausted { attempts: *retries }),
        _ => Ok(()),
    }
}

fn finish(value: u128, range: u128, low: u32) -> u32 {
    // remainder < range <= u32::MAX, and low + remainder <= high
    (value % range) as u32 + low
}

/// A generator bound to one sampler configuration.
///
/// This is the replay counterpart of the engine's `Math` object:
/// [`RangeSampler::from_seed_string`] is `Math.seedRandomString` and
/// [`RangeSampler::rand`] is `Math.rand`.
///
/// # Example
/// ```
/// use seedrand_core::{RangeSampler, SamplerConfig};
///
/// let mut math = RangeSampler::from_seed_string("pasword", SamplerConfig::default());
/// let roll = math.rand(1, 100).unwrap();
/// assert_eq!(roll, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSampler {
    state: GeneratorState,
    config: SamplerConfig,
}

impl RangeSampler {
    /// Create a sampler from a 64-bit seed.
    pub fn new(seed: u64, config: SamplerConfig) -> Self {
        Self::with_state(GeneratorState::new(seed), config)
    }

    /// Create a sampler seeded from a string, like `Math.seedRandomString`.
    pub fn from_seed_string(seed: &str, config: SamplerConfig) -> Self {
        Self::new(seed_hash_str(seed), config)
    }

    /// Take ownership of an existing generator state.
    pub fn with_state(state: GeneratorState, config: SamplerConfig) -> Self {
        Self { state, config }
    }

    /// Replace the generator with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) {
        self.state = GeneratorState::new(seed);
    }

    /// Replace the generator with one seeded from a string.
    pub fn reseed_string(&mut self, seed: &str) {
        self.reseed(seed_hash_str(seed));
    }

    /// Draw a uniform integer in `[low, high]`. See [`draw`].
    pub fn rand(&mut self, low: u32, high: u32) -> Result<u32, SampleError> {
        draw(&mut self.state, &self.config, low, high)
    }

    /// Endless stream of draws over `[low, high]`.
    pub fn draws(&mut self, low: u32, high: u32) -> Draws<'_> {
        Draws {
            sampler: self,
            low,
            high,
        }
    }

    /// Next raw tempered word, bypassing the range logic.
    pub fn next_word(&mut self) -> u64 {
        self.state.next_word()
    }

    /// Skip `count` raw words.
    pub fn discard(&mut self, count: u64) {
        self.state.discard(count);
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }
}

/// Iterator returned by [`RangeSampler::draws`].
pub struct Draws<'a> {
    sampler: &'a mut RangeSampler,
    low: u32,
    high: u32,
}

impl Iterator for Draws<'_> {
    type Item = Result<u32, SampleError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sampler.rand(self.low, self.high))
    }
}
