//! Checkpoint - Save/Load Generator State
//!
//! Replay tooling often needs to stop mid-stream (at a save point) and pick
//! the sequence up later. Snapshots capture the full 624-word table plus the
//! cursor, and carry a SHA-256 fingerprint so a hand-edited or truncated
//! file is rejected instead of silently replaying the wrong sequence.
//!
//! # Critical Invariants
//!
//! - **Determinism**: restore + continue yields exactly the words the
//!   original state would have produced
//! - **Integrity**: the fingerprint covers the cursor and every word

use crate::rng::{GeneratorState, RangeSampler, SampleError, SamplerConfig, STATE_WORDS};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised while restoring a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Snapshot has {actual} words, expected {expected}")]
    WordCount { expected: usize, actual: usize },

    #[error("Snapshot cursor {0} is outside 0..=624")]
    IndexOutOfRange(usize),

    #[error("Fingerprint mismatch: snapshot says {stored}, contents hash to {computed}")]
    FingerprintMismatch { stored: String, computed: String },

    #[error("Snapshot sampler config rejected: {0}")]
    Config(#[from] SampleError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Serialized generator state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSnapshot {
    /// Cursor into the table
    pub index: usize,

    /// All 624 raw words, untempered
    pub words: Vec<u64>,

    /// Lowercase hex SHA-256 of the cursor and words
    pub fingerprint: String,
}

/// Serialized sampler: generator plus the config driving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerSnapshot {
    pub generator: GeneratorSnapshot,
    pub config: SamplerConfig,
}

impl From<&GeneratorState> for GeneratorSnapshot {
    fn from(state: &GeneratorState) -> Self {
        GeneratorSnapshot {
            index: state.index(),
            words: state.words().to_vec(),
            fingerprint: compute_fingerprint(state.index(), state.words()),
        }
    }
}

impl TryFrom<GeneratorSnapshot> for GeneratorState {
    type Error = CheckpointError;

    fn try_from(snapshot: GeneratorSnapshot) -> Result<Self, Self::Error> {
        let actual = snapshot.words.len();
        let words: Box<[u64; STATE_WORDS]> = snapshot
            .words
            .into_boxed_slice()
            .try_into()
            .map_err(|_| CheckpointError::WordCount {
                expected: STATE_WORDS,
                actual,
            })?;

        if snapshot.index > STATE_WORDS {
            return Err(CheckpointError::IndexOutOfRange(snapshot.index));
        }

        let computed = compute_fingerprint(snapshot.index, &words[..]);
        if computed != snapshot.fingerprint {
            return Err(CheckpointError::FingerprintMismatch {
                stored: snapshot.fingerprint,
                computed,
            });
        }

        tracing::debug!(index = snapshot.index, "generator restored from snapshot");
        Ok(GeneratorState::from_parts(snapshot.index, words))
    }
}

impl GeneratorState {
    /// Capture this state for later [`GeneratorState::restore`].
    pub fn snapshot(&self) -> GeneratorSnapshot {
        GeneratorSnapshot::from(self)
    }

    /// Rebuild a state from a snapshot, validating shape and fingerprint.
    pub fn restore(snapshot: GeneratorSnapshot) -> Result<Self, CheckpointError> {
        GeneratorState::try_from(snapshot)
    }
}

impl RangeSampler {
    /// Capture generator and config.
    pub fn snapshot(&self) -> SamplerSnapshot {
        SamplerSnapshot {
            generator: self.state().snapshot(),
            config: *self.config(),
        }
    }

    /// Rebuild a sampler from a snapshot.
    ///
    /// The config is validated here so a bad file fails at load time rather
    /// than on the first draw.
    pub fn restore(snapshot: SamplerSnapshot) -> Result<Self, CheckpointError> {
        snapshot.config.validate()?;
        let state = GeneratorState::restore(snapshot.generator)?;
        Ok(RangeSampler::with_state(state, snapshot.config))
    }
}

impl SamplerSnapshot {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Fingerprinting
// ============================================================================

/// SHA-256 over the cursor and words, all little-endian u64.
pub fn compute_fingerprint(index: usize, words: &[u64]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((index as u64).to_le_bytes());
    for word in words {
        hasher.update(word.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = compute_fingerprint(0, &[]);
        assert_eq!(fp.len(), 64);
        // SHA-256 of eight zero bytes
        assert_eq!(
            fp,
            "af5570f5a1810b7af78caf4bc70a660f0df51e42baf91d4de5b2328de0e83dfc"
        );
    }

    #[test]
    fn test_fingerprint_depends_on_index() {
        let state = GeneratorState::new(1);
        assert_ne!(
            compute_fingerprint(0, state.words()),
            compute_fingerprint(1, state.words())
        );
    }

    #[test]
    fn test_short_word_list_rejected() {
        let mut snapshot = GeneratorState::new(1).snapshot();
        snapshot.words.pop();
        let err = GeneratorState::restore(snapshot).unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::WordCount {
                expected: 624,
                actual: 623
            }
        ));
    }

    #[test]
    fn test_cursor_past_end_rejected() {
        let mut snapshot = GeneratorState::new(1).snapshot();
        snapshot.index = 625;
        snapshot.fingerprint = compute_fingerprint(625, &snapshot.words);
        assert!(matches!(
            GeneratorState::restore(snapshot),
            Err(CheckpointError::IndexOutOfRange(625))
        ));
    }
}
