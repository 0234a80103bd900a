//! 64-bit Mersenne Twister variant
//!
//! This is NOT textbook MT19937-64. The engine seeds only the first 313
//! words, starts with the cursor parked at the midpoint, and refills the
//! table in two phases:
//!
//! - cursor at 312: the upper half (312..=623) is regenerated in place
//! - cursor past 623: the lower half (1..=311) is regenerated and the
//!   cursor wraps to 0; reads past the end of the table see
//!   [`OUT_OF_RANGE_WORD`] instead of wrapping around
//!
//! Tempering uses the standard MT19937-64 constants. A library MT19937-64
//! diverges from this sequence on the very first word.
//!
//! # Determinism
//!
//! Same seed → same word sequence, on every platform. All arithmetic is
//! wrapping 64-bit.

use std::fmt;

/// Number of 64-bit words in the state table.
pub const STATE_WORDS: usize = 624;

/// Cursor value that triggers the half refill. Fresh states start here.
pub const HALF_REFILL_INDEX: usize = 312;

/// Value substituted for reads beyond the end of the table during a full refill.
pub const OUT_OF_RANGE_WORD: u64 = 0x5555_5555_5555_5555;

const INIT_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const UPPER_MASK: u64 = 0xFFFF_FFFF_8000_0000;
const LOWER_MASK: u64 = 0x0000_0000_7FFF_FFFF;
const TWIST_MATRIX: u64 = 0xB502_6F5A_A966_19E9;

/// Generator state: a 624-word table and a cursor into it.
///
/// Owned by exactly one caller at a time and advanced through `&mut self`.
/// There is no internal locking; give each thread its own state.
///
/// # Example
/// ```
/// use seedrand_core::{seed_hash_str, GeneratorState};
///
/// let mut state = GeneratorState::new(seed_hash_str("pasword"));
/// assert_eq!(state.index(), 312);
///
/// let first = state.next_word();
/// assert_eq!(state.index(), 313);
/// assert_ne!(first, state.next_word());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorState {
    index: usize,
    words: Box<[u64; STATE_WORDS]>,
}

impl GeneratorState {
    /// Initialize a generator from a 64-bit seed.
    ///
    /// Only words 0..=312 are seeded; the rest stay zero until the first
    /// half refill overwrites them.
    pub fn new(seed: u64) -> Self {
        let mut words = Box::new([0u64; STATE_WORDS]);
        words[0] = seed;

        let mut curr = seed;
        for i in 1..=HALF_REFILL_INDEX {
            curr = (curr ^ (curr >> 62))
                .wrapping_mul(INIT_MULTIPLIER)
                .wrapping_add(i as u64);
            words[i] = curr;
        }

        Self {
            index: HALF_REFILL_INDEX,
            words,
        }
    }

    /// Rebuild a state from its raw parts.
    ///
    /// Callers must have validated `index <= STATE_WORDS`.
    pub(crate) fn from_parts(index: usize, words: Box<[u64; STATE_WORDS]>) -> Self {
        debug_assert!(index <= STATE_WORDS);
        Self { index, words }
    }

    /// Current cursor position in `[0, 624]`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw (untempered) state table.
    pub fn words(&self) -> &[u64; STATE_WORDS] {
        &self.words
    }

    /// Produce the next tempered 64-bit word.
    pub fn next_word(&mut self) -> u64 {
        if self.index == HALF_REFILL_INDEX {
            self.refill_half();
        } else if self.index >= STATE_WORDS {
            self.refill_full_and_reset();
        }

        let word = self.words[self.index];
        self.index += 1;
        temper(word)
    }

    /// Advance the generator by `count` words, discarding the output.
    pub fn discard(&mut self, count: u64) {
        for _ in 0..count {
            self.next_word();
        }
    }

    fn refill_half(&mut self) {
        tracing::trace!("half refill of words 312..=623");
        let w = &mut *self.words;
        for i in 1..=HALF_REFILL_INDEX {
            w[i + 311] = w[i + 155] ^ twist(w[i - 1], w[i]);
        }
    }

    fn refill_full_and_reset(&mut self) {
        tracing::trace!("full refill of words 1..=311, cursor reset");
        for k in 1..=156 {
            let twisted = twist(self.words[k + 312], self.read_or_sentinel(k + 313));
            self.words[k] = self.read_or_sentinel(k + 468) ^ twisted;
        }
        for k in 157..=311 {
            let twisted = twist(self.words[k + 312], self.read_or_sentinel(k + 313));
            self.words[k] = self.words[k - 156] ^ twisted;
        }
        // word 311 is written twice; the second write wins
        self.words[311] = self.words[155] ^ twist(self.words[623], self.words[0]);

        self.index = 0;
    }

    fn read_or_sentinel(&self, index: usize) -> u64 {
        self.words.get(index).copied().unwrap_or(OUT_OF_RANGE_WORD)
    }
}

impl fmt::Debug for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorState")
            .field("index", &self.index)
            .field("words", &format_args!("[u64; {}]", STATE_WORDS))
            .finish()
    }
}

/// Combine the top bit-block of `u` with the low 31 bits of `v`.
fn twist(u: u64, v: u64) -> u64 {
    let z = (u & UPPER_MASK) | (v & LOWER_MASK);
    let magic = if z & 1 != 0 { TWIST_MATRIX } else { 0 };
    (z >> 1) ^ magic
}

fn temper(mut x: u64) -> u64 {
    x ^= (x >> 29) & 0x5555_5555_5555_5555;
    x ^= (x << 17) & 0x71D6_7FFF_EDA6_0000;
    x ^= (x << 37) & 0xFFF7_EEE0_0000_0000;
    x ^= x >> 43;
    x
}
