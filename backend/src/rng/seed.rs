//! String seed hash behind `Math.seedRandomString`
//!
//! The engine turns a seed string into a 64-bit generator seed with an
//! sdbm-style rolling hash. Bytes are read through a signed `char`, so
//! anything at or above `0x80` is sign-extended before it is added.

/// Hash a byte string into a 64-bit generator seed.
///
/// Hashing stops at the first NUL byte, the same place the engine's
/// C-string walk stops. Arithmetic wraps modulo 2^64.
///
/// # Example
/// ```
/// use seedrand_core::seed_hash;
///
/// assert_eq!(seed_hash(b""), 0);
/// assert_eq!(seed_hash(b"a"), 0x61);
/// ```
pub fn seed_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .fold(0u64, |hash, &b| {
            // i8 -> i64 -> u64 sign-extends high bytes
            let c = b as i8 as i64 as u64;
            c.wrapping_add(hash << 6)
                .wrapping_add(hash << 16)
                .wrapping_sub(hash)
        })
}

/// Hash a UTF-8 string; non-ASCII characters contribute their encoded bytes.
pub fn seed_hash_str(seed: &str) -> u64 {
    seed_hash(seed.as_bytes())
}
