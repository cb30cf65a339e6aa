//! Key hash functions that can be injected into a [`QuadraticMap`](crate::QuadraticMap).

use std::hash::{DefaultHasher, Hasher};

/// Signature of a plain key hash function.
pub type HashFn = fn(&str) -> u64;

/// Maps a string key to a non-negative integer.
///
/// The map only relies on the output being deterministic for a given key. Any
/// `Fn(&str) -> u64`, including closures, is a `KeyHasher`.
pub trait KeyHasher {
    /// Hashes `key`.
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sum of the character codes of `key`.
///
/// Anagrams collide, which makes it handy for exercising long probe chains.
#[must_use]
pub fn additive_hash(key: &str) -> u64 {
    key.chars().fold(0u64, |hash, c| hash.wrapping_add(u64::from(c)))
}

/// Sum of `(position + 1) * character code` over `key`.
#[must_use]
pub fn positional_hash(key: &str) -> u64 {
    key.chars().zip(1u64..).fold(0u64, |hash, (c, position)| {
        hash.wrapping_add(position.wrapping_mul(u64::from(c)))
    })
}

/// SipHash of `key` with the fixed keys of [`DefaultHasher::new`].
#[must_use]
pub fn default_hash(key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(key.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_hash() {
        assert_eq!(additive_hash(""), 0);
        assert_eq!(additive_hash("a"), 97);
        assert_eq!(additive_hash("ab"), 97 + 98);
        assert_eq!(additive_hash("ab"), additive_hash("ba"));
    }

    #[test]
    fn test_positional_hash() {
        assert_eq!(positional_hash(""), 0);
        assert_eq!(positional_hash("ab"), 97 + 2 * 98);
        assert_eq!(positional_hash("ba"), 98 + 2 * 97);
        assert_ne!(positional_hash("ab"), positional_hash("ba"));
    }

    #[test]
    fn test_default_hash_is_deterministic() {
        assert_eq!(default_hash("key1"), default_hash("key1"));
        assert_ne!(default_hash("key1"), default_hash("key2"));
    }

    #[test]
    fn test_closures_are_key_hashers() {
        let seed = 7u64;
        let hasher = move |key: &str| seed.wrapping_add(key.len() as u64);
        assert_eq!(hasher.hash_key("abc"), 10);

        let function: HashFn = additive_hash;
        assert_eq!(function.hash_key("a"), 97);
    }
}
