//! # Quadratic Map
//!
//! A string-keyed hash map using open addressing with quadratic probing.
//!
//! - The bucket count is always prime, so the probe sequence `(hash + j²) mod capacity` reaches
//!   half of the table before it repeats.
//! - The table is rebuilt at twice its capacity (rounded up to a prime) before an insertion
//!   would bring the load factor to one half.
//! - Removal leaves a tombstone so probe chains through the bucket stay intact. Tombstones are
//!   purged when the table is rebuilt.
//! - The hash function is injected at construction; any `Fn(&str) -> u64` will do.
//!
//! ## Basic Usage
//!
//! ```rust
//! use quadmap::QuadraticMap;
//!
//! // Create a new map; the requested capacity is rounded up to a prime
//! let mut map = QuadraticMap::with_capacity(20);
//! assert_eq!(map.capacity(), 23);
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! assert_eq!(map.len(), 1);
//! ```
//!
//! ## Custom Hash Functions
//!
//! ```rust
//! use quadmap::{QuadraticMap, hash::positional_hash};
//!
//! let mut map = QuadraticMap::with_hasher(11, positional_hash);
//! for i in 0..6 {
//!     map.put(i.to_string(), i * 10);
//! }
//!
//! // The sixth insertion would have filled half of the 11 buckets
//! assert_eq!(map.capacity(), 23);
//! assert!(map.table_load() < 0.5);
//! ```

/// Growable array with checked indexing, used as the bucket store
pub mod dynamic_array;
/// Key hash functions
pub mod hash;
/// Prime capacity helpers
pub mod primes;
/// Quadratic probe sequence
mod probe;
/// Module implementing the quadratic probing hash map
mod quadratic_map;
/// Utility traits for the hash map
mod utils;

pub use dynamic_array::{ArrayError, DynamicArray};
pub use hash::{HashFn, KeyHasher};
pub use probe::ProbeSequence;
pub use quadratic_map::{IntoIter, Iter, QuadraticMap};
pub use utils::MapExtensions;
