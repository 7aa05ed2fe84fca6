//! This module provides a deterministic hasher and `HashMap` and `HashSet` variants that use
//! it. The hashing data structures in the standard library are randomly seeded, which would
//! make iteration order (and therefore anything derived from it) vary between runs.
//!
//! `hash_str_with_index` is used by `crate::random` to derive the seed of each
//! named random stream from the base seed.

use xxhash_rust::xxh3::xxh3_64_with_seed;

pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Hashes `data` keyed by `index`. Distinct indices give unrelated hashes for the same string.
#[must_use]
pub fn hash_str_with_index(data: &str, index: u64) -> u64 {
    xxh3_64_with_seed(data.as_bytes(), index)
}
