//! Hashing for the grouping table.
//!
//! The `Hash` impls of the context types write, in stack order, the frame
//! count and then `(kind, address)` for each frame. The hasher below folds
//! those writes in sequence, so permuted stacks hash differently.

use super::allocation::AllocationContext;
use ahash::{AHasher, RandomState};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// `BuildHasher` with fixed seeds: equal keys hash identically across maps
/// and across repeated calls. Building and running it never allocates.
#[derive(Clone, Debug)]
pub struct ContextHasher(RandomState);

impl Default for ContextHasher {
    fn default() -> Self {
        Self(RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]))
    }
}

impl BuildHasher for ContextHasher {
    type Hasher = AHasher;

    fn build_hasher(&self) -> AHasher {
        self.0.build_hasher()
    }
}

/// Map keyed by allocation context.
pub type ContextMap<V> = HashMap<AllocationContext, V, ContextHasher>;

/// Hash of a frame, backtrace or context with the table's hasher.
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    ContextHasher::default().hash_one(value)
}
