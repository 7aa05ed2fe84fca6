//! Named, seedable random streams.
//!
//! Every stochastic operation in the crate takes an explicit `&mut impl Rng`. Callers obtain
//! those generators from a [`RandomStreams`], which derives one independent stream per
//! `(RngId, index)` pair from a single base seed. Repetitions and sweep points use distinct
//! indices, so results do not depend on the order in which they are executed.
#[macro_use]
mod macros;
mod sampling_algorithms;

use log::trace;

pub use sampling_algorithms::{sample_multiple_from_known_length, sample_single_from_known_length};

use crate::hashing::hash_str_with_index;
use crate::rand::SeedableRng;

pub trait RngId: Copy + Clone {
    type RngType: SeedableRng;
    fn get_name() -> &'static str;
}

define_rng!(pub GraphRng);
define_rng!(pub RemovalRng);
define_rng!(pub EpidemicRng);

/// Derives independent random streams from a base seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomStreams {
    base_seed: u64,
}

impl RandomStreams {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        RandomStreams { base_seed }
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Creates the generator for stream `index` of the given [`RngId`]. Calling this twice
    /// with the same arguments yields two generators producing identical sequences.
    #[must_use]
    pub fn stream<R: RngId>(&self, _rng_id: R, index: u64) -> R::RngType {
        let seed = self
            .base_seed
            .wrapping_add(hash_str_with_index(R::get_name(), index));
        trace!(
            "creating {} stream {} (base seed={}, seed={})",
            R::get_name(),
            index,
            self.base_seed,
            seed
        );
        R::RngType::seed_from_u64(seed)
    }
}
