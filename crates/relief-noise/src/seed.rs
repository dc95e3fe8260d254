//! Seeded-RNG derivation.
//!
//! Every algorithm instance owns a single ChaCha8 generator. A configured
//! seed of 0 means "unseeded": the generator is drawn from OS entropy and
//! runs are intentionally non-reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Derive the algorithm RNG for a configured seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    if seed == 0 {
        ChaCha8Rng::from_os_rng()
    } else {
        ChaCha8Rng::seed_from_u64(seed)
    }
}

/// Resolve a configured seed to a concrete noise-permutation seed,
/// drawing a random one when the configured value is 0.
pub fn resolve_seed(seed: u64) -> u32 {
    if seed == 0 {
        rand::rng().random()
    } else {
        seed as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_seed_reproduces_sequence() {
        let mut a = seeded_rng(1234);
        let mut b = seeded_rng(1234);
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_distinct_seeds_diverge() {
        let mut a = seeded_rng(1);
        let mut b = seeded_rng(2);
        let va: [u64; 4] = core::array::from_fn(|_| a.random());
        let vb: [u64; 4] = core::array::from_fn(|_| b.random());
        assert_ne!(va, vb);
    }

    #[test]
    fn test_resolve_seed_passthrough() {
        assert_eq!(resolve_seed(77), 77);
    }
}
