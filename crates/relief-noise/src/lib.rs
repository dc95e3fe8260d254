//! Coherent-noise kernel and seeded-RNG derivation for the relief engine.

mod fbm;
mod seed;

pub use fbm::Fbm;
pub use seed::{resolve_seed, seeded_rng};
