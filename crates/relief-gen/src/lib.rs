//! Elevation generators: algorithms that assign or add height over the free
//! region of a [`relief_grid::HeightField`].
//!
//! Every generator takes the field and the protection mask, writes only
//! where the mask allows, and draws randomness from one seedable generator
//! per invocation (seed 0 = non-deterministic).

mod midpoint;
mod perlin;
mod uniform;
mod voronoi;

pub use midpoint::{MidpointDisplacementConfig, NormalizeMode, RandomMode};
pub use perlin::PerlinNoiseConfig;
pub use uniform::{ShiftMode, UniformShiftConfig};
pub use voronoi::{PeakProfile, VoronoiPeaksConfig};
