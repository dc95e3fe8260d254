//! Smoothing and erosion: algorithms that relax or erode elevation over the
//! free region of a height field.
//!
//! Some algorithms consume the precomputed distance-to-protected field;
//! callers check the capability flag and refuse to run them without one.
//! All algorithms leave protected cells bit-for-bit untouched.

mod basic;
mod brush;
mod distance_weighted;
mod hydraulic;
mod road;
mod thermal;

pub use basic::BoxSmoothConfig;
pub use brush::Brush;
pub use distance_weighted::{DistanceWeightedConfig, WeightProfile};
pub use hydraulic::HydraulicErosionConfig;
pub use road::nearest_protected;
pub use thermal::ThermalErosionConfig;

/// Errors shared by the smoother/erosion family.
#[derive(Debug, thiserror::Error)]
pub enum ErodeError {
    /// The algorithm requires a distance field and none was supplied.
    #[error("distance field required but not provided")]
    MissingDistanceField,
    /// The distance field has no usable range to normalize by (no protected
    /// cells, or every cell protected).
    #[error("distance field is degenerate: no usable distance range")]
    DegenerateDistanceField,
}
