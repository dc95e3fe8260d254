//! Core grid storage for mask-protected height-field transforms.
//!
//! Provides the [`HeightField`] elevation grid, the [`CellMask`] protection
//! predicate, and the [`DistanceField`] encoding 8-connected proximity to
//! protected cells, together with its binary serialization.

mod distance;
mod field_serial;
mod height_field;
mod mask;

pub use distance::{DistanceField, INFINITE_DISTANCE, NEIGHBORS_8};
pub use field_serial::DistanceSerError;
pub use height_field::HeightField;
pub use mask::{CellMask, GridMask};
