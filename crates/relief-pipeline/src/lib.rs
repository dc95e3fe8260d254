//! Transform orchestration: ordered generator and smoother stages applied to
//! a height field under a protection mask, with a cached distance field.
//!
//! Stage order is an explicit, user-visible contract. Generators like
//! Voronoi peaks accumulate as a max and therefore do not commute with the
//! passes before them; the pipeline runs exactly what the preset lists, in
//! the order it lists it.

mod cache;
mod error;
mod pipeline;
mod preset;
mod stage;

pub use cache::{CacheStatus, FieldCache};
pub use error::{PipelineError, PresetError};
pub use pipeline::{Pipeline, RunReport};
pub use preset::Preset;
pub use stage::{GeneratorStage, SmootherStage};
