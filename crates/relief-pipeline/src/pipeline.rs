//! Pipeline execution.

use relief_grid::{CellMask, HeightField};

use crate::cache::{CacheStatus, FieldCache};
use crate::error::PipelineError;
use crate::preset::Preset;

/// Summary of one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Generator stages executed.
    pub generators_run: usize,
    /// Smoother stages executed.
    pub smoothers_run: usize,
    /// How the distance field was obtained.
    pub cache_status: CacheStatus,
}

/// Executes a preset against a height field.
///
/// The pipeline owns sequencing: it resolves the distance field once (only
/// when some stage needs it), optionally resets the free region, then runs
/// generators and smoothers in preset order. The field and the cache are
/// exclusively borrowed for the duration of the run; stages never retain
/// references across calls.
#[derive(Clone, Debug)]
pub struct Pipeline {
    preset: Preset,
}

impl Pipeline {
    /// Build a pipeline from a preset.
    pub fn new(preset: Preset) -> Self {
        Self { preset }
    }

    /// The preset this pipeline runs.
    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Run the transform.
    ///
    /// On a stage error the stages before it have been applied and the
    /// failing stage has left the field untouched; the remaining stages do
    /// not run.
    pub fn run<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        cache: &mut FieldCache,
    ) -> Result<RunReport, PipelineError> {
        let width = field.width();
        let height = field.height();
        if width == 0 || height == 0 {
            return Err(PipelineError::EmptyGrid);
        }

        let needs_distance = self
            .preset
            .smoothers
            .iter()
            .any(|stage| stage.needs_distance_field());
        let (distance, cache_status) = if needs_distance {
            let (field_ref, status) = cache.obtain(width, height, mask);
            (Some(field_ref), status)
        } else {
            (None, CacheStatus::NotNeeded)
        };

        if self.preset.reset_free_region {
            log::debug!("resetting free region to zero");
            field.fill_free(mask, 0.0);
        }

        for stage in &self.preset.generators {
            log::info!("generator stage: {}", stage.name());
            stage.apply(field, mask);
        }
        for stage in &self.preset.smoothers {
            log::info!("smoother stage: {}", stage.name());
            stage
                .apply(field, mask, distance)
                .map_err(|source| PipelineError::Stage {
                    stage: stage.name(),
                    source,
                })?;
        }

        Ok(RunReport {
            generators_run: self.preset.generators.len(),
            smoothers_run: self.preset.smoothers.len(),
            cache_status,
        })
    }
}
