//! Uniform elevation shift.

use relief_grid::{CellMask, HeightField};
use serde::{Deserialize, Serialize};

/// How the shift is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftMode {
    /// Add `step` to every free cell.
    Raise,
    /// Subtract the minimum free-cell elevation from every free cell,
    /// renormalizing the floor to zero. `step` is ignored.
    RebaseFloor,
}

/// Parameters for the uniform shift generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformShiftConfig {
    /// Constant added to each free cell in [`ShiftMode::Raise`].
    pub step: f32,
    /// Shift mode.
    pub mode: ShiftMode,
}

impl Default for UniformShiftConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            mode: ShiftMode::Raise,
        }
    }
}

impl UniformShiftConfig {
    /// Apply the shift over the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        let delta = match self.mode {
            ShiftMode::Raise => self.step,
            ShiftMode::RebaseFloor => match field.min_over_free(mask) {
                Some(min) => -min,
                None => return,
            },
        };
        for y in 0..field.height() {
            for x in 0..field.width() {
                if mask.is_free(x, y) {
                    field.add(x, y, delta);
                }
            }
        }
    }
}
