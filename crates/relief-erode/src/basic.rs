//! Unweighted box smoothing.

use relief_grid::{CellMask, HeightField, NEIGHBORS_8};
use serde::{Deserialize, Serialize};

/// Parameters for the basic box smoother.
///
/// Each pass replaces every free cell with the unweighted mean of itself and
/// its up-to-8 neighbors, read from a snapshot taken before the pass so
/// in-pass updates never see each other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSmoothConfig {
    /// Number of smoothing passes. Minimum 1.
    pub iterations: u32,
}

impl Default for BoxSmoothConfig {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

impl BoxSmoothConfig {
    /// Smooth the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        let width = field.width();
        let height = field.height();
        for _ in 0..self.iterations.max(1) {
            let snapshot = field.clone();
            for y in 0..height {
                for x in 0..width {
                    if !mask.is_free(x, y) {
                        continue;
                    }
                    let mut sum = snapshot.at(x, y);
                    let mut count = 1u32;
                    for (dx, dy) in NEIGHBORS_8 {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        sum += snapshot.at(nx as usize, ny as usize);
                        count += 1;
                    }
                    field.set(x, y, sum / count as f32);
                }
            }
        }
    }
}
