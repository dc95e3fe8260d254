//! Distance-weighted smoothing.
//!
//! Smooths hardest right next to protected cells and fades out with
//! distance, pulling nearby terrain toward protected-area height so grades
//! blend instead of stepping. Requires the distance field.

use relief_grid::{CellMask, DistanceField, HeightField, NEIGHBORS_8};
use serde::{Deserialize, Serialize};

use crate::ErodeError;

/// Shape of the smoothing weight as a function of normalized distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum WeightProfile {
    /// Full smoothing up to `plateau_threshold`, then a power falloff over
    /// the remaining distance range.
    TwoPiece {
        /// Normalized distance below which the weight stays at 1.
        plateau_threshold: f32,
        /// Falloff exponent beyond the plateau.
        falloff_power: f32,
    },
    /// `(1 - normalized_distance)^power` everywhere.
    PowerLaw {
        /// Falloff exponent.
        power: f32,
    },
}

/// Parameters for the distance-weighted smoother.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceWeightedConfig {
    /// Weight profile over normalized distance-to-protected.
    pub profile: WeightProfile,
    /// Extra multiplicative weight for neighbors nearer protected cells.
    /// 0 disables the pull.
    pub road_pull: f32,
    /// Strength of variance-based detail preservation. 0 disables it;
    /// larger values keep high-variance cells closer to their original
    /// height.
    pub detail_preservation: f32,
    /// Number of passes. Minimum 1.
    pub iterations: u32,
}

impl Default for DistanceWeightedConfig {
    fn default() -> Self {
        Self {
            profile: WeightProfile::TwoPiece {
                plateau_threshold: 0.2,
                falloff_power: 2.0,
            },
            road_pull: 1.0,
            detail_preservation: 0.0,
            iterations: 1,
        }
    }
}

impl DistanceWeightedConfig {
    /// Smooth the free region. Fails on a degenerate distance field (there
    /// is no finite range to normalize by) before touching the height field.
    pub fn apply<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        distance: &DistanceField,
    ) -> Result<(), ErodeError> {
        let max = match distance.max_finite() {
            Some(m) if m > 0 => m,
            _ => return Err(ErodeError::DegenerateDistanceField),
        };
        let width = field.width();
        let height = field.height();

        for _ in 0..self.iterations.max(1) {
            let snapshot = field.clone();
            for y in 0..height {
                for x in 0..width {
                    if !mask.is_free(x, y) {
                        continue;
                    }
                    let nd = distance.normalized_at(x, y, max);
                    let weight = self.weight(nd);
                    if weight <= 0.0 {
                        continue;
                    }

                    let original = snapshot.at(x, y);
                    let mut sum = original;
                    let mut weight_sum = 1.0f32;
                    for (dx, dy) in NEIGHBORS_8 {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        let neighbor_nd = distance.normalized_at(nx, ny, max);
                        // Neighbors closer to protected terrain weigh more,
                        // dragging the average toward the fixed heights.
                        let w = 1.0 + self.road_pull * (1.0 - neighbor_nd);
                        sum += snapshot.at(nx, ny) * w;
                        weight_sum += w;
                    }
                    let average = sum / weight_sum;
                    let mut smoothed = original + (average - original) * weight;

                    if self.detail_preservation > 0.0 {
                        let detail = (libm::sqrtf(local_variance(&snapshot, x, y))
                            * self.detail_preservation)
                            .min(1.0);
                        smoothed = smoothed + (original - smoothed) * detail;
                    }
                    field.set(x, y, smoothed);
                }
            }
        }
        Ok(())
    }

    fn weight(&self, nd: f32) -> f32 {
        match self.profile {
            WeightProfile::TwoPiece {
                plateau_threshold,
                falloff_power,
            } => {
                if nd <= plateau_threshold {
                    1.0
                } else if plateau_threshold >= 1.0 {
                    1.0
                } else {
                    let t = (nd - plateau_threshold) / (1.0 - plateau_threshold);
                    libm::powf((1.0 - t).max(0.0), falloff_power)
                }
            }
            WeightProfile::PowerLaw { power } => libm::powf((1.0 - nd).max(0.0), power),
        }
    }
}

/// Population variance of the 3×3 neighborhood around a cell.
fn local_variance(field: &HeightField, x: usize, y: usize) -> f32 {
    let width = field.width();
    let height = field.height();
    let mut values = [0.0f32; 9];
    let mut count = 0usize;
    values[count] = field.at(x, y);
    count += 1;
    for (dx, dy) in NEIGHBORS_8 {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
            continue;
        }
        values[count] = field.at(nx as usize, ny as usize);
        count += 1;
    }
    let mean = values[..count].iter().sum::<f32>() / count as f32;
    values[..count]
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f32>()
        / count as f32
}
