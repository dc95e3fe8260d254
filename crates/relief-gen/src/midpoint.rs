//! Midpoint-displacement (diamond-square) generator.
//!
//! Runs the classic diamond-square recursion on a working buffer sized to a
//! power-of-two-plus-one square fitted to the grid, then blends the result
//! additively into the height field so it composes with earlier passes.
//! Protected cells can feed their live height-field values into the
//! averaging steps, anchoring the displacement to the fixed terrain around
//! them.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use relief_grid::{CellMask, HeightField};
use relief_noise::seeded_rng;
use serde::{Deserialize, Serialize};

/// Sign behavior of the per-step random offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomMode {
    /// Uniform in `[0, range]`.
    Absolute,
    /// Uniform in `[-range/2, range/2]`.
    Bipolar,
}

/// How the finished working buffer is mapped back into the height range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeMode {
    /// Rescale the buffer's min/max over free cells to `[min_height, max_height]`.
    Normalize,
    /// Clamp each value to `[min_height, max_height]`.
    Clamp,
}

/// Parameters for the midpoint-displacement generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidpointDisplacementConfig {
    /// Lower bound of the produced height range.
    pub min_height: f32,
    /// Upper bound of the produced height range.
    pub max_height: f32,
    /// Fraction of the height range used for the corner seeds and the
    /// first iteration's random offsets.
    pub initial_random_range: f32,
    /// Per-iteration decay exponent: the random range shrinks by
    /// `2^-roughness` after each full square+diamond pass.
    pub roughness: f32,
    /// Scale applied when adding the finished buffer into the height field.
    pub displacement_strength: f32,
    /// Random offset mode.
    pub random_mode: RandomMode,
    /// Substitute live height-field values (scaled by the height range) for
    /// protected corners/neighbors during averaging.
    pub blend_protected: bool,
    /// Post-recursion mapping back into the height range.
    pub normalize: NormalizeMode,
    /// RNG seed; 0 means non-deterministic.
    pub seed: u64,
}

impl Default for MidpointDisplacementConfig {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 1.0,
            initial_random_range: 0.5,
            roughness: 1.0,
            displacement_strength: 0.5,
            random_mode: RandomMode::Bipolar,
            blend_protected: true,
            normalize: NormalizeMode::Normalize,
            seed: 0,
        }
    }
}

impl MidpointDisplacementConfig {
    /// Run the displacement and blend it into the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        let width = field.width();
        let height = field.height();
        let side = width.min(height).saturating_sub(1).next_power_of_two();
        if side <= 1 {
            // Degenerate working size: the recursion has nothing to split.
            return;
        }
        let dim = side + 1;
        let range = self.max_height - self.min_height;
        let midpoint = (self.min_height + self.max_height) * 0.5;
        let mut rng = seeded_rng(self.seed);
        let mut buf = vec![0.0f32; dim * dim];

        log::debug!("midpoint displacement: {dim}x{dim} buffer on {width}x{height} grid");

        // Corner seeds.
        let mut amp = self.initial_random_range * range;
        for (cx, cy) in [(0, 0), (side, 0), (0, side), (side, side)] {
            buf[cy * dim + cx] = midpoint + self.draw(&mut rng, amp);
        }

        let mut step = side;
        while step > 1 {
            let half = step / 2;

            // Square step: every square center averages its four corners.
            for cy in (half..side).step_by(step) {
                for cx in (half..side).step_by(step) {
                    let sum = self.corner_value(&buf, field, mask, dim, cx - half, cy - half, range)
                        + self.corner_value(&buf, field, mask, dim, cx + half, cy - half, range)
                        + self.corner_value(&buf, field, mask, dim, cx - half, cy + half, range)
                        + self.corner_value(&buf, field, mask, dim, cx + half, cy + half, range);
                    buf[cy * dim + cx] = sum / 4.0 + self.draw(&mut rng, amp);
                }
            }

            // Diamond step: every edge midpoint averages its available
            // axis neighbors.
            for y in (0..=side).step_by(half) {
                let x0 = if (y / half) % 2 == 0 { half } else { 0 };
                for x in (x0..=side).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0u32;
                    if x >= half {
                        sum += self.corner_value(&buf, field, mask, dim, x - half, y, range);
                        count += 1;
                    }
                    if x + half <= side {
                        sum += self.corner_value(&buf, field, mask, dim, x + half, y, range);
                        count += 1;
                    }
                    if y >= half {
                        sum += self.corner_value(&buf, field, mask, dim, x, y - half, range);
                        count += 1;
                    }
                    if y + half <= side {
                        sum += self.corner_value(&buf, field, mask, dim, x, y + half, range);
                        count += 1;
                    }
                    buf[y * dim + x] = sum / count as f32 + self.draw(&mut rng, amp);
                }
            }

            amp *= libm::powf(2.0, -self.roughness);
            step = half;
        }

        self.blend(field, mask, &buf, dim);
    }

    /// Buffer value at a lattice point, or the live height-field value
    /// (scaled by the height range) when the point lands on a protected
    /// cell and protected blending is on.
    fn corner_value<M: CellMask + ?Sized>(
        &self,
        buf: &[f32],
        field: &HeightField,
        mask: &M,
        dim: usize,
        bx: usize,
        by: usize,
        range: f32,
    ) -> f32 {
        if self.blend_protected {
            let gx = bx.min(field.width() - 1);
            let gy = by.min(field.height() - 1);
            if !mask.is_free(gx, gy) {
                return field.at(gx, gy) * range;
            }
        }
        buf[by * dim + bx]
    }

    fn draw(&self, rng: &mut ChaCha8Rng, amp: f32) -> f32 {
        if amp <= 0.0 {
            return 0.0;
        }
        match self.random_mode {
            RandomMode::Absolute => rng.random_range(0.0..amp),
            RandomMode::Bipolar => rng.random_range(-amp / 2.0..amp / 2.0),
        }
    }

    /// Map the buffer back into the height range and add it to the free region.
    fn blend<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        buf: &[f32],
        dim: usize,
    ) {
        let width = field.width();
        let height = field.height();
        let midpoint = (self.min_height + self.max_height) * 0.5;

        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        if matches!(self.normalize, NormalizeMode::Normalize) {
            for by in 0..dim.min(height) {
                for bx in 0..dim.min(width) {
                    if mask.is_free(bx, by) {
                        let v = buf[by * dim + bx];
                        lo = lo.min(v);
                        hi = hi.max(v);
                    }
                }
            }
        }

        for by in 0..dim.min(height) {
            for bx in 0..dim.min(width) {
                if !mask.is_free(bx, by) {
                    continue;
                }
                let v = buf[by * dim + bx];
                let mapped = match self.normalize {
                    NormalizeMode::Normalize => {
                        if hi > lo {
                            self.min_height + (v - lo) / (hi - lo) * (self.max_height - self.min_height)
                        } else {
                            midpoint
                        }
                    }
                    NormalizeMode::Clamp => v.clamp(self.min_height, self.max_height),
                };
                field.add(bx, by, mapped * self.displacement_strength);
            }
        }
    }
}
