//! Thermal (talus) erosion.
//!
//! Material slides from a cell to any lower free neighbor whenever the
//! height difference exceeds the talus threshold. Transfers move elevation,
//! they never create or destroy it, so the grid total is conserved across
//! any number of passes.

use relief_grid::{CellMask, HeightField, NEIGHBORS_8};
use serde::{Deserialize, Serialize};

use crate::road::nearest_protected;

/// Parameters for thermal erosion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalErosionConfig {
    /// Number of passes. Minimum 1.
    pub iterations: u32,
    /// Maximum stable height difference between neighbors.
    pub talus: f32,
    /// Fraction of the excess difference transferred per pass.
    pub erosion_rate: f32,
    /// Scale talus/rate by proximity to the nearest protected cell,
    /// tightening the allowed slope near protected boundaries.
    pub road_aware: bool,
    /// Search radius (in steps) for the road-aware proximity lookup.
    pub road_search_radius: u32,
    /// Talus multiplier right at a protected boundary (interpolates to 1 at
    /// the search radius).
    pub road_talus_scale: f32,
    /// Transfer-rate multiplier right at a protected boundary.
    pub road_rate_scale: f32,
}

impl Default for ThermalErosionConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            talus: 0.1,
            erosion_rate: 0.5,
            road_aware: false,
            road_search_radius: 8,
            road_talus_scale: 0.25,
            road_rate_scale: 0.5,
        }
    }
}

impl ThermalErosionConfig {
    /// Run the erosion over the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        let width = field.width();
        let height = field.height();
        for pass in 0..self.iterations.max(1) {
            log::debug!("thermal erosion: pass {pass}");
            let snapshot = field.clone();
            for y in 0..height {
                for x in 0..width {
                    if !mask.is_free(x, y) {
                        continue;
                    }
                    let (talus, rate) = self.local_params(mask, width, height, x, y);
                    for (dx, dy) in NEIGHBORS_8 {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        if !mask.is_free(nx, ny) {
                            continue;
                        }
                        let diff = snapshot.at(x, y) - snapshot.at(nx, ny);
                        if diff > talus {
                            let transfer = (diff - talus) * rate;
                            field.add(x, y, -transfer);
                            field.add(nx, ny, transfer);
                        }
                    }
                }
            }
        }
    }

    /// Effective talus/rate at a cell, tightened near protected boundaries
    /// in the road-aware variant.
    fn local_params<M: CellMask + ?Sized>(
        &self,
        mask: &M,
        width: usize,
        height: usize,
        x: usize,
        y: usize,
    ) -> (f32, f32) {
        if !self.road_aware || self.road_search_radius == 0 {
            return (self.talus, self.erosion_rate);
        }
        match nearest_protected(mask, width, height, x, y, self.road_search_radius) {
            Some((_, _, steps)) => {
                let proximity = 1.0 - steps as f32 / self.road_search_radius as f32;
                let talus_scale = 1.0 + (self.road_talus_scale - 1.0) * proximity;
                let rate_scale = 1.0 + (self.road_rate_scale - 1.0) * proximity;
                (self.talus * talus_scale, self.erosion_rate * rate_scale)
            }
            None => (self.talus, self.erosion_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_grid::GridMask;

    #[test]
    fn test_spike_example_conserves_total() {
        // 5x5 all-free grid, only (0, 0) raised: one pass drops the corner,
        // raises its free neighbors, and preserves the total of 1.0.
        let mask = GridMask::all_free(5, 5);
        let mut field = HeightField::new(5, 5);
        field.set(0, 0, 1.0);
        let cfg = ThermalErosionConfig {
            iterations: 1,
            talus: 0.1,
            erosion_rate: 0.5,
            ..Default::default()
        };
        cfg.apply(&mut field, &mask);
        assert!(field.at(0, 0) < 1.0);
        assert!(field.at(1, 0) > 0.0);
        assert!(field.at(0, 1) > 0.0);
        assert!(field.at(1, 1) > 0.0);
        assert!((field.total_elevation() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_conservation_over_many_passes() {
        let mask = GridMask::all_free(16, 16);
        let mut field = HeightField::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                field.set(x, y, ((x * 7 + y * 13) % 11) as f32 / 11.0);
            }
        }
        let total_before = field.total_elevation();
        ThermalErosionConfig {
            iterations: 20,
            ..Default::default()
        }
        .apply(&mut field, &mask);
        assert!((field.total_elevation() - total_before).abs() < 1e-3);
    }

    #[test]
    fn test_below_talus_slope_is_stable() {
        let mask = GridMask::all_free(4, 1);
        let mut field = HeightField::new(4, 1);
        for x in 0..4 {
            field.set(x, 0, x as f32 * 0.05);
        }
        let before = field.clone();
        ThermalErosionConfig {
            talus: 0.1,
            ..Default::default()
        }
        .apply(&mut field, &mask);
        assert_eq!(field, before);
    }

    #[test]
    fn test_no_transfer_across_protected_cells() {
        let mut mask = GridMask::all_free(3, 1);
        mask.protect(1, 0);
        let mut field = HeightField::new(3, 1);
        field.set(0, 0, 1.0);
        field.set(1, 0, 0.0);
        ThermalErosionConfig::default().apply(&mut field, &mask);
        // The protected valley between the spike and (2, 0) blocks flow in
        // the 4-neighborhood, but (0,0)-(2,0) are not adjacent at all here,
        // so nothing moves.
        assert_eq!(field.at(0, 0), 1.0);
        assert_eq!(field.at(1, 0), 0.0);
        assert_eq!(field.at(2, 0), 0.0);
    }

    #[test]
    fn test_road_aware_tightens_near_protected() {
        // Same spike, once far from and once next to a protected cell: the
        // road-aware variant moves less material near the boundary.
        let cfg = ThermalErosionConfig {
            road_aware: true,
            road_search_radius: 4,
            road_talus_scale: 0.5,
            road_rate_scale: 0.25,
            ..Default::default()
        };

        let mut far_mask = GridMask::all_free(9, 9);
        far_mask.protect(8, 8);
        let mut far = HeightField::new(9, 9);
        far.set(0, 0, 1.0);
        cfg.apply(&mut far, &far_mask);

        let mut near_mask = GridMask::all_free(9, 9);
        near_mask.protect(1, 1);
        let mut near = HeightField::new(9, 9);
        near.set(0, 0, 1.0);
        cfg.apply(&mut near, &near_mask);

        let moved_far = 1.0 - far.at(0, 0);
        let moved_near = 1.0 - near.at(0, 0);
        assert!(moved_near < moved_far);
    }

    #[test]
    fn test_masking_is_bit_exact() {
        let mut mask = GridMask::all_free(8, 8);
        mask.protect_rect(3, 0, 4, 7);
        let mut field = HeightField::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                field.set(x, y, (x as f32) * 0.2);
            }
        }
        let snapshot = field.clone();
        ThermalErosionConfig {
            iterations: 3,
            ..Default::default()
        }
        .apply(&mut field, &mask);
        for y in 0..8 {
            for x in 3..=4 {
                assert_eq!(field.at(x, y).to_bits(), snapshot.at(x, y).to_bits());
            }
        }
    }
}
