//! Additive fractal-noise generator.

use relief_grid::{CellMask, HeightField};
use relief_noise::{Fbm, resolve_seed};
use serde::{Deserialize, Serialize};

/// Parameters for the Perlin/fBM generator.
///
/// For every free cell the generator adds
/// `fbm((x + x_offset) * x_frequency, (y + y_offset) * y_frequency) * amplitude`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinNoiseConfig {
    /// Offset added to the cell x coordinate before scaling.
    pub x_offset: f32,
    /// Offset added to the cell y coordinate before scaling.
    pub y_offset: f32,
    /// Frequency applied along x.
    pub x_frequency: f32,
    /// Frequency applied along y.
    pub y_frequency: f32,
    /// Number of noise octaves.
    pub octaves: u32,
    /// Per-octave amplitude scale. Values above 1 grow later octaves'
    /// contribution; the kernel normalizes either way.
    pub persistence: f32,
    /// Scale of the summed noise added to each cell.
    pub amplitude: f32,
    /// Noise permutation seed; 0 draws a random permutation.
    pub seed: u64,
}

impl Default for PerlinNoiseConfig {
    fn default() -> Self {
        Self {
            x_offset: 0.0,
            y_offset: 0.0,
            x_frequency: 0.02,
            y_frequency: 0.02,
            octaves: 4,
            persistence: 0.5,
            amplitude: 0.3,
            seed: 0,
        }
    }
}

impl PerlinNoiseConfig {
    /// Add layered noise over the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        let fbm = Fbm::new(resolve_seed(self.seed));
        for y in 0..field.height() {
            for x in 0..field.width() {
                if !mask.is_free(x, y) {
                    continue;
                }
                let nx = (x as f32 + self.x_offset) * self.x_frequency;
                let ny = (y as f32 + self.y_offset) * self.y_frequency;
                let value = fbm.sample(nx, ny, self.octaves, self.persistence);
                field.add(x, y, value * self.amplitude);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_grid::GridMask;

    fn seeded() -> PerlinNoiseConfig {
        PerlinNoiseConfig {
            seed: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_protected_cells_untouched() {
        let mut field = HeightField::new(8, 8);
        let mut mask = GridMask::all_free(8, 8);
        mask.protect_rect(0, 0, 7, 0);
        seeded().apply(&mut field, &mask);
        for x in 0..8 {
            assert_eq!(field.at(x, 0).to_bits(), 0.0f32.to_bits());
        }
        assert!(field.data().iter().any(|&h| h != 0.0));
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let mask = GridMask::all_free(16, 16);
        let mut a = HeightField::new(16, 16);
        let mut b = HeightField::new(16, 16);
        seeded().apply(&mut a, &mask);
        seeded().apply(&mut b, &mask);
        assert_eq!(a, b);
    }

    #[test]
    fn test_additions_bounded_by_amplitude() {
        let mut field = HeightField::new(12, 12);
        let cfg = seeded();
        cfg.apply(&mut field, &GridMask::all_free(12, 12));
        for &h in field.data() {
            assert!(h >= -1e-4 && h <= cfg.amplitude + 1e-4);
        }
    }

    #[test]
    fn test_composes_additively() {
        let mask = GridMask::all_free(4, 4);
        let mut field = HeightField::new(4, 4);
        field.fill_free(&mask, 1.0);
        let cfg = seeded();
        cfg.apply(&mut field, &mask);
        let mut reference = HeightField::new(4, 4);
        cfg.apply(&mut reference, &mask);
        for (a, b) in field.data().iter().zip(reference.data()) {
            assert!((a - (b + 1.0)).abs() < 1e-6);
        }
    }
}
