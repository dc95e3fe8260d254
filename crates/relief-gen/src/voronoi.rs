//! Voronoi-style peak placement.
//!
//! Drops randomly placed peaks onto the grid and radiates a falloff profile
//! from each one. Peaks only ever raise terrain: a cell is written when the
//! profile's candidate height exceeds the current elevation, so successive
//! peaks (and earlier generators) accumulate as a max, never an overwrite.

use rand::Rng;
use relief_grid::{CellMask, HeightField};
use relief_noise::{Fbm, seeded_rng};
use serde::{Deserialize, Serialize};

/// Falloff profile radiated from a peak.
///
/// `d` is the straight-line distance from the peak normalized by the grid
/// diagonal; `h` the peak's target height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeakProfile {
    /// `(h - d) * fall_rate`
    Linear,
    /// `h - d^drop_off * fall_rate`
    Power,
    /// `h - d * fall_rate - d^drop_off`
    Combined,
    /// `h - (3d)^fall_rate - sin(2πd) / drop_off`
    SinPower,
    /// `h - d * fall_rate * fbm(...) * noise_amplitude`
    Noise,
}

/// Parameters for the Voronoi peaks generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiPeaksConfig {
    /// Number of peaks to attempt.
    pub peak_count: u32,
    /// Lower bound of the random target height per peak.
    pub min_height: f32,
    /// Upper bound of the random target height per peak.
    pub max_height: f32,
    /// Linear falloff rate.
    pub fall_rate: f32,
    /// Power/divisor term; see [`PeakProfile`].
    pub drop_off: f32,
    /// Falloff profile.
    pub profile: PeakProfile,
    /// Octaves for the [`PeakProfile::Noise`] modulation.
    pub octaves: u32,
    /// Persistence for the [`PeakProfile::Noise`] modulation.
    pub persistence: f32,
    /// Amplitude of the noise modulation term.
    pub noise_amplitude: f32,
    /// Sampling frequency of the noise modulation term. Coherent noise
    /// evaluated at whole-cell coordinates is constant, so this must be
    /// fractional to have any effect.
    pub noise_frequency: f32,
    /// RNG seed; 0 means non-deterministic.
    pub seed: u64,
}

impl Default for VoronoiPeaksConfig {
    fn default() -> Self {
        Self {
            peak_count: 16,
            min_height: 0.3,
            max_height: 0.9,
            fall_rate: 1.0,
            drop_off: 0.6,
            profile: PeakProfile::Linear,
            octaves: 4,
            persistence: 0.5,
            noise_amplitude: 1.0,
            noise_frequency: 0.1,
            seed: 0,
        }
    }
}

impl VoronoiPeaksConfig {
    /// Place peaks over the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        let width = field.width();
        let height = field.height();
        if width == 0 || height == 0 {
            return;
        }
        let mut rng = seeded_rng(self.seed);
        let fbm = Fbm::new(rng.random());
        let diagonal = libm::hypotf(width as f32, height as f32);
        let progress_step = (self.peak_count / 10).max(1);

        for peak in 0..self.peak_count {
            if peak % progress_step == 0 {
                log::debug!("voronoi peaks: {peak}/{}", self.peak_count);
            }
            // Draw position and target up front so a skipped peak still
            // consumes the same RNG values and later peaks stay put.
            let px = rng.random_range(0..width);
            let py = rng.random_range(0..height);
            let target = if self.max_height > self.min_height {
                rng.random_range(self.min_height..self.max_height)
            } else {
                self.min_height
            };

            // Never carve a divot: an already-higher cell cancels the peak.
            if field.at(px, py) >= target {
                continue;
            }
            // A peak whose apex cannot be written would radiate a plateau
            // instead of a peak; skip it entirely.
            if !mask.is_free(px, py) {
                continue;
            }
            field.set(px, py, target);

            for y in 0..height {
                for x in 0..width {
                    if (x, y) == (px, py) {
                        continue;
                    }
                    let dx = x as f32 - px as f32;
                    let dy = y as f32 - py as f32;
                    let d = libm::hypotf(dx, dy) / diagonal;
                    let candidate = self.profile_height(target, d, x, y, &fbm);
                    if candidate > field.at(x, y) && mask.is_free(x, y) {
                        field.set(x, y, candidate);
                    }
                }
            }
        }
    }

    fn profile_height(&self, peak: f32, d: f32, x: usize, y: usize, fbm: &Fbm) -> f32 {
        match self.profile {
            PeakProfile::Linear => (peak - d) * self.fall_rate,
            PeakProfile::Power => peak - libm::powf(d, self.drop_off) * self.fall_rate,
            PeakProfile::Combined => peak - d * self.fall_rate - libm::powf(d, self.drop_off),
            PeakProfile::SinPower => {
                peak - libm::powf(3.0 * d, self.fall_rate)
                    - libm::sinf(std::f32::consts::TAU * d) / self.drop_off
            }
            PeakProfile::Noise => {
                let n = fbm.sample(
                    x as f32 * self.noise_frequency,
                    y as f32 * self.noise_frequency,
                    self.octaves,
                    self.persistence,
                );
                peak - d * self.fall_rate * n * self.noise_amplitude
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_grid::GridMask;

    fn one_peak(profile: PeakProfile) -> VoronoiPeaksConfig {
        VoronoiPeaksConfig {
            peak_count: 1,
            min_height: 0.8,
            max_height: 0.8,
            profile,
            seed: 11,
            ..Default::default()
        }
    }

    #[test]
    fn test_peak_raises_terrain() {
        let mut field = HeightField::new(16, 16);
        one_peak(PeakProfile::Linear).apply(&mut field, &GridMask::all_free(16, 16));
        let max = field.data().iter().cloned().fold(f32::MIN, f32::max);
        assert!((max - 0.8).abs() < 1e-6, "apex should hit the target");
    }

    #[test]
    fn test_never_lowers_existing_terrain() {
        let mask = GridMask::all_free(12, 12);
        let mut field = HeightField::new(12, 12);
        field.fill_free(&mask, 0.85);
        let before = field.clone();
        let cfg = VoronoiPeaksConfig {
            peak_count: 8,
            min_height: 0.2,
            max_height: 0.8,
            seed: 3,
            ..Default::default()
        };
        cfg.apply(&mut field, &mask);
        // Every target draw is below the existing 0.85, so nothing changes.
        assert_eq!(field, before);
    }

    #[test]
    fn test_masking_is_bit_exact() {
        let mut mask = GridMask::all_free(16, 16);
        mask.protect_rect(4, 4, 8, 8);
        let mut field = HeightField::new(16, 16);
        field.set(5, 5, 0.123);
        let snapshot = field.clone();
        let cfg = VoronoiPeaksConfig {
            peak_count: 12,
            seed: 21,
            ..Default::default()
        };
        cfg.apply(&mut field, &mask);
        for y in 4..=8 {
            for x in 4..=8 {
                assert_eq!(
                    field.at(x, y).to_bits(),
                    snapshot.at(x, y).to_bits(),
                    "protected cell ({x}, {y}) changed"
                );
            }
        }
    }

    #[test]
    fn test_deterministic_under_fixed_seed() {
        for profile in [
            PeakProfile::Linear,
            PeakProfile::Power,
            PeakProfile::Combined,
            PeakProfile::SinPower,
            PeakProfile::Noise,
        ] {
            let mask = GridMask::all_free(10, 10);
            let cfg = VoronoiPeaksConfig {
                peak_count: 4,
                seed: 99,
                profile,
                ..Default::default()
            };
            let mut a = HeightField::new(10, 10);
            let mut b = HeightField::new(10, 10);
            cfg.apply(&mut a, &mask);
            cfg.apply(&mut b, &mask);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_linear_profile_decays_with_distance() {
        let mut field = HeightField::new(32, 32);
        one_peak(PeakProfile::Linear).apply(&mut field, &GridMask::all_free(32, 32));
        // Locate the apex, then check the profile drops along a row.
        let (mut ax, mut ay, mut apex) = (0, 0, f32::MIN);
        for y in 0..32 {
            for x in 0..32 {
                if field.at(x, y) > apex {
                    apex = field.at(x, y);
                    ax = x;
                    ay = y;
                }
            }
        }
        let near = field.at(
            (ax + 1).min(31),
            ay,
        );
        let far = field.at(if ax > 15 { 0 } else { 31 }, ay);
        assert!(apex >= near && near > far);
    }
}
