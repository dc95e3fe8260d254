//! Radial distribution kernel for erosion and deposition.

/// A precomputed radial brush.
///
/// Cell weights follow `1 - (dist / radius)^falloff` and are normalized to
/// sum to 1, so distributing an amount through the brush conserves it when
/// no brush cell is rejected.
#[derive(Clone, Debug)]
pub struct Brush {
    offsets: Vec<(i32, i32)>,
    weights: Vec<f32>,
}

impl Brush {
    /// Build a brush of the given radius and falloff exponent.
    ///
    /// A radius of 0 produces a single-cell brush with weight 1.
    pub fn new(radius: u32, falloff: f32) -> Self {
        if radius == 0 {
            return Self {
                offsets: vec![(0, 0)],
                weights: vec![1.0],
            };
        }
        let r = radius as i32;
        let rf = radius as f32;
        let mut offsets = Vec::new();
        let mut weights = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = libm::hypotf(dx as f32, dy as f32);
                if dist > rf {
                    continue;
                }
                let w = 1.0 - libm::powf(dist / rf, falloff);
                if w <= 0.0 {
                    continue;
                }
                offsets.push((dx, dy));
                weights.push(w);
            }
        }
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { offsets, weights }
    }

    /// Iterate `(dx, dy, weight)` entries.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        self.offsets
            .iter()
            .zip(&self.weights)
            .map(|(&(dx, dy), &w)| (dx, dy, w))
    }

    /// Number of cells the brush covers.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// `true` when the brush covers no cells (never happens in practice).
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        for radius in [1u32, 2, 4, 8] {
            let brush = Brush::new(radius, 1.0);
            let total: f32 = brush.cells().map(|(_, _, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-5, "radius {radius}: {total}");
        }
    }

    #[test]
    fn test_zero_radius_is_point_brush() {
        let brush = Brush::new(0, 2.0);
        assert_eq!(brush.len(), 1);
        let (dx, dy, w) = brush.cells().next().unwrap();
        assert_eq!((dx, dy), (0, 0));
        assert_eq!(w, 1.0);
    }

    #[test]
    fn test_center_has_largest_weight() {
        let brush = Brush::new(3, 1.5);
        let center = brush
            .cells()
            .find(|&(dx, dy, _)| dx == 0 && dy == 0)
            .unwrap()
            .2;
        for (dx, dy, w) in brush.cells() {
            if (dx, dy) != (0, 0) {
                assert!(w <= center);
            }
        }
    }

    #[test]
    fn test_falloff_shrinks_edge_weights() {
        let gentle = Brush::new(4, 0.5);
        let steep = Brush::new(4, 4.0);
        let edge = |b: &Brush| {
            b.cells()
                .find(|&(dx, dy, _)| dx == 3 && dy == 0)
                .map(|(_, _, w)| w)
                .unwrap()
        };
        // A larger falloff exponent keeps weights flat out to the rim, so
        // the edge-to-center ratio grows with it.
        let gentle_ratio = edge(&gentle)
            / gentle
                .cells()
                .find(|&(dx, dy, _)| dx == 0 && dy == 0)
                .unwrap()
                .2;
        let steep_ratio = edge(&steep)
            / steep
                .cells()
                .find(|&(dx, dy, _)| dx == 0 && dy == 0)
                .unwrap()
                .2;
        assert!(gentle_ratio < steep_ratio);
    }
}
