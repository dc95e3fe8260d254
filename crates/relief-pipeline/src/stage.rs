//! Closed stage enumerations over the generator and smoother families.
//!
//! Each variant carries its algorithm's parameter record. Serialization is
//! internally tagged (`"type": "..."`) so presets read naturally, and an
//! `Unknown` catch-all absorbs unrecognized tags instead of failing the
//! whole preset.

use relief_erode::{
    BoxSmoothConfig, DistanceWeightedConfig, ErodeError, HydraulicErosionConfig,
    ThermalErosionConfig,
};
use relief_gen::{
    MidpointDisplacementConfig, PerlinNoiseConfig, UniformShiftConfig, VoronoiPeaksConfig,
};
use relief_grid::{CellMask, DistanceField, HeightField};
use serde::{Deserialize, Serialize};

/// One generator entry in a preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneratorStage {
    /// Constant shift / floor rebase.
    UniformShift(UniformShiftConfig),
    /// Additive fractal noise.
    PerlinNoise(PerlinNoiseConfig),
    /// Random peak placement.
    VoronoiPeaks(VoronoiPeaksConfig),
    /// Diamond-square displacement.
    MidpointDisplacement(MidpointDisplacementConfig),
    /// Unrecognized type tag; a no-op kept only so the rest of the preset
    /// survives deserialization.
    #[serde(other)]
    Unknown,
}

impl GeneratorStage {
    /// Stage name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UniformShift(_) => "uniform-shift",
            Self::PerlinNoise(_) => "perlin-noise",
            Self::VoronoiPeaks(_) => "voronoi-peaks",
            Self::MidpointDisplacement(_) => "midpoint-displacement",
            Self::Unknown => "unknown",
        }
    }

    /// `true` for the catch-all variant.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Run the generator over the free region.
    pub fn apply<M: CellMask + ?Sized>(&self, field: &mut HeightField, mask: &M) {
        match self {
            Self::UniformShift(cfg) => cfg.apply(field, mask),
            Self::PerlinNoise(cfg) => cfg.apply(field, mask),
            Self::VoronoiPeaks(cfg) => cfg.apply(field, mask),
            Self::MidpointDisplacement(cfg) => cfg.apply(field, mask),
            Self::Unknown => {}
        }
    }
}

/// One smoother/erosion entry in a preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SmootherStage {
    /// Unweighted box smoothing.
    BoxSmooth(BoxSmoothConfig),
    /// Distance-weighted smoothing toward protected heights.
    DistanceWeighted(DistanceWeightedConfig),
    /// Talus-threshold material transfer.
    ThermalErosion(ThermalErosionConfig),
    /// Droplet simulation with sediment transport.
    HydraulicErosion(HydraulicErosionConfig),
    /// Unrecognized type tag; see [`GeneratorStage::Unknown`].
    #[serde(other)]
    Unknown,
}

impl SmootherStage {
    /// Stage name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BoxSmooth(_) => "box-smooth",
            Self::DistanceWeighted(_) => "distance-weighted",
            Self::ThermalErosion(_) => "thermal-erosion",
            Self::HydraulicErosion(_) => "hydraulic-erosion",
            Self::Unknown => "unknown",
        }
    }

    /// `true` for the catch-all variant.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether this algorithm reads the distance field. Callers must refuse
    /// to run it without one.
    pub fn needs_distance_field(&self) -> bool {
        matches!(self, Self::DistanceWeighted(_) | Self::HydraulicErosion(_))
    }

    /// Run the smoother over the free region.
    ///
    /// Fails without mutating the field when the stage needs a distance
    /// field and `distance` is `None`, or when the supplied field is
    /// degenerate for a stage that normalizes by it.
    pub fn apply<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        distance: Option<&DistanceField>,
    ) -> Result<(), ErodeError> {
        match self {
            Self::BoxSmooth(cfg) => {
                cfg.apply(field, mask);
                Ok(())
            }
            Self::DistanceWeighted(cfg) => {
                cfg.apply(field, mask, distance.ok_or(ErodeError::MissingDistanceField)?)
            }
            Self::ThermalErosion(cfg) => {
                cfg.apply(field, mask);
                Ok(())
            }
            Self::HydraulicErosion(cfg) => {
                cfg.apply(field, mask, distance.ok_or(ErodeError::MissingDistanceField)?)
            }
            Self::Unknown => Ok(()),
        }
    }
}
