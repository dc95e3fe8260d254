//! Preset persistence.
//!
//! A preset is a value: an ordered list of generator stages, an ordered list
//! of smoother stages, and the reset flag. Cloning deep-copies every
//! contained config, so presets can be edited and re-run without aliasing.
//!
//! Loading is tolerant: unknown fields are ignored, missing fields fall back
//! to each algorithm's defaults, and an entry with an unrecognized type tag
//! is skipped with a warning while the rest of the preset loads.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PresetError;
use crate::stage::{GeneratorStage, SmootherStage};

/// An ordered transform recipe.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Zero the free region before the generators run.
    pub reset_free_region: bool,
    /// Generators, applied in order.
    pub generators: Vec<GeneratorStage>,
    /// Smoothers/erosion passes, applied in order after the generators.
    pub smoothers: Vec<SmootherStage>,
}

impl Preset {
    /// Parse a preset from JSON.
    ///
    /// Returns the preset and the number of entries skipped for carrying an
    /// unknown type tag.
    pub fn from_json(json: &str) -> Result<(Self, usize), PresetError> {
        let mut preset: Preset = serde_json::from_str(json).map_err(PresetError::Parse)?;
        let skipped = preset.strip_unknown();
        Ok((preset, skipped))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PresetError> {
        serde_json::to_string_pretty(self).map_err(PresetError::Serialize)
    }

    /// Load a preset file.
    pub fn load(path: &Path) -> Result<(Self, usize), PresetError> {
        let json = std::fs::read_to_string(path).map_err(PresetError::Read)?;
        Self::from_json(&json)
    }

    /// Write a preset file.
    pub fn save(&self, path: &Path) -> Result<(), PresetError> {
        std::fs::write(path, self.to_json()?).map_err(PresetError::Write)
    }

    /// Drop entries whose type tag was not recognized, warning per entry.
    fn strip_unknown(&mut self) -> usize {
        let mut skipped = 0usize;
        self.generators.retain(|stage| {
            if stage.is_unknown() {
                log::warn!("preset: skipping generator entry with unknown type tag");
                skipped += 1;
                false
            } else {
                true
            }
        });
        self.smoothers.retain(|stage| {
            if stage.is_unknown() {
                log::warn!("preset: skipping smoother entry with unknown type tag");
                skipped += 1;
                false
            } else {
                true
            }
        });
        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_erode::{BoxSmoothConfig, HydraulicErosionConfig, ThermalErosionConfig};
    use relief_gen::{PerlinNoiseConfig, ShiftMode, UniformShiftConfig, VoronoiPeaksConfig};

    fn sample_preset() -> Preset {
        Preset {
            reset_free_region: true,
            generators: vec![
                GeneratorStage::UniformShift(UniformShiftConfig {
                    step: 0.05,
                    mode: ShiftMode::Raise,
                }),
                GeneratorStage::PerlinNoise(PerlinNoiseConfig {
                    seed: 12,
                    octaves: 5,
                    ..Default::default()
                }),
                GeneratorStage::VoronoiPeaks(VoronoiPeaksConfig {
                    peak_count: 3,
                    seed: 4,
                    ..Default::default()
                }),
            ],
            smoothers: vec![
                SmootherStage::ThermalErosion(ThermalErosionConfig {
                    iterations: 2,
                    ..Default::default()
                }),
                SmootherStage::HydraulicErosion(HydraulicErosionConfig {
                    droplet_count: 100,
                    seed: 7,
                    ..Default::default()
                }),
                SmootherStage::BoxSmooth(BoxSmoothConfig { iterations: 1 }),
            ],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let preset = sample_preset();
        let json = preset.to_json().unwrap();
        let (back, skipped) = Preset::from_json(&json).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(back, preset);
    }

    #[test]
    fn test_unknown_type_tag_skipped_rest_loads() {
        let json = r#"{
            "reset_free_region": false,
            "generators": [
                { "type": "UniformShift", "step": 0.2, "mode": "Raise" },
                { "type": "LavaFlow", "viscosity": 9.5 },
                { "type": "PerlinNoise", "seed": 3 }
            ],
            "smoothers": [
                { "type": "GlacialCarve" },
                { "type": "BoxSmooth", "iterations": 2 }
            ]
        }"#;
        let (preset, skipped) = Preset::from_json(json).unwrap();
        assert_eq!(skipped, 2);
        assert_eq!(preset.generators.len(), 2);
        assert_eq!(preset.smoothers.len(), 1);
        assert!(matches!(
            preset.generators[0],
            GeneratorStage::UniformShift(_)
        ));
        assert!(matches!(preset.smoothers[0], SmootherStage::BoxSmooth(_)));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let json = r#"{
            "generators": [ { "type": "PerlinNoise" } ],
            "smoothers": [ { "type": "ThermalErosion", "talus": 0.25 } ]
        }"#;
        let (preset, skipped) = Preset::from_json(json).unwrap();
        assert_eq!(skipped, 0);
        assert!(!preset.reset_free_region);
        match &preset.generators[0] {
            GeneratorStage::PerlinNoise(cfg) => {
                assert_eq!(cfg.octaves, PerlinNoiseConfig::default().octaves);
            }
            other => panic!("unexpected stage: {other:?}"),
        }
        match &preset.smoothers[0] {
            SmootherStage::ThermalErosion(cfg) => {
                assert_eq!(cfg.talus, 0.25);
                assert_eq!(cfg.erosion_rate, ThermalErosionConfig::default().erosion_rate);
            }
            other => panic!("unexpected stage: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{
            "generators": [ { "type": "UniformShift", "step": 0.1, "wobble": true } ],
            "smoothers": [],
            "editor_metadata": { "author": "someone" }
        }"#;
        let (preset, skipped) = Preset::from_json(json).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(preset.generators.len(), 1);
    }

    #[test]
    fn test_clone_is_deep() {
        let preset = sample_preset();
        let mut copy = preset.clone();
        if let GeneratorStage::UniformShift(cfg) = &mut copy.generators[0] {
            cfg.step = 9.0;
        }
        match &preset.generators[0] {
            GeneratorStage::UniformShift(cfg) => assert_eq!(cfg.step, 0.05),
            other => panic!("unexpected stage: {other:?}"),
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");
        let preset = sample_preset();
        preset.save(&path).unwrap();
        let (back, skipped) = Preset::load(&path).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(back, preset);
    }
}
