//! Pipeline and preset error types.

use relief_erode::ErodeError;

/// Errors from loading or saving presets.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    /// Failed to read the preset file from disk.
    #[error("failed to read preset: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write the preset file to disk.
    #[error("failed to write preset: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to parse the preset JSON.
    #[error("failed to parse preset: {0}")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize the preset to JSON.
    #[error("failed to serialize preset: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors from running a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The height field has zero cells.
    #[error("height field has no cells")]
    EmptyGrid,

    /// A smoother stage failed; earlier stages have already been applied,
    /// the failing stage has not touched the field.
    #[error("stage {stage}: {source}")]
    Stage {
        /// Name of the failing stage.
        stage: &'static str,
        /// Underlying failure.
        #[source]
        source: ErodeError,
    },
}
