//! Binary serialization for [`DistanceField`].
//!
//! ## Binary layout (little-endian)
//!
//! | Offset | Size  | Field |
//! |--------|-------|-------|
//! | 0      | 4     | Width (`i32`) |
//! | 4      | 4     | Height (`i32`) |
//! | 8      | 4×W×H | Distances (`i32`, row-major, sentinel = `i32::MAX`) |
//!
//! The blob carries no identity of the mask it was computed for; callers key
//! stored blobs externally (per scene/terrain) and must reject a blob whose
//! dimensions disagree with the current grid.

use crate::distance::DistanceField;

/// Errors that can occur when decoding a distance-field blob.
#[derive(Debug, thiserror::Error)]
pub enum DistanceSerError {
    /// The data is shorter than its header or payload requires.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
    /// The data continues past the declared payload.
    #[error("unexpected trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingData {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
    /// The stored dimensions are non-positive or overflow the address space.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Stored width.
        width: i32,
        /// Stored height.
        height: i32,
    },
}

impl DistanceField {
    /// Serialize to the binary blob format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.cells().len() * 4);
        buf.extend_from_slice(&(self.width() as i32).to_le_bytes());
        buf.extend_from_slice(&(self.height() as i32).to_le_bytes());
        for &d in self.cells() {
            buf.extend_from_slice(&d.to_le_bytes());
        }
        buf
    }

    /// Deserialize from the binary blob format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DistanceSerError> {
        if data.len() < 8 {
            return Err(DistanceSerError::Truncated {
                expected: 8,
                actual: data.len(),
            });
        }
        let width = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let height = i32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if width <= 0 || height <= 0 {
            return Err(DistanceSerError::InvalidDimensions { width, height });
        }
        let cell_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(DistanceSerError::InvalidDimensions { width, height })?;
        let expected = 8 + cell_count * 4;
        if data.len() < expected {
            return Err(DistanceSerError::Truncated {
                expected,
                actual: data.len(),
            });
        }
        if data.len() > expected {
            return Err(DistanceSerError::TrailingData {
                expected,
                actual: data.len(),
            });
        }

        let mut cells = Vec::with_capacity(cell_count);
        for chunk in data[8..].chunks_exact(4) {
            cells.push(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        Ok(DistanceField::from_cells(
            width as usize,
            height as usize,
            cells,
        ))
    }
}
