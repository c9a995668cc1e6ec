//! Error types for layer payload operations.

use thiserror::Error;

/// Errors raised by raster grid operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// Allocation was requested with a non-positive dimension.
    #[error("invalid raster dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    /// A sample access fell outside the allocated grid.
    #[error("sample ({row}, {col}) out of range for {height}x{width} raster")]
    OutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// The grid has not been allocated yet.
    #[error("raster grid has not been allocated")]
    NotAllocated,

    /// A geotransform with a zero pixel size was rejected.
    #[error("invalid geotransform: pixel size must be non-zero")]
    InvalidGeotransform,
}

/// Errors raised by vector geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    /// A geometry was added with no coordinates.
    #[error("geometry must have at least one coordinate")]
    EmptyCoordinates,

    /// A geometry index fell outside the stored sequence.
    #[error("geometry index {index} out of range ({len} geometries)")]
    OutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_error_display() {
        let err = RasterError::OutOfRange {
            row: 9,
            col: 2,
            width: 4,
            height: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("(9, 2)"), "message should name the sample");
        assert!(msg.contains("4x4"), "message should name the shape");
    }

    #[test]
    fn test_vector_error_display() {
        assert_eq!(
            VectorError::EmptyCoordinates.to_string(),
            "geometry must have at least one coordinate"
        );
        let err = VectorError::OutOfRange { index: 3, len: 2 };
        assert!(err.to_string().contains("index 3"));
    }
}
