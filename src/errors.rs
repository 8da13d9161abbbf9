//! Error types for footprint extraction
//!
//! Errors fall in two groups. The extraction errors (`GeoConversion`,
//! `InsufficientSamples`, `RasterRead`, `NoValidSamples`) are scoped to one
//! observation and one layer and are normally recorded on the observation.
//! Everything else aborts the run.

use std::io;
use thiserror::Error;

/// Errors raised while sampling, reading or reducing raster values
#[derive(Debug, Error)]
pub enum FootprintError {
    /// Latitude too close to a pole for a meters to degrees conversion
    #[error("cannot convert meters to degrees at latitude {latitude} (pole epsilon {epsilon})")]
    GeoConversion { latitude: f64, epsilon: f64 },

    /// Rejection sampling did not produce enough points inside the ellipse
    #[error("ellipse sampling produced {obtained} of {requested} points after {attempts} attempts")]
    InsufficientSamples {
        requested: usize,
        obtained: usize,
        attempts: u32,
    },

    /// The raster could not deliver a pixel value
    #[error("failed to read pixel (row {row}, col {col}): {message}")]
    RasterRead { row: i64, col: i64, message: String },

    /// No sample survived bounds checking and the reducer needs at least one
    #[error("no valid samples for reducer '{reducer}'")]
    NoValidSamples { reducer: &'static str },

    /// The file is not a raster this crate can read
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// TIFF compression scheme without a decoder
    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u64),

    /// Invalid run configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FootprintError {
    /// Short machine-readable name, written to the `<column>_err` output column
    pub fn kind(&self) -> &'static str {
        match self {
            FootprintError::GeoConversion { .. } => "GeoConversionError",
            FootprintError::InsufficientSamples { .. } => "InsufficientSamplesError",
            FootprintError::RasterRead { .. } => "RasterReadError",
            FootprintError::NoValidSamples { .. } => "NoValidSamplesError",
            FootprintError::InvalidRaster(_) => "InvalidRasterError",
            FootprintError::UnsupportedCompression(_) => "UnsupportedCompressionError",
            FootprintError::Config(_) => "ConfigError",
            FootprintError::Csv(_) => "CsvError",
            FootprintError::Io(_) => "IoError",
        }
    }

    /// Whether the error belongs to a single observation/layer pair
    ///
    /// Everything else means the run itself cannot continue.
    pub fn is_per_observation(&self) -> bool {
        matches!(
            self,
            FootprintError::GeoConversion { .. }
                | FootprintError::InsufficientSamples { .. }
                | FootprintError::RasterRead { .. }
                | FootprintError::NoValidSamples { .. }
        )
    }
}

/// Result type for footprint operations
pub type FootprintResult<T> = Result<T, FootprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = FootprintError::NoValidSamples { reducer: "mean" };
        assert_eq!(err.kind(), "NoValidSamplesError");
        assert!(err.is_per_observation());
        assert_eq!(err.to_string(), "no valid samples for reducer 'mean'");

        let err = FootprintError::Config("sample_count must be positive".to_string());
        assert!(!err.is_per_observation());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing.tif");
        let err: FootprintError = io_err.into();
        assert_eq!(err.kind(), "IoError");
    }
}
