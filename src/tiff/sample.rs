//! Pixel sample types

use std::fmt;

use crate::errors::{FootprintError, FootprintResult};
use super::constants::sample_format;

/// Numeric type of one raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl SampleType {
    /// Resolve the type from BitsPerSample and SampleFormat
    pub fn from_tags(bits_per_sample: u64, format: u64) -> FootprintResult<Self> {
        let sample_type = match (format, bits_per_sample) {
            (sample_format::UNSIGNED, 8) => SampleType::U8,
            (sample_format::SIGNED, 8) => SampleType::I8,
            (sample_format::UNSIGNED, 16) => SampleType::U16,
            (sample_format::SIGNED, 16) => SampleType::I16,
            (sample_format::UNSIGNED, 32) => SampleType::U32,
            (sample_format::SIGNED, 32) => SampleType::I32,
            (sample_format::IEEEFP, 32) => SampleType::F32,
            (sample_format::IEEEFP, 64) => SampleType::F64,
            _ => {
                return Err(FootprintError::InvalidRaster(format!(
                    "unsupported sample layout: {} bits, format {}", bits_per_sample, format)))
            }
        };
        Ok(sample_type)
    }

    /// Size of one sample in bytes
    pub fn size(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    /// True for the integer types
    pub fn is_integer(&self) -> bool {
        !matches!(self, SampleType::F32 | SampleType::F64)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "UInt8",
            SampleType::I8 => "Int8",
            SampleType::U16 => "UInt16",
            SampleType::I16 => "Int16",
            SampleType::U32 => "UInt32",
            SampleType::I32 => "Int32",
            SampleType::F32 => "Float32",
            SampleType::F64 => "Float64",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tags() {
        assert_eq!(SampleType::from_tags(8, 1).unwrap(), SampleType::U8);
        assert_eq!(SampleType::from_tags(16, 2).unwrap(), SampleType::I16);
        assert_eq!(SampleType::from_tags(32, 3).unwrap(), SampleType::F32);
        assert_eq!(SampleType::F64.size(), 8);
        assert!(!SampleType::F32.is_integer());
        assert!(SampleType::from_tags(12, 1).is_err());
        assert!(SampleType::from_tags(64, 1).is_err());
    }
}
