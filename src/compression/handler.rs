//! Compression handler trait definition

use crate::errors::FootprintResult;

/// Strategy trait for decoding one compressed TIFF block
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data of one strip or tile
    fn decompress(&self, data: &[u8]) -> FootprintResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}
