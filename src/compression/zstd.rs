//! Handler for ZSTD compressed data

use log::debug;

use crate::errors::{FootprintError, FootprintResult};
use crate::tiff::constants::compression;
use super::handler::CompressionHandler;

/// ZSTD compression handler (compression code 14)
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> FootprintResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let decompressed = zstd::decode_all(data)
            .map_err(|e| FootprintError::InvalidRaster(format!("ZSTD decompression error: {}", e)))?;
        debug!("ZSTD decompressed {} bytes to {} bytes", data.len(), decompressed.len());
        Ok(decompressed)
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        compression::ZSTD
    }
}
