//! Handler for Deflate compressed data

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::errors::FootprintResult;
use super::handler::CompressionHandler;

/// Deflate (zlib stream) handler
///
/// Serves both the Adobe code (8) and the older PKZIP-style code (32946);
/// the stream format is the same.
pub struct DeflateHandler {
    code: u64,
}

impl DeflateHandler {
    /// Create a handler reporting the given compression code
    pub fn new(code: u64) -> Self {
        DeflateHandler { code }
    }
}

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8]) -> FootprintResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::new();
        decoder.read_to_end(&mut decompressed_data)?;
        Ok(decompressed_data)
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn code(&self) -> u64 {
        self.code
    }
}
