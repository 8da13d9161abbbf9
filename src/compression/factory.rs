//! Factory for creating compression handlers

use crate::errors::{FootprintError, FootprintResult};
use crate::tiff::constants::compression;
use super::deflate::DeflateHandler;
use super::handler::CompressionHandler;
use super::lzw::LzwHandler;
use super::uncompressed::UncompressedHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a handler for a TIFF compression code
    pub fn create_handler(code: u64) -> FootprintResult<Box<dyn CompressionHandler>> {
        match code {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::LZW => Ok(Box::new(LzwHandler)),
            compression::DEFLATE | compression::DEFLATE_OLD => Ok(Box::new(DeflateHandler::new(code))),
            compression::ZSTD => Ok(Box::new(ZstdHandler)),
            _ => Err(FootprintError::UnsupportedCompression(code)),
        }
    }
}
