//! Decompression of TIFF strips and tiles
//!
//! Each supported TIFF compression code maps to a [`CompressionHandler`]
//! created by [`CompressionFactory`].

mod handler;
mod uncompressed;
mod deflate;
mod factory;
pub(crate) mod lzw;
mod zstd;

pub use handler::CompressionHandler;
pub use factory::CompressionFactory;
pub use lzw::LzwHandler;
