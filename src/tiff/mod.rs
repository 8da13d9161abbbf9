//! TIFF and GeoTIFF parsing
//!
//! Just enough of TIFF to read a georeferenced raster band: header and IFD
//! parsing, tag value decoding, sample types and georeferencing tags.

pub mod constants;
pub mod georef;
pub mod ifd;
pub mod reader;
mod sample;
#[cfg(test)]
pub(crate) mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use sample::SampleType;
