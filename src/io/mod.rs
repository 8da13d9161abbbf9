//! Low-level I/O for raster files
//!
//! Seekable sources and byte order handling shared by the TIFF reader.

pub mod seekable;
pub mod byte_order;
