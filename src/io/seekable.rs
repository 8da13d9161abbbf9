//! Seekable reader trait
//!
//! Raster files are read through `dyn SeekableReader`, so the same TIFF code
//! serves files on disk and in-memory buffers.

use std::io::{Read, Seek};

/// A reader that can both read and seek, and can move between threads
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
