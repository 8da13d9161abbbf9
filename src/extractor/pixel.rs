//! Pixel indices and raster dimensions
//!
//! Pixel coordinates follow the usual image convention where (0, 0) is the
//! top-left pixel, rows grow downwards and columns grow to the right.

use std::fmt;

/// Integer pixel position `(row, col)`
///
/// Components are signed so that positions left of or above the raster can be
/// represented and rejected, instead of wrapping or being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelIndex {
    /// Row (pixels from top)
    pub row: i64,
    /// Column (pixels from left)
    pub col: i64,
}

impl PixelIndex {
    /// Create a new pixel index
    pub fn new(row: i64, col: i64) -> Self {
        PixelIndex { row, col }
    }
}

impl fmt::Display for PixelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// Size of a raster band in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterDims {
    /// Number of columns
    pub width: u64,
    /// Number of rows
    pub height: u64,
}

impl RasterDims {
    /// Create new raster dimensions
    pub fn new(width: u64, height: u64) -> Self {
        RasterDims { width, height }
    }

    /// Check whether a pixel index lies inside the raster
    ///
    /// In bounds means `0 <= row < height` and `0 <= col < width`.
    pub fn contains(&self, index: &PixelIndex) -> bool {
        index.row >= 0 && index.col >= 0 &&
            (index.row as u64) < self.height && (index.col as u64) < self.width
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> u64 {
        self.width * self.height
    }
}

impl fmt::Display for RasterDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
