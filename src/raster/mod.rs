//! Read-only raster band access
//!
//! The extraction core only needs four things from a raster: its size, its
//! geotransform, an optional NoData value and single-pixel reads. Anything
//! that can answer those (a GeoTIFF on disk, an in-memory grid in tests)
//! implements [`RasterAccessor`].

mod geotiff;
mod memory;

pub use geotiff::{GeoTiffRaster, RasterInfo};
pub use memory::InMemoryRaster;

use crate::coordinate::GeoTransform;
use crate::errors::FootprintResult;
use crate::extractor::{PixelIndex, RasterDims};

/// Read-only access to one raster band
///
/// Implementations are shared between worker threads, so reads take `&self`.
pub trait RasterAccessor: Send + Sync {
    /// Band size in pixels
    fn dimensions(&self) -> RasterDims;

    /// Pixel to world transform
    fn geotransform(&self) -> &GeoTransform;

    /// NoData sentinel, if the band declares one
    fn nodata(&self) -> Option<f64> {
        None
    }

    /// Read the value of one in-bounds pixel
    ///
    /// Failures are reported as `RasterRead` errors naming the pixel.
    fn read_pixel(&self, index: PixelIndex) -> FootprintResult<f64>;

    /// Short description for logs (usually the file path)
    fn description(&self) -> String;
}

/// Whether `value` equals the band's NoData sentinel
///
/// A NaN sentinel matches NaN values.
pub fn is_nodata(value: f64, nodata: Option<f64>) -> bool {
    match nodata {
        Some(nd) if nd.is_nan() => value.is_nan(),
        Some(nd) => value == nd,
        None => false,
    }
}
