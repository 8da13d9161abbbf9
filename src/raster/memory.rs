//! Raster held entirely in memory

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::coordinate::GeoTransform;
use crate::errors::{FootprintError, FootprintResult};
use crate::extractor::{PixelIndex, RasterDims};
use super::RasterAccessor;

/// Row-major grid of values with a geotransform
///
/// Counts pixel reads, which makes it handy for checking how much I/O an
/// extraction would cost against a real file.
pub struct InMemoryRaster {
    dims: RasterDims,
    transform: GeoTransform,
    data: Vec<f64>,
    nodata: Option<f64>,
    name: String,
    reads: AtomicUsize,
}

impl InMemoryRaster {
    /// Create a raster from row-major values
    pub fn new(dims: RasterDims, transform: GeoTransform, data: Vec<f64>) -> FootprintResult<Self> {
        if data.len() as u64 != dims.pixel_count() {
            return Err(FootprintError::InvalidRaster(format!(
                "{} values do not fill a {} raster", data.len(), dims)));
        }

        Ok(InMemoryRaster {
            dims,
            transform,
            data,
            nodata: None,
            name: "memory".to_string(),
            reads: AtomicUsize::new(0),
        })
    }

    /// Create a raster where every pixel holds `value`
    pub fn filled(dims: RasterDims, transform: GeoTransform, value: f64) -> Self {
        InMemoryRaster {
            dims,
            transform,
            data: vec![value; dims.pixel_count() as usize],
            nodata: None,
            name: "memory".to_string(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Set the NoData sentinel
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    /// Set the name used in logs
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Overwrite one pixel
    pub fn set(&mut self, index: PixelIndex, value: f64) {
        if self.dims.contains(&index) {
            let offset = index.row as usize * self.dims.width as usize + index.col as usize;
            self.data[offset] = value;
        }
    }

    /// Number of `read_pixel` calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl RasterAccessor for InMemoryRaster {
    fn dimensions(&self) -> RasterDims {
        self.dims
    }

    fn geotransform(&self) -> &GeoTransform {
        &self.transform
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn read_pixel(&self, index: PixelIndex) -> FootprintResult<f64> {
        if !self.dims.contains(&index) {
            return Err(FootprintError::RasterRead {
                row: index.row,
                col: index.col,
                message: format!("outside {} raster", self.dims),
            });
        }

        self.reads.fetch_add(1, Ordering::Relaxed);
        let offset = index.row as usize * self.dims.width as usize + index.col as usize;
        Ok(self.data[offset])
    }

    fn description(&self) -> String {
        self.name.clone()
    }
}
