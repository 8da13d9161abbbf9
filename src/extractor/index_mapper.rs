//! World coordinates to pixel indices

use crate::coordinate::{GeoTransform, Point};
use super::pixel::{PixelIndex, RasterDims};

/// Maps points to integer pixel indices under an affine geotransform
pub struct RasterIndexMapper<'a> {
    transform: &'a GeoTransform,
}

impl<'a> RasterIndexMapper<'a> {
    /// Create a mapper for a raster's geotransform
    pub fn new(transform: &'a GeoTransform) -> Self {
        RasterIndexMapper { transform }
    }

    /// Map a single point to the pixel that contains it
    ///
    /// Uses floor rather than truncation, so a point just left of or above the
    /// raster origin lands on column or row -1 instead of 0.
    pub fn to_pixel_index(&self, point: &Point) -> Option<PixelIndex> {
        let (row, col) = self.transform.world_to_pixel(point);
        let (row, col) = (row.floor(), col.floor());

        // Non-finite or absurdly large positions cannot be a pixel of any raster
        if !row.is_finite() || !col.is_finite() || row.abs() > i64::MAX as f64 || col.abs() > i64::MAX as f64 {
            return None;
        }

        Some(PixelIndex::new(row as i64, col as i64))
    }

    /// Map a batch of points to pixel indices, one per point
    ///
    /// Points that cannot be mapped at all (non-finite coordinates) are
    /// returned as `None` and count as out of bounds.
    pub fn to_pixel_indices(&self, points: &[Point]) -> Vec<Option<PixelIndex>> {
        points.iter().map(|p| self.to_pixel_index(p)).collect()
    }
}

/// Flag each index as in bounds (`true`) or out of bounds (`false`)
pub fn classify_bounds(indices: &[Option<PixelIndex>], dims: &RasterDims) -> Vec<bool> {
    indices.iter()
        .map(|index| index.map_or(false, |i| dims.contains(&i)))
        .collect()
}
