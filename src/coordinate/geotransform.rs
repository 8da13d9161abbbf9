//! Affine geotransform between pixel and world coordinates
//!
//! Uses the GDAL coefficient order:
//! `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`,
//! so that
//!
//! ```text
//! x = origin_x + col * pixel_width + row * row_rotation
//! y = origin_y + col * col_rotation + row * pixel_height
//! ```
//!
//! `pixel_height` is negative for the usual north-up rasters.

use std::fmt;

use super::point::Point;
use crate::errors::{FootprintError, FootprintResult};

/// Six-coefficient affine geotransform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    coefficients: [f64; 6],
}

impl GeoTransform {
    /// Create a geotransform from GDAL-ordered coefficients
    ///
    /// Rejects transforms that cannot be inverted.
    pub fn new(coefficients: [f64; 6]) -> FootprintResult<Self> {
        let transform = GeoTransform { coefficients };

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FootprintError::InvalidRaster(format!(
                "geotransform has non-finite coefficients: {:?}", coefficients)));
        }
        if transform.determinant() == 0.0 {
            return Err(FootprintError::InvalidRaster(format!(
                "geotransform is not invertible: {:?}", coefficients)));
        }

        Ok(transform)
    }

    /// Create a north-up geotransform (no rotation terms)
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> FootprintResult<Self> {
        GeoTransform::new([origin_x, pixel_width, 0.0, origin_y, 0.0, pixel_height])
    }

    /// The raw coefficients in GDAL order
    pub fn coefficients(&self) -> [f64; 6] {
        self.coefficients
    }

    /// X coordinate of the upper-left corner of pixel (0, 0)
    pub fn origin_x(&self) -> f64 {
        self.coefficients[0]
    }

    /// Y coordinate of the upper-left corner of pixel (0, 0)
    pub fn origin_y(&self) -> f64 {
        self.coefficients[3]
    }

    /// Pixel width in map units
    pub fn pixel_width(&self) -> f64 {
        self.coefficients[1]
    }

    /// Signed pixel height in map units (negative for north-up)
    pub fn pixel_height(&self) -> f64 {
        self.coefficients[5]
    }

    /// True when the rotation terms are zero
    pub fn is_north_up(&self) -> bool {
        self.coefficients[2] == 0.0 && self.coefficients[4] == 0.0
    }

    fn determinant(&self) -> f64 {
        let [_, a, b, _, d, e] = self.coefficients;
        a * e - b * d
    }

    /// Map a fractional pixel position (row, col) to world coordinates
    pub fn pixel_to_world(&self, row: f64, col: f64) -> Point {
        let [ox, a, b, oy, d, e] = self.coefficients;
        Point::new(ox + col * a + row * b, oy + col * d + row * e)
    }

    /// Map a world coordinate to a fractional pixel position `(row, col)`
    ///
    /// Integer pixel indices are obtained by flooring both components.
    pub fn world_to_pixel(&self, point: &Point) -> (f64, f64) {
        let [ox, a, b, oy, d, e] = self.coefficients;
        let dx = point.x - ox;
        let dy = point.y - oy;

        if self.is_north_up() {
            return (dy / e, dx / a);
        }

        let det = self.determinant();
        let col = (e * dx - b * dy) / det;
        let row = (a * dy - d * dx) / det;
        (row, col)
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.coefficients;
        write!(f, "[{}, {}, {}, {}, {}, {}]", c[0], c[1], c[2], c[3], c[4], c[5])
    }
}
