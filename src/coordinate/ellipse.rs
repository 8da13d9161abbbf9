//! Ellipse geometry for sensor footprints

use super::bbox::BoundingBox;
use super::point::Point;
use super::units::GeoUnitConverter;
use crate::errors::FootprintResult;

/// An axis-aligned ellipse approximating a sensor footprint
///
/// The semi-axes are expressed in the same units as the center. For a
/// geographic center they are degree offsets, so the same physical footprint
/// gives a wider ellipse (in degrees of longitude) at high latitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center of the ellipse
    pub center: Point,
    /// Semi-axis along X
    pub x_axis: f64,
    /// Semi-axis along Y
    pub y_axis: f64,
}

impl Ellipse {
    /// Create an ellipse from a center and two semi-axes
    pub fn new(center: Point, x_axis: f64, y_axis: f64) -> Self {
        Ellipse { center, x_axis, y_axis }
    }

    /// Create the footprint ellipse for a physical radius around a lon/lat center
    ///
    /// # Arguments
    /// * `center` - Footprint center (x = longitude, y = latitude)
    /// * `radius_meters` - Footprint radius in meters
    /// * `converter` - Converter used to turn meters into degrees at the center latitude
    pub fn from_buffer(center: Point, radius_meters: f64, converter: &GeoUnitConverter) -> FootprintResult<Self> {
        let (x_axis, y_axis) = converter.meters_to_degree_offsets(radius_meters, center.y)?;
        Ok(Ellipse::new(center, x_axis, y_axis))
    }

    /// Normalized squared distance of a point from the center
    ///
    /// Values up to 1.0 are inside or on the ellipse.
    pub fn normalized_distance_sq(&self, point: &Point) -> f64 {
        let dx = (point.x - self.center.x) / self.x_axis;
        let dy = (point.y - self.center.y) / self.y_axis;
        dx * dx + dy * dy
    }

    /// Check if a point lies inside or on the ellipse
    pub fn contains(&self, point: &Point) -> bool {
        self.normalized_distance_sq(point) <= 1.0
    }

    /// Bounding box that tightly encloses the ellipse
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(&self.center, self.x_axis, self.y_axis)
    }

    /// True when the ellipse has no interior to sample from
    pub fn is_degenerate(&self) -> bool {
        !(self.x_axis.is_finite() && self.y_axis.is_finite() && self.center.is_finite())
            || self.x_axis <= 0.0
            || self.y_axis <= 0.0
    }
}
