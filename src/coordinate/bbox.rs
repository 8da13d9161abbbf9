//! Bounding box structure for sampling windows

use super::point::Point;

/// An axis-aligned bounding box in a coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a box extending `half_width` and `half_height` around a center
    pub fn around(center: &Point, half_width: f64, half_height: f64) -> Self {
        BoundingBox::new(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Check if this bounding box contains a point (edges included)
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x &&
            point.y >= self.min_y && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_center() {
        let bbox = BoundingBox::around(&Point::new(10.0, -5.0), 2.0, 1.0);
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 2.0);
        assert_eq!(bbox.center(), Point::new(10.0, -5.0));
        assert!(bbox.contains(&Point::new(12.0, -4.0)));
        assert!(!bbox.contains(&Point::new(12.1, -4.0)));
    }
}
