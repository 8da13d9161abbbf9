//! Coordinate handling for footprint sampling
//!
//! This module provides points, bounding boxes and footprint ellipses, the
//! meter to degree conversion used to size footprints, the affine
//! geotransform between world and pixel space, and pluggable projections.

mod bbox;
mod point;
mod ellipse;
mod geotransform;
mod projection;
pub mod units;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::point::Point;
pub use self::ellipse::Ellipse;
pub use self::geotransform::GeoTransform;
pub use self::projection::{IdentityProjection, Projection, ProjectionKind, WebMercatorProjection};
pub use self::units::GeoUnitConverter;
