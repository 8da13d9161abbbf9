//! Coordinate projection applied before pixel lookup
//!
//! Observations are given in geographic coordinates, but some layers (for
//! example proximity rasters) are stored in a projected system. A layer
//! carries a [`Projection`] that maps sample points into the raster's CRS.
//! Projection math is treated as opaque: callers can plug in any
//! implementation.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use super::point::Point;
use crate::errors::FootprintError;

/// Earth radius in meters used by the spherical Web Mercator projection
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude limit of the Web Mercator square; points beyond it do not project
const WEB_MERCATOR_MAX_LAT: f64 = 85.06;

/// Maps points from the observation CRS into a raster CRS
pub trait Projection: Send + Sync {
    /// Project one point
    fn project(&self, point: &Point) -> Point;

    /// Human-readable name used in logs
    fn name(&self) -> &'static str;
}

/// Leaves coordinates untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    fn project(&self, point: &Point) -> Point {
        *point
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// WGS84 (EPSG:4326) longitude/latitude to Web Mercator (EPSG:3857) meters
///
/// Latitudes beyond ±85.06 degrees project to a NaN northing, which pixel
/// lookup treats as outside every raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercatorProjection;

impl Projection for WebMercatorProjection {
    fn project(&self, point: &Point) -> Point {
        let x = point.x * PI * EARTH_RADIUS / 180.0;
        if point.y.is_nan() || point.y.abs() > WEB_MERCATOR_MAX_LAT {
            return Point::new(x, f64::NAN);
        }
        let y = EARTH_RADIUS * f64::ln(f64::tan(PI / 4.0 + point.y.to_radians() / 2.0));
        Point::new(x, y)
    }

    fn name(&self) -> &'static str {
        "web-mercator"
    }
}

/// Built-in projections selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    /// No projection
    #[default]
    Identity,
    /// WGS84 to Web Mercator
    WebMercator,
}

impl ProjectionKind {
    /// Build the projection implementation for this kind
    pub fn build(&self) -> Arc<dyn Projection> {
        match self {
            ProjectionKind::Identity => Arc::new(IdentityProjection),
            ProjectionKind::WebMercator => Arc::new(WebMercatorProjection),
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identity" | "none" => Ok(ProjectionKind::Identity),
            "web-mercator" | "webmercator" | "3857" | "epsg:3857" => Ok(ProjectionKind::WebMercator),
            other => Err(FootprintError::Config(format!("Unknown projection: {}", other))),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_web_mercator_known_point() {
        let projected = WebMercatorProjection.project(&Point::new(-74.0060, 40.7128));
        assert_relative_eq!(projected.x, -8_238_310.24, epsilon = 1.0);
        assert_relative_eq!(projected.y, 4_970_071.58, epsilon = 1.0);
    }

    #[test]
    fn test_web_mercator_outside_domain() {
        let edge = WebMercatorProjection.project(&Point::new(10.0, 85.0));
        assert!(edge.y.is_finite());

        for lat in [85.5, -89.0, 90.0, f64::NAN] {
            let projected = WebMercatorProjection.project(&Point::new(10.0, lat));
            assert!(projected.y.is_nan(), "latitude {}", lat);
        }
    }

    #[test]
    fn test_identity_and_parse() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(IdentityProjection.project(&p), p);
        assert_eq!("EPSG:3857".parse::<ProjectionKind>().unwrap(), ProjectionKind::WebMercator);
        assert_eq!("none".parse::<ProjectionKind>().unwrap(), ProjectionKind::Identity);
        assert!("utm".parse::<ProjectionKind>().is_err());
    }
}
