//! Meter to decimal-degree conversion
//!
//! Footprint radii are given in meters while most predictor rasters are
//! stored in geographic coordinates. The conversion treats the length of a
//! degree of latitude as constant and scales the length of a degree of
//! longitude by `cos(latitude)`. This is an approximation, not geodesy, and it
//! is only defined away from the poles.

use log::trace;

use crate::errors::{FootprintError, FootprintResult};

/// Meters per degree of latitude
pub const METERS_PER_DEGREE_LAT: f64 = 110_574.27;

/// Meters per degree of longitude at the equator
pub const METERS_PER_DEGREE_LON_EQUATOR: f64 = 111_319.46;

/// Default distance from the poles (in degrees) where conversion is refused
pub const DEFAULT_POLE_EPSILON: f64 = 0.01;

/// Converts physical distances to degree offsets at a given latitude
#[derive(Debug, Clone, Copy)]
pub struct GeoUnitConverter {
    /// Latitudes within this many degrees of ±90 are rejected
    pole_epsilon: f64,
}

impl GeoUnitConverter {
    /// Create a converter with a custom pole epsilon (degrees)
    pub fn new(pole_epsilon: f64) -> Self {
        GeoUnitConverter { pole_epsilon }
    }

    /// Pole epsilon in degrees
    pub fn pole_epsilon(&self) -> f64 {
        self.pole_epsilon
    }

    /// Convert a distance in meters to `(lon_degrees, lat_degrees)` offsets
    ///
    /// # Arguments
    /// * `meters` - Distance in meters
    /// * `latitude` - Latitude in decimal degrees where the distance applies
    ///
    /// # Returns
    /// The longitude and latitude deltas, or `GeoConversion` when the latitude
    /// is not finite or lies within the pole epsilon.
    pub fn meters_to_degree_offsets(&self, meters: f64, latitude: f64) -> FootprintResult<(f64, f64)> {
        if !latitude.is_finite() || latitude.abs() >= 90.0 - self.pole_epsilon {
            return Err(FootprintError::GeoConversion {
                latitude,
                epsilon: self.pole_epsilon,
            });
        }

        let lon_meters = METERS_PER_DEGREE_LON_EQUATOR * latitude.to_radians().cos();
        let lon_degrees = meters / lon_meters;
        let lat_degrees = meters / METERS_PER_DEGREE_LAT;

        trace!("{} m at latitude {} -> lon {} deg, lat {} deg",
               meters, latitude, lon_degrees, lat_degrees);

        Ok((lon_degrees, lat_degrees))
    }
}

impl Default for GeoUnitConverter {
    fn default() -> Self {
        GeoUnitConverter::new(DEFAULT_POLE_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_constants() {
        let converter = GeoUnitConverter::default();
        let (lon, _) = converter.meters_to_degree_offsets(111_319.46, 0.0).unwrap();
        assert_relative_eq!(lon, 1.0, epsilon = 1e-12);

        let (_, lat) = converter.meters_to_degree_offsets(110_574.27, 0.0).unwrap();
        assert_relative_eq!(lat, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_longitude_widens_with_latitude() {
        let converter = GeoUnitConverter::default();
        let (lon_eq, lat_eq) = converter.meters_to_degree_offsets(35.0, 0.0).unwrap();
        let (lon_60, lat_60) = converter.meters_to_degree_offsets(35.0, 60.0).unwrap();

        assert_relative_eq!(lat_eq, lat_60);
        assert_relative_eq!(lon_60, lon_eq * 2.0, max_relative = 1e-9);

        let (lon_south, _) = converter.meters_to_degree_offsets(35.0, -60.0).unwrap();
        assert_relative_eq!(lon_south, lon_60);
    }

    #[test]
    fn test_pole_is_rejected() {
        let converter = GeoUnitConverter::new(0.5);
        assert!(converter.meters_to_degree_offsets(35.0, 89.4).is_ok());

        match converter.meters_to_degree_offsets(35.0, 89.6) {
            Err(FootprintError::GeoConversion { latitude, .. }) => assert_eq!(latitude, 89.6),
            other => panic!("expected GeoConversion, got {:?}", other),
        }

        assert!(converter.meters_to_degree_offsets(35.0, -90.0).is_err());
        assert!(converter.meters_to_degree_offsets(35.0, f64::NAN).is_err());
    }
}
