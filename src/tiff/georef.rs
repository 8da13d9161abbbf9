//! GeoTIFF georeferencing
//!
//! Builds the affine geotransform of a raster from either the
//! ModelTransformation matrix or the ModelPixelScale + ModelTiepoint pair,
//! and reads the GeoKey directory and GDAL NoData tag.

use std::collections::HashMap;

use log::{debug, warn};

use crate::coordinate::GeoTransform;
use crate::errors::{FootprintError, FootprintResult};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, geo_keys, tags};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// GTRasterTypeGeoKey
const RASTER_TYPE_KEY: u16 = 1025;

/// RasterPixelIsPoint: tiepoints refer to pixel centers
const RASTER_PIXEL_IS_POINT: u16 = 2;

/// User-defined code in GeoKeys, not an EPSG code
const USER_DEFINED: u16 = 32767;

/// Calculate the geotransform of the image in `ifd`
///
/// A ModelTransformation matrix wins over the scale/tiepoint pair. Rasters
/// flagged PixelIsPoint are shifted half a pixel so the transform refers to
/// pixel corners.
pub fn read_geotransform(tiff: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD,
                         keys: &HashMap<u16, u16>) -> FootprintResult<GeoTransform> {
    let mut coefficients = if let Some(entry) = ifd.get_entry(tags::MODEL_TRANSFORMATION_TAG) {
        let m = tiff.read_f64_values(reader, entry)?;
        if m.len() < 16 {
            return Err(FootprintError::InvalidRaster(format!(
                "ModelTransformation has {} values, expected 16", m.len())));
        }
        [m[3], m[0], m[1], m[7], m[4], m[5]]
    } else {
        let scale = match ifd.get_entry(tags::MODEL_PIXEL_SCALE_TAG) {
            Some(entry) => tiff.read_f64_values(reader, entry)?,
            None => Vec::new(),
        };
        let tiepoint = match ifd.get_entry(tags::MODEL_TIEPOINT_TAG) {
            Some(entry) => tiff.read_f64_values(reader, entry)?,
            None => Vec::new(),
        };

        if scale.len() < 2 || tiepoint.len() < 6 {
            return Err(FootprintError::InvalidRaster(
                "raster has no georeferencing (ModelTransformation or PixelScale + Tiepoint)".to_string()));
        }

        let pixel_width = scale[0];
        let pixel_height = -scale[1];
        let origin_x = tiepoint[3] - tiepoint[0] * pixel_width;
        let origin_y = tiepoint[4] - tiepoint[1] * pixel_height;
        [origin_x, pixel_width, 0.0, origin_y, 0.0, pixel_height]
    };

    if keys.get(&RASTER_TYPE_KEY) == Some(&RASTER_PIXEL_IS_POINT) {
        let [ox, a, b, oy, d, e] = coefficients;
        coefficients[0] = ox - 0.5 * a - 0.5 * b;
        coefficients[3] = oy - 0.5 * d - 0.5 * e;
    }

    let transform = GeoTransform::new(coefficients)?;
    debug!("Geotransform: {}", transform);
    Ok(transform)
}

/// Read the short-valued GeoKeys stored inline in the key directory
///
/// Keys whose values live in the double or ASCII parameter tags are skipped.
pub fn read_geo_keys(tiff: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> FootprintResult<HashMap<u16, u16>> {
    let mut keys = HashMap::new();

    let entry = match ifd.get_entry(tags::GEO_KEY_DIRECTORY_TAG) {
        Some(entry) => entry,
        None => return Ok(keys),
    };

    let directory = tiff.read_u64_values(reader, entry)?;
    if directory.len() < 4 {
        warn!("GeoKey directory too short ({} values), ignoring", directory.len());
        return Ok(keys);
    }

    let key_count = directory[3] as usize;
    for key in directory[4..].chunks_exact(4).take(key_count) {
        let (id, location, value) = (key[0] as u16, key[1], key[3] as u16);
        if location == 0 {
            keys.insert(id, value);
        }
    }

    Ok(keys)
}

/// EPSG code of the raster CRS, when the GeoKeys name one
pub fn epsg_code(keys: &HashMap<u16, u16>) -> Option<u16> {
    [geo_keys::PROJECTED_CS_TYPE, geo_keys::GEOGRAPHIC_TYPE]
        .iter()
        .filter_map(|key| keys.get(key).copied())
        .find(|&code| code != 0 && code != USER_DEFINED)
}

/// Read the GDAL_NODATA value
///
/// GDAL stores NoData as ASCII text; unparsable values are logged and ignored.
pub fn read_nodata(tiff: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> FootprintResult<Option<f64>> {
    let entry = match ifd.get_entry(tags::GDAL_NODATA) {
        Some(entry) => entry,
        None => return Ok(None),
    };

    if entry.field_type != field_types::ASCII {
        warn!("GDAL_NODATA has field type {}, expected ASCII; ignoring", entry.field_type);
        return Ok(None);
    }

    let text = tiff.read_ascii(reader, entry)?;
    match text.trim().parse::<f64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            warn!("Cannot parse NoData value '{}', ignoring", text);
            Ok(None)
        }
    }
}
