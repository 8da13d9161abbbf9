//! TIFF format constants
//!
//! Tag numbers and enumerated values needed to read single-band GeoTIFF
//! rasters, plus human-readable names for logging and inspection.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// BigTIFF offset size (8 bytes)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
    pub const LONG8: u16 = 16;     // BigTIFF 64-bit unsigned integer
    pub const SLONG8: u16 = 17;    // BigTIFF 64-bit signed integer
    pub const IFD8: u16 = 18;      // BigTIFF 64-bit IFD offset
}

/// Tags read by the raster accessor
pub mod tags {
    pub const NEW_SUBFILE_TYPE: u16 = 254;
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const PLANAR_CONFIGURATION: u16 = 284;
    pub const PREDICTOR: u16 = 317;
    pub const TILE_WIDTH: u16 = 322;
    pub const TILE_LENGTH: u16 = 323;
    pub const TILE_OFFSETS: u16 = 324;
    pub const TILE_BYTE_COUNTS: u16 = 325;
    pub const SAMPLE_FORMAT: u16 = 339;

    // GeoTIFF
    pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;   // Pixel size in map units
    pub const MODEL_TIEPOINT_TAG: u16 = 33922;      // Links raster to world coordinates
    pub const MODEL_TRANSFORMATION_TAG: u16 = 34264; // 4x4 transformation matrix
    pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;   // GeoTIFF keys structure

    // GDAL
    pub const GDAL_NODATA: u16 = 42113;            // NoData marker value, as ASCII
}

/// Compression codes
pub mod compression {
    pub const NONE: u64 = 1;
    pub const LZW: u64 = 5;
    pub const DEFLATE: u64 = 8;           // Adobe Deflate (zlib)
    pub const ZSTD: u64 = 14;
    pub const DEFLATE_OLD: u64 = 32946;   // Pre-standard Deflate code
}

/// Planar configuration values
pub mod planar_config {
    pub const CHUNKY: u64 = 1;            // Samples interleaved per pixel
    pub const PLANAR: u64 = 2;            // One plane per sample
}

/// Sample format values
pub mod sample_format {
    pub const UNSIGNED: u64 = 1;
    pub const SIGNED: u64 = 2;
    pub const IEEEFP: u64 = 3;
}

/// Predictor values
pub mod predictor {
    pub const NONE: u64 = 1;
    pub const HORIZONTAL_DIFFERENCING: u64 = 2;
    pub const FLOATING_POINT: u64 = 3;
}

/// GeoKey ids that name the raster CRS
pub mod geo_keys {
    pub const GEOGRAPHIC_TYPE: u16 = 2048;    // GeographicTypeGeoKey
    pub const PROJECTED_CS_TYPE: u16 = 3072;  // ProjectedCSTypeGeoKey
}

lazy_static! {
    static ref TAG_NAMES: HashMap<u16, &'static str> = {
        let mut m = HashMap::new();
        m.insert(tags::NEW_SUBFILE_TYPE, "NewSubfileType");
        m.insert(tags::IMAGE_WIDTH, "ImageWidth");
        m.insert(tags::IMAGE_LENGTH, "ImageLength");
        m.insert(tags::BITS_PER_SAMPLE, "BitsPerSample");
        m.insert(tags::COMPRESSION, "Compression");
        m.insert(tags::PHOTOMETRIC_INTERPRETATION, "PhotometricInterpretation");
        m.insert(tags::STRIP_OFFSETS, "StripOffsets");
        m.insert(tags::SAMPLES_PER_PIXEL, "SamplesPerPixel");
        m.insert(tags::ROWS_PER_STRIP, "RowsPerStrip");
        m.insert(tags::STRIP_BYTE_COUNTS, "StripByteCounts");
        m.insert(tags::PLANAR_CONFIGURATION, "PlanarConfiguration");
        m.insert(tags::PREDICTOR, "Predictor");
        m.insert(tags::TILE_WIDTH, "TileWidth");
        m.insert(tags::TILE_LENGTH, "TileLength");
        m.insert(tags::TILE_OFFSETS, "TileOffsets");
        m.insert(tags::TILE_BYTE_COUNTS, "TileByteCounts");
        m.insert(tags::SAMPLE_FORMAT, "SampleFormat");
        m.insert(tags::MODEL_PIXEL_SCALE_TAG, "ModelPixelScaleTag");
        m.insert(tags::MODEL_TIEPOINT_TAG, "ModelTiepointTag");
        m.insert(tags::MODEL_TRANSFORMATION_TAG, "ModelTransformationTag");
        m.insert(tags::GEO_KEY_DIRECTORY_TAG, "GeoKeyDirectoryTag");
        m.insert(tags::GDAL_NODATA, "GDAL_NODATA");
        m
    };

    static ref COMPRESSION_NAMES: HashMap<u64, &'static str> = {
        let mut m = HashMap::new();
        m.insert(compression::NONE, "None");
        m.insert(compression::LZW, "LZW");
        m.insert(compression::DEFLATE, "Deflate");
        m.insert(compression::ZSTD, "ZSTD");
        m.insert(compression::DEFLATE_OLD, "Deflate (old-style)");
        m
    };
}

/// Name of a TIFF tag, or "Unknown"
pub fn tag_name(tag: u16) -> &'static str {
    TAG_NAMES.get(&tag).copied().unwrap_or("Unknown")
}

/// Name of a compression code, or "Unknown"
pub fn compression_name(code: u64) -> &'static str {
    COMPRESSION_NAMES.get(&code).copied().unwrap_or("Unknown")
}
