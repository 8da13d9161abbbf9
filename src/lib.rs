//! Footprint sampling and raster value extraction
//!
//! For every point observation, footprintkit draws Monte-Carlo samples inside
//! the sensor footprint ellipse, maps them to raster pixels, reads each
//! distinct pixel once and reduces the values to one summary per layer.

pub mod api;
pub mod commands;
pub mod compression;
pub mod config;
pub mod coordinate;
pub mod errors;
pub mod extractor;
pub mod io;
pub mod raster;
pub mod table;
pub mod tiff;
pub mod utils;

pub use crate::api::FootprintKit;
pub use crate::config::{LayerConfig, RunConfig};
pub use crate::errors::{FootprintError, FootprintResult};

pub use coordinate::{Ellipse, GeoTransform, GeoUnitConverter, Point};
pub use extractor::{ExtractionLayer, FootprintExtractionPipeline, Observation, ReducerKind, Summary};
pub use raster::{GeoTiffRaster, InMemoryRaster, RasterAccessor};
