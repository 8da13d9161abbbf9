//! Run configuration
//!
//! A run is described by a [`RunConfig`], read from a TOML file and/or
//! assembled from command line options. Each `[[layer]]` table names one
//! raster and how to summarise it:
//!
//! ```toml
//! x_column = "LON"
//! y_column = "LAT"
//! sample_count = 2000
//! seed = 42
//!
//! [[layer]]
//! path = "treecover2000.tif"
//! reducer = "max"
//! buffer_radius_m = 35.0
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::coordinate::units::DEFAULT_POLE_EPSILON;
use crate::coordinate::ProjectionKind;
use crate::errors::{FootprintError, FootprintResult};
use crate::extractor::{LayerMode, PipelineOptions, ReducerKind, DEFAULT_BUFFER_RADIUS,
                       DEFAULT_MAX_ATTEMPTS, DEFAULT_SAMPLE_COUNT};
use crate::table::OutputColumns;

/// `PATH=REDUCER[:COLUMN][@RADIUS]`
const LAYER_SPEC_PATTERN: &str =
    r"^(?P<path>[^=]+)=(?P<reducer>[A-Za-z-]+)(?::(?P<column>[^@]+))?(?:@(?P<radius>[0-9.eE+-]+))?$";

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Column holding the x coordinate (longitude)
    pub x_column: String,
    /// Column holding the y coordinate (latitude)
    pub y_column: String,
    /// Samples per footprint
    pub sample_count: usize,
    /// Default footprint radius in meters
    pub buffer_radius_m: f64,
    /// Base seed for reproducible sampling
    pub seed: Option<u64>,
    /// Worker threads, 0 for the rayon default
    pub threads: usize,
    /// Stop at the first failed extraction
    pub abort_on_error: bool,
    /// Write `<column>_err`
    pub error_flags: bool,
    /// Write `<column>_n`
    pub sample_counts: bool,
    /// Rejection sampling rounds
    pub max_sampling_attempts: u32,
    /// Closest distance to a pole, in degrees, where footprints are built
    pub pole_epsilon_deg: f64,
    /// Show a progress bar
    pub progress: bool,
    /// Layers to extract
    #[serde(rename = "layer")]
    pub layers: Vec<LayerConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            x_column: "LON".to_string(),
            y_column: "LAT".to_string(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            buffer_radius_m: DEFAULT_BUFFER_RADIUS,
            seed: None,
            threads: 0,
            abort_on_error: false,
            error_flags: true,
            sample_counts: false,
            max_sampling_attempts: DEFAULT_MAX_ATTEMPTS,
            pole_epsilon_deg: DEFAULT_POLE_EPSILON,
            progress: false,
            layers: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FootprintResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FootprintError::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config = RunConfig::from_toml(&content)?;
        debug!("Loaded config {} with {} layer(s)", path.display(), config.layers.len());
        Ok(config)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> FootprintResult<Self> {
        toml::from_str(content).map_err(|e| FootprintError::Config(format!("invalid config: {}", e)))
    }

    /// Check the settings before a run
    pub fn validate(&self) -> FootprintResult<()> {
        let fail = |message: String| Err(FootprintError::Config(message));

        if self.sample_count == 0 {
            return fail("sample_count must be at least 1".to_string());
        }
        if !(self.buffer_radius_m > 0.0 && self.buffer_radius_m.is_finite()) {
            return fail(format!("buffer_radius_m must be positive, got {}", self.buffer_radius_m));
        }
        if self.max_sampling_attempts == 0 {
            return fail("max_sampling_attempts must be at least 1".to_string());
        }
        if !(self.pole_epsilon_deg > 0.0 && self.pole_epsilon_deg < 90.0) {
            return fail(format!("pole_epsilon_deg must be in (0, 90), got {}", self.pole_epsilon_deg));
        }
        if self.x_column.is_empty() || self.y_column.is_empty() {
            return fail("coordinate column names must not be empty".to_string());
        }
        if self.layers.is_empty() {
            return fail("no layers configured".to_string());
        }

        let mut columns = HashSet::new();
        for layer in &self.layers {
            layer.mode()?;
            if layer.band == 0 {
                return fail(format!("{}: bands are numbered from 1", layer.path));
            }
            if let Some(radius) = layer.buffer_radius_m {
                if !(radius > 0.0 && radius.is_finite()) {
                    return fail(format!("{}: buffer_radius_m must be positive, got {}", layer.path, radius));
                }
            }

            let column = layer.column_name()?;
            if column.is_empty() {
                return fail(format!("{}: empty output column name", layer.path));
            }
            if !columns.insert(column.clone()) {
                return fail(format!("duplicate output column '{}'", column));
            }
        }

        Ok(())
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            sample_count: self.sample_count,
            seed: self.seed,
            threads: self.threads,
            abort_on_error: self.abort_on_error,
            max_sampling_attempts: self.max_sampling_attempts,
            pole_epsilon: self.pole_epsilon_deg,
            progress: self.progress,
        }
    }

    /// Diagnostic columns to write
    pub fn output_columns(&self) -> OutputColumns {
        OutputColumns {
            sample_counts: self.sample_counts,
            error_flags: self.error_flags,
        }
    }

    /// Output value columns in layer order
    pub fn column_names(&self) -> FootprintResult<Vec<String>> {
        self.layers.iter().map(LayerConfig::column_name).collect()
    }
}

/// One raster layer of a run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Raster file
    pub path: String,
    /// Reducer name, or `point` for a single-pixel lookup
    #[serde(default = "default_reducer")]
    pub reducer: String,
    /// Output column; defaults to `<file stem>_py<reducer>`
    #[serde(default)]
    pub column: Option<String>,
    /// Footprint radius override in meters
    #[serde(default)]
    pub buffer_radius_m: Option<f64>,
    /// Band to read (1-based)
    #[serde(default = "default_band")]
    pub band: u64,
    /// Drop NoData values before reducing
    #[serde(default)]
    pub skip_nodata: bool,
    /// Projection applied to sample points before pixel lookup
    #[serde(default)]
    pub projection: ProjectionKind,
}

fn default_reducer() -> String {
    ReducerKind::Max.name().to_string()
}

fn default_band() -> u64 {
    1
}

impl LayerConfig {
    /// Layer with default settings
    pub fn new(path: &str, reducer: &str) -> Self {
        LayerConfig {
            path: path.to_string(),
            reducer: reducer.to_string(),
            column: None,
            buffer_radius_m: None,
            band: default_band(),
            skip_nodata: false,
            projection: ProjectionKind::default(),
        }
    }

    /// Parse the command line shorthand `PATH=REDUCER[:COLUMN][@RADIUS]`
    pub fn parse_spec(spec: &str) -> FootprintResult<Self> {
        let pattern = Regex::new(LAYER_SPEC_PATTERN)
            .map_err(|e| FootprintError::Config(format!("layer pattern: {}", e)))?;
        let captures = pattern.captures(spec.trim()).ok_or_else(|| {
            FootprintError::Config(format!("invalid layer '{}', expected PATH=REDUCER[:COLUMN][@RADIUS]", spec))
        })?;

        let mut layer = LayerConfig::new(&captures["path"], &captures["reducer"]);
        layer.mode()?;
        layer.column = captures.name("column").map(|m| m.as_str().to_string());
        if let Some(radius) = captures.name("radius") {
            let meters = radius.as_str().parse::<f64>().map_err(|_| {
                FootprintError::Config(format!("invalid radius '{}' in layer '{}'", radius.as_str(), spec))
            })?;
            layer.buffer_radius_m = Some(meters);
        }

        Ok(layer)
    }

    /// Footprint reducer or point lookup
    pub fn mode(&self) -> FootprintResult<LayerMode> {
        if self.reducer.trim().eq_ignore_ascii_case("point") {
            Ok(LayerMode::Point)
        } else {
            Ok(LayerMode::Footprint(self.reducer.parse()?))
        }
    }

    /// Output column name
    pub fn column_name(&self) -> FootprintResult<String> {
        if let Some(column) = &self.column {
            return Ok(column.clone());
        }
        let stem = Path::new(&self.path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(format!("{}_py{}", stem, self.mode()?.name()))
    }

    /// Footprint radius for this layer
    pub fn radius(&self, default: f64) -> f64 {
        self.buffer_radius_m.unwrap_or(default)
    }
}
