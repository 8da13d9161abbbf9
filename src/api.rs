//! Library entry point
//!
//! [`FootprintKit`] ties a validated [`RunConfig`] to the raster accessors,
//! the extraction pipeline and the CSV observation table.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::config::{LayerConfig, RunConfig};
use crate::errors::FootprintResult;
use crate::extractor::{ExtractionLayer, FootprintExtractionPipeline, LayerMode, Observation, RunSummary};
use crate::raster::{GeoTiffRaster, RasterAccessor, RasterInfo};
use crate::table::ObservationTable;

/// Main interface to the footprintkit library
pub struct FootprintKit {
    config: RunConfig,
}

impl FootprintKit {
    /// Create a FootprintKit instance for a run
    ///
    /// # Arguments
    /// * `config` - Run configuration, validated here
    ///
    /// # Returns
    /// A FootprintKit instance or a `Config` error
    pub fn new(config: RunConfig) -> FootprintResult<Self> {
        config.validate()?;
        Ok(FootprintKit { config })
    }

    /// The run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Describe band `band` of a GeoTIFF file
    pub fn inspect(path: &str, band: u64) -> FootprintResult<RasterInfo> {
        Ok(GeoTiffRaster::open(path, band)?.info().clone())
    }

    /// Build the extraction layer for one configured layer over `raster`
    pub fn layer(&self, layer: &LayerConfig, raster: Arc<dyn RasterAccessor>) -> FootprintResult<ExtractionLayer> {
        let column = layer.column_name()?;
        let extraction = match layer.mode()? {
            LayerMode::Footprint(reducer) => ExtractionLayer::footprint(raster, reducer, &column),
            LayerMode::Point => ExtractionLayer::point(raster, &column),
        };

        Ok(extraction
            .with_radius(layer.radius(self.config.buffer_radius_m))
            .with_skip_nodata(layer.skip_nodata)
            .with_projection(layer.projection.build()))
    }

    /// Open the GeoTIFF behind every configured layer
    ///
    /// Layers reading the same band of the same file share one accessor, and
    /// with it one block cache.
    pub fn open_layers(&self) -> FootprintResult<Vec<ExtractionLayer>> {
        let mut opened: HashMap<(String, u64), Arc<dyn RasterAccessor>> = HashMap::new();
        let mut layers = Vec::with_capacity(self.config.layers.len());

        for layer in &self.config.layers {
            let key = (layer.path.clone(), layer.band);
            let raster = match opened.get(&key) {
                Some(raster) => raster.clone(),
                None => {
                    let raster: Arc<dyn RasterAccessor> = Arc::new(GeoTiffRaster::open(&layer.path, layer.band)?);
                    opened.insert(key, raster.clone());
                    raster
                }
            };
            layers.push(self.layer(layer, raster)?);
        }

        Ok(layers)
    }

    /// Run the pipeline over observations and prepared layers
    pub fn extract(&self, observations: Vec<Observation>, layers: &[ExtractionLayer])
                   -> FootprintResult<(Vec<Observation>, RunSummary)> {
        FootprintExtractionPipeline::new(self.config.pipeline_options()).run(observations, layers)
    }

    /// Read observations from a CSV file, extract every layer, write the result
    ///
    /// # Arguments
    /// * `input_path` - CSV with the configured coordinate columns
    /// * `output_path` - CSV to create
    ///
    /// # Returns
    /// Run counters, or the first fatal error
    pub fn extract_csv(&self, input_path: &str, output_path: &str) -> FootprintResult<RunSummary> {
        let (table, observations) =
            ObservationTable::read_path(input_path, &self.config.x_column, &self.config.y_column)?;

        let columns = self.config.column_names()?;
        table.check_columns(&columns, self.config.output_columns())?;

        let layers = self.open_layers()?;
        let (annotated, summary) = self.extract(observations, &layers)?;

        table.write_path(output_path, &columns, self.config.output_columns(), &annotated)?;
        info!("Done: {} observation(s), {} failed extraction(s), {} samples out of bounds, {} pixel reads",
              summary.observations, summary.total_failures(), summary.total_excluded(), summary.total_reads());

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::{GeoTransform, Point};
    use crate::errors::FootprintError;
    use crate::extractor::{RasterDims, Summary};
    use crate::raster::InMemoryRaster;

    #[test]
    fn test_invalid_config_rejected() {
        let result = FootprintKit::new(RunConfig::default());
        assert!(matches!(result, Err(FootprintError::Config(_))));
    }

    #[test]
    fn test_layer_settings_applied() {
        let mut layer = LayerConfig::parse_spec("cover.tif=mean@120").unwrap();
        layer.skip_nodata = true;
        let kit = FootprintKit::new(RunConfig {
            layers: vec![layer, LayerConfig::parse_spec("cover.tif=point").unwrap()],
            seed: Some(3),
            ..RunConfig::default()
        }).unwrap();

        let gt = GeoTransform::north_up(0.0, 1.0, 0.01, -0.01).unwrap();
        let raster: Arc<dyn RasterAccessor> = Arc::new(InMemoryRaster::filled(RasterDims::new(100, 100), gt, 4.0));

        let footprint = kit.layer(&kit.config().layers[0], raster.clone()).unwrap();
        assert_eq!(footprint.column, "cover_pymean");
        assert_eq!(footprint.buffer_radius_m, 120.0);
        assert!(footprint.skip_nodata);

        let point = kit.layer(&kit.config().layers[1], raster).unwrap();
        assert_eq!(point.mode, LayerMode::Point);
        assert_eq!(point.buffer_radius_m, 35.0);

        let (out, _) = kit.extract(vec![Observation::new(Point::new(0.5, 0.5))], &[footprint, point]).unwrap();
        assert_eq!(out[0].extracted[0].outcome.summary(), Some(&Summary::Scalar(4.0)));
        assert_eq!(out[0].extracted[1].outcome.summary(), Some(&Summary::Scalar(4.0)));
    }

    #[test]
    fn test_missing_raster_is_fatal() {
        let kit = FootprintKit::new(RunConfig {
            layers: vec![LayerConfig::new("/nonexistent/cover.tif", "max")],
            ..RunConfig::default()
        }).unwrap();
        assert!(matches!(kit.open_layers(), Err(FootprintError::InvalidRaster(_))));
    }
}
