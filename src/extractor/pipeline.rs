//! Footprint extraction over many observations and layers
//!
//! For every observation and every layer the pipeline derives the footprint
//! ellipse, samples it, maps the samples to pixels, reads them and reduces the
//! values. Observations are independent and run on the rayon pool; layers are
//! processed one after the other inside each observation.
//!
//! Per-observation failures (see [`FootprintError::is_per_observation`]) are
//! recorded on the observation and the run carries on, unless
//! `abort_on_error` is set. Any other error aborts the run.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::coordinate::{Ellipse, GeoUnitConverter, IdentityProjection, Point, Projection};
use crate::errors::{FootprintError, FootprintResult};
use crate::raster::{is_nodata, RasterAccessor};
use crate::utils::progress::ProgressTracker;
use super::index_mapper::RasterIndexMapper;
use super::observation::{ExtractedField, ExtractionOutcome, Observation};
use super::reducer::{ReducerKind, Summary};
use super::sampler::{EllipseSampler, DEFAULT_MAX_ATTEMPTS};
use super::sparse::SparsePixelExtractor;

/// Default number of samples per footprint
pub const DEFAULT_SAMPLE_COUNT: usize = 2000;

/// Default footprint radius in meters
pub const DEFAULT_BUFFER_RADIUS: f64 = 35.0;

/// How a layer turns an observation into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMode {
    /// Sample the footprint and reduce the values
    Footprint(ReducerKind),
    /// Read the single pixel under the observation
    Point,
}

impl LayerMode {
    /// Short name used in default column names
    pub fn name(&self) -> &'static str {
        match self {
            LayerMode::Footprint(kind) => kind.name(),
            LayerMode::Point => "point",
        }
    }
}

impl fmt::Display for LayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One raster layer to extract
#[derive(Clone)]
pub struct ExtractionLayer {
    /// Band to read
    pub raster: Arc<dyn RasterAccessor>,
    /// Footprint reduction or point lookup
    pub mode: LayerMode,
    /// Output column name
    pub column: String,
    /// Footprint radius in meters (ignored in point mode)
    pub buffer_radius_m: f64,
    /// Drop NoData values before reducing
    pub skip_nodata: bool,
    /// Maps observation coordinates into the raster CRS
    pub projection: Arc<dyn Projection>,
}

impl ExtractionLayer {
    /// Footprint layer with the default radius and no projection
    pub fn footprint(raster: Arc<dyn RasterAccessor>, reducer: ReducerKind, column: &str) -> Self {
        ExtractionLayer {
            raster,
            mode: LayerMode::Footprint(reducer),
            column: column.to_string(),
            buffer_radius_m: DEFAULT_BUFFER_RADIUS,
            skip_nodata: false,
            projection: Arc::new(IdentityProjection),
        }
    }

    /// Point lookup layer with no projection
    pub fn point(raster: Arc<dyn RasterAccessor>, column: &str) -> Self {
        ExtractionLayer {
            mode: LayerMode::Point,
            ..ExtractionLayer::footprint(raster, ReducerKind::Max, column)
        }
    }

    /// Set the footprint radius
    pub fn with_radius(mut self, meters: f64) -> Self {
        self.buffer_radius_m = meters;
        self
    }

    /// Drop NoData values before reducing
    pub fn with_skip_nodata(mut self, skip: bool) -> Self {
        self.skip_nodata = skip;
        self
    }

    /// Set the projection applied to sample points
    pub fn with_projection(mut self, projection: Arc<dyn Projection>) -> Self {
        self.projection = projection;
        self
    }
}

impl fmt::Debug for ExtractionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionLayer")
            .field("raster", &self.raster.description())
            .field("mode", &self.mode)
            .field("column", &self.column)
            .field("buffer_radius_m", &self.buffer_radius_m)
            .field("skip_nodata", &self.skip_nodata)
            .field("projection", &self.projection.name())
            .finish()
    }
}

/// Run-wide settings
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Samples drawn per footprint
    pub sample_count: usize,
    /// Base seed; `None` draws fresh entropy for every footprint
    pub seed: Option<u64>,
    /// Worker threads, 0 for the rayon default
    pub threads: usize,
    /// Stop at the first failed extraction
    pub abort_on_error: bool,
    /// Rejection sampling rounds before `InsufficientSamples`
    pub max_sampling_attempts: u32,
    /// Pole distance (degrees) where footprints cannot be built
    pub pole_epsilon: f64,
    /// Draw a progress bar
    pub progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            sample_count: DEFAULT_SAMPLE_COUNT,
            seed: None,
            threads: 0,
            abort_on_error: false,
            max_sampling_attempts: DEFAULT_MAX_ATTEMPTS,
            pole_epsilon: crate::coordinate::units::DEFAULT_POLE_EPSILON,
            progress: false,
        }
    }
}

/// Per-layer counters for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSummary {
    /// Output column
    pub column: String,
    /// Successful extractions
    pub succeeded: usize,
    /// Failed extractions
    pub failed: usize,
    /// Samples dropped as out of bounds
    pub excluded: usize,
    /// Values dropped as NoData
    pub nodata: usize,
    /// Distinct pixel reads behind successful extractions
    pub reads: usize,
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Observations processed
    pub observations: usize,
    /// One entry per layer, in layer order
    pub layers: Vec<LayerSummary>,
}

impl RunSummary {
    fn collect(observations: &[Observation], layers: &[ExtractionLayer]) -> Self {
        let mut summaries: Vec<LayerSummary> = layers.iter()
            .map(|l| LayerSummary { column: l.column.clone(), ..LayerSummary::default() })
            .collect();

        for observation in observations {
            for (summary, field) in summaries.iter_mut().zip(&observation.extracted) {
                summary.excluded += field.outcome.excluded();
                match &field.outcome {
                    ExtractionOutcome::Value { nodata, reads, .. } => {
                        summary.succeeded += 1;
                        summary.nodata += nodata;
                        summary.reads += reads;
                    }
                    ExtractionOutcome::Failed { .. } => summary.failed += 1,
                }
            }
        }

        RunSummary { observations: observations.len(), layers: summaries }
    }

    /// Failed extractions across all layers
    pub fn total_failures(&self) -> usize {
        self.layers.iter().map(|l| l.failed).sum()
    }

    /// Out-of-bounds samples across all layers
    pub fn total_excluded(&self) -> usize {
        self.layers.iter().map(|l| l.excluded).sum()
    }

    /// Distinct pixel reads across all layers
    pub fn total_reads(&self) -> usize {
        self.layers.iter().map(|l| l.reads).sum()
    }
}

/// Values gathered for one layer before reduction
struct Gathered {
    values: Vec<f64>,
    excluded: usize,
    nodata: usize,
    reads: usize,
}

/// Runs footprint extraction for a table of observations
pub struct FootprintExtractionPipeline {
    options: PipelineOptions,
    sampler: EllipseSampler,
    converter: GeoUnitConverter,
}

impl FootprintExtractionPipeline {
    /// Create a pipeline
    pub fn new(options: PipelineOptions) -> Self {
        FootprintExtractionPipeline {
            sampler: EllipseSampler::new(options.max_sampling_attempts),
            converter: GeoUnitConverter::new(options.pole_epsilon),
            options,
        }
    }

    /// Run settings
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Extract every layer for every observation
    ///
    /// # Arguments
    /// * `observations` - Observations to annotate; order is preserved
    /// * `layers` - Layers to extract, each producing one field per observation
    ///
    /// # Returns
    /// The annotated observations and run counters, or the first fatal error
    pub fn run(&self, observations: Vec<Observation>, layers: &[ExtractionLayer]) -> FootprintResult<(Vec<Observation>, RunSummary)> {
        info!("Extracting {} layer(s) for {} observation(s), {} samples per footprint",
              layers.len(), observations.len(), self.options.sample_count);
        for layer in layers {
            info!("  {} <- {} ({}, {} m, projection {})",
                  layer.column, layer.raster.description(), layer.mode,
                  layer.buffer_radius_m, layer.projection.name());
        }

        let progress = if self.options.progress {
            ProgressTracker::new(observations.len() as u64, "Extracting footprints")
        } else {
            ProgressTracker::hidden()
        };

        let annotate = || -> FootprintResult<Vec<Observation>> {
            observations.into_par_iter()
                .enumerate()
                .map(|(index, observation)| {
                    let result = self.annotate(index, observation, layers);
                    progress.increment(1);
                    result
                })
                .collect()
        };

        let annotated = if self.options.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.threads)
                .build()
                .map_err(|e| FootprintError::Config(format!("Failed to build thread pool: {}", e)))?;
            pool.install(annotate)?
        } else {
            annotate()?
        };

        progress.finish();

        let summary = RunSummary::collect(&annotated, layers);
        for layer in &summary.layers {
            info!("{}: {} ok, {} failed, {} samples out of bounds, {} NoData values, {} pixel reads",
                  layer.column, layer.succeeded, layer.failed, layer.excluded, layer.nodata, layer.reads);
        }

        Ok((annotated, summary))
    }

    /// Extract all layers for one observation
    fn annotate(&self, index: usize, mut observation: Observation, layers: &[ExtractionLayer]) -> FootprintResult<Observation> {
        for (layer_index, layer) in layers.iter().enumerate() {
            let outcome = match self.extract(index, layer_index, &observation.point, layer) {
                Ok(outcome) => outcome,
                Err((err, excluded)) => {
                    if !err.is_per_observation() || self.options.abort_on_error {
                        return Err(err);
                    }
                    warn!("Observation {} layer {}: {}", index, layer.column, err);
                    ExtractionOutcome::Failed {
                        kind: err.kind(),
                        message: err.to_string(),
                        excluded,
                    }
                }
            };

            observation.extracted.push(ExtractedField {
                column: layer.column.clone(),
                outcome,
            });
        }

        Ok(observation)
    }

    /// Extract one layer for one observation
    ///
    /// Errors carry the number of samples already excluded as out of bounds.
    fn extract(&self, index: usize, layer_index: usize, point: &Point, layer: &ExtractionLayer)
               -> Result<ExtractionOutcome, (FootprintError, usize)> {
        let gathered = match layer.mode {
            LayerMode::Footprint(_) => self.gather_footprint(index, layer_index, point, layer),
            LayerMode::Point => self.gather_point(point, layer),
        }.map_err(|e| (e, 0))?;

        let summary = match layer.mode {
            LayerMode::Footprint(kind) => kind.reduce(&gathered.values),
            LayerMode::Point => gathered.values.first()
                .map(|v| Summary::Scalar(*v))
                .ok_or(FootprintError::NoValidSamples { reducer: "point" }),
        }.map_err(|e| (e, gathered.excluded))?;

        Ok(ExtractionOutcome::Value {
            summary,
            samples: gathered.values.len(),
            excluded: gathered.excluded,
            nodata: gathered.nodata,
            reads: gathered.reads,
        })
    }

    fn gather_footprint(&self, index: usize, layer_index: usize, point: &Point, layer: &ExtractionLayer)
                        -> FootprintResult<Gathered> {
        let ellipse = Ellipse::from_buffer(*point, layer.buffer_radius_m, &self.converter)?;

        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(derive_seed(seed, index, layer_index)),
            None => StdRng::from_entropy(),
        };
        let samples = self.sampler.sample(&ellipse, self.options.sample_count, &mut rng)?;

        let projected: Vec<Point> = samples.iter().map(|p| layer.projection.project(p)).collect();
        let transform = layer.raster.geotransform();
        let indices = RasterIndexMapper::new(transform).to_pixel_indices(&projected);

        let extraction = SparsePixelExtractor::new(layer.raster.as_ref()).extract(&indices)?;

        debug!("Observation {} layer {}: {} samples, {} out of bounds, {} pixel reads",
               index, layer.column, samples.len(), extraction.excluded, extraction.distinct_reads);

        Ok(self.mask_nodata(extraction.values, extraction.excluded, extraction.distinct_reads, layer))
    }

    fn gather_point(&self, point: &Point, layer: &ExtractionLayer) -> FootprintResult<Gathered> {
        let projected = layer.projection.project(point);
        let index = RasterIndexMapper::new(layer.raster.geotransform()).to_pixel_index(&projected);

        let values = match index {
            Some(index) if layer.raster.dimensions().contains(&index) => vec![layer.raster.read_pixel(index)?],
            _ => Vec::new(),
        };
        let excluded = 1 - values.len();
        let reads = values.len();

        Ok(self.mask_nodata(values, excluded, reads, layer))
    }

    fn mask_nodata(&self, values: Vec<f64>, excluded: usize, reads: usize, layer: &ExtractionLayer) -> Gathered {
        let nodata_value = layer.raster.nodata();
        if !layer.skip_nodata || nodata_value.is_none() {
            return Gathered { values, excluded, nodata: 0, reads };
        }

        let total = values.len();
        let values: Vec<f64> = values.into_iter().filter(|v| !is_nodata(*v, nodata_value)).collect();
        Gathered { nodata: total - values.len(), values, excluded, reads }
    }
}

/// Seed for one (observation, layer) pair, independent of scheduling order
fn derive_seed(seed: u64, observation: usize, layer: usize) -> u64 {
    seed ^ (observation as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (layer as u64).wrapping_add(1).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::{GeoTransform, WebMercatorProjection};
    use crate::extractor::{PixelIndex, RasterDims};
    use crate::raster::InMemoryRaster;

    fn uniform_raster(value: f64) -> Arc<dyn RasterAccessor> {
        let gt = GeoTransform::north_up(0.0, 1.0, 0.1, -0.1).unwrap();
        Arc::new(InMemoryRaster::filled(RasterDims::new(10, 10), gt, value))
    }

    fn seeded(seed: u64) -> PipelineOptions {
        PipelineOptions { seed: Some(seed), sample_count: 200, ..PipelineOptions::default() }
    }

    #[test]
    fn test_fields_follow_layer_order() {
        let layers = vec![
            ExtractionLayer::footprint(uniform_raster(3.0), ReducerKind::Max, "a_pymax"),
            ExtractionLayer::point(uniform_raster(8.0), "b_point"),
        ];
        let observations = vec![Observation::new(Point::new(0.55, 0.45))];

        let (out, summary) = FootprintExtractionPipeline::new(seeded(1)).run(observations, &layers).unwrap();
        let columns: Vec<&str> = out[0].extracted.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["a_pymax", "b_point"]);
        assert_eq!(out[0].extracted("b_point").unwrap().outcome.summary(), Some(&Summary::Scalar(8.0)));
        assert_eq!(summary.total_failures(), 0);
        // uniform 10x10 raster, the point layer reads exactly one pixel
        assert_eq!(summary.layers[1].reads, 1);
        assert!(summary.total_reads() >= 2);
    }

    #[test]
    fn test_failures_are_recorded() {
        let layers = vec![ExtractionLayer::footprint(uniform_raster(1.0), ReducerKind::Mean, "v")];
        let observations = vec![
            Observation::new(Point::new(0.5, 0.5)),
            Observation::new(Point::new(50.0, 50.0)),
            Observation::new(Point::new(0.5, 89.999)),
        ];

        let (out, summary) = FootprintExtractionPipeline::new(seeded(2)).run(observations, &layers).unwrap();
        assert!(!out[0].extracted[0].outcome.is_failure());

        match &out[1].extracted[0].outcome {
            ExtractionOutcome::Failed { kind, excluded, .. } => {
                assert_eq!(*kind, "NoValidSamplesError");
                assert_eq!(*excluded, 200);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        match &out[2].extracted[0].outcome {
            ExtractionOutcome::Failed { kind, .. } => assert_eq!(*kind, "GeoConversionError"),
            other => panic!("expected failure, got {:?}", other),
        }

        assert_eq!(summary.layers[0].failed, 2);
        assert_eq!(summary.layers[0].succeeded, 1);
    }

    #[test]
    fn test_abort_on_error() {
        let layers = vec![ExtractionLayer::footprint(uniform_raster(1.0), ReducerKind::Max, "v")];
        let observations = vec![Observation::new(Point::new(50.0, 50.0))];
        let options = PipelineOptions { abort_on_error: true, ..seeded(3) };

        match FootprintExtractionPipeline::new(options).run(observations, &layers) {
            Err(FootprintError::NoValidSamples { .. }) => {}
            other => panic!("expected NoValidSamples, got {:?}", other.map(|(_, s)| s)),
        }
    }

    /// Raster whose every read fails, as with a corrupt tile
    struct CorruptRaster(GeoTransform);

    impl RasterAccessor for CorruptRaster {
        fn dimensions(&self) -> RasterDims {
            RasterDims::new(10, 10)
        }

        fn geotransform(&self) -> &GeoTransform {
            &self.0
        }

        fn read_pixel(&self, index: PixelIndex) -> FootprintResult<f64> {
            Err(FootprintError::RasterRead {
                row: index.row,
                col: index.col,
                message: "corrupt tile".to_string(),
            })
        }

        fn description(&self) -> String {
            "corrupt".to_string()
        }
    }

    fn corrupt_raster() -> Arc<dyn RasterAccessor> {
        Arc::new(CorruptRaster(GeoTransform::north_up(0.0, 1.0, 0.1, -0.1).unwrap()))
    }

    #[test]
    fn test_read_failure_is_recorded() {
        let layers = vec![
            ExtractionLayer::footprint(uniform_raster(6.0), ReducerKind::Max, "good"),
            ExtractionLayer::footprint(corrupt_raster(), ReducerKind::Max, "bad"),
            ExtractionLayer::point(uniform_raster(7.0), "after"),
        ];
        let observations = vec![
            Observation::new(Point::new(0.5, 0.5)),
            Observation::new(Point::new(0.3, 0.6)),
        ];

        let (out, summary) = FootprintExtractionPipeline::new(seeded(6)).run(observations, &layers).unwrap();
        assert_eq!(out.len(), 2);
        for observation in &out {
            assert_eq!(observation.extracted("good").unwrap().outcome.summary(), Some(&Summary::Scalar(6.0)));
            assert_eq!(observation.extracted("after").unwrap().outcome.summary(), Some(&Summary::Scalar(7.0)));
            match &observation.extracted("bad").unwrap().outcome {
                ExtractionOutcome::Failed { kind, message, .. } => {
                    assert_eq!(*kind, "RasterReadError");
                    assert!(message.contains("corrupt tile"));
                }
                other => panic!("expected failure, got {:?}", other),
            }
        }

        assert_eq!(summary.layers[0].succeeded, 2);
        assert_eq!(summary.layers[1].failed, 2);
        assert_eq!(summary.layers[2].succeeded, 2);
    }

    #[test]
    fn test_read_failure_aborts_when_asked() {
        let layers = vec![
            ExtractionLayer::footprint(uniform_raster(6.0), ReducerKind::Max, "good"),
            ExtractionLayer::point(corrupt_raster(), "bad"),
        ];
        let options = PipelineOptions { abort_on_error: true, ..seeded(7) };

        match FootprintExtractionPipeline::new(options).run(vec![Observation::new(Point::new(0.5, 0.5))], &layers) {
            Err(FootprintError::RasterRead { .. }) => {}
            other => panic!("expected RasterRead, got {:?}", other.map(|(_, s)| s)),
        }
    }

    #[test]
    fn test_zero_radius_is_insufficient() {
        let layers = vec![
            ExtractionLayer::footprint(uniform_raster(2.0), ReducerKind::Mean, "wide"),
            ExtractionLayer::footprint(uniform_raster(2.0), ReducerKind::Mean, "empty").with_radius(0.0),
        ];
        let observations = vec![
            Observation::new(Point::new(0.5, 0.5)),
            Observation::new(Point::new(0.4, 0.4)),
        ];

        let (out, summary) = FootprintExtractionPipeline::new(seeded(8)).run(observations, &layers).unwrap();
        for observation in &out {
            assert_eq!(observation.extracted("wide").unwrap().outcome.summary(), Some(&Summary::Scalar(2.0)));
            match &observation.extracted("empty").unwrap().outcome {
                ExtractionOutcome::Failed { kind, excluded, .. } => {
                    assert_eq!(*kind, "InsufficientSamplesError");
                    assert_eq!(*excluded, 0);
                }
                other => panic!("expected failure, got {:?}", other),
            }
        }
        assert_eq!(summary.layers[1].failed, 2);

        let options = PipelineOptions { abort_on_error: true, ..seeded(8) };
        let result = FootprintExtractionPipeline::new(options).run(vec![Observation::new(Point::new(0.5, 0.5))], &layers);
        assert!(matches!(result, Err(FootprintError::InsufficientSamples { attempts: 0, .. })));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let gt = GeoTransform::north_up(0.49, 0.51, 0.0001, -0.0001).unwrap();
        let mut raster = InMemoryRaster::filled(RasterDims::new(200, 200), gt, 0.0);
        for col in 0..200 {
            raster.set(PixelIndex::new(100, col), 1.0);
        }
        let layers = vec![ExtractionLayer::footprint(Arc::new(raster), ReducerKind::Mean, "m").with_radius(500.0)];
        let observations: Vec<Observation> = (0..8)
            .map(|i| Observation::new(Point::new(0.5, 0.5 + i as f64 * 0.00001)))
            .collect();

        let pipeline = FootprintExtractionPipeline::new(PipelineOptions { threads: 2, ..seeded(99) });
        let (first, _) = pipeline.run(observations.clone(), &layers).unwrap();
        let (second, _) = pipeline.run(observations, &layers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_skip_nodata() {
        let gt = GeoTransform::north_up(0.0, 1.0, 0.5, -0.5).unwrap();
        let raster = InMemoryRaster::filled(RasterDims::new(2, 2), gt, -9999.0).with_nodata(-9999.0);
        let raster: Arc<dyn RasterAccessor> = Arc::new(raster);

        let layers = vec![
            ExtractionLayer::point(raster.clone(), "raw"),
            ExtractionLayer::point(raster, "masked").with_skip_nodata(true),
        ];
        let (out, summary) = FootprintExtractionPipeline::new(seeded(4))
            .run(vec![Observation::new(Point::new(0.25, 0.75))], &layers)
            .unwrap();

        assert_eq!(out[0].extracted[0].outcome.summary(), Some(&Summary::Scalar(-9999.0)));
        assert!(out[0].extracted[1].outcome.is_failure());
        assert_eq!(summary.layers[1].failed, 1);
    }

    #[test]
    fn test_point_outside_raster() {
        let layers = vec![ExtractionLayer::point(uniform_raster(1.0), "p")];
        let (out, summary) = FootprintExtractionPipeline::new(seeded(5))
            .run(vec![Observation::new(Point::new(-0.01, 0.5))], &layers)
            .unwrap();

        match &out[0].extracted[0].outcome {
            ExtractionOutcome::Failed { kind, excluded, .. } => {
                assert_eq!(*kind, "NoValidSamplesError");
                assert_eq!(*excluded, 1);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(summary.total_excluded(), 1);
    }

    #[test]
    fn test_point_beyond_web_mercator_is_excluded() {
        // Web Mercator band hugging the northern limit of the projection
        let gt = GeoTransform::north_up(0.0, 20_100_000.0, 100_000.0, -100_000.0).unwrap();
        let raster: Arc<dyn RasterAccessor> = Arc::new(InMemoryRaster::filled(RasterDims::new(10, 10), gt, 3.0));
        let layers = vec![
            ExtractionLayer::point(raster, "arctic").with_projection(Arc::new(WebMercatorProjection)),
        ];
        let observations = vec![
            Observation::new(Point::new(1.0, 85.0)),
            Observation::new(Point::new(1.0, 87.0)),
        ];

        let (out, summary) = FootprintExtractionPipeline::new(seeded(10)).run(observations, &layers).unwrap();
        assert_eq!(out[0].extracted[0].outcome.summary(), Some(&Summary::Scalar(3.0)));
        match &out[1].extracted[0].outcome {
            ExtractionOutcome::Failed { kind, excluded, .. } => {
                assert_eq!(*kind, "NoValidSamplesError");
                assert_eq!(*excluded, 1);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(summary.total_excluded(), 1);
    }

    #[test]
    fn test_derive_seed_differs() {
        assert_ne!(derive_seed(1, 0, 0), derive_seed(1, 1, 0));
        assert_ne!(derive_seed(1, 0, 0), derive_seed(1, 0, 1));
        assert_eq!(derive_seed(7, 3, 2), derive_seed(7, 3, 2));
    }
}
