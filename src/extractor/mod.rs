//! Footprint sampling and value extraction
//!
//! The building blocks, leaf first: [`EllipseSampler`] draws points inside a
//! footprint, [`RasterIndexMapper`] turns them into pixel indices,
//! [`SparsePixelExtractor`] reads each distinct pixel once and
//! [`ReducerKind`] collapses the values. [`FootprintExtractionPipeline`] wires
//! them together over a table of observations.

mod index_mapper;
mod observation;
mod pipeline;
mod pixel;
mod reducer;
mod sampler;
mod sparse;

pub use index_mapper::{classify_bounds, RasterIndexMapper};
pub use observation::{ExtractedField, ExtractionOutcome, Observation};
pub use pipeline::{
    ExtractionLayer, FootprintExtractionPipeline, LayerMode, LayerSummary, PipelineOptions, RunSummary,
    DEFAULT_BUFFER_RADIUS, DEFAULT_SAMPLE_COUNT,
};
pub use pixel::{PixelIndex, RasterDims};
pub use reducer::{ReducerKind, Summary};
pub use sampler::{EllipseSampler, SampleSet, DEFAULT_MAX_ATTEMPTS};
pub use sparse::{SparseExtraction, SparsePixelExtractor};
