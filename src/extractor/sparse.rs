//! Deduplicated pixel reads
//!
//! Footprint samples are usually much denser than the raster grid, so most of
//! them land on a pixel some other sample already hit. Each distinct pixel is
//! read once and its value repeated by the number of samples that mapped to
//! it. The result is the same multiset of values in pixel order rather than
//! sample order; only order-independent reducers may consume it.

use std::collections::BTreeMap;
use std::iter;

use log::trace;

use crate::errors::FootprintResult;
use crate::raster::RasterAccessor;
use super::index_mapper::classify_bounds;
use super::pixel::PixelIndex;

/// Values extracted for one footprint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseExtraction {
    /// One value per in-bounds sample, grouped by pixel
    pub values: Vec<f64>,
    /// Samples dropped because they fell outside the raster
    pub excluded: usize,
    /// Number of accessor reads performed
    pub distinct_reads: usize,
}

/// Reads sample values with at most one access per distinct pixel
pub struct SparsePixelExtractor<'a> {
    accessor: &'a dyn RasterAccessor,
}

impl<'a> SparsePixelExtractor<'a> {
    /// Create an extractor over a raster band
    pub fn new(accessor: &'a dyn RasterAccessor) -> Self {
        SparsePixelExtractor { accessor }
    }

    /// Extract the values at `indices`
    ///
    /// Out-of-bounds and unmappable indices are dropped and counted in
    /// `excluded`; they never reach the accessor. A failed read aborts the
    /// whole extraction.
    pub fn extract(&self, indices: &[Option<PixelIndex>]) -> FootprintResult<SparseExtraction> {
        let in_bounds = classify_bounds(indices, &self.accessor.dimensions());

        let mut multiplicities: BTreeMap<PixelIndex, usize> = BTreeMap::new();
        let mut excluded = 0;

        for (index, inside) in indices.iter().zip(in_bounds) {
            match index {
                Some(index) if inside => *multiplicities.entry(*index).or_insert(0) += 1,
                _ => excluded += 1,
            }
        }

        let mut values = Vec::with_capacity(indices.len() - excluded);
        for (index, count) in &multiplicities {
            let value = self.accessor.read_pixel(*index)?;
            values.extend(iter::repeat(value).take(*count));
        }

        trace!("{} samples, {} distinct pixels, {} out of bounds",
               indices.len(), multiplicities.len(), excluded);

        Ok(SparseExtraction {
            values,
            excluded,
            distinct_reads: multiplicities.len(),
        })
    }
}
