//! Observations and their extracted values

use crate::coordinate::Point;
use super::reducer::Summary;

/// One point observation with passthrough attributes
///
/// The pipeline never touches `point` or `fields`; it only appends to
/// `extracted`, one entry per layer in layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Observation location in the input CRS
    pub point: Point,
    /// Attribute values carried through unchanged (for CSV input, every column)
    pub fields: Vec<String>,
    /// Values added by extraction
    pub extracted: Vec<ExtractedField>,
}

impl Observation {
    /// Create an observation without attributes
    pub fn new(point: Point) -> Self {
        Observation { point, fields: Vec::new(), extracted: Vec::new() }
    }

    /// Create an observation carrying attribute values
    pub fn with_fields(point: Point, fields: Vec<String>) -> Self {
        Observation { point, fields, extracted: Vec::new() }
    }

    /// Look up an extracted field by column name
    pub fn extracted(&self, column: &str) -> Option<&ExtractedField> {
        self.extracted.iter().find(|f| f.column == column)
    }
}

/// Value extracted for one layer
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    /// Output column name
    pub column: String,
    /// Extraction outcome
    pub outcome: ExtractionOutcome,
}

/// Result of extracting one layer for one observation
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Extraction succeeded
    Value {
        /// Reduced value
        summary: Summary,
        /// Number of values that went into the reducer
        samples: usize,
        /// Samples dropped as out of bounds
        excluded: usize,
        /// Values dropped as NoData
        nodata: usize,
        /// Distinct pixels read from the raster
        reads: usize,
    },
    /// Extraction failed; the column is left empty
    Failed {
        /// Error kind name, e.g. `NoValidSamplesError`
        kind: &'static str,
        /// Error message
        message: String,
        /// Samples dropped as out of bounds before the failure
        excluded: usize,
    },
}

impl ExtractionOutcome {
    /// The summary, when extraction succeeded
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            ExtractionOutcome::Value { summary, .. } => Some(summary),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    /// True when extraction failed
    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed { .. })
    }

    /// Samples dropped as out of bounds
    pub fn excluded(&self) -> usize {
        match self {
            ExtractionOutcome::Value { excluded, .. } | ExtractionOutcome::Failed { excluded, .. } => *excluded,
        }
    }

    /// Number of values reduced (zero on failure)
    pub fn sample_count(&self) -> usize {
        match self {
            ExtractionOutcome::Value { samples, .. } => *samples,
            ExtractionOutcome::Failed { .. } => 0,
        }
    }
}
