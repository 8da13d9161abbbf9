//! Footprint reducers
//!
//! A reducer collapses the values sampled inside one footprint into a single
//! summary. All reducers are order-independent, which is what allows the
//! sparse extractor to hand values back grouped by pixel.
//!
//! NaN values follow the usual array-library semantics: any NaN makes the
//! scalar statistics NaN, and `unique` keeps a single NaN.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::{FootprintError, FootprintResult};

/// Aggregation applied to a footprint's sample values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducerKind {
    /// Largest value
    Max,
    /// Smallest value
    Min,
    /// Arithmetic mean
    Mean,
    /// Median (average of the two middle values for even counts)
    Median,
    /// Population standard deviation
    #[serde(rename = "std", alias = "stddev")]
    StdDev,
    /// Number of values
    Count,
    /// Sorted set of distinct values
    #[serde(rename = "unique", alias = "unique-set")]
    UniqueSet,
}

impl ReducerKind {
    /// All reducers, in documentation order
    pub const ALL: [ReducerKind; 7] = [
        ReducerKind::Max,
        ReducerKind::Min,
        ReducerKind::Mean,
        ReducerKind::Median,
        ReducerKind::StdDev,
        ReducerKind::Count,
        ReducerKind::UniqueSet,
    ];

    /// Short name, used in default column names (`<layer>_py<name>`)
    pub fn name(&self) -> &'static str {
        match self {
            ReducerKind::Max => "max",
            ReducerKind::Min => "min",
            ReducerKind::Mean => "mean",
            ReducerKind::Median => "median",
            ReducerKind::StdDev => "std",
            ReducerKind::Count => "count",
            ReducerKind::UniqueSet => "unique",
        }
    }

    /// Reduce the values of one footprint
    ///
    /// `Count` and `UniqueSet` accept empty input (zero and the empty set);
    /// every other reducer fails with `NoValidSamples`.
    pub fn reduce(&self, values: &[f64]) -> FootprintResult<Summary> {
        if values.is_empty() {
            return match self {
                ReducerKind::Count => Ok(Summary::Scalar(0.0)),
                ReducerKind::UniqueSet => Ok(Summary::Set(Vec::new())),
                _ => Err(FootprintError::NoValidSamples { reducer: self.name() }),
            };
        }

        let summary = match self {
            ReducerKind::Max => Summary::Scalar(nan_or(values, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))),
            ReducerKind::Min => Summary::Scalar(nan_or(values, |v| v.iter().copied().fold(f64::INFINITY, f64::min))),
            ReducerKind::Mean => Summary::Scalar(mean(values)),
            ReducerKind::Median => Summary::Scalar(nan_or(values, median)),
            ReducerKind::StdDev => Summary::Scalar(std_dev(values)),
            ReducerKind::Count => Summary::Scalar(values.len() as f64),
            ReducerKind::UniqueSet => Summary::Set(unique(values)),
        };

        Ok(summary)
    }
}

impl FromStr for ReducerKind {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" => Ok(ReducerKind::Max),
            "min" => Ok(ReducerKind::Min),
            "mean" | "avg" => Ok(ReducerKind::Mean),
            "median" => Ok(ReducerKind::Median),
            "std" | "stddev" => Ok(ReducerKind::StdDev),
            "count" => Ok(ReducerKind::Count),
            "unique" | "unique-set" | "uniqueset" => Ok(ReducerKind::UniqueSet),
            other => Err(FootprintError::Config(format!("Unknown reducer: {}", other))),
        }
    }
}

impl fmt::Display for ReducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of reducing one footprint
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// A single number
    Scalar(f64),
    /// Distinct values in ascending order
    Set(Vec<f64>),
}

impl Summary {
    /// The scalar value, if this is a scalar summary
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Summary::Scalar(v) => Some(*v),
            Summary::Set(_) => None,
        }
    }
}

impl fmt::Display for Summary {
    /// Scalars use the shortest round-trip form, sets are written as `[a b c]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Scalar(v) => write!(f, "{}", v),
            Summary::Set(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn nan_or(values: &[f64], op: impl Fn(&[f64]) -> f64) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        f64::NAN
    } else {
        op(values)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn unique(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| a == b || (a.is_nan() && b.is_nan()));
    sorted
}
