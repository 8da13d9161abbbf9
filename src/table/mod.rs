//! Observation tables
//!
//! Observations come in and go out as CSV. Input columns are carried through
//! untouched; extraction appends one value column per layer and, optionally,
//! diagnostic columns.

mod csv_table;

pub use csv_table::{ObservationTable, OutputColumns};
