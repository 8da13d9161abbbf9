use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, Writer};
use log::{debug, info};

use crate::coordinate::Point;
use crate::errors::{FootprintError, FootprintResult};
use crate::extractor::{ExtractionOutcome, Observation};

/// Diagnostic columns written next to each value column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputColumns {
    /// Add `<column>_n`, the number of values reduced
    pub sample_counts: bool,
    /// Add `<column>_err`, the error kind of failed extractions
    pub error_flags: bool,
}

impl OutputColumns {
    /// Header names produced for one value column
    pub fn names(&self, column: &str) -> Vec<String> {
        let mut names = vec![column.to_string()];
        if self.sample_counts {
            names.push(format!("{}_n", column));
        }
        if self.error_flags {
            names.push(format!("{}_err", column));
        }
        names
    }
}

/// Layout of a CSV table of observations
#[derive(Debug, Clone)]
pub struct ObservationTable {
    headers: Vec<String>,
    x_index: usize,
    y_index: usize,
}

impl ObservationTable {
    /// Read a CSV file of observations
    pub fn read_path(path: &str, x_column: &str, y_column: &str) -> FootprintResult<(Self, Vec<Observation>)> {
        let file = File::open(path).map_err(|e| {
            FootprintError::Config(format!("cannot open observation table {}: {}", path, e))
        })?;
        let (table, observations) = ObservationTable::read(file, x_column, y_column)?;
        info!("Read {} observation(s) from {}", observations.len(), path);
        Ok((table, observations))
    }

    /// Read CSV observations with coordinates in `x_column` and `y_column`
    ///
    /// Every column, coordinates included, is kept as a passthrough field.
    /// A row whose coordinates do not parse as numbers fails the whole read.
    pub fn read<R: Read>(reader: R, x_column: &str, y_column: &str) -> FootprintResult<(Self, Vec<Observation>)> {
        let mut csv_reader = ReaderBuilder::new().from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let position = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                FootprintError::Config(format!(
                    "coordinate column '{}' not found, table has: {}", name, headers.join(", ")))
            })
        };
        let table = ObservationTable {
            x_index: position(x_column)?,
            y_index: position(y_column)?,
            headers: headers.clone(),
        };

        let mut observations = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let point = table.parse_point(&record, row + 1)?;
            observations.push(Observation::with_fields(point, record.iter().map(String::from).collect()));
        }

        debug!("Observation table has {} column(s), coordinates in '{}' and '{}'",
               table.headers.len(), x_column, y_column);
        Ok((table, observations))
    }

    fn parse_point(&self, record: &StringRecord, row: usize) -> FootprintResult<Point> {
        let coordinate = |index: usize| -> FootprintResult<f64> {
            let text = record.get(index).unwrap_or("").trim();
            text.parse::<f64>().map_err(|_| {
                FootprintError::Config(format!(
                    "row {}: cannot parse '{}' in column '{}' as a coordinate", row, text, self.headers[index]))
            })
        };
        Ok(Point::new(coordinate(self.x_index)?, coordinate(self.y_index)?))
    }

    /// Input column names, in order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Reject output columns that are empty, repeated or already in the input
    pub fn check_columns(&self, columns: &[String], extra: OutputColumns) -> FootprintResult<()> {
        let mut seen: HashSet<&str> = self.headers.iter().map(String::as_str).collect();
        let names: Vec<String> = columns.iter().flat_map(|c| extra.names(c)).collect();

        for name in &names {
            if name.is_empty() {
                return Err(FootprintError::Config("empty output column name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(FootprintError::Config(format!(
                    "output column '{}' collides with an existing column", name)));
            }
        }
        Ok(())
    }

    /// Write a CSV file of annotated observations
    pub fn write_path(&self, path: &str, columns: &[String], extra: OutputColumns,
                      observations: &[Observation]) -> FootprintResult<()> {
        let file = File::create(path)?;
        self.write(file, columns, extra, observations)?;
        info!("Wrote {} observation(s) to {}", observations.len(), path);
        Ok(())
    }

    /// Write observations with their extracted fields
    ///
    /// `columns` names the value columns in layer order. Failed extractions
    /// leave the value column empty.
    pub fn write<W: Write>(&self, writer: W, columns: &[String], extra: OutputColumns,
                           observations: &[Observation]) -> FootprintResult<()> {
        let mut csv_writer = Writer::from_writer(writer);

        let mut header = self.headers.clone();
        header.extend(columns.iter().flat_map(|c| extra.names(c)));
        csv_writer.write_record(&header)?;

        for observation in observations {
            let mut record = observation.fields.clone();
            record.resize(self.headers.len(), String::new());

            for column in columns {
                let field = observation.extracted(column);
                let outcome = field.map(|f| &f.outcome);

                record.push(outcome.and_then(|o| o.summary()).map(|s| s.to_string()).unwrap_or_default());
                if extra.sample_counts {
                    record.push(outcome.map(|o| o.sample_count().to_string()).unwrap_or_default());
                }
                if extra.error_flags {
                    let kind = match outcome {
                        Some(ExtractionOutcome::Failed { kind, .. }) => *kind,
                        _ => "",
                    };
                    record.push(kind.to_string());
                }
            }

            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
