//! Turns a raw CSV byte stream into typed candidate-transaction rows.

use std::io;

use serde::Deserialize;

use crate::{Error, models::TransactionKind};

/// One data row of an import file: a candidate transaction whose category is
/// still a raw title.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportRecord {
    /// A text description of what the transaction was for.
    pub title: String,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money in minor currency units.
    pub value: i64,
    /// The raw title of the category the transaction belongs to.
    pub category: String,
}

/// A lazy, finite, non-restartable iterator over the data rows of a CSV
/// stream, in file order.
///
/// The first line is treated as a header and discarded. Fields are trimmed of
/// leading and trailing whitespace. Rows that do not form a valid
/// [ImportRecord] (wrong field count, non-integer value, unknown kind token,
/// empty title or category) yield [Error::InvalidRecord]; failures of the
/// underlying stream yield [Error::Io].
pub struct RowIngestor<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
}

impl<R: io::Read> RowIngestor<R> {
    /// Create an ingestor over a raw byte stream.
    pub fn new(stream: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(stream);

        Self {
            reader,
            record: csv::StringRecord::new(),
        }
    }

    fn parse_record(&self, line: u64) -> Result<ImportRecord, Error> {
        let record: ImportRecord =
            self.record
                .deserialize(None)
                .map_err(|error| Error::InvalidRecord {
                    line,
                    message: error.to_string(),
                })?;

        if record.title.is_empty() {
            return Err(Error::InvalidRecord {
                line,
                message: "title must not be empty".to_string(),
            });
        }

        if record.category.is_empty() {
            return Err(Error::InvalidRecord {
                line,
                message: "category must not be empty".to_string(),
            });
        }

        if record.value < 1 {
            return Err(Error::InvalidRecord {
                line,
                message: format!("value must be a positive integer, got {}", record.value),
            });
        }

        Ok(record)
    }
}

impl<R: io::Read> Iterator for RowIngestor<R> {
    type Item = Result<ImportRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map_or(0, csv::Position::line);
                Some(self.parse_record(line))
            }
            Err(error) => Some(Err(map_csv_error(error))),
        }
    }
}

fn map_csv_error(error: csv::Error) -> Error {
    let line = error.position().map_or(0, csv::Position::line);
    let message = error.to_string();

    match error.into_kind() {
        csv::ErrorKind::Io(error) => Error::Io(error.to_string()),
        _ => Error::InvalidRecord { line, message },
    }
}
