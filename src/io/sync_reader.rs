//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over point operations from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! ```no_run
//! use point_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(operation) => println!("Applying: {:?}", operation),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! Fatal errors (file not found) are returned from `new()` as `PointError::IoError`.
//! Row errors are yielded as `Err` items; parse errors carry the line number.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{PointError, PointOperation};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time, so memory use does not grow with file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open a CSV file for streaming iteration
    ///
    /// The reader trims whitespace from all fields and allows rows with a
    /// missing trailing amount, which are then reported as conversion errors.
    pub fn new(path: &Path) -> Result<Self, PointError> {
        let file = File::open(path).map_err(|e| {
            PointError::io(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<PointOperation, PointError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        let row = deserializer.next()?;
        self.line_num += 1;
        // +1 for the header row
        let line = self.line_num + 1;

        Some(match row {
            Ok(csv_record) => convert_csv_record(csv_record).map_err(|e| e.at_line(line)),
            Err(e) => Err(PointError::from(e).at_line(line)),
        })
    }
}
