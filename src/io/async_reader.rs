//! Asynchronous CSV reader with batch interface
//!
//! Reads point operations from any `futures::io::AsyncRead` source in
//! batches, for the concurrent processing strategy.
//!
//! ```text
//! CSV source → AsyncReader → batches of PointOperations
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::PointOperation;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read up to `batch_size` operations
    ///
    /// Rows that fail to parse or convert are logged and skipped. Returns an
    /// empty vector once the source is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<PointOperation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => {
                        warn!(error = %e, "skipping unconvertible record");
                        self.skipped += 1;
                    }
                },
                Some(Err(e)) => {
                    warn!(error = %e, "skipping malformed CSV row");
                    self.skipped += 1;
                }
                None => break,
            }
        }

        batch
    }
}
