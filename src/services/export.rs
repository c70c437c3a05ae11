//! CSV export of the feature-augmented table.

use std::io::Write;
use std::sync::Arc;

use futures_util::stream::{self, Stream};

use crate::error::DataError;
use crate::services::features::{Dataset, FeatureRow};

/// Fixed filename offered for the dataset download.
pub const EXPORT_FILENAME: &str = "DATASET_BTC.csv";

/// Rows encoded per streamed chunk.
pub const EXPORT_CHUNK_ROWS: usize = 50_000;

pub const EXPORT_HEADER: [&str; 14] = [
    "Timestamp",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Return",
    "Volatility",
    "RollingVol",
    "Year",
    "Month",
    "Day",
    "Hour",
    "Weekday",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write rows as CSV. `Timestamp` is integer epoch seconds and nulls are empty,
/// so the output loads back through the dataset loader.
pub fn write_csv<W: Write>(rows: &[FeatureRow], writer: W, with_header: bool) -> Result<(), DataError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    if with_header {
        csv_writer.write_record(EXPORT_HEADER)?;
    }

    for row in rows {
        csv_writer.write_record([
            row.timestamp.timestamp().to_string(),
            row.open.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.close.to_string(),
            row.volume.to_string(),
            optional(row.ret),
            row.range.to_string(),
            optional(row.rolling_volatility),
            row.year.to_string(),
            row.month.to_string(),
            row.day.to_string(),
            row.hour.to_string(),
            row.weekday.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Encode a row range to bytes; the header goes with the first chunk.
pub fn encode_chunk(rows: &[FeatureRow], start: usize, end: usize) -> Result<Vec<u8>, DataError> {
    let mut buf = Vec::new();
    write_csv(&rows[start..end], &mut buf, start == 0)?;
    Ok(buf)
}

/// Lazily encoded CSV chunks covering the whole dataset.
pub fn csv_chunks(dataset: Arc<Dataset>) -> impl Stream<Item = Result<Vec<u8>, DataError>> + Send + 'static {
    let len = dataset.len();
    // An empty dataset still yields one chunk carrying the header.
    let starts: Vec<usize> = if len == 0 {
        vec![0]
    } else {
        (0..len).step_by(EXPORT_CHUNK_ROWS).collect()
    };

    stream::iter(starts.into_iter().map(move |start| {
        let end = (start + EXPORT_CHUNK_ROWS).min(len);
        encode_chunk(dataset.rows(), start, end)
    }))
}
