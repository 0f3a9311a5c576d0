//! Ordered batch encoding.
//!
//! Records encode independently of each other, so a batch is encoded in parallel
//! on the rayon pool and merged back by input position. Lines then reach the sink
//! strictly in input order from a single writer. A record that fails to encode is
//! rejected whole: it produces no line, and the rejection is returned in the
//! [`BatchReport`] rather than aborting the batch. Sink failures do abort.
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{pipeline, FieldKind, FieldSpec, LayoutSchema, LineBuffer, Record};
//!
//! let schema = LayoutSchema::builder("t")
//!     .field(FieldSpec::required("id", FieldKind::Text))
//!     .key_field("id")
//!     .build()
//!     .unwrap();
//!
//! let records = vec![
//!     Record::new().with("id", "first"),
//!     Record::new(),
//!     Record::new().with("id", "third"),
//! ];
//!
//! let mut sink = LineBuffer::new();
//! let report = pipeline::write_batch(&schema, &records, &mut sink).unwrap();
//! assert_eq!(report.written, 2);
//! assert_eq!(report.rejected[0].record(), "#1");
//! assert_eq!(sink.lines(), ["first\r\n", "third\r\n"]);
//! ```

use crate::{LayoutSchema, LineWriter, Record, RecordEncoder, RecordError, Result, Sink};
use rayon::prelude::*;

/// Supplies records to encode, one per output line.
pub trait RecordSource {
    fn next_record(&mut self) -> Option<Record>;
}

impl<I> RecordSource for I
where
    I: Iterator<Item = Record>,
{
    fn next_record(&mut self) -> Option<Record> {
        self.next()
    }
}

/// Outcome of writing a batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Lines handed to the sink.
    pub written: usize,
    /// Records that failed to encode, in input order.
    pub rejected: Vec<RecordError>,
}

impl BatchReport {
    /// True if every record was written.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Total records seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written + self.rejected.len()
    }

    fn merge(&mut self, other: BatchReport) {
        self.written += other.written;
        self.rejected.extend(other.rejected);
    }
}

/// Encodes and renders one record into a complete line.
pub fn encode_line(
    record: &Record,
    schema: &LayoutSchema,
) -> std::result::Result<String, RecordError> {
    let tokens = RecordEncoder::encode(record, schema)?;
    Ok(LineWriter::render(&tokens, schema))
}

/// Encodes `records` in parallel. Results keep input order.
pub fn encode_batch(
    schema: &LayoutSchema,
    records: &[Record],
) -> Vec<std::result::Result<String, RecordError>> {
    encode_from(schema, records, 0)
}

fn encode_from(
    schema: &LayoutSchema,
    records: &[Record],
    offset: usize,
) -> Vec<std::result::Result<String, RecordError>> {
    records
        .par_iter()
        .enumerate()
        .map(|(i, record)| {
            RecordEncoder::encode_at(record, schema, offset + i)
                .map(|tokens| LineWriter::render(&tokens, schema))
        })
        .collect()
}

/// Encodes `records` in parallel and writes the lines to `sink` in input order.
pub fn write_batch<S: Sink + ?Sized>(
    schema: &LayoutSchema,
    records: &[Record],
    sink: &mut S,
) -> Result<BatchReport> {
    write_from(schema, records, 0, sink)
}

#[tracing::instrument(level = "debug", skip_all, fields(
    layout = schema.name(),
    count = records.len(),
    offset = offset,
))]
fn write_from<S: Sink + ?Sized>(
    schema: &LayoutSchema,
    records: &[Record],
    offset: usize,
    sink: &mut S,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for (i, encoded) in encode_from(schema, records, offset).into_iter().enumerate() {
        match encoded {
            Ok(line) => {
                sink.write_line(&line)?;
                report.written += 1;
                tracing::trace!(index = offset + i, "line written");
            }
            Err(err) => {
                tracing::warn!(
                    field = err.field(),
                    record = err.record(),
                    error = %err,
                    "record rejected"
                );
                report.rejected.push(err);
            }
        }
    }
    tracing::debug!(
        written = report.written,
        rejected = report.rejected.len(),
        "batch complete"
    );
    Ok(report)
}

/// Pulls every record from `source` in chunks of `chunk_size`, writing each chunk
/// with [`write_batch`]. Keyless records are identified by their position in the
/// whole stream.
pub fn drain<R, S>(
    schema: &LayoutSchema,
    source: &mut R,
    sink: &mut S,
    chunk_size: usize,
) -> Result<BatchReport>
where
    R: RecordSource + ?Sized,
    S: Sink + ?Sized,
{
    let chunk_size = chunk_size.max(1);
    let mut report = BatchReport::default();
    let mut chunk = Vec::with_capacity(chunk_size);
    loop {
        while chunk.len() < chunk_size {
            match source.next_record() {
                Some(record) => chunk.push(record),
                None => break,
            }
        }
        if chunk.is_empty() {
            break;
        }
        let offset = report.total();
        let done = chunk.len() < chunk_size;
        report.merge(write_from(schema, &chunk, offset, sink)?);
        chunk.clear();
        if done {
            break;
        }
    }
    sink.flush()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};
    use crate::{Error, LineBuffer, SharedSink, Value};

    fn schema() -> LayoutSchema {
        LayoutSchema::builder("t")
            .field(FieldSpec::required("seq", FieldKind::Integer))
            .field(FieldSpec::required("cnpj", FieldKind::Identifier { width: 14 }))
            .build()
            .unwrap()
    }

    fn record(seq: i64) -> Record {
        Record::new()
            .with("seq", seq)
            .with("cnpj", Value::identifier(seq.to_string()))
    }

    #[test]
    fn test_encode_batch_keeps_order() {
        let records: Vec<Record> = (0..500).map(record).collect();
        let lines = encode_batch(&schema(), &records);
        for (i, line) in lines.into_iter().enumerate() {
            assert_eq!(line.unwrap(), format!("{};{:014}\r\n", i, i));
        }
    }

    #[test]
    fn test_write_batch_skips_rejected_records() {
        let mut records: Vec<Record> = (0..10).map(record).collect();
        records[3].remove("cnpj");
        records[7] = records[7].clone().with("cnpj", Value::identifier("123456789012345"));

        let mut sink = LineBuffer::new();
        let report = write_batch(&schema(), &records, &mut sink).unwrap();
        assert_eq!(report.written, 8);
        assert_eq!(report.total(), 10);
        assert!(!report.is_clean());
        assert_eq!(report.rejected[0].record(), "#3");
        assert_eq!(report.rejected[1].record(), "#7");
        assert!(sink.lines().iter().all(|l| !l.starts_with("3;") && !l.starts_with("7;")));
    }

    #[test]
    fn test_drain_numbers_across_chunks() {
        let mut records: Vec<Record> = (0..25).map(record).collect();
        records[21].remove("seq");

        let mut sink = Vec::<String>::new();
        let report = drain(&schema(), &mut records.into_iter(), &mut sink, 4).unwrap();
        assert_eq!(report.written, 24);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].record(), "#21");
        assert_eq!(sink[20], format!("20;{:014}\r\n", 20));
        assert_eq!(sink[21], format!("22;{:014}\r\n", 22));
    }

    #[test]
    fn test_drain_empty_source() {
        let mut sink = LineBuffer::new();
        let report = drain(&schema(), &mut std::iter::empty::<Record>(), &mut sink, 8).unwrap();
        assert_eq!(report, BatchReport::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shared_sink_batch() {
        let shared = SharedSink::new(LineBuffer::new());
        let records: Vec<Record> = (0..3).map(record).collect();
        let report = write_batch(&schema(), &records, &mut &shared).unwrap();
        assert!(report.is_clean());
        assert_eq!(shared.into_inner().len(), 3);
    }

    #[test]
    fn test_sink_failure_aborts() {
        struct Full;
        impl Sink for Full {
            fn write_line(&mut self, _: &str) -> Result<()> {
                Err(Error::io("disk full"))
            }
        }
        let records: Vec<Record> = (0..3).map(record).collect();
        let err = write_batch(&schema(), &records, &mut Full).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
