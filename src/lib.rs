//! # cerc_layout
//!
//! Schema-driven encoder for the fixed-layout record files of the CERC interbank
//! receivables registry.
//!
//! ## What does it do?
//!
//! Each CERC file type ("AP001", "AP002", ...) is a delimited line format: typed
//! business values rendered into fixed-format tokens (zero-padded identifiers,
//! two-decimal amounts, calendar dates, RFC3339 timestamps) and joined into one
//! line per record. Some fields pack a variable number of sub-records, such as
//! payment instructions, using a second, nested delimiter level.
//!
//! Instead of one hand-written encoder per file type, this crate describes each
//! type as a [`LayoutSchema`] value and encodes every one of them with the same
//! machinery:
//!
//! - [`FieldFormatter`]: one typed [`Value`] to one token
//! - [`ListEncoder`]: a sequence of sub-records to one two-level token
//! - [`RecordEncoder`]: one [`Record`] to its ordered tokens
//! - [`LineWriter`]: tokens to one quoted, terminated line, forwarded to a [`Sink`]
//!
//! ## Key Features
//!
//! - **Validated layouts**: delimiter collisions and malformed fields are caught once,
//!   when the schema is built, never on the encoding path
//! - **Exact widths**: identifiers are padded, never truncated; overflow is an error
//! - **Minimal quoting**: only tokens that hold a reserved character are quoted
//! - **Ordered parallel batches**: records encode on the rayon pool, lines reach the
//!   sink in input order
//! - **Whole-record rejection**: a record encodes completely or not at all, and errors
//!   name the field and the record
//!
//! ## Quick Start
//!
//! ```rust
//! use cerc_layout::{FieldKind, FieldSpec, LayoutOptions, LayoutSchema, Record, Value};
//! use chrono::NaiveDate;
//!
//! let schema = LayoutSchema::builder("CERC-AP010")
//!     .options(LayoutOptions::cerc())
//!     .field(FieldSpec::required("referencia_externa", FieldKind::Text))
//!     .field(FieldSpec::required("data_referencia", FieldKind::Date))
//!     .field(FieldSpec::required("credenciadora", FieldKind::Identifier { width: 14 }))
//!     .key_field("referencia_externa")
//!     .build()
//!     .unwrap();
//!
//! let record = Record::new()
//!     .with("referencia_externa", "REF_000001")
//!     .with("data_referencia", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
//!     .with("credenciadora", Value::identifier("1234567000199"));
//!
//! let line = cerc_layout::to_line(&schema, &record).unwrap();
//! assert_eq!(line, "REF_000001;2024-03-15;01234567000199\r\n");
//! ```
//!
//! ### Working with List Fields
//!
//! ```rust
//! use cerc_layout::{record, sub_record, Delimiter, FieldKind, FieldSpec, LayoutOptions, LayoutSchema, ListFieldSpec, Value};
//!
//! let schema = LayoutSchema::builder("payments")
//!     .options(LayoutOptions::cerc())
//!     .field(FieldSpec::required("referencia_externa", FieldKind::Text))
//!     .list(
//!         ListFieldSpec::new(
//!             "pagamentos",
//!             vec![
//!                 FieldSpec::required("ispb", FieldKind::Identifier { width: 8 }),
//!                 FieldSpec::required("valor_a_pagar", FieldKind::decimal()),
//!             ],
//!         )
//!         .allow_empty(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let record = record! {
//!     "referencia_externa" => "REF_000002",
//!     "pagamentos" => vec![
//!         sub_record! { "ispb" => Value::identifier("1"), "valor_a_pagar" => 10.0 },
//!         sub_record! { "ispb" => Value::identifier("2"), "valor_a_pagar" => 20.5 },
//!     ],
//! };
//!
//! let line = cerc_layout::to_line(&schema, &record).unwrap();
//! assert_eq!(line, "REF_000002;\"00000001;10.00|00000002;20.50\"\r\n");
//! ```
//!
//! ### Bundled Layouts
//!
//! ```rust
//! use cerc_layout::layouts::Layout;
//!
//! for layout in Layout::ALL {
//!     assert!(layout.schema().is_ok());
//! }
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Proper error propagation with `Result` types
//! - No panics in public API
//!
//! ## Line Format
//!
//! The line format is documented in the [`wire`] module.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`single_line.rs`** - Encoding one record of a bundled layout
//! - **`payment_groups.rs`** - List fields, defaults and head fields
//! - **`custom_options.rs`** - Delimiters, line endings and options loaded from JSON
//! - **`parallel_batch.rs`** - Ordered parallel encoding into a file sink
//!
//! Run any example with: `cargo run --example <name>`

pub mod encoder;
pub mod error;
pub mod format;
pub mod layouts;
pub mod list;
pub mod macros;
pub mod map;
pub mod options;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod value;
pub mod wire;
pub mod writer;

pub use encoder::RecordEncoder;
pub use error::{Error, FieldError, FormatError, RecordError, Result, SchemaError};
pub use format::FieldFormatter;
pub use layouts::Layout;
pub use list::{FieldLookup, ListEncoder, ListParts};
pub use map::{FieldMap, Record, SubRecord};
pub use options::{Delimiter, LayoutOptions, LineEnding};
pub use pipeline::{BatchReport, RecordSource};
pub use schema::{
    DefaultSupplier, EmptyPolicy, FieldKind, FieldSpec, LayoutField, LayoutSchema,
    LayoutSchemaBuilder, ListFieldSpec, DEFAULT_FRACTION_DIGITS,
};
pub use value::{Entry, Value};
pub use writer::{LineBuffer, LineWriter, SharedSink, Sink, WriteSink};

use std::io;

/// Encodes one record into a complete line, line ending included.
///
/// # Errors
///
/// Returns [`Error::Record`] if the record does not fit the layout.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_line(schema: &LayoutSchema, record: &Record) -> Result<String> {
    Ok(pipeline::encode_line(record, schema)?)
}

/// Encodes every record and concatenates the lines.
///
/// Unlike [`pipeline::write_batch`], the first failing record aborts the whole
/// call and nothing is returned.
///
/// # Examples
///
/// ```rust
/// use cerc_layout::{FieldKind, FieldSpec, LayoutOptions, LayoutSchema, LineEnding, Record};
///
/// let schema = LayoutSchema::builder("t")
///     .options(LayoutOptions::new().with_line_ending(LineEnding::Lf))
///     .field(FieldSpec::required("quantidade", FieldKind::Integer))
///     .build()
///     .unwrap();
///
/// let records = vec![Record::new().with("quantidade", 1i64), Record::new().with("quantidade", 2i64)];
/// assert_eq!(cerc_layout::to_string(&schema, &records).unwrap(), "1\n2\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Record`] for the first record that does not fit the layout.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(schema: &LayoutSchema, records: &[Record]) -> Result<String> {
    let mut out = String::new();
    for line in pipeline::encode_batch(schema, records) {
        out.push_str(&line?);
    }
    Ok(out)
}

/// Encodes every record and writes the lines to `writer`.
///
/// All records are encoded before the first byte is written, so a failing record
/// leaves `writer` untouched.
///
/// # Examples
///
/// ```rust
/// use cerc_layout::{FieldKind, FieldSpec, LayoutSchema, Record};
///
/// let schema = LayoutSchema::builder("t")
///     .field(FieldSpec::required("carteira", FieldKind::Text))
///     .build()
///     .unwrap();
///
/// let mut buffer = Vec::new();
/// cerc_layout::to_writer(&mut buffer, &schema, &[Record::new().with("carteira", "Carteira1")]).unwrap();
/// assert_eq!(buffer, b"Carteira1\r\n");
/// ```
///
/// # Errors
///
/// Returns an error if a record does not fit the layout or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, schema: &LayoutSchema, records: &[Record]) -> Result<()>
where
    W: io::Write,
{
    let lines = pipeline::encode_batch(schema, records)
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mut sink = WriteSink::new(writer);
    for line in &lines {
        sink.write_line(line)?;
    }
    sink.flush()
}

/// Splits an encoded line back into its unquoted tokens.
///
/// # Errors
///
/// Returns [`Error::Parse`] if a quoted token is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_line(schema: &LayoutSchema, line: &str) -> Result<Vec<String>> {
    reader::split_line(line, schema)
}
