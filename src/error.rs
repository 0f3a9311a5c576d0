//! Error types for layout construction, field formatting and record encoding.
//!
//! Errors are split by the stage that raises them so callers can tell a broken
//! layout (fatal at startup) apart from a single bad record (reject and move on):
//!
//! - [`SchemaError`]: the layout itself is malformed. Raised once, when the
//!   [`LayoutSchema`](crate::LayoutSchema) is built.
//! - [`FormatError`]: one value violates the formatting contract of its field.
//! - [`RecordError`]: a record does not fit the layout, or one of its fields failed
//!   to format. Always carries the field name and the record identifier.
//! - [`Error`]: umbrella type returned by the crate-level helpers, including sink
//!   I/O failures.
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{FieldKind, FieldFormatter, FieldSpec, FormatError, Value};
//!
//! let spec = FieldSpec::required("cnpj", FieldKind::Identifier { width: 3 });
//! let err = FieldFormatter::format(Some(&Value::identifier("12345")), &spec).unwrap_err();
//! assert_eq!(err, FormatError::Overflow { width: 3, len: 5 });
//! ```

use thiserror::Error;

/// A single field value that cannot be rendered under its [`FieldSpec`](crate::FieldSpec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Identifier has more digits than the declared width. Identifiers are never truncated.
    #[error("identifier of {len} digits overflows declared width {width}")]
    Overflow { width: usize, len: usize },

    /// Decimal magnitude is NaN or infinite.
    #[error("decimal value is not finite")]
    NotFinite,

    /// Identifier contains something other than ASCII digits.
    #[error("identifier contains non-digit characters: {value:?}")]
    NonDigit { value: String },

    /// Required field has no value.
    #[error("required field has no value")]
    MissingField,

    /// Value variant does not match the field kind.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Enum code outside the field's declared code set.
    #[error("code {code:?} is not one of {allowed:?}")]
    InvalidCode { code: String, allowed: Vec<String> },

    /// A sub-field token contains one of its own list delimiters.
    #[error("sub-field token contains list delimiter {delimiter:?}")]
    DelimiterCollision { delimiter: char },
}

/// A layout that violates a construction invariant.
///
/// Schema errors are detected once, at build time, and are never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("layout {layout:?} declares no fields")]
    EmptyLayout { layout: String },

    #[error("layout {layout:?} declares field {field:?} more than once")]
    DuplicateField { layout: String, field: String },

    /// Two delimiter levels share a character, or the quote character is a delimiter.
    #[error("delimiter {delimiter:?} of {level} clashes with {other}")]
    DelimiterClash {
        delimiter: char,
        level: String,
        other: String,
    },

    #[error("required field {field:?} must not declare a default")]
    RequiredWithDefault { field: String },

    #[error("list field {field:?} has neither a default sub-record nor permits emptiness")]
    MissingDefault { field: String },

    #[error("list field {field:?} declares no sub-fields")]
    EmptyGroup { field: String },

    /// The key field named by the layout is not one of its scalar fields.
    #[error("layout {layout:?} has no scalar field {field:?} to use as record key")]
    UnknownKeyField { layout: String, field: String },
}

/// A formatting failure inside a list field, located by its sub-field path
/// (`pagamentos[1].valor_a_pagar`, `contas.head.protocolo`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {source}")]
pub struct FieldError {
    pub path: String,
    #[source]
    pub source: FormatError,
}

/// A record that cannot be encoded under a layout.
///
/// `record` identifies the offending record: the value of the layout's key field
/// when it has one, otherwise its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is absent from the record.
    #[error("record {record}: required field {field:?} is missing")]
    SchemaMismatch { field: String, record: String },

    /// A field is present but its value cannot be formatted.
    #[error("record {record}: field {field:?}: {source}")]
    Format {
        field: String,
        record: String,
        #[source]
        source: FormatError,
    },

    /// A list field was supplied a scalar value.
    #[error("record {record}: field {field:?} expects a list of sub-records")]
    ExpectedList { field: String, record: String },

    /// A scalar field was supplied a list of sub-records.
    #[error("record {record}: field {field:?} expects a scalar value")]
    ExpectedScalar { field: String, record: String },
}

impl RecordError {
    /// Name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            RecordError::SchemaMismatch { field, .. }
            | RecordError::Format { field, .. }
            | RecordError::ExpectedList { field, .. }
            | RecordError::ExpectedScalar { field, .. } => field,
        }
    }

    /// Identifier of the record the error refers to.
    pub fn record(&self) -> &str {
        match self {
            RecordError::SchemaMismatch { record, .. }
            | RecordError::Format { record, .. }
            | RecordError::ExpectedList { record, .. }
            | RecordError::ExpectedScalar { record, .. } => record,
        }
    }
}

/// Represents all errors surfaced by the crate-level helpers.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Sink write failure. Propagated as-is, never retried.
    #[error("IO error: {0}")]
    Io(String),

    /// Options could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// An encoded line could not be split back into tokens.
    #[error("malformed line at column {column}: {msg}")]
    Parse { column: usize, msg: String },
}

impl Error {
    /// Creates an I/O error for sink write failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    pub fn parse(column: usize, msg: &str) -> Self {
        Error::Parse {
            column,
            msg: msg.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config<T: std::fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
