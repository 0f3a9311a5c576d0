//! Typed business values supplied to the encoder.
//!
//! This module provides the [`Value`] enum, the immutable tagged union a
//! [`RecordSource`](crate::RecordSource) fills records with, and [`Entry`], which is
//! what a record maps each field name to: either a scalar value or a list of
//! sub-records.
//!
//! ## Creating Values
//!
//! ```rust
//! use cerc_layout::Value;
//! use chrono::NaiveDate;
//!
//! let cnpj = Value::identifier("12345678000190");
//! let amount = Value::from(1234.5);
//! let operation = Value::code("C");
//! let text = Value::from("Carteira1");
//! let date = Value::from(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
//!
//! assert_eq!(cnpj.kind_name(), "identifier");
//! assert_eq!(amount.as_f64(), Some(1234.5));
//! assert_eq!(operation.as_str(), Some("C"));
//! assert!(text.is_text());
//! assert!(date.as_date().is_some());
//! ```
//!
//! ## Timestamps
//!
//! Timestamps are stored in UTC. Zoned instants are converted when the value is
//! built, so the rendered `Z` suffix is always truthful:
//!
//! ```rust
//! use cerc_layout::Value;
//! use chrono::{FixedOffset, TimeZone};
//!
//! let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();
//! let local = sao_paulo.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
//! let value = Value::timestamp_from(local);
//!
//! let utc = value.as_timestamp().unwrap();
//! assert_eq!(utc.to_rfc3339(), "2025-01-15T12:00:00+00:00");
//! ```

use crate::SubRecord;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt;

/// A single typed business value.
///
/// Values are immutable once constructed. How a value renders is decided by the
/// [`FieldSpec`](crate::FieldSpec) it is formatted under, never by the value itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A registry identifier as a string of ASCII digits, unpadded.
    Identifier(String),
    /// A monetary or percentage magnitude.
    Decimal(f64),
    /// A whole count.
    Integer(i64),
    Date(NaiveDate),
    /// An instant, always in UTC.
    Timestamp(DateTime<Utc>),
    Text(String),
    /// A domain code such as an operation type or payment scheme.
    Enum(String),
}

impl Value {
    /// Creates an identifier value from its digits.
    pub fn identifier(digits: impl Into<String>) -> Self {
        Value::Identifier(digits.into())
    }

    /// Creates an enum code value.
    pub fn code(code: impl Into<String>) -> Self {
        Value::Enum(code.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Creates a timestamp from an instant in any time zone, converting it to UTC.
    pub fn timestamp_from<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Value::Timestamp(instant.with_timezone(&Utc))
    }

    /// Short name of the variant, used in type-mismatch errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Identifier(_) => "identifier",
            Value::Decimal(_) => "decimal",
            Value::Integer(_) => "integer",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Text(_) => "text",
            Value::Enum(_) => "enum",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns the underlying string of identifier, text and enum values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::Value;
    ///
    /// assert_eq!(Value::identifier("123").as_str(), Some("123"));
    /// assert_eq!(Value::from(1.5).as_str(), None);
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Identifier(s) | Value::Text(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Unformatted display, for diagnostics only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Identifier(s) | Value::Text(s) | Value::Enum(s) => f.write_str(s),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Date(d) => write!(f, "{}", d),
            Value::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

/// What a record maps a field name to.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Scalar(Value),
    /// Ordered sub-records for a list field. Order and duplicates are preserved.
    List(Vec<SubRecord>),
}

impl Entry {
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Entry::Scalar(v) => Some(v),
            Entry::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[SubRecord]> {
        match self {
            Entry::List(items) => Some(items),
            Entry::Scalar(_) => None,
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Scalar(value)
    }
}

macro_rules! scalar_entry_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_entry_from!(&str, String, f64, i64, u32, NaiveDate, DateTime<Utc>);

impl From<Vec<SubRecord>> for Entry {
    fn from(items: Vec<SubRecord>) -> Self {
        Entry::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::identifier("1").kind_name(), "identifier");
        assert_eq!(Value::from(1.0).kind_name(), "decimal");
        assert_eq!(Value::from(1_i64).kind_name(), "integer");
        assert_eq!(Value::code("C").kind_name(), "enum");
        assert_eq!(Value::from("x").kind_name(), "text");
    }

    #[test]
    fn test_timestamp_from_converts_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2025, 6, 1, 0, 30, 0).unwrap();
        let value = Value::timestamp_from(local);
        let expected = Utc.with_ymd_and_hms(2025, 5, 31, 22, 30, 0).unwrap();
        assert_eq!(value.as_timestamp(), Some(&expected));
    }

    #[test]
    fn test_entry_conversions() {
        let scalar: Entry = "Carteira1".into();
        assert_eq!(scalar.as_scalar(), Some(&Value::from("Carteira1")));
        assert!(scalar.as_list().is_none());

        let list: Entry = vec![SubRecord::new()].into();
        assert_eq!(list.as_list().map(<[SubRecord]>::len), Some(1));
    }
}
