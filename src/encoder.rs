//! Schema-driven assembly of a record into its ordered tokens.
//!
//! [`RecordEncoder`] walks a [`LayoutSchema`] in declaration order and produces
//! exactly one token per top-level field. Scalar fields go through
//! [`FieldFormatter`]; list fields go through [`ListEncoder`], contributing one
//! token however many groups they pack. A record either encodes completely or is
//! rejected whole with a [`RecordError`] naming the field and the record.

use crate::schema::{LayoutField, LayoutSchema, ListFieldSpec};
use crate::{Entry, FieldFormatter, ListEncoder, Record, RecordError, SubRecord};

/// Encodes records under a layout.
pub struct RecordEncoder;

impl RecordEncoder {
    /// Encodes `record` into `schema.len()` tokens, in layout order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::{FieldKind, FieldSpec, LayoutSchema, Record, RecordEncoder, RecordError, Value};
    ///
    /// let schema = LayoutSchema::builder("CERC-AP006")
    ///     .field(FieldSpec::required("referencia_externa", FieldKind::Text))
    ///     .field(FieldSpec::required("solicitante", FieldKind::Identifier { width: 14 }))
    ///     .key_field("referencia_externa")
    ///     .build()
    ///     .unwrap();
    ///
    /// let record = Record::new()
    ///     .with("referencia_externa", "REF_000001")
    ///     .with("solicitante", Value::identifier("123"));
    /// assert_eq!(
    ///     RecordEncoder::encode(&record, &schema).unwrap(),
    ///     vec!["REF_000001", "00000000000123"]
    /// );
    ///
    /// let partial = Record::new().with("referencia_externa", "REF_000002");
    /// let err = RecordEncoder::encode(&partial, &schema).unwrap_err();
    /// assert!(matches!(err, RecordError::SchemaMismatch { ref field, .. } if field == "solicitante"));
    /// assert_eq!(err.record(), "REF_000002");
    /// ```
    pub fn encode(record: &Record, schema: &LayoutSchema) -> Result<Vec<String>, RecordError> {
        Self::encode_inner(record, schema, None)
    }

    /// Like [`encode`](Self::encode), identifying keyless records by their batch `index`.
    pub fn encode_at(
        record: &Record,
        schema: &LayoutSchema,
        index: usize,
    ) -> Result<Vec<String>, RecordError> {
        Self::encode_inner(record, schema, Some(index))
    }

    fn encode_inner(
        record: &Record,
        schema: &LayoutSchema,
        index: Option<usize>,
    ) -> Result<Vec<String>, RecordError> {
        let mut tokens = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let token = match field {
                LayoutField::Scalar(spec) => {
                    let value = match record.get(spec.name()) {
                        Some(Entry::Scalar(value)) => Some(value),
                        Some(Entry::List(_)) => {
                            return Err(RecordError::ExpectedScalar {
                                field: spec.name().to_string(),
                                record: record_id(record, schema, index),
                            })
                        }
                        None if spec.is_required() => {
                            return Err(RecordError::SchemaMismatch {
                                field: spec.name().to_string(),
                                record: record_id(record, schema, index),
                            })
                        }
                        None => None,
                    };
                    FieldFormatter::format(value, spec).map_err(|source| RecordError::Format {
                        field: spec.name().to_string(),
                        record: record_id(record, schema, index),
                        source,
                    })?
                }
                LayoutField::List(spec) => Self::encode_list(record, spec, schema, index)?,
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn encode_list(
        record: &Record,
        spec: &ListFieldSpec,
        schema: &LayoutSchema,
        index: Option<usize>,
    ) -> Result<String, RecordError> {
        for head in spec.head() {
            match record.get(head.name()) {
                Some(Entry::List(_)) => {
                    return Err(RecordError::ExpectedScalar {
                        field: head.name().to_string(),
                        record: record_id(record, schema, index),
                    })
                }
                None if head.is_required() => {
                    return Err(RecordError::SchemaMismatch {
                        field: head.name().to_string(),
                        record: record_id(record, schema, index),
                    })
                }
                _ => {}
            }
        }

        let groups: &[SubRecord] = match record.get(spec.name()) {
            Some(Entry::List(groups)) => groups,
            Some(Entry::Scalar(_)) => {
                return Err(RecordError::ExpectedList {
                    field: spec.name().to_string(),
                    record: record_id(record, schema, index),
                })
            }
            None if spec.is_required() => {
                return Err(RecordError::SchemaMismatch {
                    field: spec.name().to_string(),
                    record: record_id(record, schema, index),
                })
            }
            None => &[],
        };

        ListEncoder::encode_with_head(record, groups, spec).map_err(|err| RecordError::Format {
            field: err.path,
            record: record_id(record, schema, index),
            source: err.source,
        })
    }
}

fn record_id(record: &Record, schema: &LayoutSchema, index: Option<usize>) -> String {
    schema
        .key_field()
        .and_then(|key| record.scalar(key))
        .map(ToString::to_string)
        .or_else(|| index.map(|i| format!("#{i}")))
        .unwrap_or_else(|| "<unkeyed>".to_string())
}
