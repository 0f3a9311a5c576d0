//! Declarative record layouts.
//!
//! A [`LayoutSchema`] describes one record type: its ordered fields, how each is
//! formatted, and the delimiter and quoting characters of the line. Schemas are pure
//! data. They are validated once, by [`LayoutSchemaBuilder::build`], and are
//! immutable afterwards, so the encoding path never re-checks them.
//!
//! Validation rejects:
//!
//! - layouts or list fields without fields
//! - duplicate field names (list head fields share the top-level namespace)
//! - required fields that declare a default
//! - list fields with neither a default sub-record nor an explicit empty permission
//! - delimiter collisions between nesting levels, or a quote that is a delimiter
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{FieldKind, FieldSpec, LayoutOptions, LayoutSchema, ListFieldSpec, SubRecord, Value};
//!
//! let schema = LayoutSchema::builder("CERC-AP006")
//!     .options(LayoutOptions::cerc())
//!     .field(FieldSpec::required("referencia_externa", FieldKind::Text))
//!     .field(FieldSpec::required("solicitante", FieldKind::Identifier { width: 14 }))
//!     .list(
//!         ListFieldSpec::new("arranjos", vec![FieldSpec::required("codigo", FieldKind::any_code())])
//!             .with_default(|| SubRecord::new().with("codigo", Value::code("VCC"))),
//!     )
//!     .key_field("referencia_externa")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.len(), 3);
//! assert!(schema.is_reserved(';'));
//! assert!(schema.is_reserved('|'));
//! ```

use crate::options::{Delimiter, LayoutOptions, LineEnding};
use crate::{SchemaError, SubRecord, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Decimal fraction digits used when neither the field nor the layout says otherwise.
pub const DEFAULT_FRACTION_DIGITS: u8 = 2;

/// How a scalar field is rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Digits left-padded with `0` to exactly `width`.
    Identifier { width: usize },
    /// Taxpayer document: padded to 11 digits (CPF) when it has at most 11, else to 14 (CNPJ).
    Document,
    /// Fixed fraction digits. `None` takes the layout's default at build time.
    Decimal { fraction_digits: Option<u8> },
    Integer,
    /// `YYYY-MM-DD`.
    Date,
    /// RFC3339 in UTC with a literal `Z`.
    Timestamp,
    Text,
    /// Domain code. An empty code set accepts any code.
    Enum { codes: Vec<String> },
}

impl FieldKind {
    /// Decimal with the layout's default fraction digits.
    #[must_use]
    pub const fn decimal() -> Self {
        FieldKind::Decimal {
            fraction_digits: None,
        }
    }

    /// Enum restricted to the given codes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::FieldKind;
    ///
    /// let kind = FieldKind::codes(["C", "A", "I"]);
    /// assert_eq!(kind, FieldKind::Enum { codes: vec!["C".into(), "A".into(), "I".into()] });
    /// ```
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Enum accepting any code.
    #[must_use]
    pub const fn any_code() -> Self {
        FieldKind::Enum { codes: Vec::new() }
    }

    /// Name of the value variant this kind accepts.
    #[must_use]
    pub const fn value_name(&self) -> &'static str {
        match self {
            FieldKind::Identifier { .. } | FieldKind::Document => "identifier",
            FieldKind::Decimal { .. } => "decimal",
            FieldKind::Integer => "integer",
            FieldKind::Date => "date",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Text => "text",
            FieldKind::Enum { .. } => "enum",
        }
    }
}

/// A scalar field: name, kind, presence rule and optional default.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
}

impl FieldSpec {
    /// A field that must be present in every record.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            required: true,
            default: None,
        }
    }

    /// A field that renders as an empty token (or its default) when absent.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            required: false,
            default: None,
        }
    }

    /// Value used when the field is absent. Only valid on optional fields.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    fn resolve(&mut self, default_digits: u8) {
        if let FieldKind::Decimal { fraction_digits } = &mut self.kind {
            fraction_digits.get_or_insert(default_digits);
        }
    }

    fn check_default(&self) -> Result<(), SchemaError> {
        if self.required && self.default.is_some() {
            return Err(SchemaError::RequiredWithDefault {
                field: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Produces the sub-record rendered in place of an empty list.
pub type DefaultSupplier = Arc<dyn Fn() -> SubRecord + Send + Sync>;

/// What a list field renders when it is given no sub-records.
#[derive(Clone)]
pub enum EmptyPolicy {
    /// Render one group built by the supplier.
    Default(DefaultSupplier),
    /// Render no groups at all.
    AllowEmpty,
}

impl fmt::Debug for EmptyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyPolicy::Default(_) => f.write_str("Default(<supplier>)"),
            EmptyPolicy::AllowEmpty => f.write_str("AllowEmpty"),
        }
    }
}

/// A field packing a variable number of groups into one token.
///
/// Each group is a sub-record formatted in `fields` order and joined with the
/// intra-group delimiter; groups are joined with the inter-group delimiter. Head
/// fields, when declared, are read from the parent record and rendered once before
/// the first group.
#[derive(Clone, Debug)]
pub struct ListFieldSpec {
    name: String,
    head: Vec<FieldSpec>,
    fields: Vec<FieldSpec>,
    empty: Option<EmptyPolicy>,
    intra: Option<Delimiter>,
    inter: Option<Delimiter>,
    inherited: Vec<(String, String)>,
    required: bool,
}

impl ListFieldSpec {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        ListFieldSpec {
            name: name.into(),
            head: Vec::new(),
            fields,
            empty: None,
            intra: None,
            inter: None,
            inherited: Vec::new(),
            required: false,
        }
    }

    /// Non-repeating fields rendered before the groups.
    #[must_use]
    pub fn with_head(mut self, head: Vec<FieldSpec>) -> Self {
        self.head = head;
        self
    }

    /// Sub-record rendered when the list is empty.
    #[must_use]
    pub fn with_default<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> SubRecord + Send + Sync + 'static,
    {
        self.empty = Some(EmptyPolicy::Default(Arc::new(supplier)));
        self
    }

    /// Fills `sub_field` of the default group from the parent record's
    /// `parent_field`, when the parent has a value for it.
    #[must_use]
    pub fn inherit_default(
        mut self,
        sub_field: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        self.inherited.push((sub_field.into(), parent_field.into()));
        self
    }

    /// Render an empty token instead of a default group when the list is empty.
    #[must_use]
    pub fn allow_empty(mut self) -> Self {
        self.empty = Some(EmptyPolicy::AllowEmpty);
        self
    }

    /// Overrides the layout's list delimiters for this field.
    #[must_use]
    pub fn with_delimiters(mut self, intra: Delimiter, inter: Delimiter) -> Self {
        self.intra = Some(intra);
        self.inter = Some(inter);
        self
    }

    /// The field must be present in the record, even if as an empty list.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn head(&self) -> &[FieldSpec] {
        &self.head
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// `(sub_field, parent_field)` pairs applied to the default group.
    #[must_use]
    pub fn inherited_defaults(&self) -> &[(String, String)] {
        &self.inherited
    }

    #[must_use]
    pub fn empty_policy(&self) -> Option<&EmptyPolicy> {
        self.empty.as_ref()
    }

    /// Builds the default sub-record, if the field has one.
    #[must_use]
    pub fn default_sub_record(&self) -> Option<SubRecord> {
        match &self.empty {
            Some(EmptyPolicy::Default(supplier)) => Some(supplier()),
            _ => None,
        }
    }

    #[must_use]
    pub fn intra_delimiter(&self) -> Delimiter {
        self.intra.unwrap_or(Delimiter::Comma)
    }

    #[must_use]
    pub fn inter_delimiter(&self) -> Delimiter {
        self.inter.unwrap_or(Delimiter::Pipe)
    }

    fn resolve(&mut self, options: &LayoutOptions) {
        self.intra.get_or_insert(options.intra_group_delimiter);
        self.inter.get_or_insert(options.inter_group_delimiter);
        for field in self.head.iter_mut().chain(self.fields.iter_mut()) {
            field.resolve(options.fraction_digits);
        }
    }
}

/// One top-level field of a layout.
#[derive(Clone, Debug)]
pub enum LayoutField {
    Scalar(FieldSpec),
    List(ListFieldSpec),
}

impl LayoutField {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            LayoutField::Scalar(spec) => spec.name(),
            LayoutField::List(spec) => spec.name(),
        }
    }
}

/// A validated, immutable record layout.
///
/// `LayoutSchema` is `Send + Sync`; share it by reference across encoding threads.
#[derive(Clone, Debug)]
pub struct LayoutSchema {
    name: String,
    fields: Vec<LayoutField>,
    options: LayoutOptions,
    key_field: Option<String>,
    reserved: Vec<char>,
}

impl LayoutSchema {
    /// Starts a layout named `name` (e.g. `CERC-AP002`).
    pub fn builder(name: impl Into<String>) -> LayoutSchemaBuilder {
        LayoutSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            options: LayoutOptions::default(),
            key_field: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    /// Number of top-level fields, which is the number of tokens per line.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    #[must_use]
    pub fn delimiter(&self) -> Delimiter {
        self.options.delimiter
    }

    #[must_use]
    pub fn quote(&self) -> char {
        self.options.quote
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.options.line_ending
    }

    /// Scalar field whose value identifies a record in error messages.
    #[must_use]
    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    /// Characters that force a token to be quoted.
    #[must_use]
    pub fn reserved(&self) -> &[char] {
        &self.reserved
    }

    #[must_use]
    pub fn is_reserved(&self, c: char) -> bool {
        self.reserved.contains(&c)
    }

    /// Looks up a top-level list field by name.
    #[must_use]
    pub fn list_field(&self, name: &str) -> Option<&ListFieldSpec> {
        self.fields.iter().find_map(|field| match field {
            LayoutField::List(spec) if spec.name() == name => Some(spec),
            _ => None,
        })
    }
}

/// Builder for [`LayoutSchema`]. Nothing is checked until [`build`](Self::build).
#[derive(Debug)]
pub struct LayoutSchemaBuilder {
    name: String,
    fields: Vec<LayoutField>,
    options: LayoutOptions,
    key_field: Option<String>,
}

impl LayoutSchemaBuilder {
    #[must_use]
    pub fn options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends a scalar field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(LayoutField::Scalar(spec));
        self
    }

    /// Appends a list field.
    #[must_use]
    pub fn list(mut self, spec: ListFieldSpec) -> Self {
        self.fields.push(LayoutField::List(spec));
        self
    }

    #[must_use]
    pub fn key_field(mut self, name: impl Into<String>) -> Self {
        self.key_field = Some(name.into());
        self
    }

    /// Validates the layout and freezes it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::{FieldKind, FieldSpec, LayoutSchema, SchemaError};
    ///
    /// let err = LayoutSchema::builder("broken")
    ///     .field(FieldSpec::required("cnpj", FieldKind::Identifier { width: 14 }))
    ///     .field(FieldSpec::required("cnpj", FieldKind::Text))
    ///     .build()
    ///     .unwrap_err();
    /// assert!(matches!(err, SchemaError::DuplicateField { .. }));
    /// ```
    pub fn build(self) -> Result<LayoutSchema, SchemaError> {
        let LayoutSchemaBuilder {
            name,
            mut fields,
            options,
            key_field,
        } = self;

        if fields.is_empty() {
            return Err(SchemaError::EmptyLayout { layout: name });
        }

        let primary = options.delimiter.as_char();
        let quote = options.quote;
        if quote == primary {
            return Err(clash(quote, "quote", "primary delimiter"));
        }
        if quote == '\r' || quote == '\n' {
            return Err(clash(quote, "quote", "line terminator"));
        }

        let mut seen = HashSet::new();
        let mut reserved = vec![primary, quote, '\r', '\n'];

        for field in &mut fields {
            match field {
                LayoutField::Scalar(spec) => {
                    spec.check_default()?;
                    spec.resolve(options.fraction_digits);
                    claim(&mut seen, &name, spec.name())?;
                }
                LayoutField::List(spec) => {
                    spec.resolve(&options);
                    validate_list(spec, &options)?;
                    claim(&mut seen, &name, spec.name())?;
                    for head in &spec.head {
                        claim(&mut seen, &name, head.name())?;
                    }
                    for c in [spec.intra_delimiter().as_char(), spec.inter_delimiter().as_char()] {
                        if !reserved.contains(&c) {
                            reserved.push(c);
                        }
                    }
                }
            }
        }

        for c in &options.reserved {
            if !reserved.contains(c) {
                reserved.push(*c);
            }
        }

        if let Some(key) = &key_field {
            let is_scalar = fields
                .iter()
                .any(|f| matches!(f, LayoutField::Scalar(spec) if spec.name() == key));
            if !is_scalar {
                return Err(SchemaError::UnknownKeyField {
                    layout: name,
                    field: key.clone(),
                });
            }
        }

        Ok(LayoutSchema {
            name,
            fields,
            options,
            key_field,
            reserved,
        })
    }
}

fn clash(delimiter: char, level: &str, other: &str) -> SchemaError {
    SchemaError::DelimiterClash {
        delimiter,
        level: level.to_string(),
        other: other.to_string(),
    }
}

fn claim(seen: &mut HashSet<String>, layout: &str, field: &str) -> Result<(), SchemaError> {
    if seen.insert(field.to_string()) {
        Ok(())
    } else {
        Err(SchemaError::DuplicateField {
            layout: layout.to_string(),
            field: field.to_string(),
        })
    }
}

fn validate_list(spec: &ListFieldSpec, options: &LayoutOptions) -> Result<(), SchemaError> {
    if spec.fields.is_empty() {
        return Err(SchemaError::EmptyGroup {
            field: spec.name.clone(),
        });
    }
    if spec.empty.is_none() {
        return Err(SchemaError::MissingDefault {
            field: spec.name.clone(),
        });
    }

    let mut sub_names = HashSet::new();
    for field in spec.head.iter().chain(spec.fields.iter()) {
        field.check_default()?;
        if !sub_names.insert(field.name()) {
            return Err(SchemaError::DuplicateField {
                layout: spec.name.clone(),
                field: field.name().to_string(),
            });
        }
    }

    let primary = options.delimiter.as_char();
    let intra = spec.intra_delimiter().as_char();
    let inter = spec.inter_delimiter().as_char();
    let field_level = format!("list field {:?}", spec.name);

    if intra == inter {
        return Err(clash(
            intra,
            &format!("{field_level} (intra-group)"),
            "its inter-group delimiter",
        ));
    }
    if inter == primary {
        return Err(clash(
            inter,
            &format!("{field_level} (inter-group)"),
            "primary delimiter",
        ));
    }
    if intra == primary && !options.shared_intra_delimiter {
        return Err(clash(
            intra,
            &format!("{field_level} (intra-group)"),
            "primary delimiter",
        ));
    }
    if options.quote == intra || options.quote == inter {
        return Err(clash(options.quote, "quote", &field_level));
    }
    Ok(())
}
