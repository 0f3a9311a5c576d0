//! Two-level encoding of repeated sub-records into one field.
//!
//! A list field packs an ordered sequence of groups into a single token:
//!
//! ```text
//! A;1|B;2
//! ^ ^ ^
//! | | inter-group delimiter, only between groups
//! | intra-group delimiter, only inside one group
//! first sub-field of the first group
//! ```
//!
//! Groups keep their input order and duplicates are preserved verbatim: callers fan
//! out one amount across several accounts and rely on positions lining up. An empty
//! input renders the field's default sub-record, unless the field permits emptiness.
//!
//! Sub-field tokens may not contain either list delimiter; that would break the
//! strict nesting of delimiter levels, and the format has no escape below the line
//! level. Such tokens fail with [`FormatError::DelimiterCollision`].
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{Delimiter, FieldKind, FieldSpec, ListEncoder, ListFieldSpec, SubRecord};
//!
//! let spec = ListFieldSpec::new(
//!     "grupos",
//!     vec![
//!         FieldSpec::required("letra", FieldKind::Text),
//!         FieldSpec::required("numero", FieldKind::Text),
//!     ],
//! )
//! .with_delimiters(Delimiter::Semicolon, Delimiter::Pipe)
//! .allow_empty();
//!
//! let groups = vec![
//!     SubRecord::new().with("letra", "A").with("numero", "1"),
//!     SubRecord::new().with("letra", "B").with("numero", "2"),
//! ];
//! assert_eq!(ListEncoder::encode(&groups, &spec).unwrap(), "A;1|B;2");
//! ```

use crate::schema::{EmptyPolicy, FieldSpec, ListFieldSpec};
use crate::{FieldError, FieldFormatter, FormatError, Record, SubRecord, Value};
use std::borrow::Cow;

/// Source of head-field values for a list field.
pub trait FieldLookup {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl FieldLookup for SubRecord {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldLookup for Record {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scalar(name)
    }
}

/// A list token split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListParts {
    pub head: Vec<String>,
    pub groups: Vec<Vec<String>>,
}

/// Encodes list fields.
pub struct ListEncoder;

impl ListEncoder {
    /// Encodes `groups` under `spec`. Head fields, if any, are looked up in an empty
    /// record; use [`encode_with_head`](Self::encode_with_head) to supply them.
    pub fn encode(groups: &[SubRecord], spec: &ListFieldSpec) -> Result<String, FieldError> {
        Self::encode_with_head(&SubRecord::new(), groups, spec)
    }

    fn default_group<L>(parent: &L, mut group: SubRecord, spec: &ListFieldSpec) -> SubRecord
    where
        L: FieldLookup + ?Sized,
    {
        for (sub_field, parent_field) in spec.inherited_defaults() {
            if let Some(value) = parent.lookup(parent_field) {
                group.insert(sub_field.as_str(), value.clone());
            }
        }
        group
    }

    /// Encodes the head fields read from `head`, then `groups`. An empty list's
    /// default group also reads its inherited sub-fields from `head`.
    pub fn encode_with_head<L>(
        head: &L,
        groups: &[SubRecord],
        spec: &ListFieldSpec,
    ) -> Result<String, FieldError>
    where
        L: FieldLookup + ?Sized,
    {
        let intra = spec.intra_delimiter().as_str();
        let inter = spec.inter_delimiter().as_str();

        let groups: Cow<'_, [SubRecord]> = if groups.is_empty() {
            match spec.empty_policy() {
                Some(EmptyPolicy::Default(supplier)) => {
                    Cow::Owned(vec![Self::default_group(head, supplier(), spec)])
                }
                Some(EmptyPolicy::AllowEmpty) | None => Cow::Borrowed(groups),
            }
        } else {
            Cow::Borrowed(groups)
        };

        let mut out = String::new();
        if !spec.head().is_empty() {
            let head_tokens = spec
                .head()
                .iter()
                .map(|field| {
                    Self::format_sub_field(head.lookup(field.name()), field, spec)
                        .map_err(|source| FieldError {
                            path: format!("{}.head.{}", spec.name(), field.name()),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            out.push_str(&head_tokens.join(intra));
            if !groups.is_empty() {
                out.push_str(intra);
            }
        }

        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                out.push_str(inter);
            }
            for (position, field) in spec.fields().iter().enumerate() {
                if position > 0 {
                    out.push_str(intra);
                }
                let token = Self::format_sub_field(group.get(field.name()), field, spec)
                    .map_err(|source| FieldError {
                        path: format!("{}[{}].{}", spec.name(), index, field.name()),
                        source,
                    })?;
                out.push_str(&token);
            }
        }
        Ok(out)
    }

    /// Splits a list token back into head tokens and groups.
    ///
    /// An empty token yields no groups. The token must already be unquoted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::{Delimiter, FieldKind, FieldSpec, ListEncoder, ListFieldSpec};
    ///
    /// let spec = ListFieldSpec::new("g", vec![FieldSpec::required("a", FieldKind::Text)])
    ///     .with_delimiters(Delimiter::Semicolon, Delimiter::Pipe)
    ///     .allow_empty();
    /// let parts = ListEncoder::split("x|y|x", &spec);
    /// assert_eq!(parts.groups, vec![vec!["x"], vec!["y"], vec!["x"]]);
    /// ```
    #[must_use]
    pub fn split(token: &str, spec: &ListFieldSpec) -> ListParts {
        if token.is_empty() {
            return ListParts::default();
        }
        let intra = spec.intra_delimiter().as_char();
        let inter = spec.inter_delimiter().as_char();

        let mut groups: Vec<Vec<String>> = token
            .split(inter)
            .map(|group| group.split(intra).map(str::to_string).collect())
            .collect();

        let head_len = spec.head().len();
        let mut head = Vec::new();
        if head_len > 0 {
            if let Some(first) = groups.first_mut() {
                let rest = first.split_off(head_len.min(first.len()));
                head = std::mem::replace(first, rest);
                if first.is_empty() {
                    groups.remove(0);
                }
            }
        }
        ListParts { head, groups }
    }

    fn format_sub_field(
        value: Option<&Value>,
        field: &FieldSpec,
        spec: &ListFieldSpec,
    ) -> Result<String, FormatError> {
        let token = FieldFormatter::format(value, field)?;
        for delimiter in [spec.intra_delimiter(), spec.inter_delimiter()] {
            if token.contains(delimiter.as_char()) {
                return Err(FormatError::DelimiterCollision {
                    delimiter: delimiter.as_char(),
                });
            }
        }
        Ok(token)
    }
}
