//! Ordered name-to-value maps for records and sub-records.
//!
//! This module provides [`FieldMap`], a wrapper around [`IndexMap`] that keeps
//! insertion order, and the two concrete maps the encoder consumes:
//!
//! - [`Record`]: one output line's worth of data, mapping field names to [`Entry`]
//! - [`SubRecord`]: one group of a list field, mapping sub-field names to [`Value`]
//!
//! Output order is always dictated by the layout, not by the map. Insertion order
//! only matters for diagnostics and for deterministic iteration in tests.
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{Record, SubRecord, Value};
//!
//! let payment = SubRecord::new()
//!     .with("numero_documento_titular", Value::identifier("12345678901"))
//!     .with("valor_a_pagar", 150.0);
//!
//! let record = Record::new()
//!     .with("referencia_externa", "REF_000001")
//!     .with("pagamentos", vec![payment]);
//!
//! assert_eq!(record.len(), 2);
//! assert!(record.scalar("referencia_externa").is_some());
//! assert_eq!(record.list("pagamentos").map(|p| p.len()), Some(1));
//! ```

use crate::{Entry, Value};
use indexmap::IndexMap;

/// An insertion-ordered map of field names to values.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap<V>(IndexMap<String, V>);

/// Field values for one output line.
pub type Record = FieldMap<Entry>;

/// Field values for one group of a list field.
pub type SubRecord = FieldMap<Value>;

impl<V> FieldMap<V> {
    #[must_use]
    pub fn new() -> Self {
        FieldMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        FieldMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field, returning the previous value if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<V>) -> Option<V> {
        self.0.insert(name.into(), value.into())
    }

    /// Chainable form of [`FieldMap::insert`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::{SubRecord, Value};
    ///
    /// let group = SubRecord::new()
    ///     .with("tipo_conta", Value::code("CC"))
    ///     .with("agencia", "1234");
    /// assert_eq!(group.get("agencia"), Some(&Value::from("1234")));
    /// ```
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<V>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.0.shift_remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, V> {
        self.0.keys()
    }

    /// Returns an iterator over the name-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, V> {
        self.0.iter()
    }
}

impl FieldMap<Entry> {
    /// Returns the scalar value of a field, if present and scalar.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Entry::as_scalar)
    }

    /// Returns the sub-records of a list field, if present and a list.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[SubRecord]> {
        self.get(name).and_then(Entry::as_list)
    }
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntoIterator for FieldMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a FieldMap<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = indexmap::map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V> FromIterator<(String, V)> for FieldMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        FieldMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let map = SubRecord::new()
            .with("b", "2")
            .with("a", "1")
            .with("c", "3");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = SubRecord::new();
        assert!(map.insert("a", "1").is_none());
        assert_eq!(map.insert("a", "2"), Some(Value::from("1")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_record_shape_accessors() {
        let record = Record::new()
            .with("carteira", "Carteira1")
            .with("pagamentos", Vec::<SubRecord>::new());
        assert!(record.scalar("pagamentos").is_none());
        assert!(record.list("carteira").is_none());
        assert_eq!(record.list("pagamentos").map(<[SubRecord]>::len), Some(0));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: SubRecord = vec![
            ("a".to_string(), Value::from("1")),
            ("b".to_string(), Value::from("2")),
            ("c".to_string(), Value::from("3")),
        ]
        .into_iter()
        .collect();
        map.remove("b");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
