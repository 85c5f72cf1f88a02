//! Named logical fields over nested metadata documents.
//!
//! Dataset metadata arrives in different shapes depending on the ingestion
//! source. A [`FieldSchema`] maps stable logical field names (the API
//! surface search and query code programs against) to the offsets where
//! each field physically lives, and a [`DocView`] binds a schema to one
//! concrete document so callers can read and write fields by name without
//! knowing the document's literal nesting.
//!
//! # Example
//!
//! ```rust
//! use gridcube::{DocView, FieldSchema};
//! use serde_json::json;
//!
//! let schema: FieldSchema = [("lat".to_string(), vec!["extent".into(), "lat".into()])]
//!     .into_iter()
//!     .collect();
//!
//! let mut doc = json!({"extent": {"lat": 4}});
//! let mut view = DocView::new(&schema, &mut doc);
//! assert_eq!(view.get("lat").unwrap(), &json!(4));
//! view.set("lat", json!(5)).unwrap();
//! assert_eq!(doc, json!({"extent": {"lat": 5}}));
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::doc_offset::{self, DocError};

/// Errors raised by named field access through a [`DocView`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field name is not present in the schema. Carries the full list
    /// of legal names for diagnostics.
    #[error("unknown field '{name}', expected one of {expected:?}")]
    UnknownField { name: String, expected: Vec<String> },

    /// The document does not match the shape implied by the field's offset.
    #[error(transparent)]
    Doc(#[from] DocError),
}

/// An immutable mapping from logical field name to document offset.
///
/// Shared by all documents of a class. Construction goes through a plain
/// mapping, so a duplicate field name silently overwrites the earlier
/// offset (last write wins): uniqueness is enforced by mapping semantics,
/// not a separate check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    offsets: HashMap<String, Vec<String>>,
}

impl FieldSchema {
    /// Create a schema from a name -> offset mapping.
    #[must_use]
    pub fn new(offsets: HashMap<String, Vec<String>>) -> Self {
        Self { offsets }
    }

    /// The offset backing `name`, if it is a legal field.
    #[must_use]
    pub fn offset(&self, name: &str) -> Option<&[String]> {
        self.offsets.get(name).map(Vec::as_slice)
    }

    /// All legal field names, sorted for stable diagnostics.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.offsets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.offsets.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterate over `(name, offset)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.offsets
            .iter()
            .map(|(name, offset)| (name.as_str(), offset.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A view of one document through one schema.
///
/// Holds a reference to the caller's document without copying it: mutations
/// through [`DocView::set`] mutate the underlying document in place. The
/// view carries no state beyond the two references and is meant to be
/// constructed per access session. Callers sharing a document across
/// threads are responsible for external synchronization.
#[derive(Debug)]
pub struct DocView<'a> {
    schema: &'a FieldSchema,
    doc: &'a mut Value,
}

impl<'a> DocView<'a> {
    #[must_use]
    pub fn new(schema: &'a FieldSchema, doc: &'a mut Value) -> Self {
        Self { schema, doc }
    }

    fn resolve(&self, name: &str) -> Result<&'a [String], FieldError> {
        self.schema
            .offset(name)
            .ok_or_else(|| FieldError::UnknownField {
                name: name.to_string(),
                expected: self
                    .schema
                    .field_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
    }

    /// Read the field `name` from the underlying document.
    ///
    /// Field-name validity is checked first: an unknown name always fails
    /// with [`FieldError::UnknownField`] regardless of document content.
    /// Document-shape mismatches propagate as [`FieldError::Doc`].
    pub fn get(&self, name: &str) -> Result<&Value, FieldError> {
        let offset = self.resolve(name)?;
        Ok(doc_offset::read(offset, self.doc)?)
    }

    /// Write `value` into the field `name`, mutating the underlying
    /// document in place. Same name resolution and failure ordering as
    /// [`DocView::get`].
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), FieldError> {
        let offset = self.resolve(name)?;
        Ok(doc_offset::write(offset, self.doc, value)?)
    }

    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        self.schema
    }

    /// The underlying document.
    #[must_use]
    pub fn doc(&self) -> &Value {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lat_schema() -> FieldSchema {
        [("lat".to_string(), vec!["extent".to_string(), "lat".to_string()])]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_get_reads_through_offset() {
        let schema = lat_schema();
        let mut doc = json!({"extent": {"lat": 4}});
        let view = DocView::new(&schema, &mut doc);
        assert_eq!(view.get("lat").unwrap(), &json!(4));
    }

    #[test]
    fn test_set_mutates_document_in_place() {
        let schema = lat_schema();
        let mut doc = json!({"extent": {"lat": 4}});
        let mut view = DocView::new(&schema, &mut doc);
        view.set("lat", json!(5)).unwrap();
        assert_eq!(doc, json!({"extent": {"lat": 5}}));
    }

    #[test]
    fn test_read_after_write_returns_written_value() {
        let schema = lat_schema();
        let mut doc = json!({"extent": {"lat": 4}});
        let mut view = DocView::new(&schema, &mut doc);
        view.set("lat", json!([1, 2])).unwrap();
        assert_eq!(view.get("lat").unwrap(), &json!([1, 2]));
    }

    #[test]
    fn test_unknown_field_lists_legal_names() {
        let schema = lat_schema();
        let mut doc = json!({"extent": {"lat": 4}});
        let mut view = DocView::new(&schema, &mut doc);

        let err = view.get("lon").unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownField {
                name: "lon".to_string(),
                expected: vec!["lat".to_string()],
            }
        );

        let err = view.set("lon", json!(1)).unwrap_err();
        assert!(matches!(err, FieldError::UnknownField { .. }));
    }

    #[test]
    fn test_unknown_field_wins_over_document_shape() {
        // The document matches neither field, but name validity is
        // checked first.
        let schema = lat_schema();
        let mut doc = json!(null);
        let view = DocView::new(&schema, &mut doc);

        assert!(matches!(
            view.get("lon").unwrap_err(),
            FieldError::UnknownField { .. }
        ));
        assert!(matches!(view.get("lat").unwrap_err(), FieldError::Doc(_)));
    }

    #[test]
    fn test_doc_errors_propagate() {
        let schema = lat_schema();
        let mut doc = json!({"extent": {}});
        let view = DocView::new(&schema, &mut doc);
        assert_eq!(
            view.get("lat").unwrap_err(),
            FieldError::Doc(DocError::MissingKey("extent.lat".to_string()))
        );
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let schema: FieldSchema = [
            ("id".to_string(), vec!["old".to_string()]),
            ("id".to_string(), vec!["new".to_string()]),
        ]
        .into_iter()
        .collect();

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.offset("id"), Some(&["new".to_string()][..]));
    }

    #[test]
    fn test_field_names_sorted() {
        let schema: FieldSchema = [
            ("b".to_string(), vec!["b".to_string()]),
            ("a".to_string(), vec!["a".to_string()]),
            ("c".to_string(), vec!["c".to_string()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(schema.field_names(), ["a", "b", "c"]);
    }
}
