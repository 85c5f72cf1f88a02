//! Reading and writing values at key offsets inside nested mapping
//! documents.
//!
//! An offset is an ordered sequence of string keys identifying a location
//! inside an already-decoded document (a [`serde_json::Value`] tree,
//! typically deserialized from JSON or YAML elsewhere). These functions
//! only traverse; they never parse or serialize.
//!
//! # Example
//!
//! ```rust
//! use gridcube::doc_offset;
//! use serde_json::json;
//!
//! let mut doc = json!({"extent": {"lat": 4}});
//! assert_eq!(doc_offset::read(&["extent", "lat"], &doc).unwrap(), &json!(4));
//!
//! doc_offset::write(&["extent", "lat"], &mut doc, json!(5)).unwrap();
//! assert_eq!(doc, json!({"extent": {"lat": 5}}));
//! ```

use serde_json::Value;
use thiserror::Error;

/// Errors raised while traversing a document by offset.
///
/// A failure here means the document does not match the shape its offsets
/// imply: either corrupt input or an ingestion-time contract violation.
/// Callers are expected to surface it, never to swallow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    /// A key along the offset is absent from its mapping.
    #[error("document has no value at offset '{0}'")]
    MissingKey(String),

    /// An intermediate value along the offset is not a mapping.
    #[error("value at {0} is not a mapping")]
    NotAMapping(String),

    /// Writes need at least one key to name the value being set.
    #[error("cannot write to an empty offset")]
    EmptyOffset,
}

fn joined<S: AsRef<str>>(keys: &[S]) -> String {
    keys.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

fn location<S: AsRef<str>>(prefix: &[S]) -> String {
    if prefix.is_empty() {
        "the document root".to_string()
    } else {
        format!("'{}'", joined(prefix))
    }
}

/// Read the value at `offset` inside `document`.
///
/// Traverses the document by successively indexing with each key. An empty
/// offset yields the document itself.
///
/// # Errors
///
/// [`DocError::MissingKey`] if any intermediate or final key is absent,
/// [`DocError::NotAMapping`] if an intermediate value (including the root)
/// is not a mapping.
pub fn read<'d, S: AsRef<str>>(offset: &[S], document: &'d Value) -> Result<&'d Value, DocError> {
    let mut value = document;
    for (depth, key) in offset.iter().enumerate() {
        value = value
            .as_object()
            .ok_or_else(|| DocError::NotAMapping(location(&offset[..depth])))?
            .get(key.as_ref())
            .ok_or_else(|| DocError::MissingKey(joined(&offset[..=depth])))?;
    }
    Ok(value)
}

/// Write `value` at `offset` inside `document`.
///
/// Traverses all but the last key under the same failure conditions as
/// [`read`], then sets the final key in the resulting sub-mapping. The
/// final key is created if absent; missing intermediate mappings are never
/// created, so the path up to the last segment must already exist.
///
/// # Errors
///
/// [`DocError::MissingKey`] / [`DocError::NotAMapping`] as for [`read`],
/// and [`DocError::EmptyOffset`] when `offset` has no keys.
pub fn write<S: AsRef<str>>(
    offset: &[S],
    document: &mut Value,
    value: Value,
) -> Result<(), DocError> {
    let (last, parents) = offset.split_last().ok_or(DocError::EmptyOffset)?;

    let mut target = document;
    for (depth, key) in parents.iter().enumerate() {
        target = target
            .as_object_mut()
            .ok_or_else(|| DocError::NotAMapping(location(&parents[..depth])))?
            .get_mut(key.as_ref())
            .ok_or_else(|| DocError::MissingKey(joined(&parents[..=depth])))?;
    }

    target
        .as_object_mut()
        .ok_or_else(|| DocError::NotAMapping(location(parents)))?
        .insert(last.as_ref().to_string(), value);

    Ok(())
}
