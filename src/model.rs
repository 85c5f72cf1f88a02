//! Catalog data model: datasets, collections, and storage metadata.
//!
//! These are plain in-memory types tying metadata documents to the field
//! and tile machinery. Persistence, search indexing, and the storage
//! driver contract live elsewhere; this module only models the documents
//! and the simple path/location arithmetic the higher layers share.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::crs::{Crs, CrsError};
use crate::doc_offset::{self, DocError};
use crate::fields::{DocView, FieldSchema};

/// Errors raised by descriptor- and metadata-document accessors.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The document is missing a key or nests through a non-mapping.
    #[error(transparent)]
    Doc(#[from] DocError),

    /// The document's CRS definition could not be resolved.
    #[error(transparent)]
    Crs(#[from] CrsError),

    /// A value exists but has the wrong type.
    #[error("expected {expected} at '{path}'")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
    },
}

fn str_at<'d>(document: &'d Value, offset: &[&str]) -> Result<&'d str, ModelError> {
    doc_offset::read(offset, document)?
        .as_str()
        .ok_or_else(|| ModelError::UnexpectedShape {
            path: offset.join("."),
            expected: "a string",
        })
}

fn f64_at(document: &Value, offset: &[&str]) -> Result<f64, ModelError> {
    doc_offset::read(offset, document)?
        .as_f64()
        .ok_or_else(|| ModelError::UnexpectedShape {
            path: offset.join("."),
            expected: "a number",
        })
}

/// An inclusive range of values, used for search and query bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<T> {
    pub begin: T,
    pub end: T,
}

impl<T> Range<T> {
    #[inline]
    #[must_use]
    pub fn new(begin: T, end: T) -> Self {
        Self { begin, end }
    }
}

impl<T: PartialOrd> Range<T> {
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.begin <= *value && *value <= self.end
    }
}

/// Matches datasets by exact metadata properties (a subset of the metadata
/// document). Evaluating the match is the index's job; this type only
/// carries the matcher document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMatcher {
    pub metadata: Value,
}

impl DatasetMatcher {
    #[must_use]
    pub fn new(metadata: Value) -> Self {
        Self { metadata }
    }
}

/// A definition of the storage format, backed by a descriptor document
/// understood by the storage driver.
///
/// Accessors read the well-known descriptor keys; anything else in the
/// descriptor is opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageType {
    pub descriptor: Value,
    /// Database primary key, once persisted.
    pub id: Option<i64>,
}

impl StorageType {
    #[must_use]
    pub fn new(descriptor: Value) -> Self {
        Self {
            descriptor,
            id: None,
        }
    }

    pub fn driver(&self) -> Result<&str, ModelError> {
        str_at(&self.descriptor, &["driver"])
    }

    /// The raw CRS definition carried by the descriptor, trimmed.
    pub fn projection(&self) -> Result<&str, ModelError> {
        Ok(str_at(&self.descriptor, &["crs"])?.trim())
    }

    /// The descriptor's CRS, parsed and classified.
    pub fn crs(&self) -> Result<Crs, ModelError> {
        Ok(Crs::parse(self.projection()?)?)
    }

    /// Names of the spatial dimensions gridded data uses under this
    /// storage type.
    pub fn spatial_dimensions(&self) -> Result<(&'static str, &'static str), ModelError> {
        Ok(self.crs()?.spatial_dimensions())
    }

    /// Tile size as `(x size, y size)`, keyed per spatial dimension.
    pub fn tile_size(&self) -> Result<(f64, f64), ModelError> {
        self.per_dimension("tile_size")
    }

    /// Resolution as `(x res, y res)`, keyed per spatial dimension.
    pub fn resolution(&self) -> Result<(f64, f64), ModelError> {
        self.per_dimension("resolution")
    }

    fn per_dimension(&self, key: &str) -> Result<(f64, f64), ModelError> {
        let (x_dim, y_dim) = self.spatial_dimensions()?;
        Ok((
            f64_at(&self.descriptor, &[key, x_dim])?,
            f64_at(&self.descriptor, &[key, y_dim])?,
        ))
    }

    /// Chunk sizes as `(dimension, size)` pairs in the descriptor's
    /// `dimension_order`.
    pub fn chunking(&self) -> Result<Vec<(String, u64)>, ModelError> {
        let order = doc_offset::read(&["dimension_order"], &self.descriptor)?
            .as_array()
            .ok_or_else(|| ModelError::UnexpectedShape {
                path: "dimension_order".to_string(),
                expected: "an array of strings",
            })?;

        let mut chunks = Vec::with_capacity(order.len());
        for dim in order {
            let dim = dim.as_str().ok_or_else(|| ModelError::UnexpectedShape {
                path: "dimension_order".to_string(),
                expected: "an array of strings",
            })?;
            let size = doc_offset::read(&["chunking", dim], &self.descriptor)?
                .as_u64()
                .ok_or_else(|| ModelError::UnexpectedShape {
                    path: format!("chunking.{dim}"),
                    expected: "an unsigned integer",
                })?;
            chunks.push((dim.to_string(), size));
        }
        Ok(chunks)
    }

    /// Storage unit filename pattern.
    pub fn filename_format(&self) -> Result<&str, ModelError> {
        str_at(&self.descriptor, &["filename_format"])
    }
}

/// Maps matching datasets onto a storage type at a location.
#[derive(Debug, Clone)]
pub struct StorageMapping {
    pub storage_type: Arc<StorageType>,
    /// A user-specified name, unique within the storage type.
    pub name: String,
    /// Human-readable description for display, possibly multi-line.
    pub description: String,
    /// Which datasets to map.
    pub matcher: DatasetMatcher,
    /// Measurement id -> measurement doc understood by the storage driver.
    pub measurements: Value,
    /// Base location storage units are stored under.
    pub location: String,
    /// Storage unit filename pattern inside the location.
    pub filename_pattern: String,
    /// Region of interest, if the mapping is spatially restricted.
    pub roi: Option<Value>,
    /// Database primary key, once persisted.
    pub id: Option<i64>,
}

impl StorageMapping {
    /// The offset of `filepath` inside this mapping's location, or `None`
    /// when the path is not under the location.
    #[must_use]
    pub fn local_path_to_location_offset<'p>(&self, filepath: &'p str) -> Option<&'p str> {
        filepath.strip_prefix(&self.location)
    }

    /// Join `offset` onto the location.
    ///
    /// Plain string joining: both sides are trimmed of `/` and glued with
    /// a single separator. The location is a base the offset lives inside,
    /// not a relative-URL base, so URL join semantics would be wrong here.
    #[must_use]
    pub fn resolve_location(&self, offset: &str) -> String {
        [self.location.as_str(), offset]
            .iter()
            .map(|s| s.trim_matches('/'))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The fully resolved storage unit filename pattern.
    #[must_use]
    pub fn storage_pattern(&self) -> String {
        self.resolve_location(&self.filename_pattern)
    }
}

impl fmt::Display for StorageMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageMapping<name={:?}, id={:?}>", self.name, self.id)
    }
}

/// One stored segment of data: the unit a storage mapping writes.
#[derive(Debug, Clone)]
pub struct StorageUnit {
    /// Ids of the datasets this unit was built from.
    pub dataset_ids: Vec<String>,
    pub storage_mapping: Arc<StorageMapping>,
    /// A descriptor document understood by the storage driver; properties
    /// inside may be queried by users.
    pub descriptor: Value,
    /// Path offset from the mapping's location.
    pub path: String,
    /// Database primary key, once persisted.
    pub id: Option<i64>,
}

impl StorageUnit {
    /// Local filesystem path of the unit, when its resolved location is a
    /// `file://` URL.
    #[must_use]
    pub fn filepath(&self) -> Option<String> {
        self.storage_mapping
            .resolve_location(&self.path)
            .strip_prefix("file://")
            .map(str::to_string)
    }
}

impl fmt::Display for StorageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StorageUnit <type={}, path={}>",
            self.storage_mapping.name, self.path
        )
    }
}

/// Where to find the well-known fields in dataset metadata documents.
///
/// The label is the logical identifier for a dataset: multiple datasets
/// may arrive with the same label (e.g. a reprocessed dataset keeps the
/// label of the one it replaces) and only the latest is returned by
/// default in searches, while older ones remain for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOffsets {
    /// UUID for a dataset. Always unique.
    pub uuid: Vec<String>,
    pub label: Vec<String>,
    /// When the dataset was processed/created.
    pub creation_time: Vec<String>,
    /// A dict of measurements/bands: id -> doc for the storage driver.
    pub measurements: Vec<String>,
    /// A dict of embedded source datasets: classifier -> source doc.
    pub sources: Vec<String>,
}

impl DatasetOffsets {
    /// The field schema these offsets expose on dataset documents.
    #[must_use]
    pub fn schema(&self) -> FieldSchema {
        [
            ("id", &self.uuid),
            ("label", &self.label),
            ("creation_time", &self.creation_time),
            ("measurements", &self.measurements),
            ("sources", &self.sources),
        ]
        .into_iter()
        .map(|(name, offset)| (name.to_string(), offset.clone()))
        .collect()
    }
}

/// A collection of datasets and their storage.
///
/// Owns the dataset offsets and the field schema derived from them; the
/// schema is built once at construction and shared by every document view
/// the collection hands out.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    description: String,
    matcher: DatasetMatcher,
    dataset_offsets: DatasetOffsets,
    schema: FieldSchema,
    id: Option<i64>,
}

impl Collection {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        matcher: DatasetMatcher,
        dataset_offsets: DatasetOffsets,
    ) -> Self {
        let schema = dataset_offsets.schema();
        Self {
            name: name.into(),
            description: description.into(),
            matcher,
            dataset_offsets,
            schema,
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Name of the collection. Unique.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Matches datasets that should belong to this collection.
    #[inline]
    #[must_use]
    pub fn matcher(&self) -> &DatasetMatcher {
        &self.matcher
    }

    #[inline]
    #[must_use]
    pub fn dataset_offsets(&self) -> &DatasetOffsets {
        &self.dataset_offsets
    }

    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// A named-field view of `doc` under this collection's schema.
    #[must_use]
    pub fn dataset_reader<'a>(&'a self, doc: &'a mut Value) -> DocView<'a> {
        DocView::new(&self.schema, doc)
    }
}

/// A dataset on disk: its collection, metadata document, and the path the
/// document was read from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub collection: Arc<Collection>,
    /// The metadata document (typically parsed from JSON/YAML elsewhere).
    pub metadata_doc: Value,
    pub metadata_path: PathBuf,
}

impl Dataset {
    #[must_use]
    pub fn new(collection: Arc<Collection>, metadata_doc: Value, metadata_path: PathBuf) -> Self {
        Self {
            collection,
            metadata_doc,
            metadata_path,
        }
    }

    /// The dataset id, from the document's well-known `id` key.
    pub fn id(&self) -> Result<&str, ModelError> {
        str_at(&self.metadata_doc, &["id"])
    }

    /// The on-disk format name, e.g. `GeoTIFF` or `NetCDF`.
    pub fn format(&self) -> Result<&str, ModelError> {
        str_at(&self.metadata_doc, &["format", "name"])
    }

    /// A named-field view of this dataset's metadata under the
    /// collection's schema.
    #[must_use]
    pub fn metadata(&mut self) -> DocView<'_> {
        DocView::new(self.collection.schema(), &mut self.metadata_doc)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id().unwrap_or("unknown");
        write!(
            f,
            "Dataset <id={}, path={}>",
            id,
            self.metadata_path.display()
        )
    }
}
