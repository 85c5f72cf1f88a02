//! # gridcube - Data-cube Metadata & Tile Addressing
//!
//! Core model types for a geospatial data-cube indexing layer, without GDAL.
//!
//! ## Features
//!
//! - **Schema-mapped documents**: logical field names backed by arbitrary
//!   nested-document offsets, readable and writable without hard-coding
//!   document shape
//! - **Tile addressing**: per-axis pixel-center coordinates and extent
//!   corners derived from an affine transform and pixel dimensions
//! - **CRS classification**: geographic vs projected, resolved through the
//!   crs-definitions database
//! - **Coordinate transforms**: pure Rust proj4rs reprojection of tile
//!   corners into EPSG:4326 for bounding-box queries
//! - **Catalog model**: datasets, collections, storage types/mappings/units
//!   as plain in-memory types over metadata documents
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gridcube::{Affine, Crs, DocView, FieldSchema, TileSpec};
//! use serde_json::json;
//!
//! // Read and write logical fields of a nested metadata document
//! let schema: FieldSchema = [("lat".to_string(), vec!["extent".into(), "lat".into()])]
//!     .into_iter()
//!     .collect();
//! let mut doc = json!({"extent": {"lat": 4}});
//! let mut view = DocView::new(&schema, &mut doc);
//! assert_eq!(view.get("lat")?, &json!(4));
//! view.set("lat", json!(5))?;
//!
//! // Derive a tile's footprint from its georeferencing
//! let crs = Crs::from_epsg(4326)?;
//! let transform = Affine::from_resolution_origin(0.00025, -0.00025, 151.0, -29.0);
//! let tile = TileSpec::new(crs, transform, 4000, 4000)?;
//! assert_eq!((tile.lat_min(), tile.lat_max()), (-30.0, -29.0));
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`doc_offset`]: offset-path reads and writes inside nested documents
//! - [`fields`]: [`FieldSchema`] and the per-document [`DocView`]
//! - [`crs`]: CRS parsing and classification via [`Crs`]
//! - [`geometry`]: [`Point`], [`Affine`], and point reprojection
//! - [`tile_spec`]: the [`TileSpec`] grid footprint engine
//! - [`model`]: catalog types ([`Dataset`], [`Collection`], storage metadata)

// ============================================================================
// Public modules
// ============================================================================

pub mod crs;
pub mod doc_offset;
pub mod fields;
pub mod geometry;
pub mod model;
pub mod tile_spec;

// ============================================================================
// Documents & Fields
// ============================================================================

pub use doc_offset::DocError;
pub use fields::{DocView, FieldError, FieldSchema};

// ============================================================================
// Geometry & Projections
// ============================================================================

pub use crs::{Crs, CrsError, CrsKind};
pub use geometry::projection::{reproject_point, reproject_points, ReprojectionError};
pub use geometry::{Affine, Point};

// ============================================================================
// Tile Addressing
// ============================================================================

pub use tile_spec::{TileSpec, TileSpecError};

// ============================================================================
// Catalog Model
// ============================================================================

pub use model::{
    Collection, Dataset, DatasetMatcher, DatasetOffsets, ModelError, Range, StorageMapping,
    StorageType, StorageUnit,
};
