//! Tile addressing: the geographic footprint and per-axis coordinates of a
//! regular pixel grid, derived from an affine transform and a CRS.
//!
//! A [`TileSpec`] describes a single storage unit's grid. Construction is
//! one-shot: corner points and coordinate arrays are computed eagerly and
//! the spec is immutable (and freely shareable) afterwards. For projected
//! systems the corner points are reprojected into EPSG:4326 so that
//! bounding-box queries always work in geographic terms.
//!
//! # Example
//!
//! ```rust
//! use gridcube::{Affine, Crs, TileSpec};
//!
//! let wgs84 = Crs::from_epsg(4326).unwrap();
//! let transform = Affine::from_resolution_origin(0.00025, -0.00025, 151.0, -29.0);
//! let tile = TileSpec::new(wgs84, transform, 4000, 4000).unwrap();
//!
//! assert_eq!((tile.lat_min(), tile.lat_max()), (-30.0, -29.0));
//! assert_eq!((tile.lon_min(), tile.lon_max()), (151.0, 152.0));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::crs::{Crs, CrsError};
use crate::geometry::projection::{reproject_points, ReprojectionError};
use crate::geometry::{Affine, Point};

/// Errors raised while constructing a [`TileSpec`].
#[derive(Debug, Clone, Error)]
pub enum TileSpecError {
    /// The affine transform carries rotation or shear. All downstream
    /// coordinate math assumes axis-aligned pixels, so this is fatal at
    /// construction.
    #[error("rotation and/or shear are not supported (b={b}, d={d})")]
    UnsupportedGeometry { b: f64, d: f64 },

    /// The CRS definition could not be resolved or classified.
    #[error(transparent)]
    InvalidCrs(#[from] CrsError),

    /// Reprojecting the tile corners into the reference geographic CRS
    /// failed.
    #[error(transparent)]
    ReprojectionFailed(#[from] ReprojectionError),
}

/// A single storage unit's grid: CRS, location, resolution, and global
/// attributes.
///
/// Corner points are held in geographic (EPSG:4326) terms (native corners
/// for geographic systems, reprojected corners for projected ones), so the
/// `lat_*`/`lon_*` accessors always report a geographic bounding box.
#[derive(Debug, Clone)]
pub struct TileSpec {
    crs: Crs,
    affine: Affine,
    width: usize,
    height: usize,
    global_attrs: Map<String, Value>,
    /// Extent corners in grid order (0,0), (0,h), (w,h), (w,0).
    extents: [Point; 4],
    x_coords: Vec<f64>,
    y_coords: Vec<f64>,
}

impl TileSpec {
    /// Construct a tile spec with no global attributes.
    pub fn new(
        crs: Crs,
        affine: Affine,
        width: usize,
        height: usize,
    ) -> Result<Self, TileSpecError> {
        Self::with_attrs(crs, affine, width, height, Map::new())
    }

    /// Construct a tile spec carrying opaque global attributes (stored in
    /// each storage unit, not interpreted here).
    pub fn with_attrs(
        crs: Crs,
        affine: Affine,
        width: usize,
        height: usize,
        global_attrs: Map<String, Value>,
    ) -> Result<Self, TileSpecError> {
        if !affine.is_rectilinear() {
            return Err(TileSpecError::UnsupportedGeometry {
                b: affine.b,
                d: affine.d,
            });
        }

        // Pixel-grid corners mapped forward into CRS coordinates.
        let mut extents = [
            affine.apply(0.0, 0.0),
            affine.apply(0.0, height as f64),
            affine.apply(width as f64, height as f64),
            affine.apply(width as f64, 0.0),
        ];

        // Per-axis coordinates sampled at pixel centers, half a pixel in
        // from the corner.
        let x_coords: Vec<f64> = (0..width)
            .map(|i| i as f64 * affine.a + affine.c + affine.a / 2.0)
            .collect();
        let y_coords: Vec<f64> = (0..height)
            .map(|j| j as f64 * affine.e + affine.f + affine.e / 2.0)
            .collect();

        if crs.is_projected() {
            reproject_points(&crs, &Crs::wgs84(), &mut extents)?;
        }

        debug!(
            width,
            height,
            corners = ?extents,
            "constructed tile spec"
        );

        Ok(Self {
            crs,
            affine,
            width,
            height,
            global_attrs,
            extents,
            x_coords,
            y_coords,
        })
    }

    /// Construct from an externally supplied CRS definition (EPSG code
    /// string or PROJ string), as produced by raster/georeferencing
    /// readers.
    pub fn from_definition(
        crs_definition: &str,
        affine: Affine,
        width: usize,
        height: usize,
    ) -> Result<Self, TileSpecError> {
        Self::new(Crs::parse(crs_definition)?, affine, width, height)
    }

    #[inline]
    #[must_use]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    #[inline]
    #[must_use]
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Extra attributes to store alongside the unit, opaque to this crate.
    #[inline]
    #[must_use]
    pub fn global_attrs(&self) -> &Map<String, Value> {
        &self.global_attrs
    }

    /// The four extent corners in geographic terms, grid order
    /// (0,0), (0,h), (w,h), (w,0).
    #[inline]
    #[must_use]
    pub fn extent_corners(&self) -> &[Point; 4] {
        &self.extents
    }

    /// Southernmost latitude of the extent.
    #[must_use]
    pub fn lat_min(&self) -> f64 {
        self.extents.iter().map(Point::lat).fold(f64::INFINITY, f64::min)
    }

    /// Northernmost latitude of the extent.
    #[must_use]
    pub fn lat_max(&self) -> f64 {
        self.extents.iter().map(Point::lat).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Westernmost longitude of the extent.
    #[must_use]
    pub fn lon_min(&self) -> f64 {
        self.extents.iter().map(Point::lon).fold(f64::INFINITY, f64::min)
    }

    /// Easternmost longitude of the extent.
    #[must_use]
    pub fn lon_max(&self) -> f64 {
        self.extents.iter().map(Point::lon).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Native per-pixel resolution along the y axis (signed; negative for
    /// north-up row ordering).
    #[inline]
    #[must_use]
    pub fn lat_res(&self) -> f64 {
        self.affine.e
    }

    /// Native per-pixel resolution along the x axis (signed).
    #[inline]
    #[must_use]
    pub fn lon_res(&self) -> f64 {
        self.affine.a
    }

    /// Pixel-center coordinates along the x axis, in native CRS units.
    #[inline]
    #[must_use]
    pub fn x_coords(&self) -> &[f64] {
        &self.x_coords
    }

    /// Pixel-center coordinates along the y axis, in native CRS units.
    #[inline]
    #[must_use]
    pub fn y_coords(&self) -> &[f64] {
        &self.y_coords
    }

    /// Pixel-center longitudes; `Some` only for geographic systems, where
    /// the native x axis is longitude.
    #[must_use]
    pub fn lons(&self) -> Option<&[f64]> {
        self.crs.is_geographic().then_some(self.x_coords.as_slice())
    }

    /// Pixel-center latitudes; `Some` only for geographic systems.
    #[must_use]
    pub fn lats(&self) -> Option<&[f64]> {
        self.crs.is_geographic().then_some(self.y_coords.as_slice())
    }

    /// Names of the grid's spatial dimensions, per the CRS classification.
    #[must_use]
    pub fn spatial_dimensions(&self) -> (&'static str, &'static str) {
        self.crs.spatial_dimensions()
    }
}
