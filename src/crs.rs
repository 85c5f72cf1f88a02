//! CRS parsing and classification.
//!
//! A [`Crs`] is built from an EPSG code or a PROJ string, resolved through
//! the crs-definitions database and validated with proj4rs. Every `Crs` is
//! classified as exactly one of geographic (lon/lat degrees) or projected
//! (native linear units); definitions that fit neither are rejected at
//! parse time, so downstream tile math never has to handle an
//! unclassified system.

use proj4rs::proj::Proj;
use thiserror::Error;
use tracing::debug;

/// PROJ definition of the reference geographic CRS (EPSG:4326), used for
/// tile bounding boxes.
const WGS84_PROJ_STRING: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Errors raised while resolving or classifying a CRS definition.
#[derive(Debug, Clone, Error)]
pub enum CrsError {
    /// The EPSG code is not in the crs-definitions database.
    #[error("EPSG:{0} is not in the crs-definitions database")]
    UnknownEpsg(i32),

    /// The definition could not be parsed as a projection.
    #[error("invalid CRS definition '{definition}': {reason}")]
    Invalid { definition: String, reason: String },

    /// The definition parsed but is neither geographic nor projected.
    #[error("CRS definition '{0}' is neither geographic nor projected")]
    Unclassifiable(String),
}

/// Classification of a coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrsKind {
    /// Angular lon/lat coordinates in degrees.
    Geographic,
    /// Planar coordinates in native linear units (usually metres).
    Projected,
}

/// A validated coordinate reference system definition.
///
/// # Example
///
/// ```rust
/// use gridcube::{Crs, CrsKind};
///
/// let wgs84 = Crs::from_epsg(4326).unwrap();
/// assert_eq!(wgs84.kind(), CrsKind::Geographic);
/// assert_eq!(wgs84.spatial_dimensions(), ("longitude", "latitude"));
///
/// let mercator = Crs::parse("EPSG:3857").unwrap();
/// assert!(mercator.is_projected());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    proj_string: String,
    epsg: Option<u16>,
    kind: CrsKind,
}

impl Crs {
    /// Resolve an EPSG code through the crs-definitions database.
    pub fn from_epsg(code: i32) -> Result<Self, CrsError> {
        let epsg = u16::try_from(code).ok();
        let proj_string = epsg
            .and_then(crs_definitions::from_code)
            .map(|def| def.proj4)
            .ok_or(CrsError::UnknownEpsg(code))?;

        let mut crs = Self::from_proj_string(proj_string)?;
        crs.epsg = epsg;
        Ok(crs)
    }

    /// Build a CRS directly from a PROJ string.
    pub fn from_proj_string(definition: &str) -> Result<Self, CrsError> {
        let definition = definition.trim();

        // Validate the definition parses before classifying it.
        Proj::from_proj_string(definition).map_err(|e| CrsError::Invalid {
            definition: definition.to_string(),
            reason: format!("{e:?}"),
        })?;

        let kind = if definition.contains("+proj=longlat") {
            CrsKind::Geographic
        } else if definition.contains("+proj=") {
            CrsKind::Projected
        } else {
            return Err(CrsError::Unclassifiable(definition.to_string()));
        };

        debug!(definition, ?kind, "classified CRS");

        Ok(Self {
            proj_string: definition.to_string(),
            epsg: None,
            kind,
        })
    }

    /// Parse a CRS from its common external representations: an `EPSG:`
    /// prefixed code, a bare numeric code, or a PROJ string.
    pub fn parse(definition: &str) -> Result<Self, CrsError> {
        let definition = definition.trim();

        if let Some(code) = definition
            .strip_prefix("EPSG:")
            .or_else(|| definition.strip_prefix("epsg:"))
        {
            let code = code.trim().parse::<i32>().map_err(|e| CrsError::Invalid {
                definition: definition.to_string(),
                reason: format!("bad EPSG code: {e}"),
            })?;
            return Self::from_epsg(code);
        }

        if let Ok(code) = definition.parse::<i32>() {
            return Self::from_epsg(code);
        }

        Self::from_proj_string(definition)
    }

    /// The reference geographic CRS (EPSG:4326) used for bounding boxes.
    #[must_use]
    pub fn wgs84() -> Self {
        Self {
            proj_string: WGS84_PROJ_STRING.to_string(),
            epsg: Some(4326),
            kind: CrsKind::Geographic,
        }
    }

    /// Classification of this CRS.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> CrsKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_geographic(&self) -> bool {
        self.kind == CrsKind::Geographic
    }

    #[inline]
    #[must_use]
    pub fn is_projected(&self) -> bool {
        self.kind == CrsKind::Projected
    }

    /// The validated PROJ string backing this CRS.
    #[inline]
    #[must_use]
    pub fn proj_string(&self) -> &str {
        &self.proj_string
    }

    /// The EPSG code, when the CRS was resolved from one.
    #[inline]
    #[must_use]
    pub fn epsg(&self) -> Option<u16> {
        self.epsg
    }

    /// Names of the spatial dimensions of gridded data in this CRS:
    /// `("longitude", "latitude")` for geographic systems, `("x", "y")`
    /// for projected ones.
    #[must_use]
    pub fn spatial_dimensions(&self) -> (&'static str, &'static str) {
        match self.kind {
            CrsKind::Geographic => ("longitude", "latitude"),
            CrsKind::Projected => ("x", "y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_epsg_geographic() {
        let crs = Crs::from_epsg(4326).unwrap();
        assert_eq!(crs.kind(), CrsKind::Geographic);
        assert!(crs.is_geographic());
        assert!(!crs.is_projected());
        assert_eq!(crs.epsg(), Some(4326));
        assert!(crs.proj_string().contains("+proj=longlat"));
    }

    #[test]
    fn test_from_epsg_projected() {
        let mercator = Crs::from_epsg(3857).unwrap();
        assert!(mercator.is_projected());
        assert_eq!(mercator.epsg(), Some(3857));

        // UTM zone 33N
        let utm = Crs::from_epsg(32633).unwrap();
        assert!(utm.is_projected());
    }

    #[test]
    fn test_from_epsg_unknown_code() {
        // Use an EPSG code that definitely doesn't exist
        let err = Crs::from_epsg(999999).unwrap_err();
        assert!(matches!(err, CrsError::UnknownEpsg(999999)));

        let err = Crs::from_epsg(-1).unwrap_err();
        assert!(matches!(err, CrsError::UnknownEpsg(-1)));
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(Crs::parse("EPSG:4326").unwrap().epsg(), Some(4326));
        assert_eq!(Crs::parse("epsg:3857").unwrap().epsg(), Some(3857));
        assert_eq!(Crs::parse(" 4326 ").unwrap().epsg(), Some(4326));

        let from_proj = Crs::parse("+proj=longlat +datum=WGS84 +no_defs").unwrap();
        assert!(from_proj.is_geographic());
        assert_eq!(from_proj.epsg(), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Crs::parse("EPSG:not-a-number").is_err());
        assert!(Crs::from_proj_string("definitely not a projection").is_err());
    }

    #[test]
    fn test_wgs84_reference() {
        let wgs84 = Crs::wgs84();
        assert!(wgs84.is_geographic());
        assert_eq!(wgs84.epsg(), Some(4326));
        // Must itself be a valid definition
        assert!(Crs::from_proj_string(wgs84.proj_string()).is_ok());
    }

    #[test]
    fn test_spatial_dimensions() {
        assert_eq!(
            Crs::from_epsg(4326).unwrap().spatial_dimensions(),
            ("longitude", "latitude")
        );
        assert_eq!(
            Crs::from_epsg(3857).unwrap().spatial_dimensions(),
            ("x", "y")
        );
    }
}
