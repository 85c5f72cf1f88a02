//! Point reprojection between coordinate reference systems using pure Rust
//! (proj4rs + crs-definitions).
//!
//! proj4rs works in radians on the geographic side, so coordinates are
//! converted from degrees on input when the source CRS is geographic and
//! back to degrees on output when the target is. Parsed projections are
//! kept in a small global LRU cache: tiling workloads rebuild the same two
//! projections for every tile in a run.

use std::sync::{Arc, LazyLock, Mutex};

use lru::LruCache;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use thiserror::Error;

use super::Point;
use crate::crs::Crs;

/// Upper bound on distinct cached projections.
const PROJ_CACHE_CAPACITY: usize = 64;

/// Errors raised while reprojecting points between two CRSs.
#[derive(Debug, Clone, Error)]
pub enum ReprojectionError {
    /// A projection could not be instantiated from its definition.
    #[error("failed to prepare projection '{definition}': {reason}")]
    Setup { definition: String, reason: String },

    /// The coordinate transform itself failed (e.g. out-of-domain input).
    #[error("failed to reproject point ({x}, {y}): {reason}")]
    Transform { x: f64, y: f64, reason: String },
}

static PROJ_CACHE: LazyLock<Mutex<LruCache<String, Arc<Proj>>>> =
    LazyLock::new(|| Mutex::new(LruCache::unbounded()));

fn cached_proj(crs: &Crs) -> Result<Arc<Proj>, ReprojectionError> {
    let mut cache = PROJ_CACHE.lock().unwrap();
    if let Some(proj) = cache.get(crs.proj_string()) {
        return Ok(Arc::clone(proj));
    }

    let proj = Proj::from_proj_string(crs.proj_string()).map_err(|e| ReprojectionError::Setup {
        definition: crs.proj_string().to_string(),
        reason: format!("{e:?}"),
    })?;
    let proj = Arc::new(proj);

    cache.put(crs.proj_string().to_string(), Arc::clone(&proj));
    while cache.len() > PROJ_CACHE_CAPACITY {
        cache.pop_lru();
    }

    Ok(proj)
}

/// Reproject a slice of points in place from `source` to `target`.
///
/// A no-op when both CRSs share the same definition.
pub fn reproject_points(
    source: &Crs,
    target: &Crs,
    points: &mut [Point],
) -> Result<(), ReprojectionError> {
    if source.proj_string() == target.proj_string() {
        return Ok(());
    }

    let source_proj = cached_proj(source)?;
    let target_proj = cached_proj(target)?;

    for point in points.iter_mut() {
        let (x_in, y_in) = if source.is_geographic() {
            (point.x.to_radians(), point.y.to_radians())
        } else {
            (point.x, point.y)
        };

        let mut coord = (x_in, y_in, 0.0);
        transform(&source_proj, &target_proj, &mut coord).map_err(|e| {
            ReprojectionError::Transform {
                x: point.x,
                y: point.y,
                reason: format!("{e:?}"),
            }
        })?;

        *point = if target.is_geographic() {
            Point::new(coord.0.to_degrees(), coord.1.to_degrees())
        } else {
            Point::new(coord.0, coord.1)
        };
    }

    Ok(())
}

/// Reproject a single `(x, y)` coordinate from `source` to `target`.
pub fn reproject_point(
    source: &Crs,
    target: &Crs,
    x: f64,
    y: f64,
) -> Result<(f64, f64), ReprojectionError> {
    let mut points = [Point::new(x, y)];
    reproject_points(source, target, &mut points)?;
    Ok(points[0].to_tuple())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn wgs84() -> Crs {
        Crs::from_epsg(4326).unwrap()
    }

    fn mercator() -> Crs {
        Crs::from_epsg(3857).unwrap()
    }

    #[test]
    fn test_same_crs_is_noop() {
        let (x, y) = reproject_point(&wgs84(), &wgs84(), 10.0, 51.5).unwrap();
        assert!(approx_eq(x, 10.0));
        assert!(approx_eq(y, 51.5));
    }

    #[test]
    fn test_mercator_origin() {
        let (x, y) = reproject_point(&wgs84(), &mercator(), 0.0, 0.0).unwrap();
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 0.0));

        let (lon, lat) = reproject_point(&mercator(), &wgs84(), 0.0, 0.0).unwrap();
        assert!(approx_eq(lon, 0.0));
        assert!(approx_eq(lat, 0.0));
    }

    #[test]
    fn test_roundtrip_4326_3857() {
        let test_points = [
            (0.0, 0.0),
            (10.0, 51.5),   // London-ish
            (-122.4, 37.8), // San Francisco
            (139.7, 35.7),  // Tokyo
        ];

        for (lon, lat) in test_points {
            let (x, y) = reproject_point(&wgs84(), &mercator(), lon, lat).unwrap();
            let (lon2, lat2) = reproject_point(&mercator(), &wgs84(), x, y).unwrap();
            assert!(approx_eq(lon, lon2), "lon: {} != {}", lon, lon2);
            assert!(approx_eq(lat, lat2), "lat: {} != {}", lat, lat2);
        }
    }

    #[test]
    fn test_utm_reprojection() {
        // EPSG:32633 is UTM zone 33N
        let utm = Crs::from_epsg(32633).unwrap();
        let (x, y) = reproject_point(&wgs84(), &utm, 15.0, 52.0).unwrap();
        // UTM coordinates are in metres, easting roughly 500000 near zone center
        assert!(x > 400000.0 && x < 600000.0, "UTM easting: {}", x);
        assert!(y > 5000000.0 && y < 6000000.0, "UTM northing: {}", y);

        let (lon, lat) = reproject_point(&utm, &wgs84(), x, y).unwrap();
        assert!((lon - 15.0).abs() < 1e-5, "lon roundtrip: {}", lon);
        assert!((lat - 52.0).abs() < 1e-5, "lat roundtrip: {}", lat);
    }

    #[test]
    fn test_batch_matches_single() {
        let mut points = [Point::new(10.0, 51.5), Point::new(139.7, 35.7)];
        reproject_points(&wgs84(), &mercator(), &mut points).unwrap();

        let (x0, y0) = reproject_point(&wgs84(), &mercator(), 10.0, 51.5).unwrap();
        assert!(approx_eq(points[0].x, x0));
        assert!(approx_eq(points[0].y, y0));
        assert!(points[1].x > points[0].x);
        assert!(points[1].y < points[0].y);
    }
}
