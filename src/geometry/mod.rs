pub mod projection;

use serde::{Deserialize, Serialize};

/// A simple 2D point with x and y coordinates.
///
/// Used for tile corner points in either native CRS units or geographic
/// lon/lat, depending on context.
///
/// # Example
///
/// ```rust
/// use gridcube::Point;
///
/// let p = Point::new(151.0, -29.0);
/// assert_eq!(p.lon(), 151.0);
/// assert_eq!(p.lat(), -29.0);
///
/// // Create from tuple
/// let p2: Point = (151.0, -29.0).into();
/// assert_eq!(p, p2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (longitude for geographic points)
    pub x: f64,
    /// Y coordinate (latitude for geographic points)
    pub y: f64,
}

impl Point {
    /// Create a new point from x and y coordinates.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get longitude (alias for x).
    #[inline]
    #[must_use]
    pub fn lon(&self) -> f64 {
        self.x
    }

    /// Get latitude (alias for y).
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.y
    }

    /// Convert to a tuple (x, y).
    #[inline]
    #[must_use]
    pub fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    #[inline]
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Affine georeferencing transform mapping pixel `(col, row)` indices to
/// CRS coordinates.
///
/// Uses the standard six-coefficient form:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// where `c`/`f` locate the grid origin (the outer corner of pixel (0, 0)),
/// `a`/`e` are the per-pixel resolution along each axis (signed: a negative
/// `e` indicates north-up row ordering), and `b`/`d` are the rotation/shear
/// terms. Grid footprint math in this crate only supports rectilinear
/// transforms (`b == d == 0`); see [`Affine::is_rectilinear`].
///
/// # Example
///
/// ```rust
/// use gridcube::Affine;
///
/// let t = Affine::from_resolution_origin(0.00025, -0.00025, 151.0, -29.0);
/// let corner = t.apply(0.0, 0.0);
/// assert_eq!(corner.to_tuple(), (151.0, -29.0));
/// assert!(t.is_rectilinear());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    /// Create a transform from its six coefficients.
    #[inline]
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create a rectilinear transform from per-axis resolutions and the
    /// coordinates of the grid origin.
    #[inline]
    #[must_use]
    pub fn from_resolution_origin(x_res: f64, y_res: f64, origin_x: f64, origin_y: f64) -> Self {
        Self::new(x_res, 0.0, origin_x, 0.0, y_res, origin_y)
    }

    /// Map a pixel-space `(col, row)` position forward into CRS coordinates.
    #[inline]
    #[must_use]
    pub fn apply(&self, col: f64, row: f64) -> Point {
        Point::new(
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// True when the transform carries no rotation or shear, i.e. pixel
    /// axes align with the CRS axes.
    #[inline]
    #[must_use]
    pub fn is_rectilinear(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_accessors() {
        let p = Point::new(151.0, -29.0);
        assert_eq!(p.lon(), 151.0);
        assert_eq!(p.lat(), -29.0);
        assert_eq!(p.to_tuple(), (151.0, -29.0));
    }

    #[test]
    fn test_point_tuple_conversions() {
        let p: Point = (5.0, 10.0).into();
        assert_eq!(p, Point::new(5.0, 10.0));
        let t: (f64, f64) = p.into();
        assert_eq!(t, (5.0, 10.0));
    }

    #[test]
    fn test_affine_apply_forward() {
        let t = Affine::new(0.00025, 0.0, 151.0, 0.0, -0.00025, -29.0);
        assert_eq!(t.apply(0.0, 0.0).to_tuple(), (151.0, -29.0));

        let far = t.apply(4000.0, 4000.0);
        assert!((far.x - 152.0).abs() < 1e-9);
        assert!((far.y - -30.0).abs() < 1e-9);
    }

    #[test]
    fn test_affine_apply_with_shear() {
        let t = Affine::new(1.0, 0.5, 0.0, 0.25, -1.0, 10.0);
        let p = t.apply(2.0, 4.0);
        assert_eq!(p.x, 2.0 + 2.0);
        assert_eq!(p.y, 0.5 - 4.0 + 10.0);
    }

    #[test]
    fn test_affine_rectilinear() {
        assert!(Affine::new(0.5, 0.0, 0.0, 0.0, -0.5, 0.0).is_rectilinear());
        assert!(Affine::from_resolution_origin(10.0, -10.0, 500000.0, 5760000.0).is_rectilinear());
        assert!(!Affine::new(0.5, 0.1, 0.0, 0.0, -0.5, 0.0).is_rectilinear());
        assert!(!Affine::new(0.5, 0.0, 0.0, -0.1, -0.5, 0.0).is_rectilinear());
    }
}
