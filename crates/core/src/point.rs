//! Planar points and axis-aligned bounds.

use serde::{Deserialize, Serialize};

/// A point in the plane. Generated points are never mutated in place.
pub type Point = glam::DVec2;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Degenerate box containing only `p`.
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_point(*first), |b, &p| b.include(p)),
        )
    }

    /// Returns the box grown to contain `p`.
    pub fn include(self, p: Point) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(self, other: Bounds) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along each axis.
    pub fn size(&self) -> Point {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_empty_is_none() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn from_points_covers_all_points() {
        let pts = [
            Point::new(0.5, -1.0),
            Point::new(-0.25, 0.75),
            Point::new(0.1, 0.2),
        ];
        let b = Bounds::from_points(&pts).unwrap();
        assert_eq!(b.min, Point::new(-0.25, -1.0));
        assert_eq!(b.max, Point::new(0.5, 0.75));
        assert!((b.width() - 0.75).abs() < 1e-12);
        assert!((b.height() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn single_point_has_zero_extent() {
        let b = Bounds::from_points(&[Point::new(3.0, 4.0)]).unwrap();
        assert_eq!(b.size(), Point::ZERO);
    }

    #[test]
    fn union_contains_both() {
        let a = Bounds::from_point(Point::new(0.0, 0.0));
        let b = Bounds::from_point(Point::new(2.0, -3.0));
        let u = a.union(b);
        assert_eq!(u.min, Point::new(0.0, -3.0));
        assert_eq!(u.max, Point::new(2.0, 0.0));
    }
}
