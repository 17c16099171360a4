//! Axis-aligned bounding box.
//!
//! [`Bounds`] is the world-space bounding volume used throughout the scene:
//! every model reports one, and the scene bounds is the union of all of them.
//! The default box is inverted (`min = +INF`, `max = -INF`) so that expanding
//! an empty box by any point always establishes a valid box.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in 3D space.
///
/// The default value is the *empty* box with `min` at `+INF` and `max` at
/// `-INF`. Expanding the empty box by a single point yields a degenerate box
/// with `min == max == point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// The empty (inverted) box.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from explicit corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Returns `true` if the box contains no points (still inverted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include `point`.
    ///
    /// Idempotent for repeated identical points and monotonically
    /// non-shrinking: the new `min` is component-wise `<=` the old `min` and
    /// the new `max` is component-wise `>=` the old `max`.
    pub fn expand_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box to include another box. Expanding by an empty box is a
    /// no-op.
    pub fn expand(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Slab test: does the box contain `point`?
    #[must_use]
    pub fn intersects_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test: do the two boxes overlap? Empty boxes intersect nothing.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Center of the box. Meaningless for an empty box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths of the box.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Apply an affine matrix by transforming all eight corners and
    /// re-expanding. An empty box stays empty.
    #[must_use]
    pub fn transformed(&self, matrix: Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.expand_point(matrix.transform_point3(corner));
        }
        out
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let b = Bounds::default();
        assert!(b.is_empty());
    }

    #[test]
    fn test_expand_empty_by_point_yields_degenerate_box() {
        let mut b = Bounds::default();
        let p = Vec3::new(1.0, -2.0, 3.0);
        b.expand_point(p);
        assert_eq!(b.min, p);
        assert_eq!(b.max, p);
        assert!(!b.is_empty());
    }

    #[test]
    fn test_expand_point_is_idempotent() {
        let mut b = Bounds::default();
        b.expand_point(Vec3::ONE);
        let once = b;
        b.expand_point(Vec3::ONE);
        assert_eq!(b, once);
    }

    #[test]
    fn test_expand_is_monotonic() {
        let mut b = Bounds::new(Vec3::ZERO, Vec3::ONE);
        let old = b;
        b.expand_point(Vec3::new(-1.0, 2.0, 0.5));
        assert!(b.min.cmple(old.min).all());
        assert!(b.max.cmpge(old.max).all());
    }

    #[test]
    fn test_expand_by_empty_box_is_noop() {
        let mut b = Bounds::new(Vec3::ZERO, Vec3::ONE);
        b.expand(&Bounds::EMPTY);
        assert_eq!(b, Bounds::new(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn test_union_of_boxes() {
        let mut b = Bounds::new(Vec3::ZERO, Vec3::ONE);
        b.expand(&Bounds::new(Vec3::splat(2.0), Vec3::splat(3.0)));
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_intersects_point() {
        let b = Bounds::new(Vec3::ZERO, Vec3::ONE);
        assert!(b.intersects_point(Vec3::splat(0.5)));
        assert!(b.intersects_point(Vec3::ZERO));
        assert!(!b.intersects_point(Vec3::splat(1.5)));
    }

    #[test]
    fn test_intersects_boxes() {
        let a = Bounds::new(Vec3::ZERO, Vec3::ONE);
        let b = Bounds::new(Vec3::splat(0.5), Vec3::splat(2.0));
        let c = Bounds::new(Vec3::splat(5.0), Vec3::splat(6.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&Bounds::EMPTY));
    }

    #[test]
    fn test_transformed_by_translation() {
        let b = Bounds::new(Vec3::ZERO, Vec3::ONE);
        let m = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let t = b.transformed(m);
        assert_eq!(t.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(t.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_transformed_empty_stays_empty() {
        let m = Mat4::from_translation(Vec3::ONE);
        assert!(Bounds::EMPTY.transformed(m).is_empty());
    }
}
