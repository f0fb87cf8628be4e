// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::{Hash, Hasher};

use kurbo::Point;

use crate::{Envelope, rotate_point};

/// Quadrilateral with four explicit vertices.
///
/// Represents a rectangle that may have been rotated. After rotation the
/// `bottom_left` vertex is not necessarily the minimum corner anymore, so use
/// [`Quad::to_bounding_box`] to get an axis-aligned envelope.
///
/// Equality and hashing are structural over the four vertices. Only
/// `PartialEq` is implemented: a quad with a NaN coordinate is not equal to
/// itself. Hashing folds `-0.0` into `0.0` so that equal quads hash alike.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Quad {
    /// Bottom-left vertex.
    pub bottom_left: Point,
    /// Top-left vertex.
    pub top_left: Point,
    /// Top-right vertex.
    pub top_right: Point,
    /// Bottom-right vertex.
    pub bottom_right: Point,
}

impl Quad {
    /// Creates a quad from its vertices in clockwise order.
    #[must_use]
    pub const fn new(
        bottom_left: Point,
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
    ) -> Self {
        Self {
            bottom_left,
            top_left,
            top_right,
            bottom_right,
        }
    }

    /// Vertices in clockwise order, from bottom-left around to bottom-right.
    #[must_use]
    pub fn vertices(&self) -> [Point; 4] {
        [
            self.bottom_left,
            self.top_left,
            self.top_right,
            self.bottom_right,
        ]
    }

    /// Returns a new quad with every vertex rotated about `center`.
    ///
    /// See [`rotate_point`] for the angle convention.
    #[must_use]
    pub fn rotate(&self, degrees: f64, center: Point) -> Self {
        let [bl, tl, tr, br] = self.vertices().map(|p| rotate_point(p, degrees, center));
        Self::new(bl, tl, tr, br)
    }

    /// Axis-aligned envelope covering all four vertices.
    #[must_use]
    pub fn to_bounding_box(&self) -> Envelope {
        let [a, b, c, d] = self.vertices();
        Envelope::new(
            a.x.min(b.x).min(c.x).min(d.x),
            a.y.min(b.y).min(c.y).min(d.y),
            a.x.max(b.x).max(c.x).max(d.x),
            a.y.max(b.y).max(c.y).max(d.y),
        )
    }
}

impl Hash for Quad {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for p in self.vertices() {
            // `+ 0.0` folds -0.0 into 0.0 so hashing agrees with `==`.
            (p.x + 0.0).to_bits().hash(state);
            (p.y + 0.0).to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use kurbo::Point;

    use super::Quad;
    use crate::Envelope;

    fn hash_of(q: &Quad) -> u64 {
        let mut h = DefaultHasher::new();
        q.hash(&mut h);
        h.finish()
    }

    #[test]
    fn rotated_unit_square_bbox_is_diagonal() {
        let square = Envelope::new(0.0, 0.0, 1.0, 1.0);
        let rotated = square.to_quad().rotate(45.0, square.centroid());
        let bbox = rotated.to_bounding_box();
        let diagonal = core::f64::consts::SQRT_2;
        assert!((bbox.width() - diagonal).abs() < 1e-12, "{}", bbox.width());
        assert!((bbox.height() - diagonal).abs() < 1e-12, "{}", bbox.height());
        assert!((bbox.centroid().x - 0.5).abs() < 1e-12);
        assert!((bbox.centroid().y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rotation_returns_new_quad() {
        let q = Envelope::new(0.0, 0.0, 2.0, 1.0).to_quad();
        let r = q.rotate(90.0, Point::ORIGIN);
        assert_ne!(q, r);
        assert_eq!(q, Envelope::new(0.0, 0.0, 2.0, 1.0).to_quad());
    }

    #[test]
    fn bottom_left_is_not_minimum_after_rotation() {
        let q = Envelope::new(0.0, 0.0, 2.0, 1.0).to_quad();
        let r = q.rotate(180.0, Point::new(1.0, 0.5));
        let bbox = r.to_bounding_box();
        assert!((r.bottom_left.x - 2.0).abs() < 1e-12);
        assert!(bbox.min_x().abs() < 1e-12);
    }

    #[test]
    fn structural_equality_and_hash() {
        let a = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        );
        let mut b = a;
        b.bottom_left = Point::new(-0.0, 0.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        b.top_right = Point::new(1.0, 2.0);
        assert_ne!(a, b);
    }

    #[test]
    fn nan_vertex_is_not_equal_to_itself() {
        let mut q = Envelope::new(0.0, 0.0, 1.0, 1.0).to_quad();
        q.top_left = Point::new(f64::NAN, 1.0);
        let copy = q;
        assert_ne!(q, copy);
        // Hashing stays deterministic for the same bits.
        assert_eq!(hash_of(&q), hash_of(&copy));
    }
}
