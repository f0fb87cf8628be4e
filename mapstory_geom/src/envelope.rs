// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::Quad;

/// Axis-aligned bounding rectangle.
///
/// The minimum corner is always less than or equal to the maximum corner on
/// both axes; constructors normalize their inputs to keep it that way.
/// A single point yields a degenerate (zero-area) envelope.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Envelope {
    min: Point,
    max: Point,
}

impl Envelope {
    /// Creates an envelope from two corners, normalizing the coordinate order.
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Creates a degenerate envelope covering a single point.
    #[must_use]
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Creates the smallest envelope covering all `points`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |env, p| env.join_point(p)))
    }

    /// Converts from kurbo's rectangle type.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// Converts to kurbo's rectangle type.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min.x, self.min.y, self.max.x, self.max.y)
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Point {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Point {
        self.max
    }

    /// Minimum X coordinate.
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min.x
    }

    /// Minimum Y coordinate.
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min.y
    }

    /// Maximum X coordinate.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max.x
    }

    /// Maximum Y coordinate.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max.y
    }

    /// Width of the envelope.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the envelope.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point of the envelope.
    #[must_use]
    pub fn centroid(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Returns a copy expanded by `margin` on all four sides.
    ///
    /// A negative margin shrinks the envelope; the result is clamped so that
    /// it never inverts.
    #[must_use]
    pub fn grow(&self, margin: f64) -> Self {
        let min = Point::new(self.min.x - margin, self.min.y - margin);
        let max = Point::new(self.max.x + margin, self.max.y + margin);
        if min.x > max.x || min.y > max.y {
            let c = self.centroid();
            return Self::from_point(c);
        }
        Self { min, max }
    }

    /// Returns the union bounding box of `self` and `other`.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Returns the union of `self` and a single point.
    #[must_use]
    pub fn join_point(&self, p: Point) -> Self {
        self.join(&Self::from_point(p))
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns `true` if the two envelopes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Converts into a [`Quad`] with the named corners set from min/max.
    #[must_use]
    pub fn to_quad(&self) -> Quad {
        Quad::new(
            self.min,
            Point::new(self.min.x, self.max.y),
            self.max,
            Point::new(self.max.x, self.min.y),
        )
    }
}
