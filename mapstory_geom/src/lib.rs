// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory Geom: small geometry primitives shared by the map rendering crates.
//!
//! This crate provides:
//! - [`Envelope`]: an axis-aligned bounding rectangle in world or screen units,
//!   with growth, union and inclusive containment tests.
//! - [`Quad`]: four explicit vertices used to represent a rotated rectangle,
//!   where the named corners are no longer the geometric extrema.
//! - [`rotate_point`]: rotation of a [`Point`] about an arbitrary center by a
//!   signed angle in degrees.
//!
//! Points are [`kurbo::Point`]s; equality is component-wise.
//!
//! ## Example
//!
//! ```rust
//! use mapstory_geom::{Envelope, Point};
//!
//! let a = Envelope::from_point(Point::new(0.0, 0.0));
//! let b = Envelope::from_point(Point::new(10.0, 0.0));
//! let joined = a.join(&b).grow(16.0);
//!
//! assert_eq!(joined.width(), 42.0);
//! assert!(joined.contains(Point::new(-16.0, 16.0)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod envelope;
mod quad;

pub use envelope::Envelope;
pub use kurbo::Point;
pub use quad::Quad;

use kurbo::Affine;

/// Rotates `point` about `center` by `degrees`.
///
/// Positive angles rotate clockwise when the Y axis points up (world space),
/// which is the convention used by map coordinates. The input is not modified.
#[must_use]
pub fn rotate_point(point: Point, degrees: f64, center: Point) -> Point {
    if degrees == 0.0 {
        return point;
    }
    Affine::rotate_about(-degrees.to_radians(), center) * point
}
