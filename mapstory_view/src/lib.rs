// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory View: the map viewport and its gesture-driven transforms.
//!
//! This crate provides a small, headless model of a map camera. It focuses on:
//! - Viewport state: world center, resolution (world units per pixel),
//!   rotation in degrees and pixel size of the drawing surface.
//! - Exact, mutually inverse conversion between world and screen coordinates.
//! - Single-call pan/zoom/rotate updates that keep the world point under the
//!   fingers pinned ([`Viewport::transform`]).
//! - Rotation snapping with hysteresis for two-finger gestures.
//! - The draw matrix used to paint world-aligned content under rotation.
//!
//! It does **not** own any layers or rendering backend. Callers are expected to:
//! - Feed touch or pointer input into [`GestureState`] (or call
//!   [`Viewport::transform`] directly).
//! - Serialize gesture updates and render passes on one logical timeline.
//! - Drive animations (fling, zoom-to) by issuing repeated discrete updates.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use mapstory_view::Viewport;
//!
//! let mut view = Viewport::new(Point::new(0.0, 0.0), 1.0, Size::new(100.0, 100.0));
//! assert_eq!(view.world_to_screen(Point::new(0.0, 0.0)), Point::new(50.0, 50.0));
//!
//! // Pinch-zoom by 2x around a screen point while twisting 10 degrees.
//! let focus = Point::new(20.0, 30.0);
//! let world_under_focus = view.screen_to_world(focus);
//! view.transform(focus, focus, 2.0, 10.0);
//! let back = view.world_to_screen(world_under_focus);
//! assert!((back.x - focus.x).abs() < 1e-9 && (back.y - focus.y).abs() < 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - Rotation is always reported normalized to `(-180, 180]`.
//! - World Y points up; screen Y points down.
//! - The viewport is mutated in place and is not synchronized.
//!
//! This crate is `no_std`.

#![no_std]

pub mod gesture;
mod viewport;

pub use gesture::{GestureState, PinchSample, RotationSnap, SnapConfig};
pub use viewport::{Viewport, ViewportDebugInfo, normalize_rotation};
