// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector point markers.

use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape, Vec2};
use mapstory_feature::{Pen, SymbolStyle, SymbolType, VectorStyle};
use mapstory_imaging::ImagingBackend;
use peniko::Color;

use crate::paint::fill_and_outline;

const TOLERANCE: f64 = 0.1;

/// Marker outline centered on the origin, `size` pixels across.
pub(crate) fn marker_path(symbol_type: SymbolType, size: f64) -> BezPath {
    let half = size * 0.5;
    match symbol_type {
        SymbolType::Ellipse => Circle::new(Point::ORIGIN, half).to_path(TOLERANCE),
        SymbolType::Rectangle => Rect::new(-half, -half, half, half).to_path(TOLERANCE),
        SymbolType::Triangle => {
            let mut path = BezPath::new();
            path.move_to((0.0, -half));
            path.line_to((half, half));
            path.line_to((-half, half));
            path.close_path();
            path
        }
    }
}

/// Draws a marker of `symbol_type` at the screen point `anchor`.
///
/// `offset` is applied after `rotation`, in the marker's own frame.
pub(crate) fn draw_marker(
    backend: &mut dyn ImagingBackend,
    anchor: Point,
    symbol_type: SymbolType,
    size: f64,
    offset: Vec2,
    rotation: f64,
    fill: Option<Color>,
    outline: Option<&Pen>,
    opacity: f32,
) {
    let mut path = marker_path(symbol_type, size);
    path.apply_affine(
        Affine::translate(anchor.to_vec2())
            * Affine::rotate(rotation.to_radians())
            * Affine::translate(offset),
    );
    fill_and_outline(backend, &path, fill, outline, opacity);
}

/// Draws a symbol style without a bitmap.
pub(crate) fn draw_symbol(
    backend: &mut dyn ImagingBackend,
    style: &SymbolStyle,
    anchor: Point,
    symbol_size: f64,
    map_rotation: f64,
    opacity: f32,
) {
    let rotation = if style.rotate_with_map {
        style.rotation + map_rotation
    } else {
        style.rotation
    };
    draw_marker(
        backend,
        anchor,
        style.symbol_type,
        symbol_size * style.scale,
        style.offset,
        rotation,
        style.fill,
        style.outline.as_ref(),
        opacity,
    );
}

/// Draws a generic vector style on a point as an ellipse marker.
pub(crate) fn draw_vector_marker(
    backend: &mut dyn ImagingBackend,
    style: &VectorStyle,
    anchor: Point,
    symbol_size: f64,
    opacity: f32,
) {
    draw_marker(
        backend,
        anchor,
        SymbolType::Ellipse,
        symbol_size,
        Vec2::ZERO,
        0.0,
        style.fill,
        style.outline.as_ref(),
        opacity,
    );
}
