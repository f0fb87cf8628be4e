// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines, polygons and rectangles.

use kurbo::{BezPath, Point};
use mapstory_feature::{Geometry, Polygon, VectorStyle};
use mapstory_imaging::{FillRule, ImagingBackend};
use mapstory_view::Viewport;

use crate::paint::{fill_path, stroke_path};

fn append_ring(path: &mut BezPath, viewport: &Viewport, ring: &[Point], close: bool) {
    let mut points = ring.iter().map(|p| viewport.world_to_screen(*p));
    let Some(first) = points.next() else {
        return;
    };
    path.move_to(first);
    for p in points {
        path.line_to(p);
    }
    if close {
        path.close_path();
    }
}

fn append_polygon(path: &mut BezPath, viewport: &Viewport, polygon: &Polygon) {
    append_ring(path, viewport, &polygon.exterior, true);
    for hole in &polygon.interiors {
        append_ring(path, viewport, hole, true);
    }
}

/// Projects the outline of `geometry` to screen space.
///
/// Returns `None` for points and rasters, which have no outline.
pub(crate) fn screen_path(viewport: &Viewport, geometry: &Geometry) -> Option<BezPath> {
    let mut path = BezPath::new();
    match geometry {
        Geometry::LineString(points) => append_ring(&mut path, viewport, points, false),
        Geometry::Polygon(polygon) => append_polygon(&mut path, viewport, polygon),
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                append_polygon(&mut path, viewport, polygon);
            }
        }
        Geometry::Rect(envelope) => {
            append_ring(&mut path, viewport, &envelope.to_quad().vertices(), true);
        }
        Geometry::Point(_) | Geometry::Raster(_) => return None,
    }
    Some(path)
}

/// Draws a line, polygon or rectangle geometry.
///
/// Line strings are stroked with the line pen. Areas are filled with the
/// even-odd rule, so interior rings cut holes, and then outlined.
pub(crate) fn draw_shape(
    backend: &mut dyn ImagingBackend,
    viewport: &Viewport,
    style: &VectorStyle,
    geometry: &Geometry,
    opacity: f32,
) {
    let Some(path) = screen_path(viewport, geometry) else {
        return;
    };
    if path.elements().is_empty() {
        return;
    }
    if let Geometry::LineString(_) = geometry {
        if let Some(pen) = &style.line {
            stroke_path(backend, &path, pen, opacity);
        }
        return;
    }
    if let Some(color) = style.fill {
        fill_path(backend, &path, color, FillRule::EvenOdd, opacity);
    }
    if let Some(pen) = &style.outline {
        stroke_path(backend, &path, pen, opacity);
    }
}
