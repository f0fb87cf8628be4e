// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Short-lived paint and path resources for single draws.

use kurbo::{BezPath, Rect, Stroke};
use mapstory_feature::Pen;
use mapstory_imaging::{
    DrawOp, FillRule, ImagingBackend, PaintDesc, PaintId, PathDesc, RectF, StateOp, TextRun,
};
use peniko::{Brush, Color};

/// Creates a solid paint with `opacity` multiplied into the color's alpha.
pub(crate) fn solid_paint(backend: &mut dyn ImagingBackend, color: Color, opacity: f32) -> PaintId {
    backend.create_paint(PaintDesc {
        brush: Brush::Solid(color.multiply_alpha(opacity)),
    })
}

/// Fills `path` with `color`.
pub(crate) fn fill_path(
    backend: &mut dyn ImagingBackend,
    path: &BezPath,
    color: Color,
    fill_rule: FillRule,
    opacity: f32,
) {
    let paint = solid_paint(backend, color, opacity);
    let path_id = backend.create_path(PathDesc::from_bez_path(path));
    backend.state(StateOp::SetPaint(paint));
    backend.state(StateOp::SetFillRule(fill_rule));
    backend.draw(DrawOp::FillPath(path_id));
    backend.destroy_path(path_id);
    backend.destroy_paint(paint);
}

/// Stroke style for `pen`: its width, cap on both ends and join.
pub(crate) fn pen_stroke(pen: &Pen) -> Stroke {
    Stroke::new(pen.width).with_caps(pen.cap).with_join(pen.join)
}

/// Strokes `path` with `pen`.
pub(crate) fn stroke_path(
    backend: &mut dyn ImagingBackend,
    path: &BezPath,
    pen: &Pen,
    opacity: f32,
) {
    if pen.width <= 0.0 {
        return;
    }
    let paint = solid_paint(backend, pen.color, opacity);
    let path_id = backend.create_path(PathDesc::from_bez_path(path));
    backend.state(StateOp::SetPaint(paint));
    backend.state(StateOp::SetStroke(pen_stroke(pen)));
    backend.draw(DrawOp::StrokePath(path_id));
    backend.destroy_path(path_id);
    backend.destroy_paint(paint);
}

/// Fills then outlines `path`, skipping whichever paint is absent.
pub(crate) fn fill_and_outline(
    backend: &mut dyn ImagingBackend,
    path: &BezPath,
    fill: Option<Color>,
    outline: Option<&Pen>,
    opacity: f32,
) {
    if let Some(color) = fill {
        fill_path(backend, path, color, FillRule::NonZero, opacity);
    }
    if let Some(pen) = outline {
        stroke_path(backend, path, pen, opacity);
    }
}

/// Fills an axis-aligned rectangle with `color`.
pub(crate) fn fill_rect(backend: &mut dyn ImagingBackend, rect: Rect, color: Color, opacity: f32) {
    let paint = solid_paint(backend, color, opacity);
    backend.state(StateOp::SetPaint(paint));
    backend.draw(DrawOp::FillRect(RectF::from_kurbo(rect)));
    backend.destroy_paint(paint);
}

/// Draws text lines, stroking every line with `halo` before filling any.
pub(crate) fn draw_text(
    backend: &mut dyn ImagingBackend,
    runs: &[TextRun],
    color: Color,
    halo: Option<&Pen>,
    opacity: f32,
) {
    if runs.is_empty() {
        return;
    }
    if let Some(pen) = halo.filter(|pen| pen.width > 0.0) {
        let paint = solid_paint(backend, pen.color, opacity);
        backend.state(StateOp::SetPaint(paint));
        backend.state(StateOp::SetStroke(pen_stroke(pen)));
        for run in runs {
            backend.draw(DrawOp::StrokeText(run.clone()));
        }
        backend.destroy_paint(paint);
    }
    let paint = solid_paint(backend, color, opacity);
    backend.state(StateOp::SetPaint(paint));
    for run in runs {
        backend.draw(DrawOp::FillText(run.clone()));
    }
    backend.destroy_paint(paint);
}
