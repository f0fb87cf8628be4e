// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored popups.

use kurbo::{BezPath, Point, Rect, Size};
use mapstory_feature::{ArrowAlignment, CalloutStyle, Pen};
use mapstory_imaging::{FillRule, ImagingBackend, TextRun};

use crate::paint::{draw_text, fill_path, stroke_path};

/// Callout outline: a rounded box whose arrow tip sits at `tip`.
///
/// `content` is the size of the text block; the box adds `padding` on every
/// side and is placed on the side of the tip opposite the arrow.
pub(crate) fn callout_path(style: &CalloutStyle, tip: Point, content: Size) -> (BezPath, Rect) {
    let width = content.width + 2.0 * style.padding;
    let height = content.height + 2.0 * style.padding;
    let reach = style.arrow_height;
    let (x0, y0) = match style.arrow_alignment {
        ArrowAlignment::Bottom => (tip.x - width * 0.5, tip.y - reach - height),
        ArrowAlignment::Top => (tip.x - width * 0.5, tip.y + reach),
        ArrowAlignment::Left => (tip.x + reach, tip.y - height * 0.5),
        ArrowAlignment::Right => (tip.x - reach - width, tip.y - height * 0.5),
    };
    let rect = Rect::new(x0, y0, x0 + width, y0 + height);
    let (x1, y1) = (rect.x1, rect.y1);
    let center = rect.center();

    let radius = style.corner_radius.clamp(0.0, width.min(height) * 0.5);
    let along = match style.arrow_alignment {
        ArrowAlignment::Bottom | ArrowAlignment::Top => width,
        ArrowAlignment::Left | ArrowAlignment::Right => height,
    };
    let half_arrow = (style.arrow_width.min(along - 2.0 * radius) * 0.5).max(0.0);

    let mut path = BezPath::new();
    path.move_to((x0 + radius, y0));
    if style.arrow_alignment == ArrowAlignment::Top {
        path.line_to((center.x - half_arrow, y0));
        path.line_to(tip);
        path.line_to((center.x + half_arrow, y0));
    }
    path.line_to((x1 - radius, y0));
    path.quad_to((x1, y0), (x1, y0 + radius));
    if style.arrow_alignment == ArrowAlignment::Right {
        path.line_to((x1, center.y - half_arrow));
        path.line_to(tip);
        path.line_to((x1, center.y + half_arrow));
    }
    path.line_to((x1, y1 - radius));
    path.quad_to((x1, y1), (x1 - radius, y1));
    if style.arrow_alignment == ArrowAlignment::Bottom {
        path.line_to((center.x + half_arrow, y1));
        path.line_to(tip);
        path.line_to((center.x - half_arrow, y1));
    }
    path.line_to((x0 + radius, y1));
    path.quad_to((x0, y1), (x0, y1 - radius));
    if style.arrow_alignment == ArrowAlignment::Left {
        path.line_to((x0, center.y + half_arrow));
        path.line_to(tip);
        path.line_to((x0, center.y - half_arrow));
    }
    path.line_to((x0, y0 + radius));
    path.quad_to((x0, y0), (x0 + radius, y0));
    path.close_path();
    (path, rect)
}

/// Draws a callout whose arrow points at the screen point `anchor`.
///
/// The arrow tip is placed at `anchor + offset`. Title and subtitle are
/// centered in the box, one line each.
pub(crate) fn draw_callout(
    backend: &mut dyn ImagingBackend,
    style: &CalloutStyle,
    anchor: Point,
    opacity: f32,
) {
    let lines: Vec<_> = [
        (style.title.as_deref(), &style.title_font),
        (style.subtitle.as_deref(), &style.subtitle_font),
    ]
    .into_iter()
    .filter_map(|(text, font)| {
        let text = text.filter(|t| !t.is_empty())?;
        Some((text, font, backend.measure_text(text, font)))
    })
    .collect();

    let content = Size::new(
        lines
            .iter()
            .map(|(_, _, m)| f64::from(m.width))
            .fold(0.0, f64::max),
        lines.iter().map(|(_, _, m)| f64::from(m.height)).sum(),
    );
    let (path, rect) = callout_path(style, anchor + style.offset, content);

    fill_path(backend, &path, style.fill, FillRule::NonZero, opacity);
    stroke_path(
        backend,
        &path,
        &Pen::new(style.stroke, style.stroke_width),
        opacity,
    );

    let mut y = rect.y0 + style.padding;
    let runs: Vec<_> = lines
        .into_iter()
        .map(|(text, font, m)| {
            let x = rect.x0 + style.padding + (content.width - f64::from(m.width)) * 0.5;
            let run = TextRun::new(text, font.clone(), Point::new(x, y));
            y += f64::from(m.height);
            run
        })
        .collect();
    draw_text(backend, &runs, style.fore_color, None, opacity);
}
