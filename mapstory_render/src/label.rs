// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text labels: line layout, alignment, background and halo.

use kurbo::{Point, Rect};
use mapstory_feature::{Feature, HorizontalAlignment, LabelStyle, LineBreakMode, VerticalAlignment};
use mapstory_imaging::{FontDesc, ImagingBackend, TextRun};

use crate::paint::{draw_text, fill_rect};

const ELLIPSIS: char = '\u{2026}';

/// Space between the text block and its background box, in pixels.
const BACKGROUND_PADDING: f64 = 3.0;

fn text_width(backend: &dyn ImagingBackend, text: &str, font: &FontDesc) -> f64 {
    f64::from(backend.measure_text(text, font).width)
}

/// Breaks `text` into lines according to `mode`.
///
/// Explicit newlines always break. Without `max_width`, or under
/// [`LineBreakMode::NoWrap`], nothing else happens. Wrapping modes break
/// greedily, keeping at least one word (or character) per line. Truncating
/// modes join the text into a single line and elide characters at the head,
/// tail or middle until it fits.
pub(crate) fn layout_lines(
    backend: &dyn ImagingBackend,
    text: &str,
    font: &FontDesc,
    max_width: Option<f64>,
    mode: LineBreakMode,
) -> Vec<String> {
    let Some(max_width) = max_width else {
        return text.lines().map(String::from).collect();
    };
    let fits = |s: &str| text_width(backend, s, font) <= max_width;
    match mode {
        LineBreakMode::NoWrap => text.lines().map(String::from).collect(),
        LineBreakMode::WordWrap => {
            let mut lines = Vec::new();
            for paragraph in text.lines() {
                let mut line = String::new();
                for word in paragraph.split_whitespace() {
                    if line.is_empty() {
                        line.push_str(word);
                        continue;
                    }
                    let candidate = format!("{line} {word}");
                    if fits(&candidate) {
                        line = candidate;
                    } else {
                        lines.push(core::mem::replace(&mut line, word.to_owned()));
                    }
                }
                lines.push(line);
            }
            lines
        }
        LineBreakMode::CharacterWrap => {
            let mut lines = Vec::new();
            for paragraph in text.lines() {
                let mut line = String::new();
                for ch in paragraph.chars() {
                    line.push(ch);
                    if line.chars().count() > 1 && !fits(&line) {
                        line.pop();
                        lines.push(core::mem::replace(&mut line, ch.to_string()));
                    }
                }
                lines.push(line);
            }
            lines
        }
        LineBreakMode::HeadTruncation
        | LineBreakMode::TailTruncation
        | LineBreakMode::MiddleTruncation => {
            let single = text.lines().collect::<Vec<_>>().join(" ");
            if fits(&single) {
                return vec![single];
            }
            let chars: Vec<char> = single.chars().collect();
            let n = chars.len();
            let elided = |keep: usize| -> String {
                let (head, tail) = match mode {
                    LineBreakMode::HeadTruncation => (0, keep),
                    LineBreakMode::MiddleTruncation => (keep - keep / 2, keep / 2),
                    _ => (keep, 0),
                };
                chars[..head]
                    .iter()
                    .chain(core::iter::once(&ELLIPSIS))
                    .chain(&chars[n - tail..])
                    .collect()
            };
            let line = (0..n)
                .rev()
                .map(elided)
                .find(|candidate| fits(candidate))
                .unwrap_or_else(|| ELLIPSIS.to_string());
            vec![line]
        }
    }
}

/// Lays out the label text of `feature` at the screen point `anchor`.
///
/// Returns the background rectangle (padded text block) and one run per
/// line, or `None` when the feature has no text.
pub(crate) fn layout_label(
    backend: &dyn ImagingBackend,
    style: &LabelStyle,
    feature: &Feature,
    anchor: Point,
) -> Option<(Rect, Vec<TextRun>)> {
    let text = style.text_for(feature).filter(|t| !t.is_empty())?;
    let max_width =
        (style.max_width > 0.0).then(|| style.max_width * f64::from(style.font.size));
    let lines = layout_lines(backend, &text, &style.font, max_width, style.line_break);

    let metrics: Vec<_> = lines
        .iter()
        .map(|line| backend.measure_text(line, &style.font))
        .collect();
    let line_advance = metrics
        .iter()
        .map(|m| f64::from(m.height))
        .fold(0.0, f64::max)
        * style.line_height;
    let block_width = metrics
        .iter()
        .map(|m| f64::from(m.width))
        .fold(0.0, f64::max);
    let block_height = line_advance * lines.len() as f64;

    let origin = anchor + style.offset;
    let left = match style.horizontal_alignment {
        HorizontalAlignment::Left => origin.x,
        HorizontalAlignment::Center => origin.x - block_width * 0.5,
        HorizontalAlignment::Right => origin.x - block_width,
    };
    let top = match style.vertical_alignment {
        VerticalAlignment::Top => origin.y,
        VerticalAlignment::Center => origin.y - block_height * 0.5,
        VerticalAlignment::Bottom => origin.y - block_height,
    };

    let runs = lines
        .into_iter()
        .zip(&metrics)
        .enumerate()
        .map(|(i, (line, m))| {
            let slack = block_width - f64::from(m.width);
            let x = match style.horizontal_alignment {
                HorizontalAlignment::Left => left,
                HorizontalAlignment::Center => left + slack * 0.5,
                HorizontalAlignment::Right => left + slack,
            };
            let y = top + line_advance * i as f64;
            TextRun::new(line, style.font.clone(), Point::new(x, y))
        })
        .collect();
    let background = Rect::new(left, top, left + block_width, top + block_height)
        .inflate(BACKGROUND_PADDING, BACKGROUND_PADDING);
    Some((background, runs))
}

/// Draws a label at the screen point `anchor`.
///
/// The alignments place the text block relative to `anchor + offset`:
/// `Left` puts the block's left edge there, `Top` its top edge, and so on.
pub(crate) fn draw_label(
    backend: &mut dyn ImagingBackend,
    style: &LabelStyle,
    feature: &Feature,
    anchor: Point,
    opacity: f32,
) {
    let Some((background, runs)) = layout_label(&*backend, style, feature, anchor) else {
        return;
    };
    if let Some(color) = style.back_color {
        fill_rect(backend, background, color, opacity);
    }
    draw_text(backend, &runs, style.fore_color, style.halo.as_ref(), opacity);
}

#[cfg(test)]
mod tests {
    use mapstory_feature::{FeatureId, Pen};
    use mapstory_imaging::DrawOp;
    use mapstory_imaging_ref::RefBackend;
    use peniko::Color;

    use super::*;

    // The reference backend measures every character as half the font size.
    fn font() -> FontDesc {
        FontDesc::with_size(10.0)
    }

    fn lines(text: &str, max_chars: f64, mode: LineBreakMode) -> Vec<String> {
        layout_lines(&RefBackend::new(), text, &font(), Some(max_chars * 5.0), mode)
    }

    #[test]
    fn no_wrap_keeps_explicit_lines() {
        assert_eq!(
            lines("a very long line\nnext", 3.0, LineBreakMode::NoWrap),
            ["a very long line", "next"]
        );
        assert_eq!(
            layout_lines(&RefBackend::new(), "x y", &font(), None, LineBreakMode::WordWrap),
            ["x y"]
        );
    }

    #[test]
    fn word_wrap_is_greedy() {
        assert_eq!(
            lines("the quick brown fox", 9.0, LineBreakMode::WordWrap),
            ["the quick", "brown fox"]
        );
        // A word wider than the line still gets a line of its own.
        assert_eq!(
            lines("a extraordinarily b", 5.0, LineBreakMode::WordWrap),
            ["a", "extraordinarily", "b"]
        );
    }

    #[test]
    fn character_wrap_splits_words() {
        assert_eq!(
            lines("abcdefg", 3.0, LineBreakMode::CharacterWrap),
            ["abc", "def", "g"]
        );
    }

    #[test]
    fn truncation_modes() {
        assert_eq!(lines("abcdefgh", 5.0, LineBreakMode::TailTruncation), ["abcd\u{2026}"]);
        assert_eq!(lines("abcdefgh", 5.0, LineBreakMode::HeadTruncation), ["\u{2026}efgh"]);
        assert_eq!(lines("abcdefgh", 5.0, LineBreakMode::MiddleTruncation), ["ab\u{2026}gh"]);
        assert_eq!(lines("abc", 5.0, LineBreakMode::TailTruncation), ["abc"]);
    }

    #[test]
    fn centered_label_with_background_and_halo() {
        let mut backend = RefBackend::new();
        let style = LabelStyle {
            halo: Some(Pen::new(Color::WHITE, 2.0)),
            ..LabelStyle::fixed("abcd")
        };
        let feature = Feature::new(FeatureId(1), Point::ORIGIN);
        draw_label(&mut backend, &style, &feature, Point::new(50.0, 50.0), 1.0);

        let ops: Vec<_> = backend.draw_records().map(|r| r.op.clone()).collect();
        let [
            DrawOp::FillRect(background),
            DrawOp::StrokeText(halo),
            DrawOp::FillText(text),
        ] = &ops[..]
        else {
            panic!("unexpected ops {ops:?}");
        };
        // "abcd" at size 10 is 20 x 10.
        assert_eq!((text.x, text.y), (40.0, 45.0));
        assert_eq!(halo, text);
        assert_eq!(background.to_kurbo(), Rect::new(37.0, 42.0, 63.0, 58.0));
    }

    #[test]
    fn alignment_and_offset_place_the_block() {
        let backend = RefBackend::new();
        let style = LabelStyle {
            horizontal_alignment: HorizontalAlignment::Right,
            vertical_alignment: VerticalAlignment::Top,
            offset: kurbo::Vec2::new(0.0, 4.0),
            ..LabelStyle::fixed("ab\nabcd")
        };
        let feature = Feature::new(FeatureId(1), Point::ORIGIN);
        let (_, runs) =
            layout_label(&backend, &style, &feature, Point::new(100.0, 0.0)).expect("has text");

        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].x, runs[0].y), (90.0, 4.0));
        assert_eq!((runs[1].x, runs[1].y), (80.0, 14.0));
    }

    #[test]
    fn missing_text_draws_nothing() {
        let mut backend = RefBackend::new();
        let feature = Feature::new(FeatureId(1), Point::ORIGIN);
        draw_label(
            &mut backend,
            &LabelStyle::attribute("name"),
            &feature,
            Point::ORIGIN,
            1.0,
        );
        assert!(backend.events().is_empty());
    }
}
