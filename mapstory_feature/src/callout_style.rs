// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use kurbo::Vec2;
use mapstory_imaging::FontDesc;
use peniko::Color;

use crate::StyleCommon;

/// Side of the callout box the arrow points out of.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ArrowAlignment {
    /// Arrow below the box; the box sits above the anchor.
    #[default]
    Bottom,
    /// Arrow left of the box; the box sits right of the anchor.
    Left,
    /// Arrow above the box; the box sits below the anchor.
    Top,
    /// Arrow right of the box; the box sits left of the anchor.
    Right,
}

/// Anchored popup with a title and optional subtitle.
#[derive(Clone, Debug, PartialEq)]
pub struct CalloutStyle {
    /// Shared attributes.
    pub common: StyleCommon,
    /// First line of text.
    pub title: Option<String>,
    /// Second line of text.
    pub subtitle: Option<String>,
    /// Font of the title.
    pub title_font: FontDesc,
    /// Font of the subtitle.
    pub subtitle_font: FontDesc,
    /// Text color.
    pub fore_color: Color,
    /// Box fill.
    pub fill: Color,
    /// Box outline color.
    pub stroke: Color,
    /// Box outline width in pixels.
    pub stroke_width: f64,
    /// Side the arrow points out of.
    pub arrow_alignment: ArrowAlignment,
    /// Arrow base width in pixels.
    pub arrow_width: f64,
    /// Arrow length in pixels.
    pub arrow_height: f64,
    /// Box corner radius in pixels.
    pub corner_radius: f64,
    /// Space between the text and the box edge in pixels.
    pub padding: f64,
    /// Offset of the arrow tip from the anchor in pixels.
    pub offset: Vec2,
}

impl Default for CalloutStyle {
    fn default() -> Self {
        Self {
            common: StyleCommon::default(),
            title: None,
            subtitle: None,
            title_font: FontDesc {
                bold: true,
                ..FontDesc::with_size(12.0)
            },
            subtitle_font: FontDesc::with_size(10.0),
            fore_color: Color::BLACK,
            fill: Color::WHITE,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            arrow_alignment: ArrowAlignment::Bottom,
            arrow_width: 8.0,
            arrow_height: 8.0,
            corner_radius: 4.0,
            padding: 3.0,
            offset: Vec2::ZERO,
        }
    }
}

impl CalloutStyle {
    /// Callout with a title and default attributes.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}
