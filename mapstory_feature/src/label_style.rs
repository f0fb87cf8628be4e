// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;

use kurbo::Vec2;
use mapstory_imaging::FontDesc;
use peniko::Color;

use crate::{Feature, Pen, StyleCommon};

/// Where a label's text comes from.
#[derive(Clone)]
pub enum LabelText {
    /// Constant text.
    Fixed(String),
    /// The named attribute of the feature, formatted for display.
    Attribute(String),
    /// Text computed from the feature.
    Computed(Arc<dyn Fn(&Feature) -> Option<String> + Send + Sync>),
}

impl fmt::Debug for LabelText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(s) => f.debug_tuple("Fixed").field(s).finish(),
            Self::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Self::Computed(_) => f.debug_tuple("Computed").finish_non_exhaustive(),
        }
    }
}

impl Default for LabelText {
    fn default() -> Self {
        Self::Fixed(String::new())
    }
}

impl LabelText {
    /// Resolves the text for `feature`.
    ///
    /// Returns `None` when the attribute is missing or the computation yields
    /// nothing.
    pub fn resolve(&self, feature: &Feature) -> Option<String> {
        match self {
            Self::Fixed(s) => Some(s.clone()),
            Self::Attribute(name) => feature.attribute(name).map(ToString::to_string),
            Self::Computed(f) => f(feature),
        }
    }
}

/// Horizontal placement of a label relative to its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// Text starts at the anchor.
    Left,
    /// Text is centered on the anchor.
    #[default]
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Vertical placement of a label relative to its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    /// Text hangs below the anchor.
    Top,
    /// Text is centered on the anchor.
    #[default]
    Center,
    /// Text sits above the anchor.
    Bottom,
}

/// How text wider than the label's maximum width is handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineBreakMode {
    /// A single line, never broken.
    #[default]
    NoWrap,
    /// Break between words.
    WordWrap,
    /// Break between characters.
    CharacterWrap,
    /// Single line, elided at the start.
    HeadTruncation,
    /// Single line, elided at the end.
    TailTruncation,
    /// Single line, elided in the middle.
    MiddleTruncation,
}

/// Text label.
#[derive(Clone, Debug)]
pub struct LabelStyle {
    /// Shared attributes.
    pub common: StyleCommon,
    /// Text source.
    pub text: LabelText,
    /// Font.
    pub font: FontDesc,
    /// Text color.
    pub fore_color: Color,
    /// Background box color; `None` draws no box.
    pub back_color: Option<Color>,
    /// Halo stroked around the glyphs, under the fill.
    pub halo: Option<Pen>,
    /// Offset in pixels from the anchor; positive Y moves down.
    pub offset: Vec2,
    /// Horizontal alignment.
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical alignment.
    pub vertical_alignment: VerticalAlignment,
    /// Maximum line width in multiples of the font size; `0` disables
    /// wrapping and truncation.
    pub max_width: f64,
    /// Line spacing as a multiple of the measured line height.
    pub line_height: f64,
    /// Wrapping or truncation mode.
    pub line_break: LineBreakMode,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            common: StyleCommon::default(),
            text: LabelText::default(),
            font: FontDesc::default(),
            fore_color: Color::BLACK,
            back_color: Some(Color::WHITE),
            halo: None,
            offset: Vec2::ZERO,
            horizontal_alignment: HorizontalAlignment::Center,
            vertical_alignment: VerticalAlignment::Center,
            max_width: 0.0,
            line_height: 1.0,
            line_break: LineBreakMode::NoWrap,
        }
    }
}

impl LabelStyle {
    /// Label with constant text and default attributes.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            text: LabelText::Fixed(text.into()),
            ..Self::default()
        }
    }

    /// Label showing the named attribute, with default attributes.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            text: LabelText::Attribute(name.into()),
            ..Self::default()
        }
    }

    /// Resolves the text for `feature`.
    pub fn text_for(&self, feature: &Feature) -> Option<String> {
        self.text.resolve(feature)
    }
}
