// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style variants.
//!
//! [`Style`] is a closed sum type over the five kinds of styling a feature can
//! carry. Every variant embeds a [`StyleCommon`] holding the attributes that
//! the render loop checks before dispatch.

use core::fmt;

use kurbo::{Cap, Join, Vec2};
use peniko::Color;

use crate::{CalloutStyle, LabelStyle};

/// Identity of a bitmap registered with a symbol cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitmapId(pub u32);

/// Attributes shared by every style variant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StyleCommon {
    /// Disabled styles are never drawn.
    pub enabled: bool,
    /// Smallest resolution (most zoomed in) at which the style is drawn.
    pub min_visible: f64,
    /// Largest resolution (most zoomed out) at which the style is drawn.
    pub max_visible: f64,
    /// Opacity multiplier applied to every paint of the style.
    pub opacity: f32,
}

impl Default for StyleCommon {
    fn default() -> Self {
        Self {
            enabled: true,
            min_visible: 0.0,
            max_visible: f64::INFINITY,
            opacity: 1.0,
        }
    }
}

impl StyleCommon {
    /// Returns `true` if the style is enabled and `resolution` lies within
    /// `min_visible..=max_visible`.
    pub fn is_visible_at(&self, resolution: f64) -> bool {
        self.enabled && resolution >= self.min_visible && resolution <= self.max_visible
    }
}

/// Stroke color, width in pixels, and line ends.
///
/// New pens draw butt caps and miter joins.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pen {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Shape of open line ends.
    pub cap: Cap,
    /// Shape of corners between segments.
    pub join: Join,
}

impl Pen {
    /// Creates a pen with butt caps and miter joins.
    pub const fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: Cap::Butt,
            join: Join::Miter,
        }
    }

    /// Sets the cap of both line ends.
    #[must_use]
    pub const fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    /// Sets the corner join.
    #[must_use]
    pub const fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

pub(crate) const GRAY: Color = Color::from_rgba8(128, 128, 128, 255);

/// Line, outline and fill paints for shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorStyle {
    /// Shared attributes.
    pub common: StyleCommon,
    /// Pen for line strings.
    pub line: Option<Pen>,
    /// Pen for polygon and marker outlines.
    pub outline: Option<Pen>,
    /// Fill for polygons and markers.
    pub fill: Option<Color>,
}

impl Default for VectorStyle {
    fn default() -> Self {
        Self {
            common: StyleCommon::default(),
            line: Some(Pen::new(GRAY, 1.0)),
            outline: Some(Pen::new(GRAY, 1.0)),
            fill: Some(Color::WHITE),
        }
    }
}

/// Vector marker shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SymbolType {
    /// Circle (or ellipse).
    #[default]
    Ellipse,
    /// Square.
    Rectangle,
    /// Upward-pointing triangle.
    Triangle,
}

/// Point marker: a vector shape or a bitmap.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolStyle {
    /// Shared attributes.
    pub common: StyleCommon,
    /// Marker shape when no bitmap is set.
    pub symbol_type: SymbolType,
    /// Size multiplier on the renderer's nominal symbol size.
    pub scale: f64,
    /// Marker fill.
    pub fill: Option<Color>,
    /// Marker outline.
    pub outline: Option<Pen>,
    /// Bitmap drawn instead of the vector shape.
    pub bitmap: Option<BitmapId>,
    /// Offset in pixels from the anchor, turned with the symbol's rotation.
    pub offset: Vec2,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
    /// Adds the viewport rotation so the marker turns with the map.
    pub rotate_with_map: bool,
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self {
            common: StyleCommon::default(),
            symbol_type: SymbolType::Ellipse,
            scale: 1.0,
            fill: Some(Color::WHITE),
            outline: Some(Pen::new(GRAY, 1.0)),
            bitmap: None,
            offset: Vec2::ZERO,
            rotation: 0.0,
            rotate_with_map: false,
        }
    }
}

/// Bitmap marker resolved through a symbol cache.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStyle {
    /// Shared attributes.
    pub common: StyleCommon,
    /// Bitmap to draw.
    pub bitmap: BitmapId,
    /// Size multiplier on the bitmap's pixel size.
    pub scale: f64,
    /// Offset in pixels from the anchor, turned with the symbol's rotation.
    pub offset: Vec2,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
    /// Adds the viewport rotation so the image turns with the map.
    pub rotate_with_map: bool,
}

impl ImageStyle {
    /// Image style for `bitmap` with default attributes.
    pub fn new(bitmap: BitmapId) -> Self {
        Self {
            common: StyleCommon::default(),
            bitmap,
            scale: 1.0,
            offset: Vec2::ZERO,
            rotation: 0.0,
            rotate_with_map: false,
        }
    }
}

/// Discriminant of [`Style`], used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// [`Style::Vector`].
    Vector,
    /// [`Style::Symbol`].
    Symbol,
    /// [`Style::Image`].
    Image,
    /// [`Style::Label`].
    Label,
    /// [`Style::Callout`].
    Callout,
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vector => "vector",
            Self::Symbol => "symbol",
            Self::Image => "image",
            Self::Label => "label",
            Self::Callout => "callout",
        })
    }
}

/// The closed set of feature styles.
#[derive(Clone, Debug)]
pub enum Style {
    /// Line, outline and fill for shapes; an ellipse marker on points.
    Vector(VectorStyle),
    /// Point marker.
    Symbol(SymbolStyle),
    /// Bitmap marker.
    Image(ImageStyle),
    /// Text label.
    Label(LabelStyle),
    /// Anchored popup.
    Callout(CalloutStyle),
}

impl Style {
    /// Returns the discriminant.
    pub fn kind(&self) -> StyleKind {
        match self {
            Self::Vector(_) => StyleKind::Vector,
            Self::Symbol(_) => StyleKind::Symbol,
            Self::Image(_) => StyleKind::Image,
            Self::Label(_) => StyleKind::Label,
            Self::Callout(_) => StyleKind::Callout,
        }
    }

    /// Shared attributes.
    pub fn common(&self) -> &StyleCommon {
        match self {
            Self::Vector(s) => &s.common,
            Self::Symbol(s) => &s.common,
            Self::Image(s) => &s.common,
            Self::Label(s) => &s.common,
            Self::Callout(s) => &s.common,
        }
    }

    /// Shared attributes, mutably.
    pub fn common_mut(&mut self) -> &mut StyleCommon {
        match self {
            Self::Vector(s) => &mut s.common,
            Self::Symbol(s) => &mut s.common,
            Self::Image(s) => &mut s.common,
            Self::Label(s) => &mut s.common,
            Self::Callout(s) => &mut s.common,
        }
    }

    /// See [`StyleCommon::is_visible_at`].
    pub fn is_visible_at(&self, resolution: f64) -> bool {
        self.common().is_visible_at(resolution)
    }

    /// Opacity multiplier.
    pub fn opacity(&self) -> f32 {
        self.common().opacity
    }
}

impl From<VectorStyle> for Style {
    fn from(s: VectorStyle) -> Self {
        Self::Vector(s)
    }
}

impl From<SymbolStyle> for Style {
    fn from(s: SymbolStyle) -> Self {
        Self::Symbol(s)
    }
}

impl From<ImageStyle> for Style {
    fn from(s: ImageStyle) -> Self {
        Self::Image(s)
    }
}

impl From<LabelStyle> for Style {
    fn from(s: LabelStyle) -> Self {
        Self::Label(s)
    }
}

impl From<CalloutStyle> for Style {
    fn from(s: CalloutStyle) -> Self {
        Self::Callout(s)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn visibility_bounds_are_inclusive() {
        let common = StyleCommon {
            min_visible: 1.0,
            max_visible: 10.0,
            ..StyleCommon::default()
        };
        assert!(common.is_visible_at(1.0));
        assert!(common.is_visible_at(10.0));
        assert!(!common.is_visible_at(0.5));
        assert!(!common.is_visible_at(10.5));
    }

    #[test]
    fn disabled_is_never_visible() {
        let mut style = Style::from(VectorStyle::default());
        assert!(style.is_visible_at(1e9));
        style.common_mut().enabled = false;
        assert!(!style.is_visible_at(1.0));
    }

    #[test]
    fn kinds_display() {
        assert_eq!(Style::from(SymbolStyle::default()).kind(), StyleKind::Symbol);
        assert_eq!(StyleKind::Callout.to_string(), "callout");
        let image = Style::from(ImageStyle::new(BitmapId(3)));
        assert_eq!(image.kind(), StyleKind::Image);
        assert_eq!(image.opacity(), 1.0);
    }
}
