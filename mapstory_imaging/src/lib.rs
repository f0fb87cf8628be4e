// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory Imaging: backend-agnostic drawing IR and backend traits.
//!
//! This crate defines the abstract canvas that map rendering draws onto. It
//! sits between the style renderers in `mapstory_render` and concrete
//! drawing surfaces (a GPU renderer, a CPU rasterizer, or a recording
//! backend in tests).
//!
//! # Core concepts
//!
//! - **Resources**: small, opaque handles ([`PathId`], [`ImageId`],
//!   [`PaintId`]) whose lifetimes are managed via [`ResourceBackend`].
//! - **Operations**: [`StateOp`] mutates the current imaging state (transform,
//!   paint, stroke, fill rule, layers) and [`DrawOp`] produces pixels using
//!   that state. Both can be wrapped in [`ImagingOp`] for logging.
//! - **Backends**: [`ImagingBackend`] accepts operations, exposes the current
//!   transform so callers can save and restore it, and measures text.
//!
//! # Transform discipline
//!
//! The current transform is global backend state. Code that replaces it for a
//! single draw (for example a rotated raster tile) must restore the previous
//! matrix before returning; [`ImagingBackendExt::with_transform`] does this.
//!
//! # Example
//!
//! ```ignore
//! # use mapstory_imaging::*;
//! # use peniko::{Brush, Color};
//! # struct MyBackend { /* implements ResourceBackend + ImagingBackend */ }
//! let mut backend = MyBackend { /* ... */ };
//!
//! let paint = backend.create_paint(PaintDesc {
//!     brush: Brush::Solid(Color::WHITE),
//! });
//! let path = backend.create_path(PathDesc::from_bez_path(&circle.to_path(0.1)));
//!
//! backend.state(StateOp::SetPaint(paint));
//! backend.with_transform(Affine::translate((50.0, 50.0)), |b| {
//!     b.draw(DrawOp::FillPath(path));
//! });
//! ```

#![no_std]

extern crate alloc;

use alloc::{boxed::Box, sync::Arc, vec::Vec};

use kurbo::{BezPath, PathEl};
use peniko::Brush;
pub use peniko::{Fill as FillRule, ImageAlphaType, ImageFormat, ImageSampler};

/// Identifier for a path resource.
///
/// Paths are created per draw call by the style renderers and may be reused
/// while they remain alive.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub u32);

/// Identifier for an image resource.
///
/// Decoded raster tiles and symbol bitmaps live as images until their owning
/// cache destroys them.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Identifier for a paint resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u32);

/// Affine transform type used by the imaging IR.
pub type Affine = kurbo::Affine;

/// Stroke style type used by the imaging IR.
pub type StrokeStyle = kurbo::Stroke;

#[expect(
    clippy::cast_possible_truncation,
    reason = "the IR stores f32 geometry; precision loss from f64 is acceptable"
)]
fn f64_to_f32(v: f64) -> f32 {
    v as f32
}

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Convert from kurbo's rectangle type.
    #[inline]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        Self::new(
            f64_to_f32(rect.x0),
            f64_to_f32(rect.y0),
            f64_to_f32(rect.x1),
            f64_to_f32(rect.y1),
        )
    }

    /// Convert to kurbo's rectangle type.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(self) -> f32 {
        self.y1 - self.y0
    }
}

/// Layer parameters for [`StateOp::PushLayer`].
///
/// Content drawn between a push and the matching pop is composited as a group.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LayerOp {
    /// Optional rectangular clip in local coordinates.
    pub clip: Option<RectF>,
    /// Group opacity in `0.0..=1.0`; `None` means fully opaque.
    pub opacity: Option<f32>,
}

impl LayerOp {
    /// Returns `true` if this layer has no effect on the output.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.clip.is_none() && self.opacity.is_none_or(|o| o >= 1.0)
    }
}

/// Font selection for text draws.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDesc {
    /// Font family name; `None` selects the backend default.
    pub family: Option<Arc<str>>,
    /// Font size in pixels.
    pub size: f32,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
}

impl Default for FontDesc {
    fn default() -> Self {
        Self {
            family: None,
            size: 10.0,
            bold: false,
            italic: false,
        }
    }
}

impl FontDesc {
    /// Default family at the given size.
    #[inline]
    pub fn with_size(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

/// Measured extent of a single line of text.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width in pixels.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
}

/// A single line of text positioned by the top-left corner of its line box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Text content.
    pub text: Arc<str>,
    /// Font used for shaping.
    pub font: FontDesc,
    /// X coordinate of the line start.
    pub x: f32,
    /// Y coordinate of the top of the line box.
    pub y: f32,
}

impl TextRun {
    /// Creates a run whose line box starts at `origin`.
    pub fn new(text: impl Into<Arc<str>>, font: FontDesc, origin: kurbo::Point) -> Self {
        Self {
            text: text.into(),
            font,
            x: f64_to_f32(origin.x),
            y: f64_to_f32(origin.y),
        }
    }
}

/// State operations that affect subsequent drawing.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Replace the current transform.
    SetTransform(Affine),
    /// Push a compositing layer.
    PushLayer(LayerOp),
    /// Pop the most recent layer.
    PopLayer,
    /// Select the paint used by fills, strokes and text.
    SetPaint(PaintId),
    /// Set the stroke style used by stroke operations.
    SetStroke(StrokeStyle),
    /// Set the fill rule used by path fills.
    SetFillRule(FillRule),
}

/// Drawing operations, interpreted under the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a path with the current paint.
    FillPath(PathId),
    /// Stroke a path with the current paint and stroke style.
    StrokePath(PathId),
    /// Fill an axis-aligned rectangle.
    FillRect(RectF),
    /// Draw an image with its own transform, composed with the current one.
    ///
    /// The image occupies `(0, 0, width, height)` in image space.
    DrawImage {
        /// Image to draw.
        image: ImageId,
        /// Image-to-local transform.
        transform: Affine,
        /// Sampling parameters.
        sampler: ImageSampler,
    },
    /// Draw an image (or a subregion of it) into a destination rectangle.
    DrawImageRect {
        /// Image to draw.
        image: ImageId,
        /// Source region in image pixels; `None` is the whole image.
        src: Option<RectF>,
        /// Destination rectangle in local coordinates.
        dst: RectF,
        /// Sampling parameters.
        sampler: ImageSampler,
    },
    /// Fill a line of text with the current paint.
    FillText(TextRun),
    /// Stroke a line of text with the current paint and stroke style.
    ///
    /// Used for label halos, drawn underneath the fill pass.
    StrokeText(TextRun),
}

/// Either a state or a draw operation.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// State change.
    State(StateOp),
    /// Draw.
    Draw(DrawOp),
}

/// Path commands in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Begin a new subpath.
    MoveTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Straight line to a point.
    LineTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Quadratic Bézier to a point.
    QuadTo {
        /// Control point X.
        x1: f32,
        /// Control point Y.
        y1: f32,
        /// End point X.
        x: f32,
        /// End point Y.
        y: f32,
    },
    /// Cubic Bézier to a point.
    CurveTo {
        /// First control point X.
        x1: f32,
        /// First control point Y.
        y1: f32,
        /// Second control point X.
        x2: f32,
        /// Second control point Y.
        y2: f32,
        /// End point X.
        x: f32,
        /// End point Y.
        y: f32,
    },
    /// Close the current subpath.
    Close,
}

/// Description of a path resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDesc {
    /// Path commands.
    pub commands: Box<[PathCmd]>,
}

impl PathDesc {
    /// Lowers a kurbo path into IR commands.
    pub fn from_bez_path(path: &BezPath) -> Self {
        let pt = |p: kurbo::Point| (f64_to_f32(p.x), f64_to_f32(p.y));
        let commands: Vec<PathCmd> = path
            .elements()
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) => {
                    let (x, y) = pt(p);
                    PathCmd::MoveTo { x, y }
                }
                PathEl::LineTo(p) => {
                    let (x, y) = pt(p);
                    PathCmd::LineTo { x, y }
                }
                PathEl::QuadTo(p1, p) => {
                    let (x1, y1) = pt(p1);
                    let (x, y) = pt(p);
                    PathCmd::QuadTo { x1, y1, x, y }
                }
                PathEl::CurveTo(p1, p2, p) => {
                    let (x1, y1) = pt(p1);
                    let (x2, y2) = pt(p2);
                    let (x, y) = pt(p);
                    PathCmd::CurveTo {
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                    }
                }
                PathEl::ClosePath => PathCmd::Close,
            })
            .collect();
        Self {
            commands: commands.into_boxed_slice(),
        }
    }

    /// Raises IR commands back into a kurbo path.
    pub fn to_bez_path(&self) -> BezPath {
        let pt = |x: f32, y: f32| kurbo::Point::new(f64::from(x), f64::from(y));
        let mut out = BezPath::new();
        for cmd in self.commands.iter() {
            match *cmd {
                PathCmd::MoveTo { x, y } => out.push(PathEl::MoveTo(pt(x, y))),
                PathCmd::LineTo { x, y } => out.push(PathEl::LineTo(pt(x, y))),
                PathCmd::QuadTo { x1, y1, x, y } => {
                    out.push(PathEl::QuadTo(pt(x1, y1), pt(x, y)));
                }
                PathCmd::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => out.push(PathEl::CurveTo(pt(x1, y1), pt(x2, y2), pt(x, y))),
                PathCmd::Close => out.push(PathEl::ClosePath),
            }
        }
        out
    }
}

/// Description of an image resource.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format of the data passed to [`ResourceBackend::create_image`].
    pub format: ImageFormat,
    /// Alpha interpretation.
    pub alpha_type: ImageAlphaType,
}

/// Description of a paint resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintDesc {
    /// Brush to paint with.
    pub brush: Brush,
}

/// Resource management for paths, images and paints.
pub trait ResourceBackend {
    /// Create a path resource.
    fn create_path(&mut self, desc: PathDesc) -> PathId;
    /// Destroy a path resource. Destroying an unknown id is a no-op.
    fn destroy_path(&mut self, id: PathId);

    /// Create an image resource from pixel data laid out per `desc`.
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId;
    /// Destroy an image resource. Destroying an unknown id is a no-op.
    fn destroy_image(&mut self, id: ImageId);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;
    /// Destroy a paint resource. Destroying an unknown id is a no-op.
    fn destroy_paint(&mut self, id: PaintId);
}

/// A drawing surface that accepts imaging operations.
pub trait ImagingBackend: ResourceBackend {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation using the current state.
    fn draw(&mut self, op: DrawOp);

    /// Current transform.
    fn transform(&self) -> Affine;

    /// Measure a single line of text.
    fn measure_text(&self, text: &str, font: &FontDesc) -> TextMetrics;

    /// Push a compositing layer.
    #[inline]
    fn layer_push(&mut self, op: LayerOp) {
        self.state(StateOp::PushLayer(op));
    }

    /// Pop the most recent layer.
    #[inline]
    fn layer_pop(&mut self) {
        self.state(StateOp::PopLayer);
    }

    /// Replace the current transform.
    #[inline]
    fn set_transform(&mut self, transform: Affine) {
        self.state(StateOp::SetTransform(transform));
    }
}

/// Scoped helpers built on [`ImagingBackend`].
pub trait ImagingBackendExt: ImagingBackend {
    /// Runs `f` with `transform` as the current matrix, then restores the
    /// matrix that was current before the call.
    #[inline]
    fn with_transform<R>(&mut self, transform: Affine, f: impl FnOnce(&mut Self) -> R) -> R {
        let prior = self.transform();
        self.set_transform(transform);
        let out = f(self);
        self.set_transform(prior);
        out
    }

    /// Runs `f` inside a layer described by `op`.
    #[inline]
    fn with_layer<R>(&mut self, op: LayerOp, f: impl FnOnce(&mut Self) -> R) -> R {
        self.layer_push(op);
        let out = f(self);
        self.layer_pop();
        out
    }

    /// Runs `f` inside an opacity layer.
    ///
    /// No layer is pushed when `opacity >= 1.0`.
    #[inline]
    fn with_opacity_layer<R>(&mut self, opacity: f32, f: impl FnOnce(&mut Self) -> R) -> R {
        if opacity >= 1.0 {
            return f(self);
        }
        self.with_layer(
            LayerOp {
                clip: None,
                opacity: Some(opacity.max(0.0)),
            },
            f,
        )
    }
}

impl<B: ImagingBackend + ?Sized> ImagingBackendExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Circle, Rect, Shape};
    use peniko::Color;

    #[derive(Default)]
    struct LogBackend {
        next_path: u32,
        next_paint: u32,
        transform: Affine,
        ops: Vec<ImagingOp>,
    }

    impl ResourceBackend for LogBackend {
        fn create_path(&mut self, _desc: PathDesc) -> PathId {
            let id = self.next_path;
            self.next_path += 1;
            PathId(id)
        }

        fn destroy_path(&mut self, _id: PathId) {}

        fn create_image(&mut self, _desc: ImageDesc, _pixels: &[u8]) -> ImageId {
            ImageId(0)
        }

        fn destroy_image(&mut self, _id: ImageId) {}

        fn create_paint(&mut self, _desc: PaintDesc) -> PaintId {
            let id = self.next_paint;
            self.next_paint += 1;
            PaintId(id)
        }

        fn destroy_paint(&mut self, _id: PaintId) {}
    }

    impl ImagingBackend for LogBackend {
        fn state(&mut self, op: StateOp) {
            if let StateOp::SetTransform(t) = op {
                self.transform = t;
            }
            self.ops.push(ImagingOp::State(op));
        }

        fn draw(&mut self, op: DrawOp) {
            self.ops.push(ImagingOp::Draw(op));
        }

        fn transform(&self) -> Affine {
            self.transform
        }

        fn measure_text(&self, _text: &str, font: &FontDesc) -> TextMetrics {
            TextMetrics {
                width: 0.0,
                height: font.size,
            }
        }
    }

    #[test]
    fn with_transform_restores_prior_matrix() {
        let mut backend = LogBackend::default();
        backend.set_transform(Affine::scale(2.0));

        let seen = backend.with_transform(Affine::translate((5.0, 5.0)), |b| b.transform());
        assert_eq!(seen, Affine::translate((5.0, 5.0)));
        assert_eq!(backend.transform(), Affine::scale(2.0));
        assert_eq!(
            backend.ops.last(),
            Some(&ImagingOp::State(StateOp::SetTransform(Affine::scale(2.0))))
        );
    }

    #[test]
    fn opaque_layer_is_elided() {
        let mut backend = LogBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::WHITE),
        });
        backend.with_opacity_layer(1.0, |b| b.state(StateOp::SetPaint(paint)));
        assert_eq!(backend.ops.len(), 1);

        backend.with_opacity_layer(0.5, |b| b.draw(DrawOp::FillRect(RectF::new(0., 0., 1., 1.))));
        assert_eq!(backend.ops.len(), 4);
        assert!(matches!(
            backend.ops[1],
            ImagingOp::State(StateOp::PushLayer(LayerOp {
                opacity: Some(0.5),
                ..
            }))
        ));
        assert_eq!(backend.ops[3], ImagingOp::State(StateOp::PopLayer));
    }

    #[test]
    fn bez_path_lowering_keeps_structure() {
        let circle = Circle::new((10.0, 20.0), 5.0).to_path(0.1);
        let desc = PathDesc::from_bez_path(&circle);
        assert_eq!(desc.commands.len(), circle.elements().len());
        assert!(matches!(desc.commands[0], PathCmd::MoveTo { .. }));
        assert_eq!(desc.commands.last(), Some(&PathCmd::Close));

        let back = desc.to_bez_path();
        let bbox = back.bounding_box();
        assert!((bbox.x0 - 5.0).abs() < 1e-4);
        assert!((bbox.y1 - 25.0).abs() < 1e-4);
    }

    #[test]
    fn rect_conversions() {
        let r = RectF::from_kurbo(Rect::new(1.0, 2.0, 4.0, 8.0));
        assert_eq!(r, RectF::new(1.0, 2.0, 4.0, 8.0));
        assert_eq!(r.width(), 3.0);
        assert_eq!(r.height(), 6.0);
        assert_eq!(r.to_kurbo(), Rect::new(1.0, 2.0, 4.0, 8.0));
    }

    #[test]
    fn layer_noop_detection() {
        assert!(LayerOp::default().is_noop());
        assert!(
            LayerOp {
                clip: None,
                opacity: Some(1.0)
            }
            .is_noop()
        );
        assert!(
            !LayerOp {
                clip: Some(RectF::new(0.0, 0.0, 1.0, 1.0)),
                opacity: None
            }
            .is_noop()
        );
    }
}
