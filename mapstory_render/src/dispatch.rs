// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use mapstory_feature::{Feature, Geometry, Style};
use mapstory_imaging::ImagingBackend;
use mapstory_view::Viewport;

use crate::image::{Placement, draw_bitmap};
use crate::{RenderError, SymbolCache, TileCache, callout, label, raster, symbol, vector};

/// Per-pass state threaded through [`draw_feature`].
pub struct DrawContext<'a> {
    /// Opacity of the enclosing layer, multiplied into every style's opacity.
    pub layer_opacity: f32,
    /// Nominal marker size in pixels.
    pub symbol_size: f64,
    /// Decoded raster tiles.
    pub tile_cache: &'a mut TileCache,
    /// Current render pass, stamped on drawn tiles.
    pub iteration: u64,
    /// Bitmaps referenced by image and symbol styles.
    pub symbols: &'a mut dyn SymbolCache,
}

impl fmt::Debug for DrawContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawContext")
            .field("layer_opacity", &self.layer_opacity)
            .field("symbol_size", &self.symbol_size)
            .field("tile_cache", &self.tile_cache)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

/// Draws `feature` with one `style`.
///
/// Rasters always go to the raster renderer, whatever the style. On points
/// the style picks the routine: callout, label, image, symbol (a symbol with
/// a bitmap takes the image path) or, for a vector style, an ellipse marker.
/// Lines and areas take vector and label styles; labels are placed at the
/// centroid of the geometry's envelope.
///
/// Visibility is not checked here; callers filter styles by resolution
/// first.
///
/// # Errors
///
/// [`RenderError::UnsupportedStyle`] if no routine draws this style on this
/// geometry, and [`RenderError::Raster`] if a decoded tile cannot be placed.
pub fn draw_feature(
    backend: &mut dyn ImagingBackend,
    viewport: &Viewport,
    style: &Style,
    feature: &Feature,
    ctx: &mut DrawContext<'_>,
) -> Result<(), RenderError> {
    let opacity = ctx.layer_opacity * style.opacity();
    match (&feature.geometry, style) {
        (Geometry::Raster(_), _) => {
            raster::draw_raster(
                backend,
                viewport,
                feature,
                opacity,
                ctx.tile_cache,
                ctx.iteration,
            )?;
        }
        (Geometry::Point(point), _) => {
            let anchor = viewport.world_to_screen(*point);
            let map_rotation = viewport.rotation();
            match style {
                Style::Callout(s) => callout::draw_callout(backend, s, anchor, opacity),
                Style::Label(s) => label::draw_label(backend, s, feature, anchor, opacity),
                Style::Image(s) => draw_bitmap(
                    backend,
                    ctx.symbols,
                    s.bitmap,
                    anchor,
                    Placement::for_image(s, map_rotation),
                    opacity,
                ),
                Style::Symbol(s) => match s.bitmap {
                    Some(bitmap) => draw_bitmap(
                        backend,
                        ctx.symbols,
                        bitmap,
                        anchor,
                        Placement::for_symbol(s, map_rotation),
                        opacity,
                    ),
                    None => symbol::draw_symbol(
                        backend,
                        s,
                        anchor,
                        ctx.symbol_size,
                        map_rotation,
                        opacity,
                    ),
                },
                Style::Vector(s) => {
                    symbol::draw_vector_marker(backend, s, anchor, ctx.symbol_size, opacity);
                }
            }
        }
        (geometry, Style::Vector(s)) => vector::draw_shape(backend, viewport, s, geometry, opacity),
        (geometry, Style::Label(s)) => {
            if let Some(envelope) = geometry.envelope() {
                let anchor = viewport.world_to_screen(envelope.centroid());
                label::draw_label(backend, s, feature, anchor, opacity);
            }
        }
        (geometry, style) => {
            return Err(RenderError::UnsupportedStyle {
                style: style.kind(),
                geometry: geometry.kind(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Shape, Size};
    use mapstory_feature::{
        CalloutStyle, FeatureId, GeometryKind, ImageStyle, LabelStyle, StyleKind, SymbolStyle,
        VectorStyle,
    };
    use mapstory_imaging::DrawOp;
    use mapstory_imaging_ref::RefBackend;

    use super::*;
    use crate::BitmapRegistry;
    use crate::decode::test_png::solid;

    struct Fixture {
        backend: RefBackend,
        viewport: Viewport,
        tiles: TileCache,
        symbols: BitmapRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                backend: RefBackend::new(),
                viewport: Viewport::new(Point::ORIGIN, 1.0, Size::new(100.0, 100.0)),
                tiles: TileCache::default(),
                symbols: BitmapRegistry::new(),
            }
        }

        fn draw(&mut self, style: impl Into<Style>, feature: &Feature) -> Result<(), RenderError> {
            let mut ctx = DrawContext {
                layer_opacity: 1.0,
                symbol_size: 32.0,
                tile_cache: &mut self.tiles,
                iteration: 1,
                symbols: &mut self.symbols,
            };
            draw_feature(
                &mut self.backend,
                &self.viewport,
                &style.into(),
                feature,
                &mut ctx,
            )
        }

        fn ops(&self) -> Vec<DrawOp> {
            self.backend.draw_records().map(|r| r.op.clone()).collect()
        }
    }

    fn point() -> Feature {
        Feature::new(FeatureId(1), Point::ORIGIN)
    }

    fn line() -> Feature {
        Feature::new(
            FeatureId(2),
            Geometry::LineString(vec![Point::new(-10.0, 0.0), Point::new(10.0, 0.0)]),
        )
    }

    #[test]
    fn vector_style_on_point_draws_ellipse_marker() {
        let mut fx = Fixture::new();
        fx.draw(VectorStyle::default(), &point()).expect("supported");

        let record = fx.backend.draw_records().next().expect("marker drawn");
        let bbox = record.path.expect("path").to_bez_path().bounding_box();
        assert!((bbox.center() - Point::new(50.0, 50.0)).hypot() < 1e-2);
        assert!((bbox.width() - 32.0).abs() < 1e-2);
    }

    #[test]
    fn symbol_with_bitmap_takes_image_path() {
        let mut fx = Fixture::new();
        let bitmap = fx.symbols.register(solid(2, 2, [0, 0, 0, 255]));
        let style = SymbolStyle {
            bitmap: Some(bitmap),
            ..SymbolStyle::default()
        };
        fx.draw(style, &point()).expect("supported");
        assert!(matches!(fx.ops()[..], [DrawOp::DrawImage { .. }]));

        let mut fx2 = Fixture::new();
        let bitmap = fx2.symbols.register(solid(2, 2, [0, 0, 0, 255]));
        fx2.draw(ImageStyle::new(bitmap), &point()).expect("supported");
        assert_eq!(fx.ops(), fx2.ops());
    }

    #[test]
    fn point_routes_label_and_callout() {
        let mut fx = Fixture::new();
        fx.draw(LabelStyle::fixed("x"), &point()).expect("supported");
        assert!(fx.ops().iter().any(|op| matches!(op, DrawOp::FillText(_))));

        let mut fx = Fixture::new();
        fx.draw(CalloutStyle::titled("x"), &point()).expect("supported");
        assert!(matches!(fx.ops()[0], DrawOp::FillPath(_)));
    }

    #[test]
    fn label_on_line_is_placed_at_centroid() {
        let mut fx = Fixture::new();
        let style = LabelStyle {
            back_color: None,
            ..LabelStyle::fixed("ab")
        };
        fx.draw(style, &line()).expect("supported");
        let ops = fx.ops();
        let [DrawOp::FillText(run)] = &ops[..] else {
            panic!("unexpected ops {ops:?}");
        };
        assert_eq!((run.x, run.y), (45.0, 45.0));
    }

    #[test]
    fn symbol_on_line_is_unsupported() {
        let mut fx = Fixture::new();
        let err = fx
            .draw(SymbolStyle::default(), &line())
            .expect_err("symbols need points");
        assert!(matches!(
            err,
            RenderError::UnsupportedStyle {
                style: StyleKind::Symbol,
                geometry: GeometryKind::LineString,
            }
        ));
        assert_eq!(
            err.to_string(),
            "no renderer for symbol style on line string geometry"
        );
        assert!(fx.ops().is_empty());
    }

    #[test]
    fn layer_and_style_opacity_multiply() {
        let mut fx = Fixture::new();
        let mut style = VectorStyle::default();
        style.common.opacity = 0.5;
        let mut ctx = DrawContext {
            layer_opacity: 0.5,
            symbol_size: 32.0,
            tile_cache: &mut fx.tiles,
            iteration: 1,
            symbols: &mut fx.symbols,
        };
        draw_feature(
            &mut fx.backend,
            &fx.viewport,
            &style.into(),
            &point(),
            &mut ctx,
        )
        .expect("supported");

        let brush = fx
            .backend
            .draw_records()
            .next()
            .and_then(|r| r.brush.cloned());
        assert_eq!(
            brush,
            Some(peniko::Brush::Solid(peniko::Color::WHITE.multiply_alpha(0.25)))
        );
    }
}
