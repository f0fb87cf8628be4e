// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole render passes against the recording backend.

use kurbo::{Affine, Point, Shape, Size};
use mapstory_feature::{
    Feature, FeatureId, Geometry, Layer, LayerIdAllocator, LayerStyle, MemoryProvider, Raster,
    RasterId, Style, SymbolStyle, VectorStyle,
};
use mapstory_geom::Envelope;
use mapstory_imaging::{DrawOp, ImagingBackend};
use mapstory_imaging_ref::RefBackend;
use mapstory_render::{BitmapRegistry, RenderConfig, RenderError, Renderer, TileCacheConfig};
use mapstory_view::Viewport;

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        writer
            .write_image_data(&vec![255_u8; (width * height * 4) as usize])
            .expect("png data");
    }
    bytes
}

fn viewport() -> Viewport {
    Viewport::new(Point::ORIGIN, 1.0, Size::new(100.0, 100.0))
}

fn tile(id: u64, extent: Envelope) -> Feature {
    Feature::new(FeatureId(id), Raster::new(RasterId(id), png(4, 4), extent))
        .with_style(VectorStyle::default())
}

fn layer(ids: &mut LayerIdAllocator, features: Vec<Feature>) -> Layer {
    Layer::new(ids.allocate(), "test", MemoryProvider::new(features))
}

#[test]
fn ellipse_at_world_origin_draws_at_surface_center() {
    let mut ids = LayerIdAllocator::new();
    let point = Feature::new(FeatureId(1), Point::ORIGIN).with_style(SymbolStyle::default());
    let layers = [layer(&mut ids, vec![point])];

    let mut backend = RefBackend::new();
    let mut renderer = Renderer::default();
    renderer
        .render(&mut backend, &viewport(), &layers, &mut BitmapRegistry::new())
        .expect("render");

    let fill = backend.draw_records().next().expect("symbol drawn");
    assert!(matches!(fill.op, DrawOp::FillPath(_)));
    let center = fill.path.expect("path").to_bez_path().bounding_box().center();
    assert!((center - Point::new(50.0, 50.0)).hypot() < 1e-2, "{center:?}");
}

#[test]
fn iteration_used_tracks_the_last_pass_that_drew_a_tile() {
    let mut ids = LayerIdAllocator::new();
    let layers = [layer(
        &mut ids,
        vec![
            tile(1, Envelope::new(-10.0, -10.0, 10.0, 10.0)),
            // Outside the visible extent: fetched out by the provider.
            tile(2, Envelope::new(500.0, 500.0, 510.0, 510.0)),
        ],
    )];

    let mut backend = RefBackend::new();
    let mut renderer = Renderer::default();
    let mut symbols = BitmapRegistry::new();
    for _ in 0..5 {
        renderer
            .render(&mut backend, &viewport(), &layers, &mut symbols)
            .expect("render");
    }

    assert_eq!(renderer.iteration(), 5);
    assert_eq!(renderer.tile_cache().iteration_used(RasterId(1)), Some(5));
    assert_eq!(renderer.tile_cache().iteration_used(RasterId(2)), None);
    assert_eq!(backend.live_image_count(), 1);
}

#[test]
fn undecodable_tile_is_skipped_and_not_retried() {
    let mut ids = LayerIdAllocator::new();
    let broken = Feature::new(
        FeatureId(7),
        Raster::new(
            RasterId(7),
            b"not a png".to_vec(),
            Envelope::new(0.0, 0.0, 10.0, 10.0),
        ),
    )
    .with_style(VectorStyle::default());
    let layers = [layer(
        &mut ids,
        vec![broken, tile(8, Envelope::new(-10.0, -10.0, 0.0, 0.0))],
    )];

    let mut backend = RefBackend::new();
    let mut renderer = Renderer::default();
    for _ in 0..3 {
        renderer
            .render(&mut backend, &viewport(), &layers, &mut BitmapRegistry::new())
            .expect("decode failures never abort the frame");
    }

    let entry = renderer.tile_cache().get(RasterId(7)).expect("failure cached");
    assert!(entry.bitmap.is_none());
    assert_eq!(entry.iteration_used, None);
    // Only the good tile was ever drawn or uploaded.
    assert_eq!(backend.draws().count(), 3);
    assert_eq!(backend.live_image_count(), 1);
}

#[test]
fn malformed_tile_does_not_abort_the_frame() {
    let mut ids = LayerIdAllocator::new();
    let point = Feature::new(FeatureId(2), Point::ORIGIN).with_style(SymbolStyle::default());
    let layers = [layer(
        &mut ids,
        vec![tile(1, Envelope::new(0.0, 0.0, 0.0, 10.0)), point],
    )];

    let mut backend = RefBackend::new();
    Renderer::default()
        .render(&mut backend, &viewport(), &layers, &mut BitmapRegistry::new())
        .expect("raster failures are recovered");
    assert_eq!(backend.draws().count(), 2);
}

#[test]
fn rotated_tile_leaves_surface_matrix_untouched() {
    let mut ids = LayerIdAllocator::new();
    let layers = [layer(
        &mut ids,
        vec![tile(1, Envelope::new(-10.0, -10.0, 10.0, 10.0))],
    )];
    let mut vp = viewport();
    vp.set_rotation(90.0);

    let mut backend = RefBackend::new();
    let device_scale = Affine::scale(2.0);
    backend.set_transform(device_scale);
    Renderer::default()
        .render(&mut backend, &vp, &layers, &mut BitmapRegistry::new())
        .expect("render");

    let (op, state) = backend.draws().next().expect("tile drawn");
    assert!(matches!(op, DrawOp::DrawImageRect { .. }));
    assert_ne!(state.transform, device_scale);
    assert_eq!(backend.transform(), device_scale);
}

#[test]
fn unsupported_style_is_reported() {
    let mut ids = LayerIdAllocator::new();
    let line = Feature::new(
        FeatureId(3),
        Geometry::LineString(vec![Point::ORIGIN, Point::new(1.0, 1.0)]),
    )
    .with_style(SymbolStyle::default());
    let layers = [layer(&mut ids, vec![line])];

    let mut backend = RefBackend::new();
    let err = Renderer::default()
        .render(&mut backend, &viewport(), &layers, &mut BitmapRegistry::new())
        .expect_err("symbols cannot be drawn on lines");
    assert!(matches!(err, RenderError::UnsupportedStyle { .. }));
}

#[test]
fn invisible_styles_and_layers_are_skipped() {
    let mut ids = LayerIdAllocator::new();
    let mut hidden = SymbolStyle::default();
    hidden.common.max_visible = 0.5;
    let mut disabled = SymbolStyle::default();
    disabled.common.enabled = false;
    let point = Feature::new(FeatureId(1), Point::ORIGIN)
        .with_style(hidden)
        .with_style(disabled);

    let mut off = layer(
        &mut ids,
        vec![Feature::new(FeatureId(2), Point::ORIGIN).with_style(SymbolStyle::default())],
    );
    off.enabled = false;
    let layers = [layer(&mut ids, vec![point]), off];

    let mut backend = RefBackend::new();
    Renderer::default()
        .render(&mut backend, &viewport(), &layers, &mut BitmapRegistry::new())
        .expect("render");
    assert_eq!(backend.draws().count(), 0);
}

#[test]
fn layer_style_draws_before_feature_styles() {
    let mut ids = LayerIdAllocator::new();
    let theme = LayerStyle::themed(|f: &Feature| {
        (f.id == FeatureId(1)).then(|| Style::from(VectorStyle::default()))
    });
    let styled = Feature::new(FeatureId(1), Point::ORIGIN).with_style(SymbolStyle {
        outline: None,
        scale: 0.25,
        ..SymbolStyle::default()
    });
    let plain = Feature::new(FeatureId(2), Point::new(10.0, 0.0));
    let layers = [layer(&mut ids, vec![styled, plain])
        .with_style(theme)
        .with_opacity(0.5)];

    let mut backend = RefBackend::new();
    Renderer::default()
        .render(&mut backend, &viewport(), &layers, &mut BitmapRegistry::new())
        .expect("render");

    let widths: Vec<f64> = backend
        .draw_records()
        .filter(|r| matches!(r.op, DrawOp::FillPath(_)))
        .map(|r| r.path.expect("path").to_bez_path().bounding_box().width())
        .collect();
    // Theme marker (32px) first, then the feature's own quarter-size symbol.
    assert_eq!(widths.len(), 2);
    assert!((widths[0] - 32.0).abs() < 1e-2, "{widths:?}");
    assert!((widths[1] - 8.0).abs() < 1e-2, "{widths:?}");
}

#[test]
fn stale_tiles_are_swept_after_the_pass() {
    let mut ids = LayerIdAllocator::new();
    let layers = [layer(
        &mut ids,
        vec![tile(1, Envelope::new(-10.0, -10.0, 10.0, 10.0))],
    )];
    let config = RenderConfig {
        tile_cache: TileCacheConfig {
            max_age_iterations: 2,
            capacity: 16,
        },
        ..RenderConfig::default()
    };

    let mut backend = RefBackend::new();
    let mut renderer = Renderer::new(config);
    let mut symbols = BitmapRegistry::new();
    renderer
        .render(&mut backend, &viewport(), &layers, &mut symbols)
        .expect("render");
    assert!(renderer.tile_cache().contains(RasterId(1)));

    let mut far = viewport();
    far.set_center(Point::new(10_000.0, 10_000.0));
    for _ in 0..3 {
        renderer
            .render(&mut backend, &far, &layers, &mut symbols)
            .expect("render");
    }
    assert!(!renderer.tile_cache().contains(RasterId(1)));
    assert_eq!(backend.live_image_count(), 0);
}
