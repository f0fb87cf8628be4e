// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bitmap markers.

use kurbo::{Affine, Point, Vec2};
use mapstory_feature::{BitmapId, ImageStyle, SymbolStyle};
use mapstory_imaging::{DrawOp, ImageSampler, ImagingBackend, ImagingBackendExt};

use crate::SymbolCache;

/// Where and how a bitmap marker is placed around its anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Placement {
    pub(crate) scale: f64,
    pub(crate) offset: Vec2,
    pub(crate) rotation: f64,
}

impl Placement {
    pub(crate) fn for_image(style: &ImageStyle, map_rotation: f64) -> Self {
        Self {
            scale: style.scale,
            offset: style.offset,
            rotation: map_relative(style.rotation, style.rotate_with_map, map_rotation),
        }
    }

    pub(crate) fn for_symbol(style: &SymbolStyle, map_rotation: f64) -> Self {
        Self {
            scale: style.scale,
            offset: style.offset,
            rotation: map_relative(style.rotation, style.rotate_with_map, map_rotation),
        }
    }
}

fn map_relative(rotation: f64, rotate_with_map: bool, map_rotation: f64) -> f64 {
    if rotate_with_map {
        rotation + map_rotation
    } else {
        rotation
    }
}

/// Draws bitmap `id` centered on the screen point `anchor`.
///
/// The offset is applied in the marker's rotated frame, so a bitmap whose
/// tip is shifted onto the anchor keeps it there at any rotation. Bitmaps
/// the cache cannot provide are skipped.
pub(crate) fn draw_bitmap(
    backend: &mut dyn ImagingBackend,
    symbols: &mut dyn SymbolCache,
    id: BitmapId,
    anchor: Point,
    placement: Placement,
    opacity: f32,
) {
    let Some(bitmap) = symbols.resolve(backend, id) else {
        log::debug!("bitmap {} is unavailable, skipping marker", id.0);
        return;
    };
    let half = Vec2::new(f64::from(bitmap.width), f64::from(bitmap.height)) * 0.5;
    let transform = Affine::translate(anchor.to_vec2())
        * Affine::rotate(placement.rotation.to_radians())
        * Affine::translate(placement.offset)
        * Affine::scale(placement.scale)
        * Affine::translate(-half);
    backend.with_opacity_layer(opacity, |backend| {
        backend.draw(DrawOp::DrawImage {
            image: bitmap.image,
            transform,
            sampler: ImageSampler::default(),
        });
    });
}

#[cfg(test)]
mod tests {
    use mapstory_imaging_ref::RefBackend;

    use super::*;
    use crate::BitmapRegistry;
    use crate::decode::test_png::solid;

    #[test]
    fn image_is_centered_scaled_and_faded() {
        let mut backend = RefBackend::new();
        let mut registry = BitmapRegistry::new();
        let id = registry.register(solid(8, 4, [0, 0, 0, 255]));
        let style = ImageStyle {
            scale: 2.0,
            ..ImageStyle::new(id)
        };

        draw_bitmap(
            &mut backend,
            &mut registry,
            id,
            Point::new(20.0, 30.0),
            Placement::for_image(&style, 0.0),
            0.5,
        );

        let record = backend.draw_records().next().expect("image drawn");
        let DrawOp::DrawImage { transform, .. } = record.op else {
            panic!("expected DrawImage, got {:?}", record.op);
        };
        assert_eq!(*transform * Point::ORIGIN, Point::new(12.0, 26.0));
        assert_eq!(*transform * Point::new(8.0, 4.0), Point::new(28.0, 34.0));
        assert_eq!(record.opacity, 0.5);
    }

    #[test]
    fn offset_turns_with_the_bitmap() {
        let mut backend = RefBackend::new();
        let mut registry = BitmapRegistry::new();
        let id = registry.register(solid(4, 4, [0, 0, 0, 255]));
        let style = ImageStyle {
            offset: Vec2::new(0.0, -24.0),
            rotation: 180.0,
            ..ImageStyle::new(id)
        };

        draw_bitmap(
            &mut backend,
            &mut registry,
            id,
            Point::new(50.0, 50.0),
            Placement::for_image(&style, 0.0),
            1.0,
        );

        let record = backend.draw_records().next().expect("image drawn");
        let DrawOp::DrawImage { transform, .. } = record.op else {
            panic!("expected DrawImage, got {:?}", record.op);
        };
        // Shifted up by 24 px, then turned half a revolution about the anchor.
        let center = *transform * Point::new(2.0, 2.0);
        assert!((center - Point::new(50.0, 74.0)).hypot() < 1e-9, "{center:?}");
    }

    #[test]
    fn map_rotation_only_applies_when_requested() {
        let mut style = ImageStyle::new(BitmapId(0));
        style.rotation = 10.0;
        assert_eq!(Placement::for_image(&style, 30.0).rotation, 10.0);
        style.rotate_with_map = true;
        assert_eq!(Placement::for_image(&style, 30.0).rotation, 40.0);
    }

    #[test]
    fn unknown_bitmap_is_skipped() {
        let mut backend = RefBackend::new();
        let mut registry = BitmapRegistry::new();
        draw_bitmap(
            &mut backend,
            &mut registry,
            BitmapId(3),
            Point::ORIGIN,
            Placement::for_image(&ImageStyle::new(BitmapId(3)), 0.0),
            1.0,
        );
        assert!(backend.events().is_empty());
    }
}
