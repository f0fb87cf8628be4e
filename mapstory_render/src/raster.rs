// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster tile drawing.

use kurbo::{Point, Rect};
use mapstory_feature::{Feature, Geometry};
use mapstory_imaging::{DrawOp, ImageSampler, ImagingBackend, ImagingBackendExt, RectF};
use mapstory_view::Viewport;

use crate::{RasterDrawError, TileCache};

/// Draws the raster geometry of `feature`.
///
/// Non-raster features are ignored. The decoded bitmap is looked up in
/// `cache` by raster identity (decoding on a miss) and stamped with
/// `current_iteration` when drawn. Rasters that failed to decode are skipped
/// without error.
///
/// Under rotation the tile is drawn through
/// [`Viewport::rotated_draw_matrix`] and the backend's previous transform is
/// restored afterwards. Otherwise the projected extent is rounded to whole
/// pixels and drawn under the current transform.
pub fn draw_raster(
    backend: &mut dyn ImagingBackend,
    viewport: &Viewport,
    feature: &Feature,
    opacity: f32,
    cache: &mut TileCache,
    current_iteration: u64,
) -> Result<(), RasterDrawError> {
    let Geometry::Raster(raster) = &feature.geometry else {
        return Ok(());
    };

    let Some(bitmap) = cache.get_or_decode(backend, raster).bitmap else {
        return Ok(());
    };
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(RasterDrawError::EmptyBitmap {
            width: bitmap.width,
            height: bitmap.height,
        });
    }
    let extent = raster.extent;
    if !extent.is_finite() || extent.width() <= 0.0 || extent.height() <= 0.0 {
        return Err(RasterDrawError::InvalidExtent { extent });
    }
    cache.touch(raster.id, current_iteration);

    backend.with_opacity_layer(opacity, |backend| {
        if viewport.is_rotated() {
            let top_left = Point::new(extent.min_x(), extent.max_y());
            let matrix = viewport.rotated_draw_matrix(backend.transform(), top_left);
            let dst = RectF::from_kurbo(Rect::new(0.0, 0.0, extent.width(), extent.height()));
            backend.with_transform(matrix, |backend| {
                backend.draw(DrawOp::DrawImageRect {
                    image: bitmap.image,
                    src: None,
                    dst,
                    sampler: ImageSampler::default(),
                });
            });
        } else {
            let a = viewport.world_to_screen(extent.min());
            let b = viewport.world_to_screen(extent.max());
            let dst = Rect::new(
                a.x.min(b.x).round(),
                a.y.min(b.y).round(),
                a.x.max(b.x).round(),
                a.y.max(b.y).round(),
            );
            backend.draw(DrawOp::DrawImageRect {
                image: bitmap.image,
                src: None,
                dst: RectF::from_kurbo(dst),
                sampler: ImageSampler::default(),
            });
        }
    });
    Ok(())
}
