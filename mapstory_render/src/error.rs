// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use mapstory_feature::{GeometryKind, StyleKind};
use mapstory_geom::Envelope;
use thiserror::Error;

/// Errors surfaced by a render pass or a single feature draw.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No routine draws this style on this geometry.
    ///
    /// This is a configuration error and is not recovered locally.
    #[error("no renderer for {style} style on {geometry} geometry")]
    UnsupportedStyle {
        /// Offending style kind.
        style: StyleKind,
        /// Geometry the style was applied to.
        geometry: GeometryKind,
    },
    /// A raster tile could not be drawn.
    ///
    /// [`Renderer::render`](crate::Renderer::render) logs these and moves on
    /// to the next feature.
    #[error(transparent)]
    Raster(#[from] RasterDrawError),
}

/// A bitmap payload that could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The PNG stream is malformed.
    #[error("failed to decode PNG data")]
    Png(#[from] png::DecodingError),
    /// The decoded pixels are not in a layout that converts to RGBA8.
    #[error("unsupported pixel layout {color_type:?} at {bit_depth:?}")]
    UnsupportedLayout {
        /// Color type after decoder transformations.
        color_type: png::ColorType,
        /// Bit depth after decoder transformations.
        bit_depth: png::BitDepth,
    },
}

/// A raster tile that decoded but cannot be placed on the surface.
#[derive(Debug, Error)]
pub enum RasterDrawError {
    /// The world extent is non-finite or has no area.
    #[error("raster extent {extent:?} is not drawable")]
    InvalidExtent {
        /// The offending extent.
        extent: Envelope,
    },
    /// The decoded bitmap has no pixels.
    #[error("raster bitmap is empty ({width}x{height})")]
    EmptyBitmap {
        /// Bitmap width in pixels.
        width: u32,
        /// Bitmap height in pixels.
        height: u32,
    },
}
