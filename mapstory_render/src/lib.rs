// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory Render: turns styled features into imaging operations.
//!
//! This crate sits between the feature model and an
//! [`ImagingBackend`](mapstory_imaging::ImagingBackend):
//! - [`draw_feature`] dispatches one feature and one style to the routine
//!   that draws it: point markers, bitmaps, labels, callouts, lines and
//!   areas, or raster tiles.
//! - [`TileCache`] keeps decoded raster tiles keyed by raster identity,
//!   stamps each with the render pass that last drew it, and sweeps stale
//!   entries.
//! - [`BitmapRegistry`] is a [`SymbolCache`] for bitmaps referenced by
//!   image and symbol styles.
//! - [`Renderer`] walks layers, fetches features, resolves styles and
//!   drives the tile cache's clock.
//!
//! All routines work in screen space through a
//! [`Viewport`](mapstory_view::Viewport).
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use mapstory_feature::{
//!     Feature, FeatureId, Layer, LayerIdAllocator, MemoryProvider, SymbolStyle,
//! };
//! use mapstory_imaging_ref::RefBackend;
//! use mapstory_render::{BitmapRegistry, RenderConfig, Renderer};
//! use mapstory_view::Viewport;
//!
//! let mut ids = LayerIdAllocator::new();
//! let points = MemoryProvider::new(vec![
//!     Feature::new(FeatureId(1), Point::new(0.0, 0.0)).with_style(SymbolStyle::default()),
//! ]);
//! let layers = [Layer::new(ids.allocate(), "points", points)];
//!
//! let viewport = Viewport::new(Point::ORIGIN, 1.0, Size::new(100.0, 100.0));
//! let mut backend = RefBackend::new();
//! let mut renderer = Renderer::new(RenderConfig::default());
//! renderer
//!     .render(&mut backend, &viewport, &layers, &mut BitmapRegistry::new())
//!     .expect("symbols on points are supported");
//! assert_eq!(backend.draws().count(), 2); // fill and outline
//! ```
//!
//! Failures follow one rule: a tile that cannot be decoded or placed is
//! left out of the frame, while a style attached to a geometry nothing can
//! draw is reported as [`RenderError::UnsupportedStyle`].

mod callout;
mod config;
mod decode;
mod dispatch;
mod error;
mod image;
mod label;
mod paint;
mod raster;
mod renderer;
mod symbol;
mod symbol_cache;
mod tile_cache;
mod vector;

pub use config::{RenderConfig, TileCacheConfig};
pub use decode::{BitmapHandle, DecodedImage, decode_into, decode_png};
pub use dispatch::{DrawContext, draw_feature};
pub use error::{DecodeError, RasterDrawError, RenderError};
pub use raster::draw_raster;
pub use renderer::Renderer;
pub use symbol_cache::{BitmapRegistry, SymbolCache};
pub use tile_cache::{TileCache, TileEntry};
