// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory Feature: the data model handed to the map renderer.
//!
//! This crate provides:
//! - [`Geometry`] and [`Feature`]: identity-bearing geometries with ordered
//!   styles and named attributes.
//! - [`Style`]: the closed set of style variants (vector, symbol, image,
//!   label, callout), each carrying [`StyleCommon`] visibility and opacity.
//! - [`ThemeStyle`] and [`LayerStyle`]: per-layer styles, fixed or computed
//!   per feature.
//! - [`Provider`] and [`FetchInfo`]: the synchronous pull interface through
//!   which layers obtain features, with [`MemoryProvider`] as an in-memory
//!   implementation.
//! - [`Layer`] and [`LayerIdAllocator`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use mapstory_feature::{
//!     Feature, FeatureId, FetchInfo, LabelStyle, Layer, LayerIdAllocator, MemoryProvider,
//!     Provider, SymbolStyle,
//! };
//! use mapstory_geom::Envelope;
//!
//! let harbor = Feature::new(FeatureId(1), Point::new(10.0, 20.0))
//!     .with_attribute("name", "Harbor")
//!     .with_style(SymbolStyle::default())
//!     .with_style(LabelStyle::attribute("name"));
//!
//! let mut ids = LayerIdAllocator::new();
//! let layer = Layer::new(ids.allocate(), "poi", MemoryProvider::new(vec![harbor]));
//!
//! let fetch = FetchInfo::new(Envelope::new(0.0, 0.0, 50.0, 50.0), 1.0);
//! assert_eq!(layer.provider.features(&fetch).len(), 1);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod callout_style;
mod feature;
mod geometry;
mod label_style;
mod layer;
mod provider;
pub mod style;
mod theme;

pub use callout_style::{ArrowAlignment, CalloutStyle};
pub use feature::{AttributeValue, Feature, FeatureId};
pub use geometry::{Geometry, GeometryKind, Polygon, Raster, RasterId};
pub use label_style::{
    HorizontalAlignment, LabelStyle, LabelText, LineBreakMode, VerticalAlignment,
};
pub use layer::{Layer, LayerId, LayerIdAllocator};
pub use provider::{ChangeType, FetchInfo, MemoryProvider, Provider};
pub use style::{
    BitmapId, ImageStyle, Pen, Style, StyleCommon, StyleKind, SymbolStyle, SymbolType, VectorStyle,
};
pub use theme::{LayerStyle, ThemeStyle};
