// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapstory Label: stacked labels for dense point layers.
//!
//! Points that crowd the same few pixels get one stack of labels instead of
//! overlapping text:
//! - [`cluster_features`] groups features whose centroids fall within a
//!   resolution-scaled distance of an existing group.
//! - [`stack_labels`] turns each group into an outline box (for groups of
//!   two or more) and a column of label features below it.
//! - [`StackedLabelProvider`] wraps any [`Provider`](mapstory_feature::Provider)
//!   and does both on every fetch, so a layer can render the result with
//!   the ordinary renderer.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use mapstory_feature::{
//!     Feature, FeatureId, FetchInfo, Geometry, LabelStyle, MemoryProvider, Provider,
//! };
//! use mapstory_geom::Envelope;
//! use mapstory_label::StackedLabelProvider;
//!
//! let stations = MemoryProvider::new(vec![
//!     Feature::new(FeatureId(1), Point::new(0.0, 0.0)).with_attribute("name", "North"),
//!     Feature::new(FeatureId(2), Point::new(4.0, 3.0)).with_attribute("name", "South"),
//! ]);
//! let labels = StackedLabelProvider::new(stations, LabelStyle::attribute("name"));
//!
//! let out = labels.features(&FetchInfo::new(Envelope::new(-50.0, -50.0, 50.0, 50.0), 1.0));
//! // One box around both stations, then one label per station.
//! assert_eq!(out.len(), 3);
//! assert!(matches!(out[0].geometry, Geometry::Rect(_)));
//! ```
//!
//! The default clustering is a single greedy pass; see [`ClusterMode`] for
//! its order dependence and the iterated alternative.

mod cluster;
mod config;
mod provider;

pub use cluster::{BoxStyle, Cluster, cluster_features, stack_labels};
pub use config::{ClusterConfig, ClusterMode};
pub use provider::StackedLabelProvider;
