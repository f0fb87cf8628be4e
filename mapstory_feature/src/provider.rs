// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;

use mapstory_geom::Envelope;

use crate::Feature;

/// How the view changed since the previous fetch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChangeType {
    /// A gesture is in progress; providers may return cheaper results.
    Continuous,
    /// The view settled.
    #[default]
    Discrete,
}

/// Parameters of a feature request.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchInfo {
    /// World extent to fetch.
    pub extent: Envelope,
    /// Resolution of the view, in world units per pixel.
    pub resolution: f64,
    /// Coordinate reference system of `extent`, if known.
    pub crs: Option<Arc<str>>,
    /// Kind of view change that triggered the fetch.
    pub change_type: ChangeType,
}

impl FetchInfo {
    /// Discrete fetch without a CRS.
    pub fn new(extent: Envelope, resolution: f64) -> Self {
        Self {
            extent,
            resolution,
            crs: None,
            change_type: ChangeType::Discrete,
        }
    }
}

/// Synchronous source of features.
///
/// Asynchronous producers are expected to materialize their features before
/// a render pass pulls them.
pub trait Provider {
    /// Features relevant to `fetch`.
    fn features(&self, fetch: &FetchInfo) -> Vec<Feature>;

    /// Extent of all features, if known.
    fn extent(&self) -> Option<Envelope>;

    /// Coordinate reference system of the features.
    fn crs(&self) -> Option<&str> {
        None
    }
}

/// Provider over an in-memory feature list.
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    features: Vec<Feature>,
    crs: Option<Arc<str>>,
}

impl MemoryProvider {
    /// Creates a provider over `features`.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            crs: None,
        }
    }

    /// Sets the coordinate reference system.
    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<Arc<str>>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    /// All features, in insertion order.
    pub fn all(&self) -> &[Feature] {
        &self.features
    }

    /// Appends a feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }
}

impl Provider for MemoryProvider {
    fn features(&self, fetch: &FetchInfo) -> Vec<Feature> {
        self.features
            .iter()
            .filter(|f| f.envelope().is_some_and(|e| e.intersects(&fetch.extent)))
            .cloned()
            .collect()
    }

    fn extent(&self) -> Option<Envelope> {
        self.features
            .iter()
            .filter_map(Feature::envelope)
            .reduce(|a, b| a.join(&b))
    }

    fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }
}
