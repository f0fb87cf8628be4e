// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use mapstory_feature::{Feature, FetchInfo, LabelStyle, LayerStyle, Provider, Style};
use mapstory_geom::Envelope;

use crate::{BoxStyle, ClusterConfig, cluster_features, stack_labels};

/// Provider that replaces the features of another provider with stacked
/// labels.
///
/// Every fetch clusters the inner provider's features at the fetch
/// resolution and returns, per cluster, an optional box feature followed
/// by one label feature per member. The extent and CRS are those of the
/// inner provider.
#[derive(Debug)]
pub struct StackedLabelProvider<P> {
    inner: P,
    label_style: LabelStyle,
    visibility: LayerStyle,
    box_style: BoxStyle,
    config: ClusterConfig,
    rotation: f64,
}

impl<P: Provider> StackedLabelProvider<P> {
    /// Wraps `inner`, labelling its features with `label_style`.
    ///
    /// Features are admitted when `label_style` itself is visible at the
    /// fetch resolution; see [`with_visibility_style`](Self::with_visibility_style).
    pub fn new(inner: P, label_style: LabelStyle) -> Self {
        Self {
            inner,
            visibility: LayerStyle::Fixed(Style::Label(label_style.clone())),
            label_style,
            box_style: BoxStyle::default(),
            config: ClusterConfig::default(),
            rotation: 0.0,
        }
    }

    /// Sets the cluster box style.
    #[must_use]
    pub fn with_box_style(mut self, box_style: BoxStyle) -> Self {
        self.box_style = box_style;
        self
    }

    /// Sets the clustering parameters.
    #[must_use]
    pub fn with_config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the style resolved per feature to decide whether it is labelled.
    #[must_use]
    pub fn with_visibility_style(mut self, style: impl Into<LayerStyle>) -> Self {
        self.visibility = style.into();
        self
    }

    /// Sets the map rotation in degrees used to anchor label stacks.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Clustering parameters.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }
}

impl<P: Provider> Provider for StackedLabelProvider<P> {
    fn features(&self, fetch: &FetchInfo) -> Vec<Feature> {
        let clusters = cluster_features(
            self.inner.features(fetch),
            &self.visibility,
            fetch.resolution,
            &self.config,
        );
        log::debug!(
            "stacked {} clusters at resolution {}",
            clusters.len(),
            fetch.resolution
        );
        stack_labels(
            &clusters,
            &self.label_style,
            &self.box_style,
            fetch.resolution,
            self.rotation,
            &self.config,
        )
    }

    fn extent(&self) -> Option<Envelope> {
        self.inner.extent()
    }

    fn crs(&self) -> Option<&str> {
        self.inner.crs()
    }
}
