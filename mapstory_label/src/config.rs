// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

/// How many clustering passes run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterMode {
    /// One greedy pass in centroid-Y order.
    ///
    /// Earlier assignments are never revisited, so a cluster that grows may
    /// end up within reach of a cluster created before it without the two
    /// being merged. The result depends on input order among equal-Y
    /// features.
    #[default]
    SinglePass,
    /// A greedy pass followed by merging clusters until no cluster's grown
    /// envelope contains another cluster's centroid.
    Iterated,
}

/// Clustering and stacking parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Merge distance in pixels; multiplied by the resolution to get world
    /// units.
    pub merge_factor: f64,
    /// Nominal symbol size in pixels. Half of it pads the cluster box and
    /// separates the first label from the box.
    pub symbol_size: f64,
    /// Height of one stacked label line in pixels.
    pub text_height: f64,
    /// Number of clustering passes.
    pub mode: ClusterMode,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            merge_factor: 50.0,
            symbol_size: 32.0,
            text_height: 18.0,
            mode: ClusterMode::SinglePass,
        }
    }
}

impl ClusterConfig {
    /// Merge distance in world units at `resolution`.
    pub fn merge_distance(&self, resolution: f64) -> f64 {
        resolution * self.merge_factor
    }

    /// Padding around the cluster box in pixels.
    pub fn box_margin(&self) -> f64 {
        self.symbol_size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClusterConfig::default();
        assert_eq!(config.merge_distance(2.0), 100.0);
        assert_eq!(config.box_margin(), 16.0);
        assert_eq!(config.mode, ClusterMode::SinglePass);
    }

    #[test]
    fn loads_partial_json() {
        let config: ClusterConfig =
            serde_json::from_str(r#"{ "mode": "iterated", "text_height": 20.0 }"#)
                .expect("valid json");
        assert_eq!(config.mode, ClusterMode::Iterated);
        assert_eq!(config.text_height, 20.0);
        assert_eq!(config.merge_factor, 50.0);
    }
}
