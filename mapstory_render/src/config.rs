// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

/// Renderer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Nominal marker size in pixels, before a style's `scale`.
    pub symbol_size: f64,
    /// Raster tile cache policy.
    pub tile_cache: TileCacheConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            symbol_size: 32.0,
            tile_cache: TileCacheConfig::default(),
        }
    }
}

/// Eviction policy of the raster tile cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileCacheConfig {
    /// Entries not drawn within this many render passes are evicted.
    pub max_age_iterations: u64,
    /// Maximum number of decoded tiles kept; least recently drawn go first.
    pub capacity: usize,
}

impl Default for TileCacheConfig {
    fn default() -> Self {
        Self {
            max_age_iterations: 8,
            capacity: 512,
        }
    }
}
