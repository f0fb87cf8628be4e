// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::{LayerStyle, Provider};

/// Identity of a layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Monotonic allocator for [`LayerId`]s.
///
/// Owned by whatever constructs layers (usually an application context), so
/// that ids are deterministic per allocator.
#[derive(Clone, Debug, Default)]
pub struct LayerIdAllocator {
    next: u64,
}

impl LayerIdAllocator {
    /// Creates an allocator whose first id is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn allocate(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next += 1;
        id
    }
}

/// A named group of features drawn together.
pub struct Layer {
    /// Identity.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Disabled layers are skipped.
    pub enabled: bool,
    /// Smallest resolution at which the layer is drawn.
    pub min_visible: f64,
    /// Largest resolution at which the layer is drawn.
    pub max_visible: f64,
    /// Opacity multiplied into every style of the layer.
    pub opacity: f32,
    /// Style applied before each feature's own styles.
    pub style: Option<LayerStyle>,
    /// Source of the layer's features.
    pub provider: Box<dyn Provider>,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("min_visible", &self.min_visible)
            .field("max_visible", &self.max_visible)
            .field("opacity", &self.opacity)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Layer {
    /// Creates an enabled, fully opaque, unstyled layer.
    pub fn new(id: LayerId, name: impl Into<String>, provider: impl Provider + 'static) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            min_visible: 0.0,
            max_visible: f64::INFINITY,
            opacity: 1.0,
            style: None,
            provider: Box::new(provider),
        }
    }

    /// Sets the layer style.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<LayerStyle>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Returns `true` if the layer is enabled and `resolution` lies within
    /// its visibility range.
    pub fn is_visible_at(&self, resolution: f64) -> bool {
        self.enabled && resolution >= self.min_visible && resolution <= self.max_visible
    }
}
