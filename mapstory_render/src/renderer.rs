// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use mapstory_feature::{ChangeType, FetchInfo, Layer};
use mapstory_imaging::ImagingBackend;
use mapstory_view::Viewport;

use crate::{DrawContext, RenderConfig, RenderError, SymbolCache, TileCache, draw_feature};

/// Draws layers of features, one frame per [`render`](Self::render) call.
///
/// The renderer owns the raster tile cache and the render pass counter used
/// as its clock. Like the viewport, it is single-threaded: concurrent passes
/// against one renderer need external synchronization.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
    tile_cache: TileCache,
    iteration: u64,
    change_type: ChangeType,
}

impl Renderer {
    /// Creates a renderer with an empty tile cache.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            tile_cache: TileCache::new(config.tile_cache),
            config,
            iteration: 0,
            change_type: ChangeType::Discrete,
        }
    }

    /// Current settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replaces the settings; the tile cache policy applies from the next sweep.
    pub fn set_config(&mut self, config: RenderConfig) {
        self.tile_cache.set_config(config.tile_cache);
        self.config = config;
    }

    /// Raster tile cache.
    pub fn tile_cache(&self) -> &TileCache {
        &self.tile_cache
    }

    /// Number of completed or in-progress render passes.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Sets the change type reported to providers on the next passes.
    ///
    /// Set [`ChangeType::Continuous`] while a gesture is in progress.
    pub fn set_change_type(&mut self, change_type: ChangeType) {
        self.change_type = change_type;
    }

    /// Draws one frame.
    ///
    /// Layers are drawn in order, skipping disabled layers and layers not
    /// visible at the viewport's resolution. Each layer's provider is asked
    /// for the features in the visible extent. Every feature is drawn with
    /// the layer style (if it resolves) and then its own styles, skipping
    /// styles that are disabled or not visible at the current resolution.
    ///
    /// A raster tile that cannot be drawn is logged and left out of the
    /// frame. After the last layer the tile cache is swept.
    ///
    /// # Errors
    ///
    /// [`RenderError::UnsupportedStyle`] aborts the pass: it means a style is
    /// attached to a geometry no routine can draw.
    pub fn render(
        &mut self,
        backend: &mut dyn ImagingBackend,
        viewport: &Viewport,
        layers: &[Layer],
        symbols: &mut dyn SymbolCache,
    ) -> Result<(), RenderError> {
        self.iteration += 1;
        let resolution = viewport.resolution();
        let extent = viewport.visible_extent();

        let mut ctx = DrawContext {
            layer_opacity: 1.0,
            symbol_size: self.config.symbol_size,
            tile_cache: &mut self.tile_cache,
            iteration: self.iteration,
            symbols,
        };

        for layer in layers.iter().filter(|l| l.is_visible_at(resolution)) {
            let fetch = FetchInfo {
                extent,
                resolution,
                crs: layer.provider.crs().map(Arc::from),
                change_type: self.change_type,
            };
            let features = layer.provider.features(&fetch);
            ctx.layer_opacity = layer.opacity;
            log::trace!(
                "layer {} ({}): {} features",
                layer.id.0,
                layer.name,
                features.len()
            );

            for feature in &features {
                let layer_style = layer.style.as_ref().and_then(|s| s.resolve(feature));
                let styles = layer_style.iter().map(|s| &**s).chain(&feature.styles);
                for style in styles.filter(|s| s.is_visible_at(resolution)) {
                    match draw_feature(backend, viewport, style, feature, &mut ctx) {
                        Ok(()) => {}
                        Err(RenderError::Raster(err)) => {
                            log::error!("skipping raster feature {}: {err}", feature.id.0);
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        self.tile_cache.sweep(self.iteration, backend);
        Ok(())
    }

    /// Destroys every backend image held by the tile cache.
    pub fn release(&mut self, backend: &mut dyn ImagingBackend) {
        self.tile_cache.clear(backend);
    }
}
