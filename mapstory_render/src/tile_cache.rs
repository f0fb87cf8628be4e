// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use mapstory_feature::{Raster, RasterId};
use mapstory_imaging::ImagingBackend;

use crate::TileCacheConfig;
use crate::decode::{BitmapHandle, decode_into};

/// Cached state for one raster identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileEntry {
    /// Decoded bitmap; `None` records a decode failure.
    pub bitmap: Option<BitmapHandle>,
    /// Render pass in which the entry was last drawn; `None` if never drawn.
    pub iteration_used: Option<u64>,
}

/// Decoded raster tiles keyed by raster identity.
///
/// The cache owns the recency marker of every entry and the eviction sweep.
/// Decode failures are cached as permanent misses: they are never swept, so
/// a raster that failed once is not decoded again for the cache's lifetime.
#[derive(Debug, Default)]
pub struct TileCache {
    config: TileCacheConfig,
    entries: HashMap<RasterId, TileEntry>,
}

impl TileCache {
    /// Creates an empty cache with the given policy.
    pub fn new(config: TileCacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Eviction policy.
    pub fn config(&self) -> TileCacheConfig {
        self.config
    }

    /// Replaces the eviction policy; takes effect on the next sweep.
    pub fn set_config(&mut self, config: TileCacheConfig) {
        self.config = config;
    }

    /// Returns the entry for `id`, if present.
    pub fn get(&self, id: RasterId) -> Option<&TileEntry> {
        self.entries.get(&id)
    }

    /// Returns `true` if `id` has an entry (decoded or failed).
    pub fn contains(&self, id: RasterId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Render pass in which `id` was last drawn.
    pub fn iteration_used(&self, id: RasterId) -> Option<u64> {
        self.entries.get(&id).and_then(|e| e.iteration_used)
    }

    /// Number of entries, including decode failures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for `raster`, decoding and inserting it on a miss.
    ///
    /// A decode failure is logged once and cached as an entry without bitmap.
    pub fn get_or_decode(
        &mut self,
        backend: &mut dyn ImagingBackend,
        raster: &Raster,
    ) -> &mut TileEntry {
        self.entries.entry(raster.id).or_insert_with(|| {
            let bitmap = match decode_into(backend, &raster.data) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    log::warn!("raster {} could not be decoded: {err}", raster.id.0);
                    None
                }
            };
            TileEntry {
                bitmap,
                iteration_used: None,
            }
        })
    }

    /// Stamps `id` as drawn in `iteration`.
    pub fn touch(&mut self, id: RasterId, iteration: u64) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.iteration_used = Some(iteration);
        }
    }

    /// Evicts stale entries and destroys their backend images.
    ///
    /// Entries not drawn within `max_age_iterations` of `current_iteration`
    /// go first; then, if more than `capacity` decoded tiles remain, the least
    /// recently drawn are evicted. Returns the number of evicted entries.
    pub fn sweep(&mut self, current_iteration: u64, backend: &mut dyn ImagingBackend) -> usize {
        let max_age = self.config.max_age_iterations;
        let mut evict: Vec<RasterId> = self
            .entries
            .iter()
            .filter(|(_, e)| {
                e.bitmap.is_some()
                    && current_iteration.saturating_sub(e.iteration_used.unwrap_or(0)) > max_age
            })
            .map(|(id, _)| *id)
            .collect();

        let decoded = self.entries.values().filter(|e| e.bitmap.is_some()).count();
        let remaining = decoded - evict.len();
        if remaining > self.config.capacity {
            let mut live: Vec<(Option<u64>, RasterId)> = self
                .entries
                .iter()
                .filter(|(id, e)| e.bitmap.is_some() && !evict.contains(*id))
                .map(|(id, e)| (e.iteration_used, *id))
                .collect();
            live.sort_unstable();
            evict.extend(
                live.into_iter()
                    .take(remaining - self.config.capacity)
                    .map(|(_, id)| id),
            );
        }

        for id in &evict {
            if let Some(TileEntry {
                bitmap: Some(handle),
                ..
            }) = self.entries.remove(id)
            {
                backend.destroy_image(handle.image);
            }
        }
        if !evict.is_empty() {
            log::debug!(
                "tile cache sweep at iteration {current_iteration}: evicted {}, kept {}",
                evict.len(),
                self.entries.len()
            );
        }
        evict.len()
    }

    /// Removes every entry, destroying decoded images.
    pub fn clear(&mut self, backend: &mut dyn ImagingBackend) {
        for (_, entry) in self.entries.drain() {
            if let Some(handle) = entry.bitmap {
                backend.destroy_image(handle.image);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mapstory_geom::Envelope;
    use mapstory_imaging_ref::RefBackend;

    use super::*;
    use crate::decode::test_png::solid;

    fn raster(id: u64) -> Raster {
        Raster::new(
            RasterId(id),
            solid(2, 2, [0, 0, 255, 255]),
            Envelope::new(0.0, 0.0, 1.0, 1.0),
        )
    }

    #[test]
    fn miss_decodes_and_hit_reuses() {
        let mut backend = RefBackend::new();
        let mut cache = TileCache::default();
        let r = raster(1);

        let first = *cache.get_or_decode(&mut backend, &r);
        let second = *cache.get_or_decode(&mut backend, &r);
        assert!(first.bitmap.is_some());
        assert_eq!(first, second);
        assert_eq!(backend.live_image_count(), 1);
        assert_eq!(cache.iteration_used(r.id), None);
    }

    #[test]
    fn failure_is_cached_and_never_swept() {
        let mut backend = RefBackend::new();
        let mut cache = TileCache::new(TileCacheConfig {
            max_age_iterations: 0,
            capacity: 0,
        });
        let bad = Raster::new(RasterId(9), b"xx".to_vec(), Envelope::new(0.0, 0.0, 1.0, 1.0));
        assert!(cache.get_or_decode(&mut backend, &bad).bitmap.is_none());
        assert_eq!(cache.sweep(100, &mut backend), 0);
        assert!(cache.contains(bad.id));
    }

    #[test]
    fn sweep_evicts_by_age() {
        let mut backend = RefBackend::new();
        let mut cache = TileCache::new(TileCacheConfig {
            max_age_iterations: 2,
            capacity: 100,
        });
        for id in 1..=3 {
            cache.get_or_decode(&mut backend, &raster(id));
        }
        cache.touch(RasterId(1), 1);
        cache.touch(RasterId(2), 4);
        cache.touch(RasterId(3), 5);

        assert_eq!(cache.sweep(5, &mut backend), 1);
        assert!(!cache.contains(RasterId(1)));
        assert!(cache.contains(RasterId(2)));
        assert_eq!(backend.live_image_count(), 2);
    }

    #[test]
    fn sweep_enforces_capacity_lru() {
        let mut backend = RefBackend::new();
        let mut cache = TileCache::new(TileCacheConfig {
            max_age_iterations: 100,
            capacity: 2,
        });
        for id in 1..=4 {
            cache.get_or_decode(&mut backend, &raster(id));
            cache.touch(RasterId(id), id);
        }

        assert_eq!(cache.sweep(4, &mut backend), 2);
        assert!(!cache.contains(RasterId(1)));
        assert!(!cache.contains(RasterId(2)));
        assert!(cache.contains(RasterId(3)));
        assert!(cache.contains(RasterId(4)));
        assert_eq!(backend.live_image_count(), 2);
    }

    #[test]
    fn clear_destroys_everything() {
        let mut backend = RefBackend::new();
        let mut cache = TileCache::default();
        cache.get_or_decode(&mut backend, &raster(1));
        cache.clear(&mut backend);
        assert!(cache.is_empty());
        assert_eq!(backend.live_image_count(), 0);
    }
}
