// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use hashbrown::HashMap;
use mapstory_feature::BitmapId;
use mapstory_imaging::ImagingBackend;

use crate::decode::{BitmapHandle, decode_into};

/// Resolves bitmap ids referenced by image and symbol styles.
pub trait SymbolCache {
    /// Returns a drawable handle for `id`, or `None` if it is unknown or
    /// cannot be decoded.
    fn resolve(&mut self, backend: &mut dyn ImagingBackend, id: BitmapId) -> Option<BitmapHandle>;
}

#[derive(Clone, Debug)]
enum Slot {
    Encoded,
    Ready(BitmapHandle),
    Failed,
}

#[derive(Clone, Debug)]
struct Entry {
    data: Arc<[u8]>,
    slot: Slot,
}

/// In-memory [`SymbolCache`] over encoded PNG bitmaps.
///
/// Bitmaps are decoded into the backend on first use. A bitmap that fails to
/// decode is remembered and never retried.
#[derive(Clone, Debug, Default)]
pub struct BitmapRegistry {
    entries: HashMap<BitmapId, Entry>,
    next_id: u32,
}

impl BitmapRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers encoded PNG bytes and returns their id.
    pub fn register(&mut self, data: impl Into<Arc<[u8]>>) -> BitmapId {
        let id = BitmapId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                data: data.into(),
                slot: Slot::Encoded,
            },
        );
        id
    }

    /// Removes a bitmap, destroying its backend image if it was decoded.
    pub fn unregister(&mut self, backend: &mut dyn ImagingBackend, id: BitmapId) {
        if let Some(Entry {
            slot: Slot::Ready(handle),
            ..
        }) = self.entries.remove(&id)
        {
            backend.destroy_image(handle.image);
        }
    }

    /// Number of registered bitmaps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destroys every decoded backend image; the encoded bytes are kept and
    /// will be decoded again on next use.
    pub fn release(&mut self, backend: &mut dyn ImagingBackend) {
        for entry in self.entries.values_mut() {
            if let Slot::Ready(handle) = entry.slot {
                backend.destroy_image(handle.image);
                entry.slot = Slot::Encoded;
            }
        }
    }
}

impl SymbolCache for BitmapRegistry {
    fn resolve(&mut self, backend: &mut dyn ImagingBackend, id: BitmapId) -> Option<BitmapHandle> {
        let entry = self.entries.get_mut(&id)?;
        match entry.slot {
            Slot::Ready(handle) => Some(handle),
            Slot::Failed => None,
            Slot::Encoded => match decode_into(backend, &entry.data) {
                Ok(handle) => {
                    entry.slot = Slot::Ready(handle);
                    Some(handle)
                }
                Err(err) => {
                    log::warn!("bitmap {} could not be decoded: {err}", id.0);
                    entry.slot = Slot::Failed;
                    None
                }
            },
        }
    }
}
