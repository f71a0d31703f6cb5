/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Shareable caches of recently seen [`MicroBlock`]s and [`MicroBlockInv`]s.
//!
//! Both caches are handles: cloning one yields another handle onto the same underlying
//! [`FifoCache`]. Every operation takes the cache's mutex, so the insertion order that eviction
//! depends on is only ever changed by one caller at a time.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{
    basic::BlockID,
    block::{MicroBlock, MicroBlockInv},
};

use super::fifo::FifoCache;

pub const DEFAULT_MICRO_BLOCK_CACHE_CAPACITY: usize = 24;
pub const DEFAULT_INV_CACHE_CAPACITY: usize = 24;

/// Recently received microblocks, keyed by their total id.
#[derive(Clone)]
pub struct MicroBlockCache(Arc<Mutex<FifoCache<BlockID, Arc<MicroBlock>>>>);

impl MicroBlockCache {
    pub fn new(capacity: usize) -> Self {
        Self(Arc::new(Mutex::new(FifoCache::new(capacity))))
    }

    pub fn add(&self, micro: MicroBlock) {
        self.lock().add(micro.total_id, Arc::new(micro));
    }

    pub fn get(&self, total_id: &BlockID) -> Option<Arc<MicroBlock>> {
        self.lock().get(total_id).cloned()
    }

    pub fn exists(&self, total_id: &BlockID) -> bool {
        self.lock().exists(total_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, FifoCache<BlockID, Arc<MicroBlock>>> {
        // A panic while holding the lock cannot leave the cache half-updated, so poisoning is ignored.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Recently received microblock inventory announcements, keyed by the announced total id.
#[derive(Clone)]
pub struct InvCache(Arc<Mutex<FifoCache<BlockID, Arc<MicroBlockInv>>>>);

impl InvCache {
    pub fn new(capacity: usize) -> Self {
        Self(Arc::new(Mutex::new(FifoCache::new(capacity))))
    }

    pub fn add(&self, inv: MicroBlockInv) {
        self.lock().add(inv.total_id, Arc::new(inv));
    }

    pub fn get(&self, total_id: &BlockID) -> Option<Arc<MicroBlockInv>> {
        self.lock().get(total_id).cloned()
    }

    pub fn exists(&self, total_id: &BlockID) -> bool {
        self.lock().exists(total_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, FifoCache<BlockID, Arc<MicroBlockInv>>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
