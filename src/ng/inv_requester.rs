/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for the [`InvRequester`].

use ed25519_dalek::VerifyingKey;

use crate::{
    cache::FifoCache,
    networking::{sending::SenderHandle, Network},
    types::{basic::BlockID, block::MicroBlockInv},
};

pub const DEFAULT_INV_REQUESTER_CAPACITY: usize = 16;

/// Requests announced microblocks from the peers that announced them, at most once per microblock.
///
/// Only the most recent `capacity` requested ids are remembered. An id that has been evicted may be
/// requested again, which costs a duplicate response but never leads to incorrect behavior.
pub struct InvRequester<N: Network> {
    requested: FifoCache<BlockID, ()>,
    sender: SenderHandle<N>,
}

impl<N: Network> InvRequester<N> {
    pub fn new(network: N, capacity: usize) -> Self {
        Self {
            requested: FifoCache::new(capacity),
            sender: SenderHandle::new(network),
        }
    }

    /// Ask `sender` for the microblock announced in `inv`, unless it has already been requested.
    /// Returns whether a request was sent.
    pub fn request(&mut self, sender: VerifyingKey, inv: &MicroBlockInv) -> bool {
        if self.requested.exists(&inv.total_id) {
            return false;
        }
        self.requested.add(inv.total_id, ());
        self.sender.request_micro_block(sender, inv.total_id);
        true
    }
}
