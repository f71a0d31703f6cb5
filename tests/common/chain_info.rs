//! Stub [`HeightInfo`] and [`BlockInfo`] providers over a fixed picture of the chain.

use std::collections::{HashMap, HashSet};

use ng_rs::{
    history::{BlockInfo, CollaboratorError, HeightInfo},
    types::basic::BlockID,
};

pub(crate) struct ChainInfoStub {
    pub(crate) height: u64,
    pub(crate) rollback_max: u64,
    heights: HashMap<BlockID, u64>,
    invalid: HashSet<BlockID>,
    failing: bool,
}

impl ChainInfoStub {
    pub(crate) fn new(height: u64, rollback_max: u64) -> Self {
        Self {
            height,
            rollback_max,
            heights: HashMap::new(),
            invalid: HashSet::new(),
            failing: false,
        }
    }

    /// Make `block_id` a valid block at `height`.
    pub(crate) fn with_block(mut self, block_id: BlockID, height: u64) -> Self {
        self.heights.insert(block_id, height);
        self
    }

    /// Mark `block_id` as belonging to an abandoned fork.
    pub(crate) fn invalidate(&mut self, block_id: BlockID) {
        self.invalid.insert(block_id);
    }

    /// Make every call fail, as if the storage underneath was unreadable.
    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl HeightInfo for ChainInfoStub {
    fn height(&self) -> Result<u64, CollaboratorError> {
        if self.failing {
            return Err(CollaboratorError::new("height unavailable"));
        }
        Ok(self.height)
    }

    fn block_id_to_height(&self, block_id: &BlockID) -> Result<u64, CollaboratorError> {
        if self.failing {
            return Err(CollaboratorError::new("block height unavailable"));
        }
        self.heights
            .get(block_id)
            .copied()
            .ok_or_else(|| CollaboratorError::new(format!("unknown block {}", block_id)))
    }

    fn rollback_max(&self) -> u64 {
        self.rollback_max
    }
}

impl BlockInfo for ChainInfoStub {
    fn is_valid_block(&self, block_id: &BlockID) -> Result<bool, CollaboratorError> {
        if self.failing {
            return Err(CollaboratorError::new("block validity unavailable"));
        }
        Ok(self.heights.contains_key(block_id) && !self.invalid.contains(block_id))
    }
}
