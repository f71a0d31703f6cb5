//! Traits for the subsystems the history layer depends on: chain height and block validity
//! providers, and the key-value store that persists history logs.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::types::basic::BlockID;

/// Tells the history layer how high the chain is, and how far back it may be rolled back.
pub trait HeightInfo {
    /// Height of the newest block of the currently accepted chain.
    fn height(&self) -> Result<u64, CollaboratorError>;

    fn block_id_to_height(&self, block_id: &BlockID) -> Result<u64, CollaboratorError>;

    /// Maximum number of blocks the chain can be rolled back by. Constant for the lifetime of a node.
    fn rollback_max(&self) -> u64;
}

/// Tells the history layer which blocks are still part of the currently accepted chain.
pub trait BlockInfo {
    /// Whether `block_id` names a block reachable from the currently accepted chain tip.
    fn is_valid_block(&self, block_id: &BlockID) -> Result<bool, CollaboratorError>;
}

impl<T: HeightInfo + ?Sized> HeightInfo for &T {
    fn height(&self) -> Result<u64, CollaboratorError> {
        (**self).height()
    }

    fn block_id_to_height(&self, block_id: &BlockID) -> Result<u64, CollaboratorError> {
        (**self).block_id_to_height(block_id)
    }

    fn rollback_max(&self) -> u64 {
        (**self).rollback_max()
    }
}

impl<T: BlockInfo + ?Sized> BlockInfo for &T {
    fn is_valid_block(&self, block_id: &BlockID) -> Result<bool, CollaboratorError> {
        (**self).is_valid_block(block_id)
    }
}

/// An error produced by an implementation of [`HeightInfo`] or [`BlockInfo`], for example a failed
/// storage read underneath it.
#[derive(Debug)]
pub struct CollaboratorError(Box<dyn Error + Send + Sync>);

impl CollaboratorError {
    pub fn new(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl Display for CollaboratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for CollaboratorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_ref())
    }
}

pub trait KVStore: KVGet + Clone + Send + 'static {
    type WriteBatch: WriteBatch;

    fn write(&mut self, wb: Self::WriteBatch);
}

pub trait KVGet {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
}

pub trait WriteBatch {
    fn new() -> Self;
    fn set(&mut self, key: &[u8], value: &[u8]);
    fn delete(&mut self, key: &[u8]);
}
