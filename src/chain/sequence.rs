/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [`Blocks`] sequence and the [`Row`] view derived from it.

use std::{
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use crate::types::{
    basic::BlockID,
    block::{KeyBlock, MicroBlock},
};

/// Length above which [`Blocks::shrink`] starts dropping rows from the front of the sequence.
pub const DEFAULT_SHRINK_SOFT_CAP: usize = 100;

/// A single element of the tentative chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlocksElement {
    KeyBlock(Arc<KeyBlock>),
    MicroBlock(Arc<MicroBlock>),
}

impl BlocksElement {
    /// The id other blocks use to extend this element: a key block's own id, or a microblock's
    /// total id.
    pub fn id(&self) -> &BlockID {
        match self {
            BlocksElement::KeyBlock(block) => &block.id,
            BlocksElement::MicroBlock(micro) => &micro.total_id,
        }
    }

    pub fn is_key_block(&self) -> bool {
        matches!(self, BlocksElement::KeyBlock(_))
    }
}

/// A key block paired with the ordered microblocks that currently extend it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub key_block: Arc<KeyBlock>,
    pub micro_blocks: Vec<Arc<MicroBlock>>,
}

impl Row {
    /// Id of the newest element in the row: the last microblock's total id, or the key block's id
    /// if no microblock extends it yet.
    pub fn last_id(&self) -> &BlockID {
        match self.micro_blocks.last() {
            Some(micro) => &micro.total_id,
            None => &self.key_block.id,
        }
    }
}

/// An immutable, fork-checked sequence of key blocks and microblocks. See the
/// [module-level docs](crate::chain) for the shape of the sequence and why it is immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blocks {
    elements: Arc<[BlocksElement]>,
    soft_cap: usize,
}

impl Blocks {
    /// Create a sequence that holds only `block`.
    pub fn from_key_block(block: KeyBlock) -> Blocks {
        Self::from_key_block_with_soft_cap(block, DEFAULT_SHRINK_SOFT_CAP)
    }

    pub fn from_key_block_with_soft_cap(block: KeyBlock, soft_cap: usize) -> Blocks {
        Blocks {
            elements: Arc::from(vec![BlocksElement::KeyBlock(Arc::new(block))]),
            soft_cap,
        }
    }

    /// A sequence that holds nothing, modelling a node that has no tentative chain yet.
    pub fn empty() -> Blocks {
        Self::empty_with_soft_cap(DEFAULT_SHRINK_SOFT_CAP)
    }

    pub fn empty_with_soft_cap(soft_cap: usize) -> Blocks {
        Blocks {
            elements: Arc::from(Vec::new()),
            soft_cap,
        }
    }

    /// Attach `block` after the newest element whose id equals `block.parent`, discarding every
    /// element after that one.
    ///
    /// # Panics
    ///
    /// If `self` is empty. Key blocks may only be attached to an initialized sequence.
    pub fn add_block(&self, block: KeyBlock) -> Result<Blocks, ChainError> {
        assert!(
            !self.elements.is_empty(),
            "add_block called on an empty tentative chain"
        );
        let parent_position = self
            .position(&block.parent)
            .ok_or(ChainError::ParentNotFound {
                parent: block.parent,
            })?;
        Ok(self
            .extend_at(parent_position, BlocksElement::KeyBlock(Arc::new(block)))
            .shrink())
    }

    /// Attach `micro` after the newest element whose id equals `micro.reference`, discarding every
    /// element after that one. Attaching to an empty sequence yields an empty sequence.
    pub fn add_micro(&self, micro: MicroBlock) -> Result<Blocks, ChainError> {
        if self.elements.is_empty() {
            return Ok(Self::empty_with_soft_cap(self.soft_cap));
        }
        let reference_position =
            self.position(&micro.reference)
                .ok_or(ChainError::ParentNotFound {
                    parent: micro.reference,
                })?;
        Ok(self
            .extend_at(reference_position, BlocksElement::MicroBlock(Arc::new(micro)))
            .shrink())
    }

    /// Whether any element of the sequence is named by `id`.
    pub fn contains_id(&self, id: &BlockID) -> bool {
        self.elements.iter().any(|element| element.id() == id)
    }

    /// The newest key block and every microblock after it.
    ///
    /// # Panics
    ///
    /// If the sequence holds no key block, which can only be the case for an [empty](Self::empty)
    /// sequence.
    pub fn row(&self) -> Row {
        let last_key = match self.key_block_positions().last() {
            Some(position) => *position,
            None => panic!("row called on a tentative chain without key blocks"),
        };
        self.row_at(last_key, self.elements.len())
    }

    /// The key block before the newest one, together with the microblocks between the two.
    pub fn previous_row(&self) -> Result<Row, ChainError> {
        let positions = self.key_block_positions();
        match positions.as_slice() {
            [.., previous, last] => Ok(self.row_at(*previous, *last)),
            _ => Err(ChainError::NoPreviousRow),
        }
    }

    /// If the sequence is longer than its soft cap, drop its oldest row, so that it starts at its
    /// second key block. The current and the previous row are never dropped.
    pub fn shrink(&self) -> Blocks {
        if self.elements.len() <= self.soft_cap {
            return self.clone();
        }
        let positions = self.key_block_positions();
        if positions.len() < 3 {
            return self.clone();
        }
        Blocks {
            elements: Arc::from(&self.elements[positions[1]..]),
            soft_cap: self.soft_cap,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn soft_cap(&self) -> usize {
        self.soft_cap
    }

    /// The same sequence, shrunk against `soft_cap` from now on.
    pub fn with_soft_cap(&self, soft_cap: usize) -> Blocks {
        Blocks {
            elements: Arc::clone(&self.elements),
            soft_cap,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlocksElement> {
        self.elements.iter()
    }

    /// Id of the newest element, if any.
    pub fn last_id(&self) -> Option<&BlockID> {
        self.elements.last().map(BlocksElement::id)
    }

    fn position(&self, id: &BlockID) -> Option<usize> {
        self.elements.iter().rposition(|element| element.id() == id)
    }

    fn key_block_positions(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.is_key_block())
            .map(|(position, _)| position)
            .collect()
    }

    fn extend_at(&self, position: usize, element: BlocksElement) -> Blocks {
        let mut elements = Vec::with_capacity(position + 2);
        elements.extend_from_slice(&self.elements[..=position]);
        elements.push(element);
        Blocks {
            elements: Arc::from(elements),
            soft_cap: self.soft_cap,
        }
    }

    fn row_at(&self, key_position: usize, end: usize) -> Row {
        let key_block = match &self.elements[key_position] {
            BlocksElement::KeyBlock(block) => Arc::clone(block),
            BlocksElement::MicroBlock(_) => unreachable!("row must start at a key block"),
        };
        let micro_blocks = self.elements[key_position + 1..end]
            .iter()
            .filter_map(|element| match element {
                BlocksElement::MicroBlock(micro) => Some(Arc::clone(micro)),
                BlocksElement::KeyBlock(_) => None,
            })
            .collect();
        Row {
            key_block,
            micro_blocks,
        }
    }
}

/// Errors returned when attaching to or reading from a [`Blocks`] sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The block extends an element this node does not know, or has already dropped. The block is
    /// an orphan and should be queued or discarded by the caller.
    ParentNotFound { parent: BlockID },

    /// The sequence holds a single key block, so there is no row before the current one yet.
    NoPreviousRow,
}

impl Display for ChainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::ParentNotFound { parent } => {
                write!(f, "parent {} not found in the tentative chain", parent)
            }
            ChainError::NoPreviousRow => write!(f, "tentative chain has no previous row"),
        }
    }
}

impl std::error::Error for ChainError {}
