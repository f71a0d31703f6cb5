/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for [`NgState`] and [`NgCamera`].

use std::{
    fmt::{self, Display, Formatter},
    sync::{mpsc::Sender, Arc, PoisonError, RwLock},
    time::SystemTime,
};

use ed25519_dalek::VerifyingKey;

use crate::{
    cache::{InvCache, MicroBlockCache},
    chain::{Blocks, ChainError, Row},
    events::*,
    networking::{sending::SenderHandle, Message, MicroBlockRequest, Network},
    node::Configuration,
    types::{
        basic::BlockID,
        block::{KeyBlock, MicroBlock, MicroBlockInv},
        keypair::Keypair,
    },
};

use super::inv_requester::InvRequester;

/// The single writer of the tentative chain and the recency caches.
pub struct NgState<N: Network> {
    chain: Arc<RwLock<Blocks>>,
    soft_cap: usize,
    micro_blocks: MicroBlockCache,
    invs: InvCache,
    inv_requester: InvRequester<N>,
    sender: SenderHandle<N>,
    keypair: Option<Keypair>,
    event_publisher: Option<Sender<Event>>,
}

impl<N: Network> NgState<N> {
    /// Create a state with an empty tentative chain. The chain is initialized by the first key
    /// block passed to [`handle_key_block`](Self::handle_key_block) or [`reset`](Self::reset).
    pub fn new(
        configuration: &Configuration,
        network: N,
        event_publisher: Option<Sender<Event>>,
    ) -> Self {
        Self {
            chain: Arc::new(RwLock::new(Blocks::empty_with_soft_cap(
                configuration.shrink_soft_cap,
            ))),
            soft_cap: configuration.shrink_soft_cap,
            micro_blocks: MicroBlockCache::new(configuration.micro_block_cache_capacity),
            invs: InvCache::new(configuration.inv_cache_capacity),
            inv_requester: InvRequester::new(
                network.clone(),
                configuration.inv_requester_capacity,
            ),
            sender: SenderHandle::new(network),
            keypair: configuration.keypair.clone(),
            event_publisher,
        }
    }

    /// Get a read-only handle onto the tentative chain and the caches.
    pub fn camera(&self) -> NgCamera {
        NgCamera {
            chain: Arc::clone(&self.chain),
            micro_blocks: self.micro_blocks.clone(),
            invs: self.invs.clone(),
        }
    }

    /// Dispatch an inbound message to the matching handler.
    pub fn handle_message(&mut self, origin: VerifyingKey, message: Message) -> Result<(), NgError> {
        match message {
            Message::KeyBlock(block) => self.handle_key_block(block).map(|_| ()),
            Message::MicroBlock(micro) => self.handle_micro_block(micro).map(|_| ()),
            Message::MicroBlockInv(inv) => self.handle_inv(origin, inv).map(|_| ()),
            Message::MicroBlockRequest(request) => {
                self.handle_micro_block_request(origin, request);
                Ok(())
            }
        }
    }

    /// Attach a key block to the tentative chain, or initialize the chain with it if there is none
    /// yet. Returns the new current row.
    pub fn handle_key_block(&mut self, block: KeyBlock) -> Result<Row, NgError> {
        if !block.is_correct() {
            return Err(NgError::InvalidSignature { id: block.id });
        }
        let current = self.snapshot();
        if current.contains_id(&block.id) {
            return Err(NgError::AlreadyKnown { id: block.id });
        }

        let (id, parent, height) = (block.id, block.parent, block.height);
        let next = if current.is_empty() {
            Blocks::from_key_block_with_soft_cap(block, self.soft_cap)
        } else {
            self.attach(&current, id, parent, |chain| chain.add_block(block))?
        };

        Event::InsertKeyBlock(InsertKeyBlockEvent {
            timestamp: SystemTime::now(),
            block: id,
            height,
        })
        .publish(&self.event_publisher);
        Ok(self.replace(&current, next))
    }

    /// Attach a microblock to the tentative chain, remember it so that it can be served to peers,
    /// and announce it if this node has a keypair to sign announcements with. Returns the new
    /// current row.
    pub fn handle_micro_block(&mut self, micro: MicroBlock) -> Result<Row, NgError> {
        let current = self.snapshot();
        if current.contains_id(&micro.total_id) {
            return Err(NgError::AlreadyKnown { id: micro.total_id });
        }
        if !micro.is_correct() {
            return Err(NgError::InvalidSignature { id: micro.total_id });
        }
        if current.is_empty() {
            return Err(NgError::NoTentativeChain);
        }

        let (total_id, reference) = (micro.total_id, micro.reference);
        let inv = self.keypair.as_ref().map(|keypair| micro.inv(keypair));
        let cached = micro.clone();
        let next = self.attach(&current, total_id, reference, |chain| chain.add_micro(micro))?;
        self.micro_blocks.add(cached);

        if let Some(inv) = inv {
            self.sender.announce(inv);
        }
        Event::InsertMicroBlock(InsertMicroBlockEvent {
            timestamp: SystemTime::now(),
            total_id,
            reference,
        })
        .publish(&self.event_publisher);
        Ok(self.replace(&current, next))
    }

    /// Remember an inventory announcement and, if the announced microblock is not known yet, request
    /// it from `origin`. Returns whether a request was sent.
    pub fn handle_inv(&mut self, origin: VerifyingKey, inv: MicroBlockInv) -> Result<bool, NgError> {
        if !inv.is_correct() {
            return Err(NgError::InvalidSignature { id: inv.total_id });
        }
        let total_id = inv.total_id;
        self.invs.add(inv.clone());
        if self.snapshot().contains_id(&total_id) || self.micro_blocks.exists(&total_id) {
            return Ok(false);
        }

        let requested = self.inv_requester.request(origin, &inv);
        if requested {
            Event::RequestMicroBlock(RequestMicroBlockEvent {
                timestamp: SystemTime::now(),
                peer: origin,
                total_id,
            })
            .publish(&self.event_publisher);
        }
        Ok(requested)
    }

    /// Answer a peer's request with the cached microblock, if there is one. Returns whether the
    /// microblock was sent.
    pub fn handle_micro_block_request(
        &mut self,
        origin: VerifyingKey,
        request: MicroBlockRequest,
    ) -> bool {
        match self.micro_blocks.get(&request.total_id) {
            Some(micro) => {
                self.sender.serve_micro_block(origin, MicroBlock::clone(&micro));
                Event::ServeMicroBlock(ServeMicroBlockEvent {
                    timestamp: SystemTime::now(),
                    peer: origin,
                    total_id: request.total_id,
                })
                .publish(&self.event_publisher);
                true
            }
            None => false,
        }
    }

    /// Replace the tentative chain with one holding only `block`. Used after a resync, or when
    /// switching to a better competing branch.
    pub fn reset(&mut self, block: KeyBlock) -> Row {
        let id = block.id;
        let next = Blocks::from_key_block_with_soft_cap(block, self.soft_cap);
        let row = next.row();
        *self.chain.write().unwrap_or_else(PoisonError::into_inner) = next;
        Event::ResetChain(ResetChainEvent {
            timestamp: SystemTime::now(),
            block: id,
        })
        .publish(&self.event_publisher);
        row
    }

    pub fn snapshot(&self) -> Blocks {
        self.chain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn attach(
        &self,
        current: &Blocks,
        id: BlockID,
        parent: BlockID,
        add: impl FnOnce(&Blocks) -> Result<Blocks, ChainError>,
    ) -> Result<Blocks, NgError> {
        add(current).map_err(|err| {
            if let ChainError::ParentNotFound { .. } = err {
                Event::RejectOrphan(RejectOrphanEvent {
                    timestamp: SystemTime::now(),
                    id,
                    parent,
                })
                .publish(&self.event_publisher);
            }
            NgError::Chain(err)
        })
    }

    fn replace(&self, current: &Blocks, next: Blocks) -> Row {
        let first_id = |blocks: &Blocks| blocks.iter().next().map(|first| *first.id());
        if let (Some(before), Some(first_block)) = (first_id(current), first_id(&next)) {
            if before != first_block {
                Event::ShrinkChain(ShrinkChainEvent {
                    timestamp: SystemTime::now(),
                    first_block,
                    len: next.len(),
                })
                .publish(&self.event_publisher);
            }
        }
        let row = next.row();
        *self.chain.write().unwrap_or_else(PoisonError::into_inner) = next;
        row
    }
}

/// A read-only handle onto the tentative chain and the recency caches of an [`NgState`].
///
/// Every method takes a fresh snapshot. A [`Blocks`] or [`Row`] obtained from a camera never
/// changes afterwards, even as the state keeps attaching blocks.
#[derive(Clone)]
pub struct NgCamera {
    chain: Arc<RwLock<Blocks>>,
    micro_blocks: MicroBlockCache,
    invs: InvCache,
}

impl NgCamera {
    pub fn snapshot(&self) -> Blocks {
        self.chain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current row, or `None` if there is no tentative chain yet.
    pub fn row(&self) -> Option<Row> {
        let blocks = self.snapshot();
        if blocks.is_empty() {
            None
        } else {
            Some(blocks.row())
        }
    }

    pub fn previous_row(&self) -> Result<Row, ChainError> {
        self.snapshot().previous_row()
    }

    pub fn micro_block(&self, total_id: &BlockID) -> Option<Arc<MicroBlock>> {
        self.micro_blocks.get(total_id)
    }

    pub fn inv(&self, total_id: &BlockID) -> Option<Arc<MicroBlockInv>> {
        self.invs.get(total_id)
    }

    pub fn has_micro_block(&self, total_id: &BlockID) -> bool {
        self.micro_blocks.exists(total_id)
    }

    pub fn has_inv(&self, total_id: &BlockID) -> bool {
        self.invs.exists(total_id)
    }
}

/// Errors returned by the handlers of [`NgState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NgError {
    /// The block or microblock could not be attached to the tentative chain.
    Chain(ChainError),

    /// A microblock arrived before any key block initialized the tentative chain.
    NoTentativeChain,

    /// The signature of the key block, microblock, or announcement named by `id` does not verify.
    InvalidSignature { id: BlockID },

    /// The tentative chain already contains the element named by `id`.
    AlreadyKnown { id: BlockID },
}

impl From<ChainError> for NgError {
    fn from(value: ChainError) -> Self {
        NgError::Chain(value)
    }
}

impl Display for NgError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NgError::Chain(err) => write!(f, "{}", err),
            NgError::NoTentativeChain => write!(f, "no tentative chain to attach to"),
            NgError::InvalidSignature { id } => write!(f, "invalid signature for {}", id),
            NgError::AlreadyKnown { id } => write!(f, "{} is already in the tentative chain", id),
        }
    }
}

impl std::error::Error for NgError {}
