/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of the events emitted by a running [node](crate::node).
//!
//! An event for a given action indicates that the action has been completed. Events are published
//! by the [`NgState`](crate::ng::NgState) onto a channel and consumed by the event bus thread, which
//! passes them to the default [loggers](crate::logging) and to any user-registered handlers.

use ed25519_dalek::VerifyingKey;
use std::{sync::mpsc::Sender, time::SystemTime};

use crate::types::basic::{BlockHeight, BlockID};

pub enum Event {
    // Events that change the tentative chain.
    InsertKeyBlock(InsertKeyBlockEvent),
    InsertMicroBlock(InsertMicroBlockEvent),
    ShrinkChain(ShrinkChainEvent),
    ResetChain(ResetChainEvent),
    RejectOrphan(RejectOrphanEvent),
    // Events that involve sending a message to a peer.
    RequestMicroBlock(RequestMicroBlockEvent),
    ServeMicroBlock(ServeMicroBlockEvent),
}

impl Event {
    pub(crate) fn publish(self, event_publisher: &Option<Sender<Event>>) {
        if let Some(event_publisher) = event_publisher {
            // The event bus may already be shut down while the node is being dropped.
            let _ = event_publisher.send(self);
        }
    }
}

pub struct InsertKeyBlockEvent {
    pub timestamp: SystemTime,
    pub block: BlockID,
    pub height: BlockHeight,
}

pub struct InsertMicroBlockEvent {
    pub timestamp: SystemTime,
    pub total_id: BlockID,
    pub reference: BlockID,
}

/// Rows were dropped from the front of the tentative chain.
pub struct ShrinkChainEvent {
    pub timestamp: SystemTime,
    pub first_block: BlockID,
    pub len: usize,
}

/// The tentative chain was replaced by one holding only `block`.
pub struct ResetChainEvent {
    pub timestamp: SystemTime,
    pub block: BlockID,
}

pub struct RejectOrphanEvent {
    pub timestamp: SystemTime,
    pub id: BlockID,
    pub parent: BlockID,
}

pub struct RequestMicroBlockEvent {
    pub timestamp: SystemTime,
    pub peer: VerifyingKey,
    pub total_id: BlockID,
}

pub struct ServeMicroBlockEvent {
    pub timestamp: SystemTime,
    pub peer: VerifyingKey,
    pub total_id: BlockID,
}
