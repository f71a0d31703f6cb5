/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Handling of the messages specific to continuous block generation.
//!
//! [`NgState`] is the single writer of the node's [tentative chain](crate::chain) and of its
//! [recency caches](crate::cache). It takes inbound key blocks, microblocks, microblock inventory
//! announcements and microblock requests, and turns each into an update of the tentative chain, a
//! cache lookup, or a message to a peer. Any number of readers can observe the result concurrently
//! through an [`NgCamera`].
//!
//! [`InvRequester`] makes sure that a microblock announced by many peers (the common case under gossip
//! fan-out) is requested only once.

pub mod inv_requester;
pub use inv_requester::{InvRequester, DEFAULT_INV_REQUESTER_CAPACITY};

pub mod state;
pub use state::{NgCamera, NgError, NgState};
