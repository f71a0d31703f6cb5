/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! A node-side implementation of the data structures at the heart of continuous block generation
//! ("NG"), where full key blocks are produced once per protocol slot and, between slots, the slot's
//! generator keeps streaming small microblocks that extend the latest key block.
//!
//! The crate provides:
//! 1. The [tentative chain](chain): an immutable, fork-checked sequence of the most recent key blocks
//!    and microblocks, from which the current and previous [rows](chain::Row) are derived.
//! 2. [Recency caches](cache) of microblocks and microblock inventory announcements, used to answer
//!    peer requests without retaining unbounded history.
//! 3. The [NG message handling](ng) that ties the two together and de-duplicates microblock requests.
//! 4. [Historized state](history): per-key logs of values tagged by the block that produced them,
//!    which can be rolled back when the chain switches to a competing branch, and whose length is
//!    bounded by the maximum rollback depth.
//! 5. A [node](node) that runs the NG message handling against a pluggable [network](networking).

pub mod types;

pub mod chain;

pub mod cache;

pub mod networking;

pub mod ng;

pub mod history;

pub mod node;

pub mod events;

pub mod logging;

pub(crate) mod event_bus;
