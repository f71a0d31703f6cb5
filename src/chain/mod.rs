/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The tentative chain: the node's current belief about the unconfirmed tail of the blockchain.
//!
//! Under continuous block generation, the generator of a slot first produces a [key block](KeyBlock)
//! and then, until the next slot, keeps streaming [microblocks](MicroBlock) that extend it. The tail of
//! the chain that is still subject to change is therefore a sequence shaped like:
//!
//! ```text
//! K1, m1, m2, K2, m3, K3, m4, m5, m6
//! ```
//!
//! Where every element after the first extends (names as its parent or reference) some earlier
//! element. A key block together with the microblocks that currently extend it is called a [`Row`].
//!
//! ## Snapshots
//!
//! [`Blocks`] is an immutable value. Attaching a key block or a microblock never changes the `Blocks`
//! it is called on; instead, a new `Blocks` is built from the retained prefix plus the new element.
//! Readers (for example, handlers serving peer requests) can therefore hold on to a `Blocks` or a
//! `Row` taken from it for as long as they like without any locking, and will never observe it
//! change underneath them.
//!
//! ## Bounding growth
//!
//! After every successful attach, the new sequence is [shrunk](Blocks::shrink): if it is longer than
//! its soft cap, its oldest row is dropped, unless that would leave fewer than two rows. Since every
//! attach adds a single element, dropping one row per attach is enough to keep the sequence near the
//! cap.
//!
//! [`KeyBlock`]: crate::types::block::KeyBlock
//! [`MicroBlock`]: crate::types::block::MicroBlock

pub mod sequence;
pub use sequence::{Blocks, BlocksElement, ChainError, Row, DEFAULT_SHRINK_SOFT_CAP};
