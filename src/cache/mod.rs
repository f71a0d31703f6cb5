/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Bounded caches of recently broadcast objects.
//!
//! These caches exist so that the node can answer "send me microblock X" requests from peers, and
//! recognize inventory announcements it has already seen, without keeping every microblock it has
//! ever received. Entries are evicted strictly in insertion order: reading an entry never extends
//! its lifetime, since what matters is how recently it was broadcast, not how recently it was used.

pub mod fifo;
pub use fifo::FifoCache;

pub mod recency;
pub use recency::{InvCache, MicroBlockCache};
