/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Historized state: per-key logs of values tagged by the block that produced them.
//!
//! Every piece of per-key blockchain state (the balance of an account, the target of an alias, ...)
//! is stored as a *history log*: a byte buffer made of fixed-size records laid out contiguously, each
//! record being a value followed by the id of the block that produced it:
//!
//! ```text
//! | value_1 | block_id_1 | value_2 | block_id_2 | ... | value_n | block_id_n |
//! ```
//!
//! The [`HistoryFormatter`] maintains three properties of these logs:
//! 1. **Same-block writes overwrite**: writing a key twice while applying the same block leaves a
//!    single record for that block.
//! 2. **Abandoned forks can be dropped**: [`filter`](HistoryFormatter::filter) trims the trailing
//!    records produced by blocks that are no longer part of the valid chain.
//! 3. **Bounded length**: [`cut`](HistoryFormatter::cut) drops records older than the maximum
//!    rollback depth, so a log never grows with the total height of the chain.
//!
//! [`HistoryStorage`] applies the formatter to logs kept in a pluggable [key-value store](KVStore).
//!
//! ## Consistency
//!
//! The formatter does not lock or snapshot anything. Its answers are only as consistent as those of
//! the [`HeightInfo`] and [`BlockInfo`] it is given, so callers must invoke
//! [`normalize`](HistoryFormatter::normalize) under the same consistency boundary as the storage read
//! and write it accompanies.

pub mod pluggables;
pub use pluggables::{BlockInfo, CollaboratorError, HeightInfo, KVGet, KVStore, WriteBatch};

pub mod formatter;
pub use formatter::{HistoryError, HistoryFormatter};

pub mod storage;
pub use storage::{HistoryEntry, HistoryStorage};
