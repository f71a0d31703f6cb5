/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for [`HistoryStorage`], which keeps history logs in a [`KVStore`].

use crate::types::basic::BlockID;

use super::{
    formatter::{HistoryError, HistoryFormatter},
    pluggables::{BlockInfo, HeightInfo, KVStore, WriteBatch},
};

/// Prefix of every key under which a history log is stored.
pub const HISTORY: [u8; 1] = [0];

/// A single record of a history log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub value: Vec<u8>,
    pub block_id: BlockID,
}

/// Stores one history log per key, every value being `value_size` bytes long and every block id
/// `id_size` bytes long.
///
/// Writes go into a caller-provided write batch and are only visible to reads once the batch has been
/// [written](KVStore::write). Callers applying several updates to the same key within one batch must
/// therefore write the batch in between.
pub struct HistoryStorage<K: KVStore, H: HeightInfo, B: BlockInfo> {
    kv_store: K,
    value_size: usize,
    formatter: HistoryFormatter<H, B>,
}

impl<K: KVStore, H: HeightInfo, B: BlockInfo> HistoryStorage<K, H, B> {
    pub fn new(
        kv_store: K,
        value_size: usize,
        id_size: usize,
        height_info: H,
        block_info: B,
    ) -> Result<Self, HistoryError> {
        let formatter = HistoryFormatter::new(value_size + id_size, id_size, height_info, block_info)?;
        Ok(Self {
            kv_store,
            value_size,
            formatter,
        })
    }

    pub fn kv_store(&self) -> &K {
        &self.kv_store
    }

    pub fn kv_store_mut(&mut self) -> &mut K {
        &mut self.kv_store
    }

    /// The raw, unnormalized history log of `key`.
    pub fn history(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.kv_store.get(&history_key(key))
    }

    /// Record that the block `block_id` set `key` to `value`. The key's log is normalized before the
    /// new record is added.
    pub fn add_entry(
        &self,
        wb: &mut K::WriteBatch,
        key: &[u8],
        value: &[u8],
        block_id: &BlockID,
    ) -> Result<(), HistoryError> {
        if value.len() != self.value_size {
            return Err(HistoryError::InvalidValueSize {
                len: value.len(),
                expected: self.value_size,
            });
        }
        let id_bytes = block_id.bytes();
        if id_bytes.len() != self.formatter.id_size() {
            return Err(HistoryError::InvalidSize {
                record_size: self.formatter.record_size(),
                id_size: id_bytes.len(),
            });
        }

        let mut record = Vec::with_capacity(self.formatter.record_size());
        record.extend_from_slice(value);
        record.extend_from_slice(&id_bytes);

        let log = self.formatter.normalize(self.history(key).unwrap_or_default())?;
        let log = self.formatter.add_record(log, &record)?;
        wb.set(&history_key(key), &log);
        Ok(())
    }

    /// The newest entry of `key` produced by a block of the valid chain.
    pub fn latest_entry(&self, key: &[u8]) -> Result<Option<HistoryEntry>, HistoryError> {
        let log = self.formatter.filter(self.history(key).unwrap_or_default())?;
        if log.is_empty() {
            return Ok(None);
        }
        self.entry(self.formatter.latest(&log)?).map(Some)
    }

    /// The newest entry of `key` produced by a valid block at or below `height`.
    pub fn entry_at_height(
        &self,
        key: &[u8],
        height: u64,
    ) -> Result<Option<HistoryEntry>, HistoryError> {
        let log = self.formatter.filter(self.history(key).unwrap_or_default())?;
        for record in log.chunks_exact(self.formatter.record_size()).rev() {
            let entry = self.entry(record)?;
            let block_height = self.formatter.block_height(&entry.block_id)?;
            if block_height <= height {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Normalize the log of `key` after a rollback. A log left without records is deleted.
    pub fn normalize_key(&self, wb: &mut K::WriteBatch, key: &[u8]) -> Result<(), HistoryError> {
        let log = match self.history(key) {
            Some(log) => log,
            None => return Ok(()),
        };
        let normalized = self.formatter.normalize(log)?;
        if normalized.is_empty() {
            wb.delete(&history_key(key));
        } else {
            wb.set(&history_key(key), &normalized);
        }
        Ok(())
    }

    fn entry(&self, record: &[u8]) -> Result<HistoryEntry, HistoryError> {
        Ok(HistoryEntry {
            value: record[..self.value_size].to_vec(),
            block_id: self.formatter.id(record)?,
        })
    }
}

fn history_key(key: &[u8]) -> Vec<u8> {
    let mut history_key = Vec::with_capacity(HISTORY.len() + key.len());
    history_key.extend_from_slice(&HISTORY);
    history_key.extend_from_slice(key);
    history_key
}
