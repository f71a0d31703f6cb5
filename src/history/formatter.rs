/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for the [`HistoryFormatter`].

use std::fmt::{self, Display, Formatter};

use crate::types::basic::{BlockID, BlockIDError};

use super::pluggables::{BlockInfo, CollaboratorError, HeightInfo};

/// Reads and rewrites history logs made of `record_size`-byte records, the last `id_size` bytes of
/// each being the id of the block that produced the record.
///
/// The formatter itself is stateless: every method is a function of its two sizes, the state of its
/// [`HeightInfo`] and [`BlockInfo`], and the log it is given.
pub struct HistoryFormatter<H: HeightInfo, B: BlockInfo> {
    record_size: usize,
    id_size: usize,
    height_info: H,
    block_info: B,
}

impl<H: HeightInfo, B: BlockInfo> HistoryFormatter<H, B> {
    pub fn new(
        record_size: usize,
        id_size: usize,
        height_info: H,
        block_info: B,
    ) -> Result<Self, HistoryError> {
        let id_size_supported = matches!(id_size, BlockID::DIGEST_SIZE | BlockID::SIGNATURE_SIZE);
        if !id_size_supported || id_size > record_size {
            return Err(HistoryError::InvalidSize {
                record_size,
                id_size,
            });
        }
        Ok(Self {
            record_size,
            id_size,
            height_info,
            block_info,
        })
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    pub fn id_size(&self) -> usize {
        self.id_size
    }

    /// Height of the block named by `block_id`, as reported by the [`HeightInfo`].
    pub fn block_height(&self, block_id: &BlockID) -> Result<u64, HistoryError> {
        self.height_info
            .block_id_to_height(block_id)
            .map_err(HistoryError::HeightInfo)
    }

    /// The id of the block that produced `record`.
    pub fn id(&self, record: &[u8]) -> Result<BlockID, HistoryError> {
        Ok(BlockID::from_bytes(self.id_bytes(record)?)?)
    }

    /// Add `record` to the end of `log`. If the last record of `log` was produced by the same block
    /// as `record`, it is overwritten instead.
    pub fn add_record(&self, mut log: Vec<u8>, record: &[u8]) -> Result<Vec<u8>, HistoryError> {
        let record = self.check_record(record)?;
        self.check_alignment(&log)?;
        if log.len() < self.record_size {
            return Ok(record.to_vec());
        }
        if self.id_bytes(self.latest(&log)?)? == self.id_bytes(record)? {
            log.truncate(log.len() - self.record_size);
        }
        log.extend_from_slice(record);
        Ok(log)
    }

    /// The last record of `log`.
    pub fn latest<'l>(&self, log: &'l [u8]) -> Result<&'l [u8], HistoryError> {
        if log.len() < self.record_size {
            return Err(HistoryError::RecordTooShort {
                len: log.len(),
                record_size: self.record_size,
            });
        }
        Ok(&log[log.len() - self.record_size..])
    }

    /// Drop the trailing records of `log` that were produced by blocks no longer in the valid chain.
    /// Scanning stops at the newest record produced by a valid block: records before it are kept
    /// without being checked.
    pub fn filter(&self, mut log: Vec<u8>) -> Result<Vec<u8>, HistoryError> {
        self.check_alignment(&log)?;
        let mut end = log.len();
        while end >= self.record_size {
            let id = self.id(&log[end - self.record_size..end])?;
            if self
                .block_info
                .is_valid_block(&id)
                .map_err(HistoryError::BlockInfo)?
            {
                break;
            }
            end -= self.record_size;
        }
        log.truncate(end);
        Ok(log)
    }

    /// Drop the records of `log` produced by blocks deeper than the maximum rollback depth, keeping
    /// the newest of them so that the value at the rollback horizon still resolves. That record is
    /// dropped too when the oldest record within the horizon sits exactly at it.
    pub fn cut(&self, mut log: Vec<u8>) -> Result<Vec<u8>, HistoryError> {
        self.check_alignment(&log)?;
        if log.is_empty() {
            return Ok(log);
        }
        let current_height = self.height_info.height().map_err(HistoryError::HeightInfo)?;
        let rollback_max = self.height_info.rollback_max();

        let mut first_needed = 0;
        for start in (0..log.len()).step_by(self.record_size) {
            let id = self.id(&log[start..start + self.record_size])?;
            let block_height = self.block_height(&id)?;
            let depth = current_height.checked_sub(block_height).ok_or(
                HistoryError::HeightAboveCurrent {
                    block_height,
                    current_height,
                },
            )?;
            if depth > rollback_max {
                first_needed = start;
                continue;
            }
            if depth == rollback_max {
                first_needed = start;
            }
            break;
        }
        log.drain(..first_needed);
        Ok(log)
    }

    /// [`filter`](Self::filter) then [`cut`](Self::cut). Filtering has to come first, so that records
    /// of an abandoned fork are not mistaken for old history by the cut.
    pub fn normalize(&self, log: Vec<u8>) -> Result<Vec<u8>, HistoryError> {
        self.cut(self.filter(log)?)
    }

    fn check_record<'r>(&self, record: &'r [u8]) -> Result<&'r [u8], HistoryError> {
        if record.len() != self.record_size {
            return Err(HistoryError::InvalidRecordSize {
                len: record.len(),
                record_size: self.record_size,
            });
        }
        Ok(record)
    }

    fn id_bytes<'r>(&self, record: &'r [u8]) -> Result<&'r [u8], HistoryError> {
        let record = self.check_record(record)?;
        Ok(&record[self.record_size - self.id_size..])
    }

    fn check_alignment(&self, log: &[u8]) -> Result<(), HistoryError> {
        if log.len() % self.record_size != 0 {
            return Err(HistoryError::MisalignedLog {
                len: log.len(),
                record_size: self.record_size,
            });
        }
        Ok(())
    }
}

/// Errors returned by the [`HistoryFormatter`] and the [`HistoryStorage`](super::HistoryStorage).
#[derive(Debug)]
pub enum HistoryError {
    /// Ids must be 32 (digest) or 64 (signature) bytes long, and cannot be larger than the records
    /// that hold them.
    InvalidSize { record_size: usize, id_size: usize },

    /// A log expected to hold at least one record is shorter than one record.
    RecordTooShort { len: usize, record_size: usize },

    /// A record is not exactly one record size long.
    InvalidRecordSize { len: usize, record_size: usize },

    /// The length of a log is not a multiple of the record size.
    MisalignedLog { len: usize, record_size: usize },

    /// A value written to a history does not have the history's fixed value size.
    InvalidValueSize { len: usize, expected: usize },

    /// The id stored in a record is not a valid block id.
    InvalidBlockID(BlockIDError),

    /// A record claims to be produced by a block above the current height of the chain.
    HeightAboveCurrent {
        block_height: u64,
        current_height: u64,
    },

    /// The [`HeightInfo`] failed.
    HeightInfo(CollaboratorError),

    /// The [`BlockInfo`] failed.
    BlockInfo(CollaboratorError),
}

impl From<BlockIDError> for HistoryError {
    fn from(value: BlockIDError) -> Self {
        HistoryError::InvalidBlockID(value)
    }
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::InvalidSize {
                record_size,
                id_size,
            } => write!(
                f,
                "invalid history sizes: record size {}, id size {}",
                record_size, id_size
            ),
            HistoryError::RecordTooShort { len, record_size } => write!(
                f,
                "{} bytes is shorter than one {}-byte record",
                len, record_size
            ),
            HistoryError::InvalidRecordSize { len, record_size } => write!(
                f,
                "record of {} bytes, expected {}",
                len, record_size
            ),
            HistoryError::MisalignedLog { len, record_size } => write!(
                f,
                "history of {} bytes is not a sequence of {}-byte records",
                len, record_size
            ),
            HistoryError::InvalidValueSize { len, expected } => {
                write!(f, "value of {} bytes, expected {}", len, expected)
            }
            HistoryError::InvalidBlockID(err) => write!(f, "{}", err),
            HistoryError::HeightAboveCurrent {
                block_height,
                current_height,
            } => write!(
                f,
                "record block height {} is above current height {}",
                block_height, current_height
            ),
            HistoryError::HeightInfo(err) => write!(f, "height info: {}", err),
            HistoryError::BlockInfo(err) => write!(f, "block info: {}", err),
        }
    }
}

impl std::error::Error for HistoryError {}
