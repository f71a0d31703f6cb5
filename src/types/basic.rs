/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! "Inert" types that are passed around and inspected by every component of the crate, but have no
//! active behavior of their own. These types follow the newtype pattern.

use borsh::{BorshDeserialize, BorshSerialize};
use std::{
    fmt::{self, Debug, Display, Formatter},
    ops::{Add, AddAssign},
};

/// Height of a key block in the blockchain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub const fn new(int: u64) -> Self {
        Self(int)
    }

    pub const fn int(&self) -> u64 {
        self.0
    }

    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl Display for BlockHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl AddAssign<u64> for BlockHeight {
    fn add_assign(&mut self, rhs: u64) {
        self.0.add_assign(rhs)
    }
}

impl Add<u64> for BlockHeight {
    type Output = BlockHeight;
    fn add(self, rhs: u64) -> Self::Output {
        BlockHeight::new(self.0.add(rhs))
    }
}

/// A SHA256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct CryptoHash([u8; 32]);

impl CryptoHash {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for CryptoHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Debug for CryptoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The bytes of an Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct SignatureBytes([u8; 64]);

impl SignatureBytes {
    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 64] {
        self.0
    }
}

impl Debug for SignatureBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Names a key block, or the state reached after applying a microblock (its "total" id).
///
/// Key blocks signed by their generator are named by that signature. Blocks produced under
/// protocol versions that name blocks by the hash of their header use the `Digest` variant. Two ids
/// are equal iff their bytes are equal, so a `Signature` id never equals a `Digest` id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub enum BlockID {
    Signature(SignatureBytes),
    Digest(CryptoHash),
}

impl BlockID {
    pub const SIGNATURE_SIZE: usize = 64;
    pub const DIGEST_SIZE: usize = 32;

    /// Parse an id from its raw bytes. The length of `bytes` decides the variant.
    pub fn from_bytes(bytes: &[u8]) -> Result<BlockID, BlockIDError> {
        match bytes.len() {
            Self::SIGNATURE_SIZE => {
                let mut sig = [0u8; 64];
                sig.copy_from_slice(bytes);
                Ok(BlockID::Signature(SignatureBytes::new(sig)))
            }
            Self::DIGEST_SIZE => {
                let mut digest = [0u8; 32];
                digest.copy_from_slice(bytes);
                Ok(BlockID::Digest(CryptoHash::new(digest)))
            }
            len => Err(BlockIDError::InvalidLength { len }),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        match self {
            BlockID::Signature(sig) => sig.bytes().to_vec(),
            BlockID::Digest(digest) => digest.bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BlockID::Signature(_) => Self::SIGNATURE_SIZE,
            BlockID::Digest(_) => Self::DIGEST_SIZE,
        }
    }
}

impl From<SignatureBytes> for BlockID {
    fn from(sig: SignatureBytes) -> Self {
        BlockID::Signature(sig)
    }
}

impl From<CryptoHash> for BlockID {
    fn from(digest: CryptoHash) -> Self {
        BlockID::Digest(digest)
    }
}

impl Debug for BlockID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BlockID::Signature(sig) => write!(f, "Signature({:?})", sig),
            BlockID::Digest(digest) => write!(f, "Digest({:?})", digest),
        }
    }
}

impl Display for BlockID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BlockIDError {
    /// Block ids are either 32 (digest) or 64 (signature) bytes long.
    InvalidLength { len: usize },
}

impl Display for BlockIDError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BlockIDError::InvalidLength { len } => write!(
                f,
                "block id must be {} or {} bytes long, got {}",
                BlockID::DIGEST_SIZE,
                BlockID::SIGNATURE_SIZE,
                len
            ),
        }
    }
}

impl std::error::Error for BlockIDError {}

/// Opaque, already-serialized transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct Transaction(Vec<u8>);

impl Transaction {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> &Vec<u8> {
        &self.0
    }
}

/// The transaction payload of a key block or a microblock.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct Transactions(Vec<Transaction>);

impl Transactions {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self(transactions)
    }

    pub const fn vec(&self) -> &Vec<Transaction> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.0.iter()
    }
}
