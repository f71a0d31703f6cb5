/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for key blocks, microblocks, and microblock inventory announcements.
//!
//! Every type here is signed by the generator that produced it. The bytes that get signed are a
//! fixed, length-prefixed concatenation of the type's fields (see `signing_bytes` on each type), so
//! that two nodes always agree on them regardless of how the type is later serialized on the wire.

use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256 as CryptoHasher};

use crate::types::{basic::*, keypair::Keypair};

/// A full block produced by the generator of a protocol slot.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct KeyBlock {
    pub id: BlockID,
    /// The key block or microblock total id this block extends.
    pub parent: BlockID,
    pub height: BlockHeight,
    pub generator: [u8; 32],
    pub signature: SignatureBytes,
    pub transactions: Transactions,
}

impl KeyBlock {
    /// Create a key block named by its generator's signature.
    pub fn new_signed(
        keypair: &Keypair,
        parent: BlockID,
        height: BlockHeight,
        transactions: Transactions,
    ) -> KeyBlock {
        let generator = keypair.public_bytes();
        let signature =
            keypair.sign(&Self::signing_bytes(&parent, height, &generator, &transactions));
        KeyBlock {
            id: BlockID::Signature(signature),
            parent,
            height,
            generator,
            signature,
            transactions,
        }
    }

    /// Create a key block named by the digest of its signed header.
    pub fn new_signed_with_digest_id(
        keypair: &Keypair,
        parent: BlockID,
        height: BlockHeight,
        transactions: Transactions,
    ) -> KeyBlock {
        let mut block = Self::new_signed(keypair, parent, height, transactions);
        block.id = BlockID::Digest(block.header_digest());
        block
    }

    pub fn signing_bytes(
        parent: &BlockID,
        height: BlockHeight,
        generator: &[u8; 32],
        transactions: &Transactions,
    ) -> Vec<u8> {
        let mut bytes = Vec::new();
        put_id(&mut bytes, parent);
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.extend_from_slice(generator);
        put_transactions(&mut bytes, transactions);
        bytes
    }

    /// SHA256 over the signed header followed by the generator's signature.
    pub fn header_digest(&self) -> CryptoHash {
        let mut hasher = CryptoHasher::new();
        hasher.update(Self::signing_bytes(
            &self.parent,
            self.height,
            &self.generator,
            &self.transactions,
        ));
        hasher.update(self.signature.bytes());
        CryptoHash::new(hasher.finalize().into())
    }

    /// Checks that the generator's signature is valid and that `id` is derived from it.
    pub fn is_correct(&self) -> bool {
        let id_matches = match &self.id {
            BlockID::Signature(sig) => *sig == self.signature,
            BlockID::Digest(digest) => *digest == self.header_digest(),
        };
        id_matches
            && verify(
                &self.generator,
                &Self::signing_bytes(&self.parent, self.height, &self.generator, &self.transactions),
                &self.signature,
            )
    }
}

/// An incremental extension of the latest key block, produced between protocol slots.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MicroBlock {
    /// Id of the block obtained by applying this microblock on top of `reference`.
    pub total_id: BlockID,
    /// The key block id or previous microblock total id this microblock extends.
    pub reference: BlockID,
    pub sender: [u8; 32],
    pub signature: SignatureBytes,
    pub transactions: Transactions,
}

impl MicroBlock {
    pub fn new_signed(
        keypair: &Keypair,
        reference: BlockID,
        total_id: BlockID,
        transactions: Transactions,
    ) -> MicroBlock {
        let sender = keypair.public_bytes();
        let signature =
            keypair.sign(&Self::signing_bytes(&reference, &total_id, &sender, &transactions));
        MicroBlock {
            total_id,
            reference,
            sender,
            signature,
            transactions,
        }
    }

    pub fn signing_bytes(
        reference: &BlockID,
        total_id: &BlockID,
        sender: &[u8; 32],
        transactions: &Transactions,
    ) -> Vec<u8> {
        let mut bytes = Vec::new();
        put_id(&mut bytes, reference);
        put_id(&mut bytes, total_id);
        bytes.extend_from_slice(sender);
        put_transactions(&mut bytes, transactions);
        bytes
    }

    pub fn is_correct(&self) -> bool {
        verify(
            &self.sender,
            &Self::signing_bytes(&self.reference, &self.total_id, &self.sender, &self.transactions),
            &self.signature,
        )
    }

    /// Build the inventory announcement for this microblock, signed by `keypair`.
    pub fn inv(&self, keypair: &Keypair) -> MicroBlockInv {
        MicroBlockInv::new_signed(keypair, self.total_id, self.reference)
    }
}

/// Announcement that the sender holds the microblock named by `total_id`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MicroBlockInv {
    pub sender: [u8; 32],
    pub total_id: BlockID,
    pub reference: BlockID,
    pub signature: SignatureBytes,
}

impl MicroBlockInv {
    pub fn new_signed(keypair: &Keypair, total_id: BlockID, reference: BlockID) -> MicroBlockInv {
        let sender = keypair.public_bytes();
        let signature = keypair.sign(&Self::signing_bytes(&sender, &total_id, &reference));
        MicroBlockInv {
            sender,
            total_id,
            reference,
            signature,
        }
    }

    pub fn signing_bytes(sender: &[u8; 32], total_id: &BlockID, reference: &BlockID) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(sender);
        put_id(&mut bytes, total_id);
        put_id(&mut bytes, reference);
        bytes
    }

    pub fn is_correct(&self) -> bool {
        verify(
            &self.sender,
            &Self::signing_bytes(&self.sender, &self.total_id, &self.reference),
            &self.signature,
        )
    }
}

fn put_id(bytes: &mut Vec<u8>, id: &BlockID) {
    bytes.push(id.len() as u8);
    bytes.extend_from_slice(&id.bytes());
}

fn put_transactions(bytes: &mut Vec<u8>, transactions: &Transactions) {
    bytes.extend_from_slice(&(transactions.len() as u32).to_le_bytes());
    for tx in transactions.iter() {
        bytes.extend_from_slice(&(tx.bytes().len() as u32).to_le_bytes());
        bytes.extend_from_slice(tx.bytes());
    }
}

fn verify(public_key: &[u8; 32], message: &[u8], signature: &SignatureBytes) -> bool {
    match VerifyingKey::from_bytes(public_key) {
        Ok(verifying_key) => verifying_key
            .verify(message, &Signature::from_bytes(&signature.bytes()))
            .is_ok(),
        Err(_) => false,
    }
}
