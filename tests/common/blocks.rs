//! Builders for ids, key blocks and microblocks.

use ed25519_dalek::SigningKey;
use rand_core::OsRng;

use ng_rs::types::{
    basic::{BlockHeight, BlockID, CryptoHash, SignatureBytes, Transaction, Transactions},
    block::{KeyBlock, MicroBlock},
    keypair::Keypair,
};

/// A digest id whose first eight bytes are `n`.
pub(crate) fn id(n: u64) -> BlockID {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&n.to_le_bytes());
    BlockID::Digest(CryptoHash::new(bytes))
}

/// An unsigned key block, for tests that only care about linkage.
pub(crate) fn key_block(id: BlockID, parent: BlockID) -> KeyBlock {
    KeyBlock {
        id,
        parent,
        height: BlockHeight::new(0),
        generator: [0u8; 32],
        signature: SignatureBytes::new([0u8; 64]),
        transactions: Transactions::default(),
    }
}

/// An unsigned microblock, for tests that only care about linkage.
pub(crate) fn micro_block(total_id: BlockID, reference: BlockID) -> MicroBlock {
    MicroBlock {
        total_id,
        reference,
        sender: [0u8; 32],
        signature: SignatureBytes::new([0u8; 64]),
        transactions: Transactions::default(),
    }
}

pub(crate) fn keypair() -> Keypair {
    Keypair::new(SigningKey::generate(&mut OsRng))
}

fn random_transactions() -> Transactions {
    Transactions::new(vec![Transaction::new(
        rand::random::<u64>().to_le_bytes().to_vec(),
    )])
}

pub(crate) fn signed_key_block(keypair: &Keypair, parent: BlockID, height: u64) -> KeyBlock {
    KeyBlock::new_signed(keypair, parent, BlockHeight::new(height), random_transactions())
}

/// A signed microblock with a random total id.
pub(crate) fn signed_micro_block(keypair: &Keypair, reference: BlockID) -> MicroBlock {
    MicroBlock::new_signed(keypair, reference, id(rand::random::<u64>()), random_transactions())
}
