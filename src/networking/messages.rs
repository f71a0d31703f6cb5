//! Exhaustive enumeration of the messages exchanged between NG nodes.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{
    basic::BlockID,
    block::{KeyBlock, MicroBlock, MicroBlockInv},
};

/// All message variants sent or received by the crate.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Message {
    /// A newly generated key block.
    KeyBlock(KeyBlock),

    /// A microblock, either pushed by its generator or sent in response to a [`MicroBlockRequest`].
    MicroBlock(MicroBlock),

    /// See [`MicroBlockInv`].
    MicroBlockInv(MicroBlockInv),

    /// See [`MicroBlockRequest`].
    MicroBlockRequest(MicroBlockRequest),
}

/// Asks the receiving peer to send the microblock whose total id is `total_id`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MicroBlockRequest {
    pub total_id: BlockID,
}

impl From<KeyBlock> for Message {
    fn from(value: KeyBlock) -> Self {
        Message::KeyBlock(value)
    }
}

impl From<MicroBlock> for Message {
    fn from(value: MicroBlock) -> Self {
        Message::MicroBlock(value)
    }
}

impl From<MicroBlockInv> for Message {
    fn from(value: MicroBlockInv) -> Self {
        Message::MicroBlockInv(value)
    }
}

impl From<MicroBlockRequest> for Message {
    fn from(value: MicroBlockRequest) -> Self {
        Message::MicroBlockRequest(value)
    }
}

impl Message {
    /// Name of the message variant, used when logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::KeyBlock(_) => "KeyBlock",
            Message::MicroBlock(_) => "MicroBlock",
            Message::MicroBlockInv(_) => "MicroBlockInv",
            Message::MicroBlockRequest(_) => "MicroBlockRequest",
        }
    }
}
