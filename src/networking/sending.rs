//! The outbound half of NG message handling.

use ed25519_dalek::VerifyingKey;

use crate::types::{
    basic::BlockID,
    block::{MicroBlock, MicroBlockInv},
};

use super::{
    messages::{Message, MicroBlockRequest},
    network::Network,
};

/// Sends the messages the NG handlers produce through a [`Network`]: microblock requests to the peer
/// that announced a microblock, microblocks back to the peer that asked for them, and announcements to
/// everyone.
#[derive(Clone)]
pub(crate) struct SenderHandle<N: Network> {
    network: N,
}

impl<N: Network> SenderHandle<N> {
    pub(crate) fn new(network: N) -> Self {
        Self { network }
    }

    /// Ask `peer` for the microblock whose total id is `total_id`.
    pub(crate) fn request_micro_block(&mut self, peer: VerifyingKey, total_id: BlockID) {
        self.send(peer, MicroBlockRequest { total_id })
    }

    /// Answer a [`MicroBlockRequest`] from `peer`.
    pub(crate) fn serve_micro_block(&mut self, peer: VerifyingKey, micro: MicroBlock) {
        self.send(peer, micro)
    }

    /// Tell every peer that this node holds the microblock named in `inv`.
    pub(crate) fn announce(&mut self, inv: MicroBlockInv) {
        self.network.broadcast(inv.into())
    }

    fn send<S: Into<Message>>(&mut self, peer: VerifyingKey, msg: S) {
        self.network.send(peer, msg.into())
    }
}
