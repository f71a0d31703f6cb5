use std::{
    collections::HashMap,
    sync::{
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc, Mutex,
    },
};

use ed25519_dalek::VerifyingKey;
use ng_rs::networking::{Message, Network};

/// A mock network stub which passes messages from and to threads using channels.
#[derive(Clone)]
pub(crate) struct NetworkStub {
    my_verifying_key: VerifyingKey,
    all_peers: HashMap<VerifyingKey, Sender<(VerifyingKey, Message)>>,
    inbox: Arc<Mutex<Receiver<(VerifyingKey, Message)>>>,
}

impl Network for NetworkStub {
    fn send(&mut self, peer: VerifyingKey, message: Message) {
        if let Some(peer) = self.all_peers.get(&peer) {
            let _ = peer.send((self.my_verifying_key, message));
        }
    }

    fn broadcast(&mut self, message: Message) {
        for (peer_key, peer) in &self.all_peers {
            if *peer_key != self.my_verifying_key {
                let _ = peer.send((self.my_verifying_key, message.clone()));
            }
        }
    }

    fn recv(&mut self) -> Option<(VerifyingKey, Message)> {
        match self.inbox.lock().unwrap().try_recv() {
            Ok(o_m) => Some(o_m),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => panic!(),
        }
    }
}

pub(crate) fn mock_network(peers: impl Iterator<Item = VerifyingKey>) -> Vec<NetworkStub> {
    let mut all_peers = HashMap::new();
    let peer_and_inboxes: Vec<(VerifyingKey, Receiver<(VerifyingKey, Message)>)> = peers
        .map(|peer| {
            let (sender, receiver) = mpsc::channel();
            all_peers.insert(peer, sender);

            (peer, receiver)
        })
        .collect();

    peer_and_inboxes
        .into_iter()
        .map(|(my_verifying_key, inbox)| NetworkStub {
            my_verifying_key,
            all_peers: all_peers.clone(),
            inbox: Arc::new(Mutex::new(inbox)),
        })
        .collect()
}

/// Who a [`RecordingNetwork`] message was addressed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Recipient {
    Peer(VerifyingKey),
    Everyone,
}

/// A network that never delivers anything, and records every message handed to it.
#[derive(Clone, Default)]
pub(crate) struct RecordingNetwork {
    sent: Arc<Mutex<Vec<(Recipient, Message)>>>,
}

impl RecordingNetwork {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn sent(&self) -> Vec<(Recipient, Message)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Network for RecordingNetwork {
    fn send(&mut self, peer: VerifyingKey, message: Message) {
        self.sent.lock().unwrap().push((Recipient::Peer(peer), message));
    }

    fn broadcast(&mut self, message: Message) {
        self.sent.lock().unwrap().push((Recipient::Everyone, message));
    }

    fn recv(&mut self) -> Option<(VerifyingKey, Message)> {
        None
    }
}
